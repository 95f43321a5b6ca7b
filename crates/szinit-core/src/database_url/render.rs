//! Driver-specific ("specific") and redacted renderings of a parsed URL.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{parse, DatabaseUrlError, ParsedUrl};

/// Placeholder written in place of credentials in log-safe renderings.
pub const REDACTED: &str = "xxxxxxxx";

/// Database schemes with a driver-specific rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseScheme {
    Sqlite3,
    Mysql,
    Postgresql,
    Db2,
    Mssql,
}

impl DatabaseScheme {
    pub const ALL: [DatabaseScheme; 5] = [
        DatabaseScheme::Sqlite3,
        DatabaseScheme::Mysql,
        DatabaseScheme::Postgresql,
        DatabaseScheme::Db2,
        DatabaseScheme::Mssql,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DatabaseScheme::Sqlite3 => "sqlite3",
            DatabaseScheme::Mysql => "mysql",
            DatabaseScheme::Postgresql => "postgresql",
            DatabaseScheme::Db2 => "db2",
            DatabaseScheme::Mssql => "mssql",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

impl fmt::Display for DatabaseScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders the connection string the driver for `scheme` expects.
pub fn render_for_scheme(parsed: &ParsedUrl, scheme: &str) -> Result<String, DatabaseUrlError> {
    let scheme = resolve(parsed, scheme)?;
    let (user, pass) = (parsed.username.as_str(), parsed.password.as_str());
    Ok(match scheme {
        DatabaseScheme::Sqlite3 => format!("sqlite3://{}{}", parsed.netloc, parsed.path),
        _ => with_credentials(parsed, scheme, user, pass),
    })
}

/// Same dispatch as [`render_for_scheme`] with credentials replaced by [`REDACTED`].
pub fn render_redacted(parsed: &ParsedUrl, scheme: &str) -> Result<String, DatabaseUrlError> {
    let scheme = resolve(parsed, scheme)?;
    Ok(with_credentials(parsed, scheme, REDACTED, REDACTED))
}

fn with_credentials(parsed: &ParsedUrl, scheme: DatabaseScheme, user: &str, pass: &str) -> String {
    let host = &parsed.hostname;
    let port = parsed.port_or_empty();
    let schema = &parsed.schema;
    match scheme {
        DatabaseScheme::Mysql => format!("mysql://{user}:{pass}@{host}:{port}/?schema={schema}"),
        DatabaseScheme::Postgresql => {
            format!("postgresql://{user}:{pass}@{host}:{port}:{schema}/")
        }
        DatabaseScheme::Db2 => format!("db2://{user}:{pass}@{schema}"),
        DatabaseScheme::Mssql => format!("mssql://{user}:{pass}@{schema}"),
        // netloc carries the credentials, so this form is rebuilt from the path.
        DatabaseScheme::Sqlite3 => format!("sqlite3://{user}:{pass}@{}", parsed.path),
    }
}

fn resolve(parsed: &ParsedUrl, scheme: &str) -> Result<DatabaseScheme, DatabaseUrlError> {
    DatabaseScheme::from_name(scheme).ok_or_else(|| DatabaseUrlError::UnknownScheme {
        scheme: scheme.to_string(),
        url: parsed.mask_credentials(parsed.original()),
    })
}

/// Everything before the first `:`; no parsing or validation.
pub fn extract_scheme(url: &str) -> &str {
    url.split(':').next().unwrap_or(url)
}

/// Generic URL to driver-specific URL, using the URL's own scheme.
pub fn specific_url(generic: &str) -> Result<String, DatabaseUrlError> {
    let parsed = parse(generic)?;
    render_for_scheme(&parsed, &parsed.scheme)
}

/// Generic URL to its log-safe rendering.
pub fn redacted_url(generic: &str) -> Result<String, DatabaseUrlError> {
    let parsed = parse(generic)?;
    render_redacted(&parsed, &parsed.scheme)
}
