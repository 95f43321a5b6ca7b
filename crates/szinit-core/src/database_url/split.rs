//! Generic URL component split and compose.
//!
//! Follows the classic six-part model `scheme://netloc/path;params?query#fragment`
//! rather than WHATWG parsing: nothing is percent-encoded or normalized (apart from
//! the scheme being lowercased), so components can be recomposed byte-for-byte.

/// Schemes whose last path segment may carry `;params`.
const USES_PARAMS: &[&str] = &[
    "", "ftp", "hdl", "prospero", "http", "imap", "https", "shttp", "rtsp", "rtspu", "sip",
    "sips", "mms", "sftp", "tel",
];

/// Schemes that get a `//` authority prefix even when the netloc is empty.
const USES_NETLOC: &[&str] = &[
    "", "ftp", "http", "gopher", "nntp", "telnet", "imap", "wais", "file", "mms", "https",
    "shttp", "snews", "prospero", "rtsp", "rtspu", "rsync", "svn", "svn+ssh", "sftp", "nfs",
    "git", "git+ssh", "ws", "wss",
];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct UrlParts {
    pub scheme: String,
    pub netloc: String,
    pub path: String,
    pub params: String,
    pub query: String,
    pub fragment: String,
}

/// Credentials and host decomposed from a netloc. Empty pieces are `None`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Authority {
    pub username: Option<String>,
    pub password: Option<String>,
    pub hostname: Option<String>,
    pub port: Option<String>,
}

fn is_scheme_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')
}

pub(crate) fn split(url: &str) -> UrlParts {
    let mut rest = url;
    let mut parts = UrlParts::default();

    if let Some(i) = rest.find(':') {
        let candidate = &rest[..i];
        if candidate.starts_with(|c: char| c.is_ascii_alphabetic())
            && candidate.chars().all(is_scheme_char)
        {
            parts.scheme = candidate.to_ascii_lowercase();
            rest = &rest[i + 1..];
        }
    }

    if let Some(after) = rest.strip_prefix("//") {
        let end = after
            .find(|c| matches!(c, '/' | '?' | '#'))
            .unwrap_or(after.len());
        parts.netloc = after[..end].to_string();
        rest = &after[end..];
    }

    if let Some((before, fragment)) = rest.split_once('#') {
        parts.fragment = fragment.to_string();
        rest = before;
    }

    if let Some((before, query)) = rest.split_once('?') {
        parts.query = query.to_string();
        rest = before;
    }

    if USES_PARAMS.contains(&parts.scheme.as_str()) && rest.contains(';') {
        let (path, params) = split_params(rest);
        parts.path = path.to_string();
        parts.params = params.to_string();
    } else {
        parts.path = rest.to_string();
    }

    parts
}

/// Params start at the first `;` of the last path segment.
fn split_params(url: &str) -> (&str, &str) {
    let search_from = url.rfind('/').unwrap_or(0);
    match url[search_from..].find(';') {
        Some(offset) => {
            let i = search_from + offset;
            (&url[..i], &url[i + 1..])
        }
        None => (url, ""),
    }
}

pub(crate) fn compose(parts: &UrlParts) -> String {
    let mut path = parts.path.clone();
    if !parts.params.is_empty() {
        path = format!("{};{}", path, parts.params);
    }

    if !parts.netloc.is_empty()
        || (!parts.scheme.is_empty()
            && USES_NETLOC.contains(&parts.scheme.as_str())
            && !path.starts_with("//"))
    {
        if !path.is_empty() && !path.starts_with('/') {
            path.insert(0, '/');
        }
        path = format!("//{}{}", parts.netloc, path);
    }

    let mut out = if parts.scheme.is_empty() {
        path
    } else {
        format!("{}:{}", parts.scheme, path)
    };
    if !parts.query.is_empty() {
        out.push('?');
        out.push_str(&parts.query);
    }
    if !parts.fragment.is_empty() {
        out.push('#');
        out.push_str(&parts.fragment);
    }
    out
}

/// Splits `user:pass@host:port`. The last `@` separates credentials and the
/// first `:` after it starts the port.
pub(crate) fn authority(netloc: &str) -> Authority {
    let (userinfo, hostinfo) = match netloc.rsplit_once('@') {
        Some((userinfo, hostinfo)) => (Some(userinfo), hostinfo),
        None => (None, netloc),
    };

    let (username, password) = match userinfo {
        Some(info) => match info.split_once(':') {
            Some((user, pass)) => (Some(user), Some(pass)),
            None => (Some(info), None),
        },
        None => (None, None),
    };

    let (hostname, port) = hostinfo.split_once(':').unwrap_or((hostinfo, ""));

    let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
    Authority {
        username: username.map(str::to_string),
        password: password.map(str::to_string),
        hostname: non_empty(hostname),
        port: non_empty(port),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_full_url() {
        let p = split("mysql://user:pw@db.local:3306/G2?ssl=1#frag");
        assert_eq!(p.scheme, "mysql");
        assert_eq!(p.netloc, "user:pw@db.local:3306");
        assert_eq!(p.path, "/G2");
        assert_eq!(p.query, "ssl=1");
        assert_eq!(p.fragment, "frag");
        assert_eq!(p.params, "");
    }

    #[test]
    fn split_lowercases_scheme_only() {
        let p = split("PostgreSQL://U:P@Host:5432/DB");
        assert_eq!(p.scheme, "postgresql");
        assert_eq!(p.netloc, "U:P@Host:5432");
        assert_eq!(p.path, "/DB");
    }

    #[test]
    fn params_only_for_param_schemes() {
        let p = split("http://h/a;b/c;d");
        assert_eq!(p.path, "/a;b/c");
        assert_eq!(p.params, "d");

        let p = split("db2://u:p@G2;x");
        assert_eq!(p.netloc, "u:p@G2;x");
        assert_eq!(p.params, "");
    }

    #[test]
    fn compose_without_netloc_for_db_scheme() {
        let p = split("sqlite3:///tmp/G2C.db");
        assert_eq!(p.netloc, "");
        assert_eq!(compose(&p), "sqlite3:/tmp/G2C.db");
    }

    #[test]
    fn compose_round_trips_typical_urls() {
        for url in [
            "sqlite3://na:na@/var/opt/senzing/sqlite/G2C.db",
            "mysql://u:p@h:3306/?schema=G2",
            "postgresql://u:p@h:5432:G2/",
            "db2://u:p@G2",
            "http://h/a;b?c=d#e",
        ] {
            assert_eq!(compose(&split(url)), url);
        }
    }

    #[test]
    fn authority_variants() {
        let a = authority("na:na@");
        assert_eq!(a.username.as_deref(), Some("na"));
        assert_eq!(a.password.as_deref(), Some("na"));
        assert_eq!(a.hostname, None);
        assert_eq!(a.port, None);

        let a = authority("user@host");
        assert_eq!(a.username.as_deref(), Some("user"));
        assert_eq!(a.password, None);
        assert_eq!(a.hostname.as_deref(), Some("host"));

        let a = authority("u:p:q@h@x:50000");
        assert_eq!(a.username.as_deref(), Some("u"));
        assert_eq!(a.password.as_deref(), Some("p:q@h"));
        assert_eq!(a.hostname.as_deref(), Some("x"));
        assert_eq!(a.port.as_deref(), Some("50000"));
    }
}
