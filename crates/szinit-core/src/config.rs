//! Run configuration: defaults, optional TOML file, environment, command line.
//!
//! Each source is expressed as an [`Overrides`] layer; later layers win.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::database_url::{self, DatabaseUrlError};

pub const DEFAULT_DATABASE_URL: &str = "sqlite3://na:na@/var/opt/senzing/sqlite/G2C.db";

/// Environment variable naming an explicit config file.
pub const CONFIG_FILE_ENV: &str = "SENZING_INIT_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a non-negative integer, got '{value}'")]
    InvalidInteger { name: &'static str, value: String },
    #[error("read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("locate config directory")]
    Xdg(#[from] xdg::BaseDirectoriesError),
}

/// Locations of third-party database driver files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverPaths {
    /// Db2 CLI driver `cfg` directory.
    pub db2_cfg_dir: PathBuf,
    /// MS SQL ODBC driver `etc` directory.
    pub odbc_dir: PathBuf,
    /// Template used to render `odbc.ini`.
    pub odbc_template: PathBuf,
    /// Where the built-in `odbc.ini` template is written when none is installed.
    pub scratch_dir: PathBuf,
}

impl Default for DriverPaths {
    fn default() -> Self {
        Self {
            db2_cfg_dir: PathBuf::from("/opt/IBM/db2/clidriver/cfg"),
            odbc_dir: PathBuf::from("/opt/microsoft/msodbcsql17/etc"),
            odbc_template: PathBuf::from("/etc/odbc.ini.mssql-template"),
            scratch_dir: PathBuf::from("/tmp"),
        }
    }
}

impl DriverPaths {
    pub fn db2_template(&self) -> PathBuf {
        self.db2_cfg_dir.join("db2dsdriver.cfg.senzing-template")
    }

    pub fn db2_cfg(&self) -> PathBuf {
        self.db2_cfg_dir.join("db2dsdriver.cfg")
    }

    pub fn odbc_ini(&self) -> PathBuf {
        self.odbc_dir.join("odbc.ini")
    }
}

/// Fully resolved configuration for one command run.
#[derive(Debug, Clone, Serialize)]
pub struct InitConfig {
    pub data_dir: PathBuf,
    pub etc_dir: PathBuf,
    pub g2_dir: PathBuf,
    pub var_dir: PathBuf,
    /// Generic database URL.
    pub database_url: Option<String>,
    /// Driver-specific URL; derived from `database_url` when unset.
    pub database_url_raw: Option<String>,
    pub engine_configuration_json: Option<String>,
    pub db2dsdriver_cfg_contents: Option<String>,
    pub mssql_odbc_ini_contents: Option<String>,
    pub debug: bool,
    pub delay_in_seconds: u64,
    pub sleep_time_in_seconds: u64,
    pub enable_db2: bool,
    pub enable_mssql: bool,
    pub enable_mysql: bool,
    pub enable_postgresql: bool,
    pub uid: u32,
    pub gid: u32,
    pub license_base64_encoded: Option<String>,
    pub api_server_key_store_base64_encoded: Option<String>,
    pub api_server_client_key_store_base64_encoded: Option<String>,
    pub g2_config_gtc: Option<String>,
    pub update_ini_files: bool,
    pub driver_paths: DriverPaths,
}

impl Default for InitConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("/opt/senzing/data"),
            etc_dir: PathBuf::from("/etc/opt/senzing"),
            g2_dir: PathBuf::from("/opt/senzing/g2"),
            var_dir: PathBuf::from("/var/opt/senzing"),
            database_url: Some(DEFAULT_DATABASE_URL.to_string()),
            database_url_raw: None,
            engine_configuration_json: None,
            db2dsdriver_cfg_contents: None,
            mssql_odbc_ini_contents: None,
            debug: false,
            delay_in_seconds: 0,
            sleep_time_in_seconds: 0,
            enable_db2: false,
            enable_mssql: false,
            enable_mysql: false,
            enable_postgresql: false,
            uid: 1001,
            gid: 1001,
            license_base64_encoded: None,
            api_server_key_store_base64_encoded: None,
            api_server_client_key_store_base64_encoded: None,
            g2_config_gtc: None,
            update_ini_files: false,
            driver_paths: DriverPaths::default(),
        }
    }
}

/// One configuration layer. `None` leaves the lower layer's value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub etc_dir: Option<PathBuf>,
    pub g2_dir: Option<PathBuf>,
    pub var_dir: Option<PathBuf>,
    pub database_url: Option<String>,
    pub database_url_raw: Option<String>,
    pub engine_configuration_json: Option<String>,
    pub db2dsdriver_cfg_contents: Option<String>,
    pub mssql_odbc_ini_contents: Option<String>,
    pub debug: Option<bool>,
    pub delay_in_seconds: Option<u64>,
    pub sleep_time_in_seconds: Option<u64>,
    pub enable_db2: Option<bool>,
    pub enable_mssql: Option<bool>,
    pub enable_mysql: Option<bool>,
    pub enable_postgresql: Option<bool>,
    pub uid: Option<u32>,
    pub gid: Option<u32>,
    pub license_base64_encoded: Option<String>,
    pub api_server_key_store_base64_encoded: Option<String>,
    pub api_server_client_key_store_base64_encoded: Option<String>,
    pub g2_config_gtc: Option<String>,
    pub update_ini_files: Option<bool>,
    /// Only settable from the config file.
    pub driver_paths: Option<DriverPaths>,
}

/// `true`, `1`, `t`, `y`, `yes` (any case) are true; everything else is false.
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "true" | "1" | "t" | "y" | "yes"
    )
}

fn parse_int<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidInteger {
            name,
            value: value.to_string(),
        })
}

impl Overrides {
    /// Reads `SENZING_*` variables through `lookup`. Empty values are ignored.
    pub fn from_env<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let path = |name: &str| get(name).map(PathBuf::from);
        let flag = |name: &str| get(name).map(|v| parse_bool(&v));

        Ok(Self {
            data_dir: path("SENZING_DATA_DIR"),
            etc_dir: path("SENZING_ETC_DIR"),
            g2_dir: path("SENZING_G2_DIR"),
            var_dir: path("SENZING_VAR_DIR"),
            database_url: get("SENZING_DATABASE_URL"),
            database_url_raw: get("SENZING_DATABASE_URL_RAW"),
            engine_configuration_json: get("SENZING_ENGINE_CONFIGURATION_JSON"),
            db2dsdriver_cfg_contents: get(
                "SENZING_OPT_IBM_DB2_CLIDRIVER_CFG_DB2DSDRIVER_CFG_CONTENTS",
            ),
            mssql_odbc_ini_contents: get("SENZING_OPT_MICROSOFT_MSODBCSQL17_ETC_ODBC_INI_CONTENTS"),
            debug: flag("SENZING_DEBUG"),
            delay_in_seconds: get("SENZING_DELAY_IN_SECONDS")
                .map(|v| parse_int("SENZING_DELAY_IN_SECONDS", &v))
                .transpose()?,
            sleep_time_in_seconds: get("SENZING_SLEEP_TIME_IN_SECONDS")
                .map(|v| parse_int("SENZING_SLEEP_TIME_IN_SECONDS", &v))
                .transpose()?,
            enable_db2: flag("SENZING_ENABLE_DB2"),
            enable_mssql: flag("SENZING_ENABLE_MSSQL"),
            enable_mysql: flag("SENZING_ENABLE_MYSQL"),
            enable_postgresql: flag("SENZING_ENABLE_POSTGRESQL"),
            uid: get("SENZING_UID")
                .map(|v| parse_int("SENZING_UID", &v))
                .transpose()?,
            gid: get("SENZING_GID")
                .map(|v| parse_int("SENZING_GID", &v))
                .transpose()?,
            license_base64_encoded: get("SENZING_LICENSE_BASE64_ENCODED"),
            api_server_key_store_base64_encoded: get(
                "SENZING_API_SERVER_KEY_STORE_BASE64_ENCODED",
            ),
            api_server_client_key_store_base64_encoded: get(
                "SENZING_API_SERVER_CLIENT_KEY_STORE_BASE64_ENCODED",
            ),
            g2_config_gtc: get("SENZING_G2CONFIG_GTC"),
            update_ini_files: flag("SENZING_UPDATE_INI_FILES"),
            driver_paths: None,
        })
    }

    /// Loads a TOML layer from disk.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl InitConfig {
    /// Applies a layer on top of the current values.
    pub fn apply(&mut self, layer: Overrides) {
        macro_rules! take {
            ($($field:ident),* $(,)?) => {
                $(if let Some(v) = layer.$field { self.$field = v; })*
            };
        }
        macro_rules! take_opt {
            ($($field:ident),* $(,)?) => {
                $(if let Some(v) = layer.$field { self.$field = Some(v); })*
            };
        }

        take!(
            data_dir,
            etc_dir,
            g2_dir,
            var_dir,
            debug,
            delay_in_seconds,
            sleep_time_in_seconds,
            enable_db2,
            enable_mssql,
            enable_mysql,
            enable_postgresql,
            uid,
            gid,
            update_ini_files,
            driver_paths,
        );
        take_opt!(
            database_url,
            database_url_raw,
            engine_configuration_json,
            db2dsdriver_cfg_contents,
            mssql_odbc_ini_contents,
            license_base64_encoded,
            api_server_key_store_base64_encoded,
            api_server_client_key_store_base64_encoded,
            g2_config_gtc,
        );
    }

    /// Driver-specific URL: the explicit raw URL, else derived from the generic one.
    pub fn specific_database_url(&self) -> Result<Option<String>, DatabaseUrlError> {
        if let Some(raw) = &self.database_url_raw {
            return Ok(Some(raw.clone()));
        }
        self.database_url
            .as_deref()
            .map(database_url::specific_url)
            .transpose()
    }

    /// JSON for entry/exit log lines, with secrets removed.
    pub fn redacted_json(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(map) = value.as_object_mut() {
            for key in [
                "database_url",
                "database_url_raw",
                "engine_configuration_json",
                "license_base64_encoded",
                "api_server_key_store_base64_encoded",
                "api_server_client_key_store_base64_encoded",
            ] {
                map.remove(key);
            }
            if let Some(redacted) = self
                .database_url
                .as_deref()
                .and_then(|url| database_url::redacted_url(url).ok())
            {
                map.insert("database_url_redacted".into(), redacted.into());
            }
        }
        value
    }
}

/// Config file to use, if any: `$SENZING_INIT_CONFIG`, else an existing
/// `$XDG_CONFIG_HOME/szinit/config.toml`. Nothing is created.
pub fn config_path<F>(lookup: F) -> Result<Option<PathBuf>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(explicit) = lookup(CONFIG_FILE_ENV).filter(|v| !v.is_empty()) {
        return Ok(Some(PathBuf::from(explicit)));
    }
    let xdg_dirs = xdg::BaseDirectories::with_prefix("szinit")?;
    Ok(xdg_dirs.find_config_file("config.toml"))
}

/// Options for [`resolve`].
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Drop the built-in sqlite URL so only an explicit URL counts.
    pub without_default_database_url: bool,
}

/// Defaults < config file < environment < command line.
pub fn resolve<F>(
    file: Option<&Path>,
    lookup: F,
    cli: Overrides,
    options: &ResolveOptions,
) -> Result<InitConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = InitConfig::default();
    if options.without_default_database_url {
        cfg.database_url = None;
    }
    if let Some(path) = file {
        cfg.apply(Overrides::from_file(path)?);
        tracing::debug!("applied config file {}", path.display());
    }
    cfg.apply(Overrides::from_env(lookup)?);
    cfg.apply(cli);
    Ok(cfg)
}
