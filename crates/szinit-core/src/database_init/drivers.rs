//! Db2 and MS SQL client driver configuration files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::{template, DatabaseInitError};
use crate::config::InitConfig;
use crate::database_url::ParsedUrl;
use crate::files::{self, BackupOutcome};
use crate::messages;

/// Used when no `odbc.ini` template is installed.
pub const MSSQL_ODBC_TEMPLATE: &str = "\
[{schema}]
Database = G2
Description = Senzing MS SQL database for G2
Driver = ODBC Driver 17 for SQL Server
Server = {hostname},{port}
";

const MSSQL_TEMPLATE_NAME: &str = "odbc.ini.mssql-template";

fn warn_missing(path: &Path) {
    tracing::warn!("{} {} - File is missing.", messages::warning(510), path.display());
}

fn render_file(path: &Path, parsed: Option<&ParsedUrl>) -> Result<String> {
    let parsed = parsed.ok_or(DatabaseInitError::MissingDatabaseUrl)?;
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    template::render(&text, |name| parsed.field(name))
        .with_context(|| format!("render {}", path.display()))
}

fn driver_contents(
    cfg: &InitConfig,
    template_path: &Path,
    parsed: Option<&ParsedUrl>,
    explicit: Option<&str>,
    missing: DatabaseInitError,
) -> Result<String> {
    if cfg.engine_configuration_json.is_some() {
        return match explicit {
            Some(contents) => Ok(contents.to_string()),
            None => {
                tracing::error!("{} {}", messages::error(missing.message_index()), missing);
                Err(missing.into())
            }
        };
    }
    render_file(template_path, parsed)
}

/// Contents `db2dsdriver.cfg` would get, or `None` when no template is installed.
pub fn db2_driver_config(cfg: &InitConfig, parsed: Option<&ParsedUrl>) -> Result<Option<String>> {
    let template_path = cfg.driver_paths.db2_template();
    if !template_path.exists() {
        return Ok(None);
    }
    driver_contents(
        cfg,
        &template_path,
        parsed,
        cfg.db2dsdriver_cfg_contents.as_deref(),
        DatabaseInitError::MissingDriverContents {
            file: "db2dsdriver.cfg",
            variable: "SENZING_OPT_IBM_DB2_CLIDRIVER_CFG_DB2DSDRIVER_CFG_CONTENTS",
        },
    )
    .map(Some)
}

pub fn initialize_db2(cfg: &InitConfig, parsed: Option<&ParsedUrl>) -> Result<Option<BackupOutcome>> {
    tracing::info!("{} Initializing for Db2", messages::info(183));
    let Some(contents) = db2_driver_config(cfg, parsed)? else {
        warn_missing(&cfg.driver_paths.db2_template());
        return Ok(None);
    };
    let output = cfg.driver_paths.db2_cfg();
    log_generated(&output, &cfg.driver_paths.db2_template());
    files::write_with_backup(&output, &contents).map(Some)
}

/// Installed template, or the built-in one written to the scratch dir.
fn mssql_template(cfg: &InitConfig) -> Result<PathBuf> {
    let installed = &cfg.driver_paths.odbc_template;
    if installed.exists() {
        return Ok(installed.clone());
    }
    warn_missing(installed);
    let fallback = cfg.driver_paths.scratch_dir.join(MSSQL_TEMPLATE_NAME);
    tracing::info!("{} {} - Creating file", messages::info(157), fallback.display());
    fs::write(&fallback, MSSQL_ODBC_TEMPLATE)
        .with_context(|| format!("write {}", fallback.display()))?;
    Ok(fallback)
}

pub fn initialize_mssql(cfg: &InitConfig, parsed: Option<&ParsedUrl>) -> Result<BackupOutcome> {
    tracing::info!("{} Initializing for MS SQL", messages::info(184));
    let template_path = mssql_template(cfg)?;

    let output_dir = &cfg.driver_paths.odbc_dir;
    if !output_dir.exists() {
        tracing::info!("{} {} - Creating directory", messages::info(162), output_dir.display());
        fs::create_dir_all(output_dir).with_context(|| {
            format!(
                "{} Could not create '{}' directory",
                messages::error(702),
                output_dir.display()
            )
        })?;
    }

    let contents = driver_contents(
        cfg,
        &template_path,
        parsed,
        cfg.mssql_odbc_ini_contents.as_deref(),
        DatabaseInitError::MissingDriverContents {
            file: "odbc.ini",
            variable: "SENZING_OPT_MICROSOFT_MSODBCSQL17_ETC_ODBC_INI_CONTENTS",
        },
    )?;
    let output = cfg.driver_paths.odbc_ini();
    log_generated(&output, &template_path);
    files::write_with_backup(&output, &contents)
}

fn log_generated(output: &Path, template: &Path) {
    tracing::info!(
        "{} {} - Copying {} and modifying",
        messages::info(160),
        output.display(),
        template.display()
    );
}
