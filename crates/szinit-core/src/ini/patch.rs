use std::path::Path;

use anyhow::{Context, Result};

use super::IniDocument;
use crate::config::InitConfig;
use crate::engine_config::EngineConfiguration;
use crate::messages;

pub const MODULE_INI: &str = "G2Module.ini";
pub const PROJECT_INI: &str = "G2Project.ini";

/// Fixed in-container locations written into `PIPELINE`.
const PIPELINE_PATHS: [(&str, &str); 3] = [
    ("SUPPORTPATH", "/opt/senzing/data"),
    ("CONFIGPATH", "/etc/opt/senzing"),
    ("RESOURCEPATH", "/opt/senzing/g2/resources"),
];

fn specific_url(cfg: &InitConfig) -> Result<String> {
    Ok(cfg
        .specific_database_url()
        .context("derive driver database URL")?
        .unwrap_or_default())
}

/// Rewrites `etc_dir/G2Module.ini` for the configured database.
pub fn patch_module_ini(cfg: &InitConfig) -> Result<()> {
    let path = cfg.etc_dir.join(MODULE_INI);
    let mut doc = IniDocument::read(&path)?;

    if let Some(json) = &cfg.engine_configuration_json {
        tracing::info!(
            "{} {} - Configuring from SENZING_ENGINE_CONFIGURATION_JSON",
            messages::info(163),
            path.display()
        );
        let engine = EngineConfiguration::parse(json)?;
        for (section, entries) in engine.sections()? {
            doc.set_section(&section, entries);
        }
    } else {
        let url = specific_url(cfg)?;
        if doc.set("SQL", "CONNECTION", &url) {
            log_modified(&path, "Changed SQL.CONNECTION");
        }
        for (key, value) in PIPELINE_PATHS {
            doc.set("PIPELINE", key, value);
            log_modified(&path, &format!("Changed PIPELINE.{key} to {value}"));
        }
        if doc.remove("SQL", "G2CONFIGFILE") {
            log_modified(&path, "Removed SQL.G2CONFIGFILE");
        }
    }

    doc.write(&path)
}

/// Points `g2.G2Connection` in `etc_dir/G2Project.ini` at the configured database.
/// Newer installs have no project file; that is not an error.
pub fn patch_project_ini(cfg: &InitConfig) -> Result<()> {
    let path = cfg.etc_dir.join(PROJECT_INI);
    if !path.exists() {
        return Ok(());
    }
    let mut doc = IniDocument::read(&path)?;
    let url = specific_url(cfg)?;
    if doc.set("g2", "G2Connection", &url) {
        log_modified(&path, "Changed g2.G2Connection");
        doc.write(&path)?;
    }
    Ok(())
}

// The new URL carries credentials, so it is not part of the line.
fn log_modified(path: &Path, what: &str) {
    tracing::info!("{} {} - Modified. {}", messages::info(156), path.display(), what);
}
