use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use base64::engine::general_purpose;
use base64::Engine;

use crate::config::InitConfig;
use crate::messages;

pub const LICENSE_FILE: &str = "g2.lic";
pub const SERVER_KEYSTORE_FILE: &str = "api-server-keystore.p12";
pub const CLIENT_KEYSTORE_FILE: &str = "api-server-client-keystore.p12";
pub const G2CONFIG_GTC_FILE: &str = "G2Config.gtc";

/// Files in `etc_dir` that must not survive initialization.
pub const OBSOLETE_FILES: [&str; 1] = ["g2config.json"];

fn log_created(path: &Path) {
    tracing::info!("{} {} - Creating file", messages::info(157), path.display());
}

fn write_decoded(path: &Path, encoded: &str) -> Result<()> {
    // Values pasted from env often carry line breaks.
    let compact: String = encoded.split_whitespace().collect();
    let bytes = general_purpose::STANDARD
        .decode(compact)
        .with_context(|| format!("decode base64 for {}", path.display()))?;
    log_created(path);
    fs::write(path, bytes).with_context(|| format!("write {}", path.display()))
}

/// Decodes the license and API server keystores that were supplied.
pub fn write_secret_artifacts(cfg: &InitConfig) -> Result<()> {
    let artifacts = [
        (LICENSE_FILE, &cfg.license_base64_encoded),
        (SERVER_KEYSTORE_FILE, &cfg.api_server_key_store_base64_encoded),
        (
            CLIENT_KEYSTORE_FILE,
            &cfg.api_server_client_key_store_base64_encoded,
        ),
    ];
    for (name, encoded) in artifacts {
        if let Some(encoded) = encoded.as_deref().filter(|v| !v.is_empty()) {
            write_decoded(&cfg.etc_dir.join(name), encoded)?;
        }
    }
    Ok(())
}

/// Always written; empty when no content is configured.
pub fn write_g2config_gtc(cfg: &InitConfig) -> Result<()> {
    let path = cfg.etc_dir.join(G2CONFIG_GTC_FILE);
    fs::write(&path, cfg.g2_config_gtc.as_deref().unwrap_or(""))
        .with_context(|| format!("write {}", path.display()))?;
    log_created(&path);
    Ok(())
}

pub fn delete_obsolete_files(cfg: &InitConfig) -> Result<()> {
    for name in OBSOLETE_FILES {
        let path = cfg.etc_dir.join(name);
        if path.exists() {
            tracing::info!("{} {} - Deleting", messages::info(155), path.display());
            fs::remove_file(&path).with_context(|| format!("remove {}", path.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg_in(dir: &Path) -> InitConfig {
        let mut cfg = InitConfig::default();
        cfg.etc_dir = dir.to_path_buf();
        cfg
    }

    #[test]
    fn secrets_are_decoded() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = cfg_in(dir.path());
        cfg.license_base64_encoded = Some("bGljZW5zZQ==".into());
        cfg.api_server_client_key_store_base64_encoded = Some("a2V5\nc3RvcmU=".into());

        write_secret_artifacts(&cfg).unwrap();

        assert_eq!(fs::read(dir.path().join(LICENSE_FILE)).unwrap(), b"license");
        assert_eq!(
            fs::read(dir.path().join(CLIENT_KEYSTORE_FILE)).unwrap(),
            b"keystore"
        );
        assert!(!dir.path().join(SERVER_KEYSTORE_FILE).exists());
    }

    #[test]
    fn invalid_base64_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = cfg_in(dir.path());
        cfg.license_base64_encoded = Some("not base64!".into());
        let err = write_secret_artifacts(&cfg).unwrap_err();
        assert!(format!("{err:#}").contains("decode base64"));
    }

    #[test]
    fn gtc_written_even_when_unset() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = cfg_in(dir.path());
        write_g2config_gtc(&cfg).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join(G2CONFIG_GTC_FILE)).unwrap(), "");

        cfg.g2_config_gtc = Some("gtc".into());
        write_g2config_gtc(&cfg).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join(G2CONFIG_GTC_FILE)).unwrap(), "gtc");
    }

    #[test]
    fn obsolete_files_removed() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("g2config.json"), "{}").unwrap();
        delete_obsolete_files(&cfg_in(dir.path())).unwrap();
        assert!(!dir.path().join("g2config.json").exists());
        delete_obsolete_files(&cfg_in(dir.path())).unwrap();
    }
}
