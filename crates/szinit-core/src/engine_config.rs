//! Engine settings document (`SENZING_ENGINE_CONFIGURATION_JSON`).

use std::collections::BTreeSet;

use serde_json::{json, Map, Value};

use crate::config::InitConfig;
use crate::database_url::{self, DatabaseUrlError};

#[derive(Debug, thiserror::Error)]
pub enum EngineConfigError {
    #[error("engine configuration is not valid JSON")]
    Json(#[from] serde_json::Error),
    #[error("engine configuration must be a JSON object; '{0}' is not")]
    NotAnObject(String),
    #[error("engine configuration has no SQL.CONNECTION")]
    MissingConnection,
    #[error("engine configuration contains multiple database schemes: {}", format_schemes(.0))]
    MultipleSchemes(BTreeSet<String>),
    #[error(transparent)]
    DatabaseUrl(#[from] DatabaseUrlError),
}

fn format_schemes(schemes: &BTreeSet<String>) -> String {
    schemes.iter().cloned().collect::<Vec<_>>().join(", ")
}

/// Settings built from the run configuration when no JSON is supplied.
pub fn default_document(cfg: &InitConfig) -> Result<Value, DatabaseUrlError> {
    let connection = cfg.specific_database_url()?.unwrap_or_default();
    Ok(json!({
        "PIPELINE": {
            "CONFIGPATH": cfg.etc_dir.display().to_string(),
            "RESOURCEPATH": cfg.g2_dir.join("resources").display().to_string(),
            "SUPPORTPATH": cfg.data_dir.display().to_string(),
        },
        "SQL": {
            "CONNECTION": connection,
        },
    }))
}

/// JSON handed to the engine: the explicit document verbatim, else the default one.
pub fn settings_json(cfg: &InitConfig) -> Result<String, DatabaseUrlError> {
    match &cfg.engine_configuration_json {
        Some(explicit) => Ok(explicit.clone()),
        None => Ok(default_document(cfg)?.to_string()),
    }
}

/// Parsed engine settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfiguration {
    root: Map<String, Value>,
}

impl EngineConfiguration {
    pub fn parse(json: &str) -> Result<Self, EngineConfigError> {
        match serde_json::from_str::<Value>(json)? {
            Value::Object(root) => Ok(Self { root }),
            other => Err(EngineConfigError::NotAnObject(other.to_string())),
        }
    }

    fn string_at(&self, section: &str, key: &str) -> Option<&str> {
        self.root.get(section)?.get(key)?.as_str()
    }

    /// `SQL.CONNECTION` followed by `DB_1` of every section a `HYBRID` entry names.
    pub fn database_urls(&self) -> Result<Vec<String>, EngineConfigError> {
        let connection = self
            .string_at("SQL", "CONNECTION")
            .ok_or(EngineConfigError::MissingConnection)?;
        let mut urls = vec![connection.to_string()];

        let hybrid_sections: BTreeSet<&str> = self
            .root
            .get("HYBRID")
            .and_then(Value::as_object)
            .map(|h| h.values().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        for section in hybrid_sections {
            if let Some(url) = self.string_at(section, "DB_1") {
                urls.push(url.to_string());
            }
        }
        Ok(urls)
    }

    /// The one scheme every database URL shares.
    pub fn single_scheme(&self) -> Result<String, EngineConfigError> {
        let schemes: BTreeSet<String> = self
            .database_urls()?
            .iter()
            .map(|url| database_url::extract_scheme(url).to_string())
            .collect();
        if schemes.len() == 1 {
            if let Some(scheme) = schemes.into_iter().next() {
                return Ok(scheme);
            }
            return Err(EngineConfigError::MissingConnection);
        }
        Err(EngineConfigError::MultipleSchemes(schemes))
    }

    /// Top-level objects as INI sections; non-string values keep their JSON text.
    pub fn sections(&self) -> Result<Vec<(String, Vec<(String, String)>)>, EngineConfigError> {
        self.root
            .iter()
            .map(|(name, body)| {
                let entries = body
                    .as_object()
                    .ok_or_else(|| EngineConfigError::NotAnObject(name.clone()))?
                    .iter()
                    .map(|(k, v)| {
                        let text = match v {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        };
                        (k.clone(), text)
                    })
                    .collect();
                Ok((name.clone(), entries))
            })
            .collect()
    }
}
