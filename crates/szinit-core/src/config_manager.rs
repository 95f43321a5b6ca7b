//! Engine configuration manager: the external service that stores engine
//! configurations in the database and tracks which one is the default.
//!
//! Backends implement [`ConfigManager`]; callers open one per process and pass it
//! by `&mut` reference. The native engine SDK is not linked into this build, so
//! [`open_default`] yields [`ConfigManagerError::Unavailable`].

use crate::messages;

/// Identifier assigned by the service to a stored configuration.
pub type ConfigId = i64;

pub const INITIAL_CONFIG_COMMENT: &str = "Initial configuration.";

/// Instance name the service sees for this process.
pub const INSTANCE_NAME: &str = "szinit-config-manager";

#[derive(Debug, thiserror::Error)]
pub enum ConfigManagerError {
    #[error("configuration manager unavailable: {0}")]
    Unavailable(String),
    #[error("could not connect configuration manager: {0}")]
    Connect(String),
    #[error("{method} failed")]
    Call {
        method: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ConfigManagerError {
    /// Only connection failures are worth waiting on.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ConfigManagerError::Connect(_))
    }

    pub fn call<E>(method: &'static str, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        ConfigManagerError::Call {
            method,
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigManagerError>;

pub trait ConfigManager {
    fn open(&mut self, instance_name: &str, settings_json: &str, verbose: bool) -> Result<()>;
    fn close(&mut self) -> Result<()>;
    fn default_config_id(&mut self) -> Result<Option<ConfigId>>;
    /// A fresh configuration document from the engine's template.
    fn create_default_config(&mut self) -> Result<String>;
    fn add_config(&mut self, config_json: &str, comment: &str) -> Result<ConfigId>;
    fn set_default_config_id(&mut self, id: ConfigId) -> Result<()>;
    fn list_configurations(&mut self) -> Result<String>;
    fn list_data_sources(&mut self) -> Result<String>;
}

/// Stores and selects an initial configuration unless a default already exists.
/// Returns the new id, or `None` when nothing was done.
pub fn seed_default_config(manager: &mut dyn ConfigManager) -> Result<Option<ConfigId>> {
    if let Some(existing) = manager.default_config_id()? {
        tracing::info!(
            "{} Default config in SYS_CFG already exists having ID {}",
            messages::info(171),
            existing
        );
        return Ok(None);
    }

    let document = manager.create_default_config()?;
    let id = manager.add_config(&document, INITIAL_CONFIG_COMMENT)?;
    manager.set_default_config_id(id)?;
    tracing::info!(
        "{} Created new default config in SYS_CFG having ID {}",
        messages::info(170),
        id
    );
    Ok(Some(id))
}

/// Backend used when the engine SDK is not part of the build.
#[derive(Debug, Default)]
pub struct UnlinkedSdk;

impl UnlinkedSdk {
    fn unavailable<T>(&self) -> Result<T> {
        Err(ConfigManagerError::Unavailable(
            "engine SDK is not linked into szinit".to_string(),
        ))
    }
}

impl ConfigManager for UnlinkedSdk {
    fn open(&mut self, _instance_name: &str, _settings_json: &str, _verbose: bool) -> Result<()> {
        self.unavailable()
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    fn default_config_id(&mut self) -> Result<Option<ConfigId>> {
        self.unavailable()
    }

    fn create_default_config(&mut self) -> Result<String> {
        self.unavailable()
    }

    fn add_config(&mut self, _config_json: &str, _comment: &str) -> Result<ConfigId> {
        self.unavailable()
    }

    fn set_default_config_id(&mut self, _id: ConfigId) -> Result<()> {
        self.unavailable()
    }

    fn list_configurations(&mut self) -> Result<String> {
        self.unavailable()
    }

    fn list_data_sources(&mut self) -> Result<String> {
        self.unavailable()
    }
}

/// Opens the backend this build provides.
pub fn open_default(settings_json: &str, verbose: bool) -> Result<Box<dyn ConfigManager>> {
    let mut manager: Box<dyn ConfigManager> = Box::new(UnlinkedSdk);
    manager.open(INSTANCE_NAME, settings_json, verbose)?;
    Ok(manager)
}

#[cfg(any(test, feature = "test-support"))]
pub mod memory {
    //! In-process backend for tests.

    use super::*;

    #[derive(Debug, Default)]
    pub struct InMemoryConfigManager {
        pub opened: bool,
        pub default_id: Option<ConfigId>,
        pub configs: Vec<(ConfigId, String, String)>,
        pub data_sources: Vec<String>,
        /// Number of `open` calls that fail with `Connect` before one succeeds.
        pub connect_failures: usize,
        /// Method name that fails with `Call`.
        pub fail_on: Option<&'static str>,
        pub calls: Vec<&'static str>,
    }

    impl InMemoryConfigManager {
        fn enter(&mut self, method: &'static str) -> Result<()> {
            self.calls.push(method);
            if self.fail_on == Some(method) {
                return Err(ConfigManagerError::call(method, "injected failure"));
            }
            Ok(())
        }
    }

    impl ConfigManager for InMemoryConfigManager {
        fn open(&mut self, _instance_name: &str, _settings_json: &str, _verbose: bool) -> Result<()> {
            self.calls.push("open");
            if self.connect_failures > 0 {
                self.connect_failures -= 1;
                return Err(ConfigManagerError::Connect("database not ready".into()));
            }
            self.opened = true;
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            self.calls.push("close");
            self.opened = false;
            Ok(())
        }

        fn default_config_id(&mut self) -> Result<Option<ConfigId>> {
            self.enter("default_config_id")?;
            Ok(self.default_id)
        }

        fn create_default_config(&mut self) -> Result<String> {
            self.enter("create_default_config")?;
            Ok(r#"{"G2_CONFIG":{"CFG_DSRC":[]}}"#.to_string())
        }

        fn add_config(&mut self, config_json: &str, comment: &str) -> Result<ConfigId> {
            self.enter("add_config")?;
            let id = 1000 + self.configs.len() as ConfigId;
            self.configs
                .push((id, config_json.to_string(), comment.to_string()));
            Ok(id)
        }

        fn set_default_config_id(&mut self, id: ConfigId) -> Result<()> {
            self.enter("set_default_config_id")?;
            self.default_id = Some(id);
            Ok(())
        }

        fn list_configurations(&mut self) -> Result<String> {
            self.enter("list_configurations")?;
            let configs: Vec<_> = self
                .configs
                .iter()
                .map(|(id, _, comment)| serde_json::json!({"CONFIG_ID": id, "CONFIG_COMMENTS": comment}))
                .collect();
            Ok(serde_json::json!({ "CONFIGS": configs }).to_string())
        }

        fn list_data_sources(&mut self) -> Result<String> {
            self.enter("list_data_sources")?;
            let sources: Vec<_> = self
                .data_sources
                .iter()
                .map(|code| serde_json::json!({ "DSRC_CODE": code }))
                .collect();
            Ok(serde_json::json!({ "DATA_SOURCES": sources }).to_string())
        }
    }
}
