//! Per-run state shared by command handlers.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::Value;
use szinit_core::config::InitConfig;
use szinit_core::config_manager::{self, ConfigManager, ConfigManagerError};
use szinit_core::messages;

use super::command_kind::CommandKind;

pub type ManagerOpener = Box<
    dyn Fn(&str, bool) -> Result<Box<dyn ConfigManager>, ConfigManagerError> + Send + Sync,
>;

fn unix_secs(t: SystemTime) -> f64 {
    t.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Configuration snapshot and start time used for the enter/exit log lines.
#[derive(Debug, Clone)]
pub struct RunReport {
    snapshot: Value,
    started: SystemTime,
}

impl RunReport {
    pub fn new(kind: CommandKind, cfg: &InitConfig) -> Self {
        let mut snapshot = if cfg.debug {
            serde_json::to_value(cfg).unwrap_or_default()
        } else {
            cfg.redacted_json()
        };
        let started = SystemTime::now();
        if let Some(map) = snapshot.as_object_mut() {
            map.insert("subcommand".into(), kind.name().into());
            map.insert("program_version".into(), env!("CARGO_PKG_VERSION").into());
            map.insert("start_time".into(), unix_secs(started).into());
        }
        Self { snapshot, started }
    }

    pub fn entry_line(&self) -> String {
        format!("{} Enter {}", messages::info(297), self.snapshot)
    }

    pub fn exit_line(&self) -> String {
        let now = SystemTime::now();
        let elapsed = now
            .duration_since(self.started)
            .unwrap_or_default()
            .as_secs_f64();
        let mut snapshot = self.snapshot.clone();
        if let Some(map) = snapshot.as_object_mut() {
            map.insert("stop_time".into(), unix_secs(now).into());
            map.insert("elapsed_time".into(), elapsed.into());
        }
        format!("{} Exit {}", messages::info(298), snapshot)
    }
}

pub struct RunContext {
    pub kind: CommandKind,
    pub config: InitConfig,
    pub report: RunReport,
    opener: ManagerOpener,
    sleeper: fn(Duration),
}

impl RunContext {
    pub fn new(kind: CommandKind, config: InitConfig) -> Self {
        let report = RunReport::new(kind, &config);
        Self {
            kind,
            config,
            report,
            opener: Box::new(config_manager::open_default),
            sleeper: std::thread::sleep,
        }
    }

    /// Swaps the configuration manager backend.
    pub fn with_opener(mut self, opener: ManagerOpener) -> Self {
        self.opener = opener;
        self
    }

    /// Swaps the function used for every pause.
    pub fn with_sleeper(mut self, sleeper: fn(Duration)) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn log_entry(&self) {
        tracing::info!("{}", self.report.entry_line());
    }

    pub fn log_exit(&self) {
        tracing::info!("{}", self.report.exit_line());
    }

    pub fn sleep(&self, duration: Duration) {
        (self.sleeper)(duration);
    }

    /// Waits `delay_in_seconds` when configured.
    pub fn delay(&self) {
        let secs = self.config.delay_in_seconds;
        if secs > 0 {
            tracing::info!("{} Sleeping {} seconds.", messages::info(296), secs);
            self.sleep(Duration::from_secs(secs));
        }
    }

    pub fn open_config_manager(
        &self,
        settings_json: &str,
    ) -> Result<Box<dyn ConfigManager>, ConfigManagerError> {
        (self.opener)(settings_json, self.config.debug)
    }

    pub fn dispatch(&self) -> anyhow::Result<()> {
        let handler = self
            .kind
            .handler()
            .ok_or_else(|| anyhow::anyhow!("no handler for {}", self.kind.name()))?;
        handler(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lines_carry_ids_and_times() {
        let mut cfg = InitConfig::default();
        cfg.database_url = Some("mysql://root:hunter2@db:3306/G2".into());
        let report = RunReport::new(CommandKind::Initialize, &cfg);

        let entry = report.entry_line();
        assert!(entry.starts_with("senzing-50070297I Enter {"));
        assert!(entry.contains("\"subcommand\":\"initialize\""));
        assert!(!entry.contains("hunter2"));

        let exit = report.exit_line();
        assert!(exit.starts_with("senzing-50070298I Exit {"));
        assert!(exit.contains("\"elapsed_time\""));
        assert!(exit.contains("\"stop_time\""));
    }

    #[test]
    fn debug_report_keeps_everything() {
        let mut cfg = InitConfig::default();
        cfg.debug = true;
        cfg.database_url = Some("mysql://root:hunter2@db:3306/G2".into());
        let report = RunReport::new(CommandKind::Sleep, &cfg);
        assert!(report.entry_line().contains("hunter2"));
    }
}
