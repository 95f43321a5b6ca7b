//! `szinit wait-for-database` – block until the configuration manager connects.

use std::time::Duration;

use anyhow::{Context, Result};
use szinit_core::{engine_config, messages};

use crate::cli::context::RunContext;

const DEFAULT_INTERVAL_SECS: u64 = 15;

/// Returns the number of attempts it took.
pub(crate) fn wait(ctx: &RunContext) -> Result<u32> {
    let settings = engine_config::settings_json(&ctx.config)?;
    let interval = match ctx.config.sleep_time_in_seconds {
        0 => DEFAULT_INTERVAL_SECS,
        secs => secs,
    };

    let mut attempt = 1;
    loop {
        match ctx.open_config_manager(&settings) {
            Ok(mut manager) => {
                manager.close()?;
                tracing::info!("{} Database is available.", messages::info(114));
                return Ok(attempt);
            }
            Err(err) if err.is_retryable() => {
                tracing::warn!(
                    "{} Database not available (attempt {}): {}. Retrying in {} seconds.",
                    messages::warning(302),
                    attempt,
                    err,
                    interval
                );
                ctx.sleep(Duration::from_secs(interval));
                attempt += 1;
            }
            Err(err) => return Err(err).context("open configuration manager"),
        }
    }
}

pub fn run_wait_for_database(ctx: &RunContext) -> Result<()> {
    ctx.log_entry();
    wait(ctx)?;
    ctx.log_exit();
    Ok(())
}
