//! `szinit sleep` – keep the container alive.

use std::time::Duration;

use anyhow::Result;
use szinit_core::messages;

use crate::cli::context::RunContext;

const FOREVER_INTERVAL: Duration = Duration::from_secs(3600);

pub fn run_sleep(ctx: &RunContext) -> Result<()> {
    ctx.log_entry();

    let secs = ctx.config.sleep_time_in_seconds;
    if secs > 0 {
        tracing::info!("{} Sleeping {} seconds.", messages::info(296), secs);
        ctx.sleep(Duration::from_secs(secs));
    } else {
        loop {
            tracing::info!("{} Sleeping infinitely.", messages::info(295));
            ctx.sleep(FOREVER_INTERVAL);
        }
    }

    ctx.log_exit();
    Ok(())
}
