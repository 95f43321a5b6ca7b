//! `szinit version` – log the program version.

use anyhow::Result;
use szinit_core::messages;

use crate::cli::context::RunContext;

pub const UPDATED: &str = "2026-10-19";

pub fn version_line() -> String {
    format!(
        "{} Version: {}  Updated: {}",
        messages::info(294),
        env!("CARGO_PKG_VERSION"),
        UPDATED
    )
}

pub fn run_version(_ctx: &RunContext) -> Result<()> {
    tracing::info!("{}", version_line());
    Ok(())
}
