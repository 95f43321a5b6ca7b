//! `szinit list-configurations` and `szinit list-datasources`.

use anyhow::{Context, Result};
use szinit_core::config_manager::ConfigManager;
use szinit_core::{engine_config, messages};

use crate::cli::context::RunContext;

fn with_manager<F>(ctx: &RunContext, what: &str, call: F) -> Result<String>
where
    F: FnOnce(&mut dyn ConfigManager) -> szinit_core::config_manager::Result<String>,
{
    let settings = engine_config::settings_json(&ctx.config)?;
    let mut manager = ctx
        .open_config_manager(&settings)
        .with_context(|| format!("open configuration manager to {what}"))?;
    let result = call(manager.as_mut());
    manager.close()?;
    result.with_context(|| what.to_string())
}

pub fn run_list_configurations(ctx: &RunContext) -> Result<()> {
    ctx.log_entry();
    let listing = with_manager(ctx, "list configurations", |m| m.list_configurations())?;
    tracing::info!("{} Configurations: {}", messages::info(112), listing);
    ctx.log_exit();
    Ok(())
}

pub fn run_list_datasources(ctx: &RunContext) -> Result<()> {
    ctx.log_entry();
    let listing = with_manager(ctx, "list data sources", |m| m.list_data_sources())?;
    tracing::info!("{} Data sources: {}", messages::info(113), listing);
    ctx.log_exit();
    Ok(())
}
