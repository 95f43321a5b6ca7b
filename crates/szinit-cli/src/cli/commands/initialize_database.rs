//! `szinit initialize-database` – driver files and default configuration only.

use anyhow::Result;
use szinit_core::{database_init, ini};

use super::seed::seed_default_config;
use crate::cli::context::RunContext;

pub fn run_initialize_database(ctx: &RunContext) -> Result<()> {
    ctx.log_entry();

    // No built-in URL here: without an explicit one, database files are left alone.
    if ctx.config.database_url.is_some() {
        database_init::initialize_database(&ctx.config)?;
        if ctx.config.update_ini_files {
            ini::patch_module_ini(&ctx.config)?;
            ini::patch_project_ini(&ctx.config)?;
        }
    }

    seed_default_config(ctx)?;

    ctx.log_exit();
    Ok(())
}
