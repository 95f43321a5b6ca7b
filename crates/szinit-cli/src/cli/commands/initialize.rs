//! `szinit initialize` and `szinit initialize-files`.

use anyhow::Result;
use szinit_core::{database_init, files, ini};

use super::seed::seed_default_config;
use crate::cli::context::RunContext;

fn patch_ini_files(ctx: &RunContext) -> Result<()> {
    ini::patch_module_ini(&ctx.config)?;
    ini::patch_project_ini(&ctx.config)
}

fn write_artifacts(ctx: &RunContext) -> Result<()> {
    files::write_secret_artifacts(&ctx.config)?;
    files::write_g2config_gtc(&ctx.config)
}

fn fix_ownership(ctx: &RunContext) -> Result<()> {
    files::change_directory_ownership(&ctx.config)?;
    files::change_file_permissions(&ctx.config)
}

pub fn run_initialize(ctx: &RunContext) -> Result<()> {
    ctx.log_entry();
    ctx.delay();

    files::copy_files(&ctx.config)?;
    patch_ini_files(ctx)?;
    database_init::initialize_database(&ctx.config)?;
    fix_ownership(ctx)?;
    write_artifacts(ctx)?;
    seed_default_config(ctx)?;
    files::delete_obsolete_files(&ctx.config)?;

    ctx.log_exit();
    Ok(())
}

/// Same file work as `initialize`, without the delay and configuration seeding.
pub fn run_initialize_files(ctx: &RunContext) -> Result<()> {
    ctx.log_entry();

    files::copy_files(&ctx.config)?;
    patch_ini_files(ctx)?;
    write_artifacts(ctx)?;
    database_init::initialize_database(&ctx.config)?;
    fix_ownership(ctx)?;
    files::delete_obsolete_files(&ctx.config)?;

    ctx.log_exit();
    Ok(())
}
