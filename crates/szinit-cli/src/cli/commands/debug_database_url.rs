//! `szinit debug-database-url` – show how the database URL is understood.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use szinit_core::{database_init, database_url};

use crate::cli::context::RunContext;

pub(crate) fn report(ctx: &RunContext) -> Result<String> {
    let url = ctx
        .config
        .database_url
        .as_deref()
        .context("no database URL configured")?;
    let parsed = database_url::parse(url)?;

    let mut out = String::new();
    writeln!(out)?;
    writeln!(out, "SENZING_DATABASE_URL={url}")?;
    writeln!(out)?;
    writeln!(out, "===== Results from parsing SENZING_DATABASE_URL =====")?;
    writeln!(out)?;
    writeln!(out, "{}", serde_json::to_string_pretty(&parsed)?)?;
    writeln!(out)?;

    if let Some(sample) = database_init::db2_driver_config(&ctx.config, Some(&parsed))? {
        writeln!(out, "===== Sample db2dsdriver.cfg =====")?;
        writeln!(out)?;
        writeln!(out, "{}", sample.trim_end())?;
    }
    Ok(out)
}

pub fn run_debug_database_url(ctx: &RunContext) -> Result<()> {
    print!("{}", report(ctx)?);
    Ok(())
}
