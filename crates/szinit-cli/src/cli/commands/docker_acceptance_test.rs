//! `szinit docker-acceptance-test` – enter and exit lines only.

use anyhow::Result;

use crate::cli::context::RunContext;

pub fn run_docker_acceptance_test(ctx: &RunContext) -> Result<()> {
    ctx.log_entry();
    ctx.log_exit();
    Ok(())
}
