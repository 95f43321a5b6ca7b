//! Default engine configuration seeding shared by the initialize commands.

use anyhow::Result;
use szinit_core::config_manager::{self, ConfigManagerError};
use szinit_core::{engine_config, messages};

use crate::cli::context::RunContext;

fn seed(ctx: &RunContext, settings: &str) -> Result<(), ConfigManagerError> {
    let mut manager = ctx.open_config_manager(settings)?;
    let seeded = config_manager::seed_default_config(manager.as_mut());
    manager.close()?;
    seeded.map(|_| ())
}

/// Seeds a default configuration. Service failures are logged, not returned.
pub fn seed_default_config(ctx: &RunContext) -> Result<()> {
    let settings = engine_config::settings_json(&ctx.config)?;
    if let Err(err) = seed(ctx, &settings) {
        let cause = std::error::Error::source(&err)
            .map(|s| s.to_string())
            .unwrap_or_default();
        tracing::error!(
            "{} Error '{}' caused by '{}'",
            messages::error(701),
            err,
            cause
        );
    }
    Ok(())
}
