//! CLI for szinit.

mod command_kind;
mod commands;
mod context;
mod signals;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use szinit_core::config::{self, InitConfig, Overrides, ResolveOptions};
use szinit_core::messages;

pub use command_kind::{CommandKind, UnknownCommandError};
use context::RunContext;
use signals::ShutdownHandler;

/// Environment variable naming the subcommand when argv has none.
pub const SUBCOMMAND_ENV: &str = "SENZING_SUBCOMMAND";
pub const DOCKER_LAUNCHED_ENV: &str = "SENZING_DOCKER_LAUNCHED";

/// Top-level CLI for szinit.
#[derive(Debug, Parser)]
#[command(name = "szinit", version)]
#[command(
    about = "Initialize a Senzing installation: files, INI settings, database drivers",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Generic database URL. (SENZING_DATABASE_URL)
    #[arg(long, value_name = "URL")]
    pub database_url: Option<String>,
    /// Enable debugging; logs the unredacted configuration. (SENZING_DEBUG)
    #[arg(long)]
    pub debug: bool,
    /// Delay before processing in seconds. (SENZING_DELAY_IN_SECONDS)
    #[arg(long, value_name = "SECONDS")]
    pub delay_in_seconds: Option<u64>,
    /// Advanced engine configuration. (SENZING_ENGINE_CONFIGURATION_JSON)
    #[arg(long, value_name = "JSON")]
    pub engine_configuration_json: Option<String>,
    /// Contents of Db2 db2dsdriver.cfg, used with --engine-configuration-json.
    #[arg(long, value_name = "CONTENTS")]
    pub db2dsdriver_cfg_contents: Option<String>,
    /// Contents of MS SQL odbc.ini, used with --engine-configuration-json.
    #[arg(long, value_name = "CONTENTS")]
    pub mssql_odbc_ini_contents: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct VolumeArgs {
    /// Senzing etc directory. (SENZING_ETC_DIR)
    #[arg(long, value_name = "DIR")]
    pub etc_dir: Option<PathBuf>,
    /// Senzing g2 directory. (SENZING_G2_DIR)
    #[arg(long, value_name = "DIR")]
    pub g2_dir: Option<PathBuf>,
    /// Senzing support data directory. (SENZING_DATA_DIR)
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
    /// Senzing var directory. (SENZING_VAR_DIR)
    #[arg(long, value_name = "DIR")]
    pub var_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct EnableArgs {
    /// Prepare Db2 driver files regardless of URL scheme. (SENZING_ENABLE_DB2)
    #[arg(long)]
    pub enable_db2: bool,
    /// Prepare MS SQL driver files regardless of URL scheme. (SENZING_ENABLE_MSSQL)
    #[arg(long)]
    pub enable_mssql: bool,
    /// Take the MySQL branch regardless of URL scheme. (SENZING_ENABLE_MYSQL)
    #[arg(long)]
    pub enable_mysql: bool,
    /// Take the PostgreSQL branch regardless of URL scheme. (SENZING_ENABLE_POSTGRESQL)
    #[arg(long)]
    pub enable_postgresql: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct OwnershipArgs {
    /// Owner for prepared files. (SENZING_UID) Default: 1001
    #[arg(long, value_name = "UID")]
    pub uid: Option<u32>,
    /// Group for prepared files. (SENZING_GID) Default: 1001
    #[arg(long, value_name = "GID")]
    pub gid: Option<u32>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Show the parsed database URL. Does not modify the system.
    DebugDatabaseUrl {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Log the enter and exit lines only; for container acceptance tests.
    DockerAcceptanceTest,

    /// Initialize a newly installed Senzing.
    Initialize {
        #[command(flatten)]
        common: CommonArgs,
        #[command(flatten)]
        volumes: VolumeArgs,
        #[command(flatten)]
        enable: EnableArgs,
        #[command(flatten)]
        ownership: OwnershipArgs,
    },

    /// Initialize only the database; a subset of `initialize`.
    InitializeDatabase {
        #[command(flatten)]
        common: CommonArgs,
        #[command(flatten)]
        volumes: VolumeArgs,
        /// Also update G2Module.ini and G2Project.ini. (SENZING_UPDATE_INI_FILES)
        #[arg(long)]
        update_ini_files: bool,
    },

    /// Initialize only the files; a subset of `initialize`.
    InitializeFiles {
        #[command(flatten)]
        common: CommonArgs,
        #[command(flatten)]
        volumes: VolumeArgs,
        #[command(flatten)]
        enable: EnableArgs,
        #[command(flatten)]
        ownership: OwnershipArgs,
    },

    /// Log the configurations stored in the database.
    ListConfigurations {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Log the data sources of the default configuration.
    ListDatasources {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Do nothing but sleep. 0 sleeps forever.
    Sleep {
        /// (SENZING_SLEEP_TIME_IN_SECONDS) Default: 0
        #[arg(long, value_name = "SECONDS")]
        sleep_time_in_seconds: Option<u64>,
    },

    /// Log the program version.
    Version,

    /// Retry connecting to the configuration manager until it answers.
    WaitForDatabase {
        #[command(flatten)]
        common: CommonArgs,
        /// Seconds between attempts. (SENZING_SLEEP_TIME_IN_SECONDS) Default: 15
        #[arg(long, value_name = "SECONDS")]
        sleep_time_in_seconds: Option<u64>,
    },
}

impl CommonArgs {
    fn apply_to(&self, o: &mut Overrides) {
        o.database_url = self.database_url.clone();
        o.debug = self.debug.then_some(true);
        o.delay_in_seconds = self.delay_in_seconds;
        o.engine_configuration_json = self.engine_configuration_json.clone();
        o.db2dsdriver_cfg_contents = self.db2dsdriver_cfg_contents.clone();
        o.mssql_odbc_ini_contents = self.mssql_odbc_ini_contents.clone();
    }
}

impl VolumeArgs {
    fn apply_to(&self, o: &mut Overrides) {
        o.etc_dir = self.etc_dir.clone();
        o.g2_dir = self.g2_dir.clone();
        o.data_dir = self.data_dir.clone();
        o.var_dir = self.var_dir.clone();
    }
}

impl EnableArgs {
    fn apply_to(&self, o: &mut Overrides) {
        o.enable_db2 = self.enable_db2.then_some(true);
        o.enable_mssql = self.enable_mssql.then_some(true);
        o.enable_mysql = self.enable_mysql.then_some(true);
        o.enable_postgresql = self.enable_postgresql.then_some(true);
    }
}

impl OwnershipArgs {
    fn apply_to(&self, o: &mut Overrides) {
        o.uid = self.uid;
        o.gid = self.gid;
    }
}

impl CliCommand {
    pub fn kind(&self) -> CommandKind {
        match self {
            CliCommand::DebugDatabaseUrl { .. } => CommandKind::DebugDatabaseUrl,
            CliCommand::DockerAcceptanceTest => CommandKind::DockerAcceptanceTest,
            CliCommand::Initialize { .. } => CommandKind::Initialize,
            CliCommand::InitializeDatabase { .. } => CommandKind::InitializeDatabase,
            CliCommand::InitializeFiles { .. } => CommandKind::InitializeFiles,
            CliCommand::ListConfigurations { .. } => CommandKind::ListConfigurations,
            CliCommand::ListDatasources { .. } => CommandKind::ListDatasources,
            CliCommand::Sleep { .. } => CommandKind::Sleep,
            CliCommand::Version => CommandKind::Version,
            CliCommand::WaitForDatabase { .. } => CommandKind::WaitForDatabase,
        }
    }

    /// Command-line configuration layer. Unset flags leave lower layers alone.
    pub fn overrides(&self) -> Overrides {
        let mut o = Overrides::default();
        match self {
            CliCommand::DebugDatabaseUrl { common }
            | CliCommand::ListConfigurations { common }
            | CliCommand::ListDatasources { common } => common.apply_to(&mut o),
            CliCommand::Initialize {
                common,
                volumes,
                enable,
                ownership,
            }
            | CliCommand::InitializeFiles {
                common,
                volumes,
                enable,
                ownership,
            } => {
                common.apply_to(&mut o);
                volumes.apply_to(&mut o);
                enable.apply_to(&mut o);
                ownership.apply_to(&mut o);
            }
            CliCommand::InitializeDatabase {
                common,
                volumes,
                update_ini_files,
            } => {
                common.apply_to(&mut o);
                volumes.apply_to(&mut o);
                o.update_ini_files = update_ini_files.then_some(true);
            }
            CliCommand::Sleep {
                sleep_time_in_seconds,
            } => o.sleep_time_in_seconds = *sleep_time_in_seconds,
            CliCommand::WaitForDatabase {
                common,
                sleep_time_in_seconds,
            } => {
                common.apply_to(&mut o);
                o.sleep_time_in_seconds = *sleep_time_in_seconds;
            }
            CliCommand::DockerAcceptanceTest | CliCommand::Version => {}
        }
        o
    }
}

/// What to do once argv and the environment have been looked at.
#[derive(Debug)]
pub enum Invocation {
    Command(CommandKind, Overrides),
    /// No subcommand anywhere; print help.
    Help { docker_launched: bool },
}

pub fn resolve_invocation<F>(
    command: Option<CliCommand>,
    lookup: F,
) -> Result<Invocation, UnknownCommandError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(command) = command {
        return Ok(Invocation::Command(command.kind(), command.overrides()));
    }
    match lookup(SUBCOMMAND_ENV).filter(|v| !v.trim().is_empty()) {
        Some(name) => {
            let kind = name.parse::<CommandKind>().inspect_err(|e| {
                tracing::warn!("{} {}", messages::warning(596), e);
            })?;
            Ok(Invocation::Command(kind, Overrides::default()))
        }
        None => Ok(Invocation::Help {
            docker_launched: lookup(DOCKER_LAUNCHED_ENV).is_some_and(|v| !v.is_empty()),
        }),
    }
}

pub fn write_help<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "{}", Cli::command().render_help())
}

/// Like [`resolve_invocation`], but writes the help text to `out` before
/// returning an unknown-command error.
pub fn invocation_or_help<F, W>(
    command: Option<CliCommand>,
    lookup: F,
    out: &mut W,
) -> Result<Invocation>
where
    F: Fn(&str) -> Option<String>,
    W: Write,
{
    match resolve_invocation(command, lookup) {
        Ok(invocation) => Ok(invocation),
        Err(err) => {
            write_help(out)?;
            Err(err.into())
        }
    }
}

/// Layers file, environment and command line for `kind`.
pub fn resolve_config<F>(kind: CommandKind, cli: Overrides, lookup: F) -> Result<InitConfig>
where
    F: Fn(&str) -> Option<String> + Copy,
{
    let path = config::config_path(lookup)?;
    let options = ResolveOptions {
        without_default_database_url: kind == CommandKind::InitializeDatabase,
    };
    let cfg = config::resolve(path.as_deref(), lookup, cli, &options)
        .with_context(|| format!("resolve configuration for {kind}"))?;
    tracing::debug!("resolved configuration: {}", cfg.redacted_json());
    Ok(cfg)
}

pub async fn run_from_args() -> Result<()> {
    let cli = Cli::parse();
    let lookup = |name: &str| std::env::var(name).ok();

    let mut stdout = std::io::stdout();
    let (kind, overrides) = match invocation_or_help(cli.command, lookup, &mut stdout)? {
        Invocation::Command(kind, overrides) => (kind, overrides),
        Invocation::Help { docker_launched } => {
            write_help(&mut stdout)?;
            if !docker_launched {
                anyhow::bail!("no subcommand given and {SUBCOMMAND_ENV} is not set");
            }
            (CommandKind::Sleep, Overrides::default())
        }
    };

    let cfg = resolve_config(kind, overrides, lookup)?;
    let ctx = RunContext::new(kind, cfg);
    let shutdown = ShutdownHandler::new(&ctx);

    let work = tokio::task::spawn_blocking(move || ctx.dispatch());
    tokio::select! {
        joined = work => joined.context("command handler panicked")?,
        signal_name = shutdown.wait() => shutdown.shutdown(signal_name),
    }
}

#[cfg(test)]
mod tests;
