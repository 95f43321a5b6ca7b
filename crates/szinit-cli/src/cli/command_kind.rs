use std::fmt;
use std::str::FromStr;

use anyhow::Result;

use super::commands;
use super::context::RunContext;

pub type Handler = fn(&RunContext) -> Result<()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    DebugDatabaseUrl,
    DockerAcceptanceTest,
    Initialize,
    InitializeDatabase,
    InitializeFiles,
    ListConfigurations,
    ListDatasources,
    Sleep,
    Version,
    WaitForDatabase,
}

const HANDLERS: [(CommandKind, Handler); 10] = [
    (CommandKind::DebugDatabaseUrl, commands::run_debug_database_url),
    (CommandKind::DockerAcceptanceTest, commands::run_docker_acceptance_test),
    (CommandKind::Initialize, commands::run_initialize),
    (CommandKind::InitializeDatabase, commands::run_initialize_database),
    (CommandKind::InitializeFiles, commands::run_initialize_files),
    (CommandKind::ListConfigurations, commands::run_list_configurations),
    (CommandKind::ListDatasources, commands::run_list_datasources),
    (CommandKind::Sleep, commands::run_sleep),
    (CommandKind::Version, commands::run_version),
    (CommandKind::WaitForDatabase, commands::run_wait_for_database),
];

impl CommandKind {
    pub const ALL: [CommandKind; 10] = [
        CommandKind::DebugDatabaseUrl,
        CommandKind::DockerAcceptanceTest,
        CommandKind::Initialize,
        CommandKind::InitializeDatabase,
        CommandKind::InitializeFiles,
        CommandKind::ListConfigurations,
        CommandKind::ListDatasources,
        CommandKind::Sleep,
        CommandKind::Version,
        CommandKind::WaitForDatabase,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CommandKind::DebugDatabaseUrl => "debug-database-url",
            CommandKind::DockerAcceptanceTest => "docker-acceptance-test",
            CommandKind::Initialize => "initialize",
            CommandKind::InitializeDatabase => "initialize-database",
            CommandKind::InitializeFiles => "initialize-files",
            CommandKind::ListConfigurations => "list-configurations",
            CommandKind::ListDatasources => "list-datasources",
            CommandKind::Sleep => "sleep",
            CommandKind::Version => "version",
            CommandKind::WaitForDatabase => "wait-for-database",
        }
    }

    pub fn handler(self) -> Option<Handler> {
        HANDLERS
            .iter()
            .find(|(kind, _)| *kind == self)
            .map(|(_, handler)| *handler)
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Bad SENZING_SUBCOMMAND: {0}.")]
pub struct UnknownCommandError(pub String);

impl FromStr for CommandKind {
    type Err = UnknownCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        CommandKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| UnknownCommandError(name.to_string()))
    }
}
