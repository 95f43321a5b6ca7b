//! CLI tests: argument parsing, invocation resolution, handler dispatch.

use super::{Cli, CliCommand};
use clap::Parser;

pub(super) fn parse(args: &[&str]) -> CliCommand {
    let cli = Cli::try_parse_from(args).unwrap();
    cli.command.expect("subcommand")
}
