//! CLI command definitions and dispatch.

pub mod check;
pub mod compile;

use clap::{Parser, Subcommand};

/// scrgen — Service-Component header to SCR descriptor compiler.
#[derive(Parser, Debug)]
#[command(name = "scrgen", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile the header and write descriptor resources.
    Compile(compile::CompileArgs),
    /// Compile in memory and report diagnostics only.
    Check(check::CheckArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Compile(args) => compile::execute(args),
        Command::Check(args) => check::execute(args),
    }
}
