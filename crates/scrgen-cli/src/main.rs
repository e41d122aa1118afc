//! # scrgen — Service-Component descriptor generator
//!
//! Compiles the compact Service-Component header syntax into SCR component
//! descriptor documents and a rewritten header.

mod commands;
mod input;

use clap::Parser;

use crate::commands::Cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    commands::execute(cli)
}
