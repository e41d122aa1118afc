//! `scrgen check` — Compile in memory and report diagnostics only.

use clap::Args;
use scrgen_core::pipeline;

use crate::input::InputArgs;

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Header and class-index inputs.
    #[command(flatten)]
    pub input: InputArgs,
}

/// Executes the `check` command.
///
/// # Errors
///
/// Returns an error when inputs cannot be loaded, the header is malformed,
/// or error-severity diagnostics were recorded.
pub fn execute(args: CheckArgs) -> anyhow::Result<()> {
    let header = args.input.load_header()?;
    let index = args.input.load_index()?;

    let output = pipeline::compile(&header, &index, &index)?;

    println!(
        "Components: {}  Diagnostics: {}",
        output.resources.len(),
        output.diagnostics.len()
    );
    for diagnostic in &output.diagnostics {
        eprintln!("{diagnostic}");
    }
    if output.diagnostics.has_errors() {
        anyhow::bail!("header does not compile cleanly");
    }

    Ok(())
}
