//! `scrgen compile` — Compile the header and write descriptor resources.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use scrgen_core::pipeline;

use crate::input::InputArgs;

/// Arguments for the `compile` subcommand.
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Header and class-index inputs.
    #[command(flatten)]
    pub input: InputArgs,

    /// Directory to write descriptor resources under.
    #[arg(short, long, default_value = ".")]
    pub out: PathBuf,

    /// Print the rewritten header to stdout.
    #[arg(long)]
    pub print_header: bool,
}

/// Executes the `compile` command.
///
/// # Errors
///
/// Returns an error when inputs cannot be loaded, the header is malformed,
/// resources cannot be written, or error-severity diagnostics were recorded.
pub fn execute(args: CompileArgs) -> anyhow::Result<()> {
    let header = args.input.load_header()?;
    let index = args.input.load_index()?;
    tracing::info!(out = %args.out.display(), "compiling Service-Component header");

    let output = pipeline::compile(&header, &index, &index)?;

    for resource in &output.resources {
        let path = args.out.join(&resource.path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(&path, &resource.xml)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    if args.print_header {
        println!("{}", output.header);
    }

    for diagnostic in &output.diagnostics {
        eprintln!("{diagnostic}");
    }
    if output.diagnostics.has_errors() {
        anyhow::bail!(
            "{} diagnostics recorded, output is best-effort",
            output.diagnostics.len()
        );
    }

    Ok(())
}
