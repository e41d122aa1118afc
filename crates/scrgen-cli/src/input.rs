//! Header and class-index input loading.
//!
//! The header can be given directly on the command line or extracted from a
//! JAR manifest, where the value may be folded across continuation lines
//! (a line starting with a single space continues the previous one).

use anyhow::Context;
use clap::Args;
use scrgen_core::index::StaticClassIndex;

/// Manifest attribute name carrying the component header.
const SERVICE_COMPONENT: &str = "Service-Component";

/// Shared input arguments for header-consuming subcommands.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Service-Component header value, given directly.
    #[arg(long, conflicts_with = "manifest")]
    pub header: Option<String>,

    /// Path to a manifest file containing a Service-Component entry.
    #[arg(long)]
    pub manifest: Option<std::path::PathBuf>,

    /// Path to the class-index JSON document.
    #[arg(long)]
    pub index: std::path::PathBuf,
}

impl InputArgs {
    /// Returns the header value from whichever source was given.
    ///
    /// # Errors
    ///
    /// Fails when neither source is given, the manifest cannot be read, or
    /// it carries no Service-Component entry.
    pub fn load_header(&self) -> anyhow::Result<String> {
        if let Some(ref header) = self.header {
            return Ok(header.clone());
        }
        let Some(ref path) = self.manifest else {
            anyhow::bail!("either --header or --manifest must be given");
        };
        if !path.exists() {
            anyhow::bail!("file not found: {}", path.display());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading manifest {}", path.display()))?;
        header_from_manifest(&text).ok_or_else(|| {
            anyhow::anyhow!(
                "no {SERVICE_COMPONENT} entry in manifest {}",
                path.display()
            )
        })
    }

    /// Loads the class index document.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed.
    pub fn load_index(&self) -> anyhow::Result<StaticClassIndex> {
        if !self.index.exists() {
            anyhow::bail!("file not found: {}", self.index.display());
        }
        StaticClassIndex::load(&self.index)
            .with_context(|| format!("loading class index {}", self.index.display()))
    }
}

/// Extracts the Service-Component value from manifest text, folding
/// continuation lines.
pub fn header_from_manifest(text: &str) -> Option<String> {
    let mut lines = text.lines().peekable();
    while let Some(line) = lines.next() {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        if !name.eq_ignore_ascii_case(SERVICE_COMPONENT) {
            continue;
        }
        let mut header = value.trim_start().to_owned();
        while let Some(continuation) = lines.peek().and_then(|l| l.strip_prefix(' ')) {
            header.push_str(continuation);
            let _ = lines.next();
        }
        return Some(header);
    }
    None
}
