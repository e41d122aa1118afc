//! End-to-end compilation of a Service-Component header.
//!
//! Parse, resolve, and emit in one pass. Only a header syntax error is
//! fatal; every other finding is accumulated and returned next to the
//! produced resources. Each run is stateless.

use scrgen_common::constants::{RESOURCE_PREFIX, RESOURCE_SUFFIX};
use scrgen_common::diagnostics::Diagnostics;
use scrgen_common::error::Result;

use crate::emitter;
use crate::index::{AnnotationReader, ClassIndex};
use crate::parser;
use crate::resolver;

/// One generated descriptor resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorResource {
    /// Resource path, `OSGI-INF/<name>.xml`.
    pub path: String,
    /// Descriptor document text.
    pub xml: String,
}

/// Everything one compilation run produced.
#[derive(Debug, Clone)]
pub struct CompileOutput {
    /// Generated descriptor resources, in clause order.
    pub resources: Vec<DescriptorResource>,
    /// Rewritten header: generated clauses replaced by resource paths,
    /// pass-through clauses preserved verbatim.
    pub header: String,
    /// Accumulated non-fatal diagnostics.
    pub diagnostics: Diagnostics,
}

/// Compiles a Service-Component header against a class index.
///
/// # Errors
///
/// Returns [`scrgen_common::error::ScrError::Parse`] when the header is
/// syntactically malformed; nothing is produced in that case.
pub fn compile(
    header: &str,
    index: &dyn ClassIndex,
    reader: &dyn AnnotationReader,
) -> Result<CompileOutput> {
    tracing::info!("compiling Service-Component header");
    let clauses = parser::parse_header(header)?;

    let mut diagnostics = Diagnostics::new();
    let resolution = resolver::resolve(&clauses, index, reader, &mut diagnostics);

    let resources = resolution
        .components
        .iter()
        .map(|component| DescriptorResource {
            path: format!("{RESOURCE_PREFIX}{}{RESOURCE_SUFFIX}", component.name),
            xml: emitter::emit(component, index, &mut diagnostics),
        })
        .collect();

    Ok(CompileOutput {
        resources,
        header: parser::print_clauses(&resolution.header_clauses),
        diagnostics,
    })
}
