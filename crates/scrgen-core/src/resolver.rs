//! Clause resolution: pass-through vs. annotation discovery.
//!
//! Decides per clause whether it is an external descriptor reference (kept
//! verbatim) or a class-name pattern, queries the class index for annotated
//! matches, and merges manifest attributes with annotation-derived ones into
//! resolved components. Per-clause failures are recorded and do not abort
//! the remaining clauses.

use scrgen_common::constants::{
    COMPONENT_IMPLEMENTATION, COMPONENT_NAME, COMPONENT_NOANNOTATIONS, COMPONENT_PROPERTIES,
    RESOURCE_PREFIX, RESOURCE_SUFFIX, is_true,
};
use scrgen_common::diagnostics::Diagnostics;

use crate::index::{AnnotationReader, ClassIndex};
use crate::parser::ast::{AttrMap, ComponentClause};

/// A component ready for descriptor emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedComponent {
    /// Final component name; also names the output resource.
    pub name: String,
    /// Implementation class name.
    pub implementation: String,
    /// Final attribute map after merging.
    pub attrs: AttrMap,
}

/// Result of resolving one header.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Components to emit, in clause order.
    pub components: Vec<ResolvedComponent>,
    /// Clauses of the rewritten header: generated descriptor paths plus
    /// pass-through clauses, in input order.
    pub header_clauses: Vec<ComponentClause>,
}

/// Resolves parsed clauses against the class index.
///
/// Resolution failures (unresolved implementation class, annotation read
/// errors) are recorded in `diags`; affected components are still produced
/// on a best-effort basis where possible.
pub fn resolve(
    clauses: &[ComponentClause],
    index: &dyn ClassIndex,
    reader: &dyn AnnotationReader,
    diags: &mut Diagnostics,
) -> Resolution {
    tracing::debug!(clauses = clauses.len(), "resolving component clauses");
    let mut resolution = Resolution::default();

    for clause in clauses {
        if clause.key.contains('/') || clause.key.ends_with(RESOURCE_SUFFIX) {
            // External descriptor reference, not generated here.
            resolution.header_clauses.push(clause.clone());
            continue;
        }
        resolve_pattern_clause(clause, index, reader, diags, &mut resolution);
    }

    resolution
}

fn resolve_pattern_clause(
    clause: &ComponentClause,
    index: &dyn ClassIndex,
    reader: &dyn AnnotationReader,
    diags: &mut Diagnostics,
    resolution: &mut Resolution,
) {
    let matched = index.find_annotated(&clause.key);

    if matched.is_empty() || is_true(clause.attrs.get(COMPONENT_NOANNOTATIONS)) {
        // No annotated classes in the wildcarded universe; the pattern
        // itself is the implementation class.
        add_component(clause.key.clone(), clause.attrs.clone(), index, diags, resolution);
        return;
    }

    for class in matched {
        match reader.read_component_attributes(&class) {
            Ok(mut attrs) => {
                // The annotation can override the component name.
                let local_name = attrs
                    .get(COMPONENT_NAME)
                    .map_or_else(|| class.fqn.clone(), ToOwned::to_owned);
                merge_manifest(&mut attrs, &clause.attrs);
                add_component(local_name, attrs, index, diags, resolution);
            }
            Err(e) => {
                diags.resolution_error(format!(
                    "invalid Service-Component clause {} ({}): {e}",
                    clause.key, class.fqn
                ));
            }
        }
    }
}

/// Overlays manifest attributes on annotation-derived ones. The manifest
/// wins on conflict, except `properties:` where both sides are kept.
fn merge_manifest(attrs: &mut AttrMap, manifest: &AttrMap) {
    let merged = merge_values(manifest.get(COMPONENT_PROPERTIES), attrs.remove(COMPONENT_PROPERTIES).as_deref());
    for (key, value) in manifest.iter() {
        if key != COMPONENT_PROPERTIES {
            attrs.insert(key, value);
        }
    }
    if let Some(properties) = merged {
        attrs.insert(COMPONENT_PROPERTIES, properties);
    }
}

fn merge_values(manifest: Option<&str>, annotation: Option<&str>) -> Option<String> {
    let manifest = manifest.filter(|v| !v.is_empty());
    let annotation = annotation.filter(|v| !v.is_empty());
    match (manifest, annotation) {
        (Some(m), Some(a)) => Some(format!("{m},{a}")),
        (Some(v), None) | (None, Some(v)) => Some(v.to_owned()),
        (None, None) => None,
    }
}

fn add_component(
    default_name: String,
    attrs: AttrMap,
    index: &dyn ClassIndex,
    diags: &mut Diagnostics,
    resolution: &mut Resolution,
) {
    // Both the name and the implementation can be overridden in the
    // final attributes.
    let mut name = attrs
        .get(COMPONENT_NAME)
        .map_or(default_name, ToOwned::to_owned);
    while resolution.components.iter().any(|c| c.name == name) {
        name.push('~');
    }

    let implementation = attrs
        .get(COMPONENT_IMPLEMENTATION)
        .map_or_else(|| name.clone(), ToOwned::to_owned);

    if !index.class_exists(&implementation) {
        diags.resolution_error(format!(
            "no implementation found for Service-Component entry: {implementation}"
        ));
    }

    resolution.header_clauses.push(ComponentClause {
        key: format!("{RESOURCE_PREFIX}{name}{RESOURCE_SUFFIX}"),
        attrs: AttrMap::new(),
    });
    resolution.components.push(ResolvedComponent {
        name,
        implementation,
        attrs,
    });
}
