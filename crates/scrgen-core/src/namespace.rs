//! Descriptor schema version selection.
//!
//! An explicit `version:` directive picks the schema URI directly; otherwise
//! the presence of any v1.1.0 directive selects that schema; otherwise no
//! namespace is written and the runtime default applies.

use scrgen_common::constants::{COMPONENT_VERSION, DIRECTIVES_1_1, NAMESPACE_STEM};
use scrgen_common::diagnostics::Diagnostics;
use scrgen_common::version::Version;

use crate::parser::ast::AttrMap;

/// Returns the schema namespace URI for a component's attributes, or `None`
/// when the runtime default schema applies.
///
/// An invalid `version:` token is recorded as a resolution error and yields
/// `None`.
#[must_use]
pub fn namespace(attrs: &AttrMap, diags: &mut Diagnostics) -> Option<String> {
    if let Some(token) = attrs.get(COMPONENT_VERSION) {
        return match token.parse::<Version>() {
            Ok(version) => Some(format!("{NAMESPACE_STEM}/v{version}")),
            Err(e) => {
                diags.resolution_error(format!(
                    "version: specified on component header but {e}"
                ));
                None
            }
        };
    }

    if DIRECTIVES_1_1.iter().any(|d| attrs.contains_key(d)) {
        return Some(format!("{NAMESPACE_STEM}/v1.1.0"));
    }

    None
}
