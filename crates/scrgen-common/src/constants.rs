//! Directive vocabulary and descriptor constants.
//!
//! Directive keys carry a trailing `:` to distinguish them from reference
//! names inside a component clause. The sets below drive directive
//! recognition and schema-version selection.

/// Stem of the descriptor schema namespace URI.
pub const NAMESPACE_STEM: &str = "http://www.osgi.org/xmlns/scr";

/// Directory prefix for generated descriptor resources.
pub const RESOURCE_PREFIX: &str = "OSGI-INF/";

/// File suffix for descriptor resources.
pub const RESOURCE_SUFFIX: &str = ".xml";

/// `name:` — overrides the component name.
pub const COMPONENT_NAME: &str = "name:";
/// `factory:` — component factory identifier.
pub const COMPONENT_FACTORY: &str = "factory:";
/// `servicefactory:` — publish the service with a service factory.
pub const COMPONENT_SERVICEFACTORY: &str = "servicefactory:";
/// `immediate:` — activate eagerly.
pub const COMPONENT_IMMEDIATE: &str = "immediate:";
/// `enabled:` — initial enabled state.
pub const COMPONENT_ENABLED: &str = "enabled:";
/// `dynamic:` — reference names with dynamic policy.
pub const COMPONENT_DYNAMIC: &str = "dynamic:";
/// `multiple:` — reference names with multiple cardinality.
pub const COMPONENT_MULTIPLE: &str = "multiple:";
/// `optional:` — reference names with optional cardinality.
pub const COMPONENT_OPTIONAL: &str = "optional:";
/// `provide:` — provided service interfaces.
pub const COMPONENT_PROVIDE: &str = "provide:";
/// `properties:` — component property clauses.
pub const COMPONENT_PROPERTIES: &str = "properties:";
/// `implementation:` — overrides the implementation class.
pub const COMPONENT_IMPLEMENTATION: &str = "implementation:";
/// `noannotations:` — ignore discovered annotation metadata.
pub const COMPONENT_NOANNOTATIONS: &str = "noannotations:";

// Introduced with descriptor schema v1.1.0.

/// `version:` — explicit descriptor schema version.
pub const COMPONENT_VERSION: &str = "version:";
/// `configuration-policy:` — configuration handling policy.
pub const COMPONENT_CONFIGURATION_POLICY: &str = "configuration-policy:";
/// `modified:` — configuration-modified callback method.
pub const COMPONENT_MODIFIED: &str = "modified:";
/// `activate:` — activation callback method.
pub const COMPONENT_ACTIVATE: &str = "activate:";
/// `deactivate:` — deactivation callback method.
pub const COMPONENT_DEACTIVATE: &str = "deactivate:";

/// All recognized component directives. Any other key ending in `:` is an
/// unrecognized directive and is reported as a resolution error.
pub const COMPONENT_DIRECTIVES: &[&str] = &[
    COMPONENT_NAME,
    COMPONENT_FACTORY,
    COMPONENT_SERVICEFACTORY,
    COMPONENT_IMMEDIATE,
    COMPONENT_ENABLED,
    COMPONENT_DYNAMIC,
    COMPONENT_MULTIPLE,
    COMPONENT_OPTIONAL,
    COMPONENT_PROVIDE,
    COMPONENT_PROPERTIES,
    COMPONENT_IMPLEMENTATION,
    COMPONENT_NOANNOTATIONS,
    COMPONENT_VERSION,
    COMPONENT_CONFIGURATION_POLICY,
    COMPONENT_MODIFIED,
    COMPONENT_ACTIVATE,
    COMPONENT_DEACTIVATE,
];

/// Directives whose presence selects the v1.1.0 descriptor schema.
pub const DIRECTIVES_1_1: &[&str] = &[
    COMPONENT_VERSION,
    COMPONENT_CONFIGURATION_POLICY,
    COMPONENT_MODIFIED,
    COMPONENT_ACTIVATE,
    COMPONENT_DEACTIVATE,
];

/// Allowed `type` values on a property element.
pub const PROPERTY_TYPES: &[&str] = &[
    "String", "Long", "Double", "Float", "Integer", "Byte", "Char", "Boolean", "Short",
];

/// Allowed `configuration-policy` values.
pub const CONFIGURATION_POLICIES: &[&str] = &["optional", "require", "ignore"];

/// Returns `true` when `key` names a directive (trailing `:`).
#[must_use]
pub fn is_directive(key: &str) -> bool {
    key.ends_with(':')
}

/// Returns `true` when `value` represents a set flag.
///
/// A bare flag in the header is stored as `true`; explicit values follow the
/// same convention.
#[must_use]
pub fn is_true(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}
