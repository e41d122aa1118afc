//! Interpretation of reference attributes.
//!
//! Every attribute whose key does not carry the directive marker declares a
//! service reference. The key encodes the reference name and optionally the
//! bind/unbind method names; the value carries the interface name, an
//! optional cardinality suffix, and an optional parenthesized target filter.

use std::collections::BTreeSet;

use scrgen_common::constants::{
    COMPONENT_DIRECTIVES, COMPONENT_DYNAMIC, COMPONENT_MULTIPLE, COMPONENT_OPTIONAL,
    is_directive,
};
use scrgen_common::diagnostics::Diagnostics;

use crate::index::ClassIndex;
use crate::parser::ast::{AttrMap, split_list};

/// How an unbind method name was obtained.
///
/// A calculated unbind that is absent from the discovered-method set is
/// silently dropped; an explicit one that is absent is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnbindProvenance {
    /// Derived from the bind method by naming heuristic.
    Calculated,
    /// Given literally in the header.
    Explicit,
}

/// A structured service reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceDescriptor {
    /// Reference name, unique within one component.
    pub name: String,
    /// Service interface name.
    pub interface: String,
    /// Bind method, when one applies.
    pub bind: Option<String>,
    /// Unbind method, when one applies.
    pub unbind: Option<String>,
    /// Provenance of the unbind method name.
    pub unbind_provenance: UnbindProvenance,
    /// Minimum cardinality 0 instead of 1.
    pub optional: bool,
    /// Maximum cardinality n instead of 1.
    pub multiple: bool,
    /// Dynamic binding policy.
    pub dynamic: bool,
    /// Target filter expression, parens included, unvalidated.
    pub target: Option<String>,
}

impl ReferenceDescriptor {
    /// Renders the cardinality as `min..max`.
    #[must_use]
    pub fn cardinality(&self) -> String {
        format!(
            "{}..{}",
            if self.optional { "0" } else { "1" },
            if self.multiple { "n" } else { "1" }
        )
    }

    /// Returns `true` for the default `1..1` cardinality, which is omitted
    /// from the descriptor.
    #[must_use]
    pub const fn is_default_cardinality(&self) -> bool {
        !self.optional && !self.multiple
    }
}

/// Builds reference descriptors from a component's attributes, in input
/// order.
///
/// `methods` is the discovered-method set of the implementation class; when
/// non-empty, bind and unbind methods are checked against it. Unrecognized
/// directives, empty interface names, unresolved interface classes, and
/// missing methods are recorded in `diags`.
pub fn interpret(
    attrs: &AttrMap,
    index: &dyn ClassIndex,
    methods: &BTreeSet<String>,
    diags: &mut Diagnostics,
) -> Vec<ReferenceDescriptor> {
    let dynamic = split_list(attrs.get(COMPONENT_DYNAMIC));
    let optional = split_list(attrs.get(COMPONENT_OPTIONAL));
    let multiple = split_list(attrs.get(COMPONENT_MULTIPLE));

    let mut references = Vec::new();

    for (key, value) in attrs.iter() {
        if is_directive(key) {
            if !COMPONENT_DIRECTIVES.contains(&key) {
                diags.resolution_error(format!(
                    "unrecognized directive in Service-Component header: {key}"
                ));
            }
            continue;
        }

        let (name, bind, unbind, provenance) = derive_methods(key);

        if value.is_empty() {
            diags.resolution_error(format!(
                "invalid interface name for reference in Service-Component: {name}={value}"
            ));
            continue;
        }

        let (bind, unbind) =
            check_methods(&name, bind, unbind, provenance, methods, diags);

        let mut reference = ReferenceDescriptor {
            optional: optional.iter().any(|n| n == &name),
            multiple: multiple.iter().any(|n| n == &name),
            dynamic: dynamic.iter().any(|n| n == &name),
            name,
            interface: String::new(),
            bind,
            unbind,
            unbind_provenance: provenance,
            target: None,
        };

        let (interface, target) = split_interface(strip_cardinality(value, &mut reference));
        reference.interface = interface.to_owned();
        reference.target = target.map(ToOwned::to_owned);

        if !index.class_exists(&reference.interface) {
            diags.resolution_error(format!(
                "component definition refers to a class that is neither imported nor contained: {}",
                reference.interface
            ));
        }

        references.push(reference);
    }

    references
}

/// Splits the attribute key into reference name and bind/unbind methods.
///
/// `name/bind/unbind` gives all three explicitly; `name/bind` derives the
/// unbind (`addX` becomes `removeX`, anything else gets an `un` prefix);
/// a lowercase name without separator synthesizes `setX`/`unsetX`.
fn derive_methods(key: &str) -> (String, Option<String>, Option<String>, UnbindProvenance) {
    if key.contains('/') {
        let mut parts = key.split('/');
        let name = parts.next().unwrap_or_default().to_owned();
        let bind = parts.next().unwrap_or_default().to_owned();
        if let Some(unbind) = parts.next() {
            return (name, Some(bind), Some(unbind.to_owned()), UnbindProvenance::Explicit);
        }
        let unbind = bind.strip_prefix("add").map_or_else(
            || format!("un{bind}"),
            |suffix| format!("remove{suffix}"),
        );
        return (name, Some(bind), Some(unbind), UnbindProvenance::Calculated);
    }

    if key.chars().next().is_some_and(char::is_lowercase) {
        let mut upper = key.to_owned();
        if let Some(first) = upper.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        let bind = format!("set{upper}");
        let unbind = format!("un{bind}");
        return (key.to_owned(), Some(bind), Some(unbind), UnbindProvenance::Calculated);
    }

    (key.to_owned(), None, None, UnbindProvenance::Calculated)
}

/// Checks bind/unbind against the discovered-method set. An empty set
/// relaxes all checks.
fn check_methods(
    name: &str,
    bind: Option<String>,
    unbind: Option<String>,
    provenance: UnbindProvenance,
    methods: &BTreeSet<String>,
    diags: &mut Diagnostics,
) -> (Option<String>, Option<String>) {
    if methods.is_empty() {
        return (bind, unbind);
    }

    if let Some(ref method) = bind {
        if !methods.contains(method) {
            diags.resolution_error(format!(
                "the bind method {method} for {name} is not defined"
            ));
        }
    }

    let unbind = match unbind {
        Some(method) if !methods.contains(&method) => match provenance {
            UnbindProvenance::Calculated => None,
            UnbindProvenance::Explicit => {
                diags.resolution_error(format!(
                    "the unbind method {method} for {name} is not defined"
                ));
                Some(method)
            }
        },
        other => other,
    };

    (bind, unbind)
}

/// Strips a trailing cardinality character and applies its meaning.
///
/// `?` optional+dynamic, `+` multiple+dynamic, `*` optional+multiple+dynamic,
/// `~` optional only.
fn strip_cardinality<'a>(value: &'a str, reference: &mut ReferenceDescriptor) -> &'a str {
    let Some(last) = value.chars().last() else {
        return value;
    };
    if !matches!(last, '?' | '+' | '*' | '~') {
        return value;
    }
    if matches!(last, '?' | '*' | '~') {
        reference.optional = true;
    }
    if matches!(last, '+' | '*') {
        reference.multiple = true;
    }
    if matches!(last, '?' | '+' | '*') {
        reference.dynamic = true;
    }
    &value[..value.len() - last.len_utf8()]
}

/// Splits `Interface(filter)` structurally; the filter text keeps its parens
/// and is never validated. A value that does not match the shape is returned
/// whole.
fn split_interface(value: &str) -> (&str, Option<&str>) {
    match value.find('(') {
        Some(pos) if pos > 0 && value.ends_with(')') => {
            (&value[..pos], Some(&value[pos..]))
        }
        _ => (value, None),
    }
}
