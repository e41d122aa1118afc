//! Canonical XML rendering of a resolved component.
//!
//! Element order inside one descriptor is fixed because some consuming
//! runtimes are order-sensitive: component attributes, implementation,
//! service block, properties, references. Attribute text is written exactly
//! as given; escaping it would change observable output.

use scrgen_common::constants::{
    COMPONENT_ACTIVATE, COMPONENT_CONFIGURATION_POLICY, COMPONENT_DEACTIVATE, COMPONENT_ENABLED,
    COMPONENT_FACTORY, COMPONENT_IMMEDIATE, COMPONENT_MODIFIED, COMPONENT_PROPERTIES,
    COMPONENT_PROVIDE, COMPONENT_SERVICEFACTORY, CONFIGURATION_POLICIES, PROPERTY_TYPES, is_true,
};
use scrgen_common::diagnostics::Diagnostics;

use crate::index::ClassIndex;
use crate::namespace;
use crate::parser::ast::split_list;
use crate::reference;
use crate::resolver::ResolvedComponent;

/// Validation applied to a component attribute value.
enum Check<'a> {
    /// Any value is accepted.
    None,
    /// Value must be a member of the given set.
    Member(&'a [&'a str]),
    /// Value must be a bare identifier token.
    Identifier,
}

/// Renders one resolved component as an XML descriptor document.
///
/// Validation failures and advisory findings are recorded in `diags`;
/// emission always completes, writing the offending attribute as given.
/// Emitting twice from the same component yields byte-identical output.
#[must_use]
pub fn emit(
    component: &ResolvedComponent,
    index: &dyn ClassIndex,
    diags: &mut Diagnostics,
) -> String {
    tracing::debug!(name = %component.name, "emitting component descriptor");
    let attrs = &component.attrs;
    let mut out = String::from("<?xml version='1.0' encoding='utf-8'?>\n");

    out.push_str(&format!("<component name='{}'", component.name));
    if let Some(uri) = namespace::namespace(attrs, diags) {
        out.push_str(&format!(" xmlns='{uri}'"));
    }

    write_attribute(&mut out, attrs.get(COMPONENT_FACTORY), "factory", &Check::None, diags);
    write_attribute(
        &mut out,
        attrs.get(COMPONENT_IMMEDIATE),
        "immediate",
        &Check::Member(&["false", "true"]),
        diags,
    );
    write_attribute(
        &mut out,
        attrs.get(COMPONENT_ENABLED),
        "enabled",
        &Check::Member(&["true", "false"]),
        diags,
    );
    write_attribute(
        &mut out,
        attrs.get(COMPONENT_CONFIGURATION_POLICY),
        "configuration-policy",
        &Check::Member(CONFIGURATION_POLICIES),
        diags,
    );
    write_attribute(&mut out, attrs.get(COMPONENT_ACTIVATE), "activate", &Check::Identifier, diags);
    write_attribute(
        &mut out,
        attrs.get(COMPONENT_DEACTIVATE),
        "deactivate",
        &Check::Identifier,
        diags,
    );
    write_attribute(&mut out, attrs.get(COMPONENT_MODIFIED), "modified", &Check::Identifier, diags);
    out.push_str(">\n");

    out.push_str(&format!(
        "  <implementation class='{}'/>\n",
        component.implementation
    ));

    write_service(&mut out, component, index, diags);
    write_properties(&mut out, attrs.get(COMPONENT_PROPERTIES), diags);
    write_references(&mut out, component, index, diags);

    out.push_str("</component>\n");
    out
}

fn write_attribute(
    out: &mut String,
    value: Option<&str>,
    name: &str,
    check: &Check<'_>,
    diags: &mut Diagnostics,
) {
    let Some(value) = value else {
        return;
    };
    match check {
        Check::None => {}
        Check::Member(members) => {
            if !members.contains(&value) {
                diags.validation_error(format!(
                    "component attribute {name} has value {value} but is not a member of {members:?}"
                ));
            }
        }
        Check::Identifier => {
            if !is_identifier(value) {
                diags.validation_error(format!(
                    "component attribute {name} has value {value} but is not an identifier"
                ));
            }
        }
    }
    out.push_str(&format!(" {name}='{value}'"));
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn write_service(
    out: &mut String,
    component: &ResolvedComponent,
    index: &dyn ClassIndex,
    diags: &mut Diagnostics,
) {
    let attrs = &component.attrs;
    let provides = split_list(attrs.get(COMPONENT_PROVIDE));
    let servicefactory = is_true(attrs.get(COMPONENT_SERVICEFACTORY));

    if servicefactory && is_true(attrs.get(COMPONENT_IMMEDIATE)) {
        diags.warning(format!(
            "the immediate option and the servicefactory option are mutually exclusive for {} ({})",
            component.name, component.implementation
        ));
    }

    if provides.is_empty() {
        if servicefactory {
            diags.warning(
                "the servicefactory:=true directive is set but no service is provided, ignoring it",
            );
        }
        return;
    }

    if servicefactory {
        out.push_str("  <service servicefactory='true'>\n");
    } else {
        out.push_str("  <service>\n");
    }
    for interface in provides {
        out.push_str(&format!("    <provide interface='{interface}'/>\n"));
        if !index.class_exists(&interface) {
            diags.resolution_error(format!(
                "component definition provides a class that is neither imported nor contained: {interface}"
            ));
        }
    }
    out.push_str("  </service>\n");
}

fn write_properties(out: &mut String, properties: Option<&str>, diags: &mut Diagnostics) {
    for clause in split_list(properties) {
        let Some(eq) = clause.find('=').filter(|&n| n > 0) else {
            diags.validation_error(format!(
                "not a valid property in service component: {clause}"
            ));
            continue;
        };
        let (name_part, value) = clause.split_at(eq);
        let value = value[1..].trim();
        let (name, type_tag) = split_property_name(name_part);

        out.push_str(&format!("  <property name='{name}'"));
        if let Some(type_tag) = type_tag {
            if PROPERTY_TYPES.contains(&type_tag) {
                out.push_str(&format!(" type='{type_tag}'"));
            } else {
                diags.warning(format!(
                    "invalid property type '{type_tag}' for property {name}"
                ));
            }
        }

        let mut parts: Vec<&str> = value.split(['|', '\n']).map(str::trim).collect();
        while parts.last().is_some_and(|p| p.is_empty()) {
            let _ = parts.pop();
        }
        if parts.len() > 1 {
            out.push_str(">\n");
            for part in parts {
                out.push_str(part);
                out.push('\n');
            }
            out.push_str("</property>\n");
        } else {
            out.push_str(&format!(" value='{}'/>\n", parts.first().unwrap_or(&"")));
        }
    }
}

/// Splits a property name into `(name, type)`: `type@name` or `name:type`.
fn split_property_name(name: &str) -> (&str, Option<&str>) {
    if let Some((type_tag, name)) = name.split_once('@') {
        (name, Some(type_tag))
    } else if let Some((name, type_tag)) = name.split_once(':') {
        (name, Some(type_tag))
    } else {
        (name, None)
    }
}

fn write_references(
    out: &mut String,
    component: &ResolvedComponent,
    index: &dyn ClassIndex,
    diags: &mut Diagnostics,
) {
    let methods = index.method_names(&component.implementation);
    for r in reference::interpret(&component.attrs, index, &methods, diags) {
        out.push_str(&format!("  <reference name='{}'", r.name));
        out.push_str(&format!(" interface='{}'", r.interface));
        if !r.is_default_cardinality() {
            out.push_str(&format!(" cardinality='{}'", r.cardinality()));
        }
        if let Some(ref bind) = r.bind {
            out.push_str(&format!(" bind='{bind}'"));
            if let Some(ref unbind) = r.unbind {
                out.push_str(&format!(" unbind='{unbind}'"));
            }
        }
        if r.dynamic {
            out.push_str(" policy='dynamic'");
        }
        if let Some(ref target) = r.target {
            out.push_str(&format!(" target='{target}'"));
        }
        out.push_str("/>\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{IndexedClass, StaticClassIndex};
    use crate::parser::ast::AttrMap;

    const LOG: &str = "org.osgi.service.log.LogService";

    fn component(name: &str, attrs: AttrMap) -> ResolvedComponent {
        ResolvedComponent {
            name: name.into(),
            implementation: name.into(),
            attrs,
        }
    }

    fn index_for(contained: &[&str], imports: &[&str]) -> StaticClassIndex {
        StaticClassIndex {
            classes: contained
                .iter()
                .map(|fqn| IndexedClass {
                    fqn: (*fqn).to_owned(),
                    ..IndexedClass::default()
                })
                .collect(),
            imports: imports.iter().map(ToString::to_string).collect(),
        }
    }

    fn attrs(pairs: &[(&str, &str)]) -> AttrMap {
        pairs.iter().copied().collect()
    }

    #[test]
    fn minimal_component_descriptor() {
        let mut diags = Diagnostics::new();
        let comp = component("com.acme.Foo", AttrMap::new());
        let xml = emit(&comp, &index_for(&["com.acme.Foo"], &[]), &mut diags);
        assert_eq!(
            xml,
            "<?xml version='1.0' encoding='utf-8'?>\n\
             <component name='com.acme.Foo'>\n\
             \x20\x20<implementation class='com.acme.Foo'/>\n\
             </component>\n"
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn emission_is_idempotent() {
        let comp = component(
            "com.acme.Foo",
            attrs(&[("immediate:", "true"), ("log", LOG)]),
        );
        let index = index_for(&["com.acme.Foo"], &[LOG]);
        let mut first_diags = Diagnostics::new();
        let mut second_diags = Diagnostics::new();
        let first = emit(&comp, &index, &mut first_diags);
        let second = emit(&comp, &index, &mut second_diags);
        assert_eq!(first, second);
        assert_eq!(first_diags, second_diags);
    }

    #[test]
    fn component_attributes_in_fixed_order() {
        let comp = component(
            "c",
            attrs(&[
                ("modified:", "changed"),
                ("factory:", "my.factory"),
                ("enabled:", "false"),
                ("immediate:", "true"),
            ]),
        );
        let mut diags = Diagnostics::new();
        let xml = emit(&comp, &index_for(&["c"], &[]), &mut diags);
        let component_line = xml.lines().nth(1).expect("component element line");
        assert_eq!(
            component_line,
            "<component name='c' xmlns='http://www.osgi.org/xmlns/scr/v1.1.0' \
             factory='my.factory' immediate='true' enabled='false' modified='changed'>"
        );
    }

    #[test]
    fn invalid_enum_value_recorded_but_written() {
        let comp = component("c", attrs(&[("configuration-policy:", "sometimes")]));
        let mut diags = Diagnostics::new();
        let xml = emit(&comp, &index_for(&["c"], &[]), &mut diags);
        assert!(xml.contains("configuration-policy='sometimes'"));
        assert!(diags.has_errors());
    }

    #[test]
    fn invalid_identifier_recorded_but_written() {
        let comp = component("c", attrs(&[("activate:", "start up")]));
        let mut diags = Diagnostics::new();
        let xml = emit(&comp, &index_for(&["c"], &[]), &mut diags);
        assert!(xml.contains("activate='start up'"));
        assert!(diags.has_errors());
    }

    #[test]
    fn service_block_with_servicefactory() {
        let comp = component(
            "c",
            attrs(&[("provide:", "com.acme.API"), ("servicefactory:", "true")]),
        );
        let mut diags = Diagnostics::new();
        let xml = emit(&comp, &index_for(&["c"], &["com.acme.API"]), &mut diags);
        assert!(xml.contains("  <service servicefactory='true'>\n"));
        assert!(xml.contains("    <provide interface='com.acme.API'/>\n"));
        assert!(xml.contains("  </service>\n"));
        assert!(diags.is_empty());
    }

    #[test]
    fn no_service_block_without_provide() {
        let comp = component("c", AttrMap::new());
        let mut diags = Diagnostics::new();
        let xml = emit(&comp, &index_for(&["c"], &[]), &mut diags);
        assert!(!xml.contains("<service"));
    }

    #[test]
    fn servicefactory_with_immediate_warns() {
        let comp = component(
            "c",
            attrs(&[
                ("provide:", "com.acme.API"),
                ("servicefactory:", "true"),
                ("immediate:", "true"),
            ]),
        );
        let mut diags = Diagnostics::new();
        let _ = emit(&comp, &index_for(&["c"], &["com.acme.API"]), &mut diags);
        assert_eq!(diags.len(), 1);
        assert!(!diags.has_errors(), "mutual exclusion is advisory");
    }

    #[test]
    fn servicefactory_without_provide_warns_and_ignores() {
        let comp = component("c", attrs(&[("servicefactory:", "true")]));
        let mut diags = Diagnostics::new();
        let xml = emit(&comp, &index_for(&["c"], &[]), &mut diags);
        assert!(!xml.contains("<service"));
        assert_eq!(diags.len(), 1);
        assert!(!diags.has_errors());
    }

    #[test]
    fn unresolved_provided_interface_is_an_error() {
        let comp = component("c", attrs(&[("provide:", "com.acme.Gone")]));
        let mut diags = Diagnostics::new();
        let xml = emit(&comp, &index_for(&["c"], &[]), &mut diags);
        assert!(xml.contains("<provide interface='com.acme.Gone'/>"), "still written");
        assert!(diags.has_errors());
    }

    #[test]
    fn scalar_property() {
        let comp = component("c", attrs(&[("properties:", "x=5")]));
        let mut diags = Diagnostics::new();
        let xml = emit(&comp, &index_for(&["c"], &[]), &mut diags);
        assert!(xml.contains("  <property name='x' value='5'/>\n"));
    }

    #[test]
    fn multi_line_property() {
        let comp = component("c", attrs(&[("properties:", "x=1|2|3")]));
        let mut diags = Diagnostics::new();
        let xml = emit(&comp, &index_for(&["c"], &[]), &mut diags);
        assert!(xml.contains("  <property name='x'>\n1\n2\n3\n</property>\n"));
    }

    #[test]
    fn typed_property_colon_form() {
        let comp = component("c", attrs(&[("properties:", "port:Integer=8080")]));
        let mut diags = Diagnostics::new();
        let xml = emit(&comp, &index_for(&["c"], &[]), &mut diags);
        assert!(xml.contains("  <property name='port' type='Integer' value='8080'/>\n"));
    }

    #[test]
    fn typed_property_at_form() {
        let comp = component("c", attrs(&[("properties:", "Long@count=1")]));
        let mut diags = Diagnostics::new();
        let xml = emit(&comp, &index_for(&["c"], &[]), &mut diags);
        assert!(xml.contains("  <property name='count' type='Long' value='1'/>\n"));
    }

    #[test]
    fn invalid_property_type_warns_and_omits_attribute() {
        let comp = component("c", attrs(&[("properties:", "x:Decimal=1")]));
        let mut diags = Diagnostics::new();
        let xml = emit(&comp, &index_for(&["c"], &[]), &mut diags);
        assert!(xml.contains("  <property name='x' value='1'/>\n"));
        assert_eq!(diags.len(), 1);
        assert!(!diags.has_errors());
    }

    #[test]
    fn property_without_equals_is_validation_error() {
        let comp = component("c", attrs(&[("properties:", "broken")]));
        let mut diags = Diagnostics::new();
        let xml = emit(&comp, &index_for(&["c"], &[]), &mut diags);
        assert!(!xml.contains("<property"));
        assert!(diags.has_errors());
    }

    #[test]
    fn multiple_property_clauses() {
        let comp = component("c", attrs(&[("properties:", "a=1, b=2")]));
        let mut diags = Diagnostics::new();
        let xml = emit(&comp, &index_for(&["c"], &[]), &mut diags);
        assert!(xml.contains("  <property name='a' value='1'/>\n"));
        assert!(xml.contains("  <property name='b' value='2'/>\n"));
    }

    #[test]
    fn reference_element_full_shape() {
        let mut reference_attrs = AttrMap::new();
        reference_attrs.insert("log", format!("{LOG}(x=1)*"));
        let comp = component("c", reference_attrs);
        let mut diags = Diagnostics::new();
        let xml = emit(&comp, &index_for(&["c"], &[LOG]), &mut diags);
        assert!(xml.contains(
            "  <reference name='log' interface='org.osgi.service.log.LogService' \
             cardinality='0..n' bind='setLog' unbind='unsetLog' policy='dynamic' \
             target='(x=1)'/>\n"
        ));
        assert!(diags.is_empty());
    }

    #[test]
    fn default_cardinality_attribute_omitted() {
        let comp = component("c", attrs(&[("log", LOG)]));
        let mut diags = Diagnostics::new();
        let xml = emit(&comp, &index_for(&["c"], &[LOG]), &mut diags);
        assert!(!xml.contains("cardinality="));
        assert!(!xml.contains("policy="));
    }

    #[test]
    fn directive_driven_cardinality_and_policy() {
        let comp = component(
            "Foo",
            attrs(&[("dynamic:", "bar"), ("optional:", "bar"), ("bar", "com.X.I")]),
        );
        let mut diags = Diagnostics::new();
        let xml = emit(&comp, &index_for(&["Foo"], &["com.X.I"]), &mut diags);
        assert!(xml.contains("cardinality='0..1'"));
        assert!(xml.contains("policy='dynamic'"));
        assert!(diags.is_empty());
    }

    #[test]
    fn element_order_service_properties_references() {
        let comp = component(
            "c",
            attrs(&[
                ("log", LOG),
                ("provide:", "com.acme.API"),
                ("properties:", "x=1"),
            ]),
        );
        let mut diags = Diagnostics::new();
        let xml = emit(
            &comp,
            &index_for(&["c"], &[LOG, "com.acme.API"]),
            &mut diags,
        );
        let service = xml.find("<service").expect("service");
        let property = xml.find("<property").expect("property");
        let reference = xml.find("<reference").expect("reference");
        let implementation = xml.find("<implementation").expect("implementation");
        assert!(implementation < service);
        assert!(service < property);
        assert!(property < reference);
    }
}
