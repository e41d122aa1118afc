//! End-to-end tests: header text in, descriptor resources and rewritten
//! header out, against a JSON-loaded class index.

use scrgen_core::index::StaticClassIndex;
use scrgen_core::pipeline::{CompileOutput, compile};

const LOG: &str = "org.osgi.service.log.LogService";

fn index() -> StaticClassIndex {
    StaticClassIndex::from_json(
        r#"{
            "classes": [
                { "fqn": "com.acme.Foo" },
                { "fqn": "com.X.I" },
                {
                    "fqn": "com.acme.impl.MailerImpl",
                    "annotated": true,
                    "attributes": [
                        ["provide:", "com.acme.Mailer"],
                        ["properties:", "transport=smtp"],
                        ["log", "org.osgi.service.log.LogService"]
                    ],
                    "methods": ["setLog", "unsetLog", "start", "stop"]
                },
                { "fqn": "com.acme.Mailer" }
            ],
            "imports": ["org.osgi.service.log.LogService"]
        }"#,
    )
    .expect("index should parse")
}

fn run(header: &str) -> CompileOutput {
    let index = index();
    compile(header, &index, &index).expect("header should compile")
}

#[test]
fn attribute_only_clause_round_trips() {
    let output = run("com.acme.Foo;factory:=acme.factory;immediate:=true;enabled:=false");
    assert_eq!(output.resources.len(), 1);
    let xml = &output.resources[0].xml;
    assert!(xml.contains("factory='acme.factory'"));
    assert!(xml.contains("immediate='true'"));
    assert!(xml.contains("enabled='false'"));
    assert!(output.diagnostics.is_empty());
}

#[test]
fn compilation_is_idempotent() {
    let header = "com.acme.Foo;log=org.osgi.service.log.LogService;immediate:=true";
    let first = run(header);
    let second = run(header);
    assert_eq!(first.resources, second.resources);
    assert_eq!(first.header, second.header);
    assert_eq!(first.diagnostics, second.diagnostics);
}

#[test]
fn cardinality_suffix_table_end_to_end() {
    let cases = [
        ("?", Some("0..1"), true),
        ("+", Some("1..n"), true),
        ("*", Some("0..n"), true),
        ("~", Some("0..1"), false),
        ("", None, false),
    ];
    for (suffix, cardinality, dynamic) in cases {
        let output = run(&format!("com.acme.Foo;log={LOG}{suffix}"));
        let xml = &output.resources[0].xml;
        match cardinality {
            Some(c) => assert!(
                xml.contains(&format!("cardinality='{c}'")),
                "suffix {suffix:?}: {xml}"
            ),
            None => assert!(!xml.contains("cardinality="), "suffix {suffix:?}"),
        }
        assert_eq!(
            xml.contains("policy='dynamic'"),
            dynamic,
            "suffix {suffix:?}"
        );
        assert!(xml.contains(&format!("interface='{LOG}'")), "suffix stripped");
    }
}

#[test]
fn lowercase_reference_synthesizes_set_unset_pair() {
    let output = run(&format!("com.acme.Foo;log={LOG}"));
    let xml = &output.resources[0].xml;
    assert!(xml.contains("bind='setLog'"));
    assert!(xml.contains("unbind='unsetLog'"));
}

#[test]
fn slash_reference_derives_remove_unbind() {
    let output = run(&format!("com.acme.Foo;log/addLog={LOG}"));
    let xml = &output.resources[0].xml;
    assert!(xml.contains("reference name='log'"));
    assert!(xml.contains("bind='addLog'"));
    assert!(xml.contains("unbind='removeLog'"));
}

#[test]
fn activate_directive_selects_v1_1_0_schema() {
    let output = run("com.acme.Foo;activate:=init");
    let xml = &output.resources[0].xml;
    assert!(xml.contains("xmlns='http://www.osgi.org/xmlns/scr/v1.1.0'"));
    assert!(xml.contains("activate='init'"));
}

#[test]
fn explicit_version_selects_exact_schema() {
    let output = run("com.acme.Foo;version:=1.2");
    let xml = &output.resources[0].xml;
    assert!(xml.contains("xmlns='http://www.osgi.org/xmlns/scr/v1.2'"));
}

#[test]
fn dynamic_and_optional_directive_sets_combine() {
    let output = run("com.acme.Foo;dynamic:=bar;optional:=bar;bar=com.X.I");
    let xml = &output.resources[0].xml;
    assert!(xml.contains("cardinality='0..1'"));
    assert!(xml.contains("policy='dynamic'"));
    assert!(output.diagnostics.is_empty());
}

#[test]
fn wildcard_without_matches_keeps_pattern_and_records_error() {
    let output = run("com.acme.missing.*");
    assert_eq!(output.resources.len(), 1);
    let xml = &output.resources[0].xml;
    assert!(xml.contains("<implementation class='com.acme.missing.*'/>"));
    assert!(output.diagnostics.has_errors());
}

#[test]
fn property_scalar_and_multi_line_forms() {
    let output = run(r#"com.acme.Foo;properties:="x=1|2|3,y=5""#);
    let xml = &output.resources[0].xml;
    assert!(xml.contains("<property name='x'>\n1\n2\n3\n</property>"));
    assert!(xml.contains("<property name='y' value='5'/>"));
}

#[test]
fn annotation_discovery_merges_manifest_overrides() {
    let output = run(r#"com.acme.impl.*;immediate:=true;properties:="debug=true""#);
    assert_eq!(output.resources.len(), 1);
    assert_eq!(output.resources[0].path, "OSGI-INF/com.acme.impl.MailerImpl.xml");
    let xml = &output.resources[0].xml;
    assert!(xml.contains("immediate='true'"), "manifest overlay applied");
    assert!(xml.contains("<provide interface='com.acme.Mailer'/>"));
    assert!(
        xml.contains("<property name='debug' value='true'/>"),
        "manifest properties kept"
    );
    assert!(
        xml.contains("<property name='transport' value='smtp'/>"),
        "annotation properties kept"
    );
    assert!(xml.contains("bind='setLog'"), "methods verified against class");
    assert_eq!(output.header, "OSGI-INF/com.acme.impl.MailerImpl.xml");
    assert!(output.diagnostics.is_empty());
}

#[test]
fn discovered_methods_enforce_bind_presence() {
    // MailerImpl declares setLog/unsetLog but no setMailer.
    let output = run("com.acme.impl.*;mailer=com.acme.Mailer");
    assert!(output.diagnostics.has_errors());
    let xml = &output.resources[0].xml;
    assert!(xml.contains("bind='setMailer'"), "still written best-effort");
    assert!(
        !xml.contains("unbind='unsetMailer'"),
        "calculated unbind silently dropped"
    );
}

#[test]
fn pass_through_and_generated_clauses_share_one_header() {
    let output = run("OSGI-INF/manual.xml,com.acme.Foo");
    assert_eq!(output.resources.len(), 1);
    assert_eq!(output.header, "OSGI-INF/manual.xml,OSGI-INF/com.acme.Foo.xml");
}

#[test]
fn malformed_header_produces_no_output() {
    let index = index();
    let result = compile(r#"com.acme.Foo;properties:="unterminated"#, &index, &index);
    assert!(result.is_err());
}
