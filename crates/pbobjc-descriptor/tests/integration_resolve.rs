use std::path::PathBuf;

use pbobjc_descriptor::types::error::{E_INVALID_DEFAULT, E_INVALID_FIELD, E_REF_NOT_FOUND};
use pbobjc_descriptor::{
    load_descriptor_set, resolve_set, Cardinality, DefaultValue, ResolvedFile, Scope,
    ValidationReport, ValueKind,
};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("fixtures")
}

fn load_and_resolve(fixture: &str) -> (Vec<ResolvedFile>, ValidationReport) {
    let path = fixtures_dir().join(fixture);
    let (set, mut report) = load_descriptor_set(&path)
        .unwrap_or_else(|e| panic!("Failed to load fixture '{}': {}", fixture, e));
    let (resolved, resolve_report) = resolve_set(&set);
    report.merge(resolve_report);
    (resolved, report)
}

#[test]
fn test_basic_fixture_resolves_cleanly() {
    let (resolved, report) = load_and_resolve("extensions-basic");
    assert!(report.ok, "unexpected errors: {:?}", report.errors);

    let paths: Vec<&str> = resolved.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["foo/base.pb.json", "foo/ext.pb.json"]);
    assert!(resolved[0].extensions.is_empty());

    let names: Vec<&str> = resolved[1]
        .extensions
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["bar", "ratio", "tags", "color", "samples", "old_flag", "blob", "self_ref", "inner"]
    );
}

#[test]
fn test_basic_fixture_field_details() {
    let (resolved, _) = load_and_resolve("extensions-basic");
    let ext = &resolved[1].extensions;

    assert_eq!(ext[0].default, Some(DefaultValue::Int32(-1)));
    assert_eq!(ext[0].extendee.full_name, ".foo.Foo");
    assert_eq!(ext[0].extendee.file.name, "foo/base.proto");

    assert_eq!(ext[1].default, Some(DefaultValue::Float(3.5)));
    assert_eq!(ext[2].cardinality, Cardinality::Repeated);

    match &ext[3].value {
        ValueKind::Enum(e) => {
            assert_eq!(e.type_ref.full_name, ".foo.Color");
            assert_eq!(e.first_value().map(|v| v.number), Some(1));
        }
        other => panic!("expected enum, got {other:?}"),
    }
    assert!(ext[3].default.is_none());

    assert!(ext[4].packed);
    assert!(ext[5].deprecated);
    assert_eq!(ext[6].default, Some(DefaultValue::Bytes(vec![1, 2])));

    match &ext[7].scope {
        Scope::Message(t) => assert_eq!(t.full_name, ".foo.Holder"),
        other => panic!("expected message scope, got {other:?}"),
    }
    assert_eq!(ext[7].full_name, ".foo.Holder.self_ref");
    assert_eq!(
        ext[8].value.type_ref().map(|t| t.full_name.as_str()),
        Some(".foo.Foo.Inner")
    );
}

#[test]
fn test_broken_fixture_reports_every_problem() {
    let (resolved, report) = load_and_resolve("broken-refs");
    assert!(report.has_errors());

    let codes: Vec<&str> = report.errors.iter().map(|e| e.code.as_str()).collect();
    assert_eq!(codes, vec![E_REF_NOT_FOUND, E_INVALID_FIELD, E_INVALID_DEFAULT]);
    assert!(report.errors.iter().all(|e| e.file == "broken.pb.json"));

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].extensions.len(), 1);
    assert_eq!(
        resolved[0].extensions[0].default,
        Some(DefaultValue::String("hi".into()))
    );
}

#[test]
fn test_missing_fixture_directory() {
    let result = load_descriptor_set(&fixtures_dir().join("does-not-exist"));
    assert!(result.is_err());
}
