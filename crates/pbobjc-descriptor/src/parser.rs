use std::path::Path;

use crate::types::error::{ErrorEntry, E_PARSE_ERROR};
use crate::types::file::FileSpec;

/// Suffix that marks a descriptor file
pub const DESCRIPTOR_SUFFIX: &str = ".pb.json";

/// Parse a *.pb.json descriptor file
#[allow(clippy::result_large_err)]
pub fn parse_file(content: &str, file_path: &str) -> Result<FileSpec, ErrorEntry> {
    serde_json::from_str(content).map_err(|e| serde_error_to_entry(e, file_path))
}

/// Whether the given path names a descriptor file
pub fn detect_descriptor_file(file_path: &Path) -> bool {
    file_path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| {
            name.ends_with(DESCRIPTOR_SUFFIX) && name.len() > DESCRIPTOR_SUFFIX.len()
        })
}

/// Convert a serde_json error into a structured ErrorEntry
fn serde_error_to_entry(err: serde_json::Error, file_path: &str) -> ErrorEntry {
    let line = err.line();
    let col = err.column();
    let path = format!("$.line:{line}:col:{col}");

    ErrorEntry::error(
        E_PARSE_ERROR,
        format!("JSON parse error: {err}"),
        file_path,
        &path,
    )
    .with_suggestion("Check JSON syntax and field types")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_file() {
        let json = r#"{
            "name": "foo/bar.proto",
            "package": "foo",
            "options": { "javaPackage": "com.example.foo" },
            "messageTypes": [{ "name": "Foo" }],
            "extensions": [
                { "name": "bar", "number": 5, "type": "int32", "extendee": ".foo.Foo" }
            ]
        }"#;

        let file = parse_file(json, "foo/bar.pb.json").unwrap();
        assert_eq!(file.name, "foo/bar.proto");
        assert_eq!(file.extensions.len(), 1);
    }

    #[test]
    fn test_parse_invalid_json() {
        let json = r#"{ invalid json }"#;
        let err = parse_file(json, "broken.pb.json").unwrap_err();
        assert_eq!(err.code, E_PARSE_ERROR);
        assert_eq!(err.file, "broken.pb.json");
        assert!(err.message.contains("JSON parse error"));
    }

    #[test]
    fn test_parse_unknown_field_type() {
        let json = r#"{
            "name": "a.proto",
            "extensions": [{ "name": "x", "number": 1, "type": "int128", "extendee": "Foo" }]
        }"#;
        let err = parse_file(json, "a.pb.json").unwrap_err();
        assert!(err.message.contains("int128"));
    }

    #[test]
    fn test_detect_descriptor_file() {
        assert!(detect_descriptor_file(Path::new("foo/bar.pb.json")));
        assert!(detect_descriptor_file(Path::new("x.pb.json")));
        assert!(!detect_descriptor_file(Path::new(".pb.json")));
        assert!(!detect_descriptor_file(Path::new("bar.json")));
        assert!(!detect_descriptor_file(Path::new("README.md")));
    }

    #[test]
    fn test_serde_error_includes_location() {
        let json = r#"{
            "name": 123
        }"#;
        let err = parse_file(json, "a.pb.json").unwrap_err();
        assert!(err.path.contains("line:"));
        assert!(err.path.contains("col:"));
    }
}
