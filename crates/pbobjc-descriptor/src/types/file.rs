use serde::{Deserialize, Serialize};

use super::common::is_false;
use super::field::FieldSpec;
use super::message::{EnumSpec, MessageSpec};

/// Descriptor file (*.pb.json): one `FileDescriptorProto` rendered as JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSpec {
    /// Proto file path (e.g., "foo/bar.proto")
    pub name: String,

    /// Proto package (e.g., "foo.bar")
    #[serde(default)]
    pub package: String,

    /// File options
    #[serde(default)]
    pub options: FileOptionsSpec,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub message_types: Vec<MessageSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_types: Vec<EnumSpec>,

    /// Top-level extensions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<FieldSpec>,
}

/// Java options that decide generated class names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileOptionsSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub java_package: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub java_outer_classname: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub java_multiple_files: bool,
}

impl FileSpec {
    /// Names of the file's top-level messages and enums, in declaration order
    pub fn top_level_type_names(&self) -> Vec<String> {
        self.message_types
            .iter()
            .map(|m| m.name.clone())
            .chain(self.enum_types.iter().map(|e| e.name.clone()))
            .collect()
    }

    /// Total number of extensions declared anywhere in this file
    pub fn extension_count(&self) -> usize {
        fn count_in(msg: &MessageSpec) -> usize {
            msg.extensions.len() + msg.nested_types.iter().map(count_in).sum::<usize>()
        }
        self.extensions.len() + self.message_types.iter().map(count_in).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FileSpec {
        serde_json::from_value(serde_json::json!({
            "name": "foo/bar.proto",
            "package": "foo",
            "options": {
                "javaPackage": "com.example.foo",
                "javaOuterClassname": "BarProto",
                "javaMultipleFiles": true
            },
            "messageTypes": [
                {
                    "name": "Foo",
                    "nestedTypes": [{
                        "name": "Inner",
                        "extensions": [{ "name": "deep", "number": 3, "type": "bool", "extendee": ".foo.Foo" }]
                    }],
                    "extensions": [{ "name": "nested", "number": 2, "type": "bool", "extendee": ".foo.Foo" }]
                }
            ],
            "enumTypes": [{ "name": "Color", "values": [{ "name": "RED", "number": 0 }] }],
            "extensions": [{ "name": "bar", "number": 5, "type": "int32", "extendee": ".foo.Foo" }]
        }))
        .unwrap()
    }

    #[test]
    fn test_file_deserialization() {
        let file = sample();
        assert_eq!(file.name, "foo/bar.proto");
        assert_eq!(file.options.java_package.as_deref(), Some("com.example.foo"));
        assert!(file.options.java_multiple_files);
        assert_eq!(file.message_types.len(), 1);
        assert_eq!(file.extensions[0].number, 5);
    }

    #[test]
    fn test_top_level_type_names() {
        assert_eq!(sample().top_level_type_names(), vec!["Foo", "Color"]);
    }

    #[test]
    fn test_extension_count_includes_nested() {
        assert_eq!(sample().extension_count(), 3);
    }

    #[test]
    fn test_minimal_file_defaults() {
        let file: FileSpec =
            serde_json::from_value(serde_json::json!({ "name": "a.proto" })).unwrap();
        assert_eq!(file.package, "");
        assert!(!file.options.java_multiple_files);
        assert_eq!(file.extension_count(), 0);
    }
}
