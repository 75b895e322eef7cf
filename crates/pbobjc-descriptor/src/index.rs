use std::sync::Arc;

use indexmap::IndexMap;

use crate::descriptor::{EnumRef, EnumValue, FileRef, TypeRef};
use crate::types::error::{ErrorEntry, ValidationReport, E_DUPLICATE_SYMBOL};
use crate::types::file::FileSpec;
use crate::types::message::{EnumSpec, MessageSpec};

/// Kinds of named types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Message,
    Enum,
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeKind::Message => write!(f, "message"),
            TypeKind::Enum => write!(f, "enum"),
        }
    }
}

/// Entry in the type table
#[derive(Debug, Clone)]
pub struct TypeEntry {
    pub kind: TypeKind,
    pub type_ref: TypeRef,
    /// Declared values (enums only)
    pub enum_values: Vec<EnumValue>,
    /// Descriptor file that declares the type
    pub declared_in: String,
    /// JSONPath of the declaration
    pub path: String,
}

impl TypeEntry {
    pub fn full_name(&self) -> &str {
        &self.type_ref.full_name
    }

    /// View an enum entry as an [`EnumRef`]
    pub fn to_enum_ref(&self) -> Option<EnumRef> {
        (self.kind == TypeKind::Enum).then(|| EnumRef {
            type_ref: self.type_ref.clone(),
            values: self.enum_values.clone(),
        })
    }
}

/// Index of every message and enum across a descriptor set, keyed by
/// fully-qualified name (".pkg.Outer.Inner").
#[derive(Debug, Clone, Default)]
pub struct TypeIndex {
    types: IndexMap<String, TypeEntry>,
    files: IndexMap<String, Arc<FileRef>>,
}

impl TypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index for a set of parsed files, reporting duplicate symbols.
    pub fn build(files: &[(String, FileSpec)]) -> (Self, ValidationReport) {
        let mut index = Self::new();
        let mut report = ValidationReport::success();

        for (rel_path, spec) in files {
            let file = Arc::new(FileRef::from_spec(spec));
            index.files.insert(spec.name.clone(), file.clone());

            for (i, msg) in spec.message_types.iter().enumerate() {
                let path = format!("$.messageTypes[{i}]");
                index.register_message(&file, rel_path, &[], msg, &path, &mut report);
            }
            for (i, e) in spec.enum_types.iter().enumerate() {
                let path = format!("$.enumTypes[{i}]");
                index.register_enum(&file, rel_path, &[], e, &path, &mut report);
            }
        }

        (index, report)
    }

    fn register_message(
        &mut self,
        file: &Arc<FileRef>,
        rel_path: &str,
        parent: &[String],
        msg: &MessageSpec,
        json_path: &str,
        report: &mut ValidationReport,
    ) {
        let mut nesting = parent.to_vec();
        nesting.push(msg.name.clone());

        let entry = TypeEntry {
            kind: TypeKind::Message,
            type_ref: TypeRef::new(file.clone(), nesting.clone()),
            enum_values: Vec::new(),
            declared_in: rel_path.to_string(),
            path: json_path.to_string(),
        };
        if let Some(err) = self.register(entry) {
            report.push(err);
        }

        for (i, nested) in msg.nested_types.iter().enumerate() {
            let path = format!("{json_path}.nestedTypes[{i}]");
            self.register_message(file, rel_path, &nesting, nested, &path, report);
        }
        for (i, e) in msg.enum_types.iter().enumerate() {
            let path = format!("{json_path}.enumTypes[{i}]");
            self.register_enum(file, rel_path, &nesting, e, &path, report);
        }
    }

    fn register_enum(
        &mut self,
        file: &Arc<FileRef>,
        rel_path: &str,
        parent: &[String],
        spec: &EnumSpec,
        json_path: &str,
        report: &mut ValidationReport,
    ) {
        let mut nesting = parent.to_vec();
        nesting.push(spec.name.clone());

        let entry = TypeEntry {
            kind: TypeKind::Enum,
            type_ref: TypeRef::new(file.clone(), nesting),
            enum_values: spec
                .values
                .iter()
                .map(|v| EnumValue {
                    name: v.name.clone(),
                    number: v.number,
                })
                .collect(),
            declared_in: rel_path.to_string(),
            path: json_path.to_string(),
        };
        if let Some(err) = self.register(entry) {
            report.push(err);
        }
    }

    /// Register a type. Returns an error if the name is already taken.
    pub fn register(&mut self, entry: TypeEntry) -> Option<ErrorEntry> {
        let key = entry.type_ref.full_name.clone();
        if let Some(existing) = self.types.get(&key) {
            return Some(
                ErrorEntry::error(
                    E_DUPLICATE_SYMBOL,
                    format!(
                        "Duplicate {} '{key}' (also defined in {})",
                        entry.kind, existing.declared_in
                    ),
                    &entry.declared_in,
                    &entry.path,
                )
                .with_suggestion(format!(
                    "Rename one of the '{}' definitions to avoid conflict",
                    entry.type_ref.simple_name()
                )),
            );
        }
        self.types.insert(key, entry);
        None
    }

    /// Look up a type by fully-qualified name (leading dot included)
    pub fn lookup(&self, full_name: &str) -> Option<&TypeEntry> {
        self.types.get(full_name)
    }

    /// Look up the shared file identity by proto name
    pub fn file(&self, proto_name: &str) -> Option<&Arc<FileRef>> {
        self.files.get(proto_name)
    }

    /// All indexed types in registration order
    pub fn iter(&self) -> impl Iterator<Item = &TypeEntry> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(json: serde_json::Value) -> FileSpec {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_index_nested_types() {
        let files = vec![(
            "foo.pb.json".to_string(),
            spec(serde_json::json!({
                "name": "foo.proto",
                "package": "foo",
                "messageTypes": [{
                    "name": "Outer",
                    "nestedTypes": [{ "name": "Inner" }],
                    "enumTypes": [{ "name": "Mode", "values": [{ "name": "ON", "number": 1 }] }]
                }],
                "enumTypes": [{ "name": "Color", "values": [] }]
            })),
        )];
        let (index, report) = TypeIndex::build(&files);
        assert!(report.ok);
        assert_eq!(index.len(), 4);

        let inner = index.lookup(".foo.Outer.Inner").unwrap();
        assert_eq!(inner.kind, TypeKind::Message);
        assert_eq!(inner.path, "$.messageTypes[0].nestedTypes[0]");

        let mode = index.lookup(".foo.Outer.Mode").unwrap();
        let mode_ref = mode.to_enum_ref().unwrap();
        assert_eq!(mode_ref.values[0].name, "ON");

        assert!(index.lookup(".foo.Color").is_some());
        assert!(index.lookup("foo.Color").is_none());
        assert!(index.file("foo.proto").is_some());
    }

    #[test]
    fn test_duplicate_across_files() {
        let files = vec![
            (
                "a.pb.json".to_string(),
                spec(serde_json::json!({ "name": "a.proto", "package": "p", "messageTypes": [{ "name": "M" }] })),
            ),
            (
                "b.pb.json".to_string(),
                spec(serde_json::json!({ "name": "b.proto", "package": "p", "enumTypes": [{ "name": "M" }] })),
            ),
        ];
        let (index, report) = TypeIndex::build(&files);
        assert!(report.has_errors());
        assert_eq!(report.errors[0].code, E_DUPLICATE_SYMBOL);
        assert_eq!(report.errors[0].file, "b.pb.json");
        assert!(report.errors[0].message.contains("a.pb.json"));
        assert_eq!(index.lookup(".p.M").unwrap().kind, TypeKind::Message);
    }

    #[test]
    fn test_message_entry_has_no_enum_ref() {
        let files = vec![(
            "a.pb.json".to_string(),
            spec(serde_json::json!({ "name": "a.proto", "messageTypes": [{ "name": "M" }] })),
        )];
        let (index, _) = TypeIndex::build(&files);
        assert!(index.lookup(".M").unwrap().to_enum_ref().is_none());
    }
}
