//! Resolved descriptor model.
//!
//! Everything in here is produced by the [`resolver`](crate::resolver) (or built
//! directly in tests) and is immutable afterwards. Types that several fields
//! share, such as the owning file, are held behind an [`Arc`] so descriptors
//! can be handed to generators on different threads.

use std::sync::Arc;

use crate::types::field::FieldType;
use crate::types::file::FileSpec;

/// A proto file, reduced to what naming rules need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    /// Proto file path (e.g., "foo/bar.proto")
    pub name: String,
    /// Proto package, empty when none is declared
    pub package: String,
    pub java_package: Option<String>,
    pub java_outer_classname: Option<String>,
    pub java_multiple_files: bool,
    /// Simple names of top-level messages and enums
    pub top_level_types: Vec<String>,
}

impl FileRef {
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            java_package: None,
            java_outer_classname: None,
            java_multiple_files: false,
            top_level_types: Vec::new(),
        }
    }

    pub fn from_spec(spec: &FileSpec) -> Self {
        Self {
            name: spec.name.clone(),
            package: spec.package.clone(),
            java_package: spec.options.java_package.clone(),
            java_outer_classname: spec.options.java_outer_classname.clone(),
            java_multiple_files: spec.options.java_multiple_files,
            top_level_types: spec.top_level_type_names(),
        }
    }

    pub fn with_java_package(mut self, java_package: impl Into<String>) -> Self {
        self.java_package = Some(java_package.into());
        self
    }

    pub fn with_outer_classname(mut self, outer: impl Into<String>) -> Self {
        self.java_outer_classname = Some(outer.into());
        self
    }

    pub fn with_multiple_files(mut self, multiple_files: bool) -> Self {
        self.java_multiple_files = multiple_files;
        self
    }

    pub fn with_top_level_types<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.top_level_types = names.into_iter().map(Into::into).collect();
        self
    }

    /// Fully-qualified package prefix: "" for no package, ".foo.bar" otherwise.
    pub fn package_prefix(&self) -> String {
        if self.package.is_empty() {
            String::new()
        } else {
            format!(".{}", self.package)
        }
    }
}

/// Reference to a message or enum type.
///
/// Two references are equal when they name the same fully-qualified type.
#[derive(Debug, Clone)]
pub struct TypeRef {
    /// Fully-qualified proto name (e.g., ".foo.Outer.Inner")
    pub full_name: String,
    /// File that declares the type
    pub file: Arc<FileRef>,
    /// Nesting path inside the file (e.g., ["Outer", "Inner"])
    pub path: Vec<String>,
}

impl TypeRef {
    pub fn new<I, S>(file: Arc<FileRef>, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let path: Vec<String> = path.into_iter().map(Into::into).collect();
        let full_name = format!("{}.{}", file.package_prefix(), path.join("."));
        Self {
            full_name,
            file,
            path,
        }
    }

    /// Innermost name (e.g., "Inner")
    pub fn simple_name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }

    /// Outermost name (e.g., "Outer")
    pub fn top_level_name(&self) -> &str {
        self.path.first().map(String::as_str).unwrap_or_default()
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.full_name == other.full_name
    }
}

impl Eq for TypeRef {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
}

/// Reference to an enum type along with its declared values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumRef {
    pub type_ref: TypeRef,
    /// Values in declaration order
    pub values: Vec<EnumValue>,
}

impl EnumRef {
    /// The value a field of this enum type defaults to when none is declared.
    pub fn first_value(&self) -> Option<&EnumValue> {
        self.values.first()
    }

    pub fn find_value(&self, name: &str) -> Option<&EnumValue> {
        self.values.iter().find(|v| v.name == name)
    }
}

/// What an extension's values are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    /// A scalar; the field type says which one
    Scalar,
    /// A message (or group) type
    Message(TypeRef),
    /// An enum type
    Enum(EnumRef),
}

impl ValueKind {
    /// The referenced type, if any
    pub fn type_ref(&self) -> Option<&TypeRef> {
        match self {
            ValueKind::Scalar => None,
            ValueKind::Message(t) => Some(t),
            ValueKind::Enum(e) => Some(&e.type_ref),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    Optional,
    Required,
    Repeated,
}

impl Cardinality {
    pub fn proto_name(&self) -> &'static str {
        match self {
            Cardinality::Optional => "optional",
            Cardinality::Required => "required",
            Cardinality::Repeated => "repeated",
        }
    }
}

/// Where an extension is declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// At the top level of a file
    File(Arc<FileRef>),
    /// Inside a message body
    Message(TypeRef),
}

impl Scope {
    pub fn file(&self) -> &Arc<FileRef> {
        match self {
            Scope::File(file) => file,
            Scope::Message(t) => &t.file,
        }
    }

    /// Fully-qualified name of the scope ("" for a file without a package)
    pub fn full_name(&self) -> String {
        match self {
            Scope::File(file) => file.package_prefix(),
            Scope::Message(t) => t.full_name.clone(),
        }
    }
}

/// A declared default, already parsed for the field's type.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Int32(i32),
    Int64(i64),
    UInt32(u32),
    UInt64(u64),
    Float(f32),
    Double(f64),
    Bool(bool),
    String(String),
    Bytes(Vec<u8>),
    Enum { name: String, number: i32 },
}

/// A fully resolved extension field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Declared name (e.g., "my_ext")
    pub name: String,
    /// Fully-qualified name (e.g., ".foo.Scope.my_ext")
    pub full_name: String,
    pub number: u32,
    pub cardinality: Cardinality,
    pub field_type: FieldType,
    pub value: ValueKind,
    /// The message being extended
    pub extendee: TypeRef,
    pub scope: Scope,
    pub default: Option<DefaultValue>,
    pub packed: bool,
    pub deprecated: bool,
}

impl FieldDescriptor {
    /// Create an optional extension without a default.
    pub fn new(
        scope: Scope,
        name: impl Into<String>,
        number: u32,
        field_type: FieldType,
        value: ValueKind,
        extendee: TypeRef,
    ) -> Self {
        let name = name.into();
        Self {
            full_name: format!("{}.{}", scope.full_name(), name),
            name,
            number,
            cardinality: Cardinality::Optional,
            field_type,
            value,
            extendee,
            scope,
            default: None,
            packed: false,
            deprecated: false,
        }
    }

    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    pub fn packed(mut self) -> Self {
        self.packed = true;
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    /// File that declares the extension
    pub fn file(&self) -> &Arc<FileRef> {
        self.scope.file()
    }

    pub fn is_repeated(&self) -> bool {
        self.cardinality == Cardinality::Repeated
    }
}

/// All extensions of one descriptor file, resolved.
#[derive(Debug, Clone)]
pub struct ResolvedFile {
    /// Descriptor file path relative to the loaded root
    pub path: String,
    pub file: Arc<FileRef>,
    /// Extensions in declaration order, top-level first, then message by message
    pub extensions: Vec<FieldDescriptor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file() -> Arc<FileRef> {
        Arc::new(FileRef::new("foo/bar.proto", "foo.bar"))
    }

    #[test]
    fn test_type_ref_full_name() {
        let t = TypeRef::new(file(), ["Outer", "Inner"]);
        assert_eq!(t.full_name, ".foo.bar.Outer.Inner");
        assert_eq!(t.simple_name(), "Inner");
        assert_eq!(t.top_level_name(), "Outer");
    }

    #[test]
    fn test_type_ref_without_package() {
        let f = Arc::new(FileRef::new("a.proto", ""));
        let t = TypeRef::new(f, ["Foo"]);
        assert_eq!(t.full_name, ".Foo");
    }

    #[test]
    fn test_type_ref_equality_by_name() {
        let a = TypeRef::new(file(), ["Foo"]);
        let b = TypeRef::new(Arc::new(FileRef::new("other.proto", "foo.bar")), ["Foo"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_field_full_name_by_scope() {
        let f = file();
        let extendee = TypeRef::new(f.clone(), ["Foo"]);
        let top = FieldDescriptor::new(
            Scope::File(f.clone()),
            "bar",
            5,
            FieldType::Int32,
            ValueKind::Scalar,
            extendee.clone(),
        );
        assert_eq!(top.full_name, ".foo.bar.bar");

        let nested = FieldDescriptor::new(
            Scope::Message(TypeRef::new(f, ["Holder"])),
            "baz",
            6,
            FieldType::Bool,
            ValueKind::Scalar,
            extendee,
        );
        assert_eq!(nested.full_name, ".foo.bar.Holder.baz");
    }

    #[test]
    fn test_builder_methods() {
        let f = file();
        let field = FieldDescriptor::new(
            Scope::File(f.clone()),
            "values",
            7,
            FieldType::Int64,
            ValueKind::Scalar,
            TypeRef::new(f, ["Foo"]),
        )
        .with_cardinality(Cardinality::Repeated)
        .packed()
        .deprecated();
        assert!(field.is_repeated());
        assert!(field.packed);
        assert!(field.deprecated);
        assert_eq!(field.file().name, "foo/bar.proto");
    }

    #[test]
    fn test_enum_ref_values() {
        let e = EnumRef {
            type_ref: TypeRef::new(file(), ["Color"]),
            values: vec![
                EnumValue {
                    name: "RED".into(),
                    number: 3,
                },
                EnumValue {
                    name: "BLUE".into(),
                    number: 7,
                },
            ],
        };
        assert_eq!(e.first_value().map(|v| v.number), Some(3));
        assert_eq!(e.find_value("BLUE").map(|v| v.number), Some(7));
        assert!(e.find_value("GREEN").is_none());
    }
}
