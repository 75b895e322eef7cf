use serde::{Deserialize, Serialize};

use super::common::is_false;

/// One `FieldDescriptorProto` entry, as found in the
/// `extensions` list of a file or message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    /// Field name as declared in the .proto file (e.g., "my_ext")
    pub name: String,

    /// Field number (tag)
    pub number: i32,

    /// Field label
    #[serde(default)]
    pub label: Label,

    /// Field type
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Referenced message/enum type name, absolute (".pkg.Msg") or relative
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,

    /// Extended message type name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extendee: Option<String>,

    /// Default value in protoc's textual form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    /// Field options
    #[serde(default, skip_serializing_if = "FieldOptionsSpec::is_empty")]
    pub options: FieldOptionsSpec,
}

/// Field options relevant to code generation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOptionsSpec {
    #[serde(default, skip_serializing_if = "is_false")]
    pub packed: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub deprecated: bool,
}

impl FieldOptionsSpec {
    pub fn is_empty(&self) -> bool {
        !self.packed && !self.deprecated
    }
}

/// Field labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    #[default]
    Optional,
    Required,
    Repeated,
}

/// Protocol buffer field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Double,
    Float,
    Int64,
    Uint64,
    Int32,
    Fixed64,
    Fixed32,
    Bool,
    String,
    Group,
    Message,
    Bytes,
    Uint32,
    Enum,
    Sfixed32,
    Sfixed64,
    Sint32,
    Sint64,
}

impl FieldType {
    /// Name as written in .proto source (e.g., "sfixed32")
    pub fn proto_name(&self) -> &'static str {
        match self {
            FieldType::Double => "double",
            FieldType::Float => "float",
            FieldType::Int64 => "int64",
            FieldType::Uint64 => "uint64",
            FieldType::Int32 => "int32",
            FieldType::Fixed64 => "fixed64",
            FieldType::Fixed32 => "fixed32",
            FieldType::Bool => "bool",
            FieldType::String => "string",
            FieldType::Group => "group",
            FieldType::Message => "message",
            FieldType::Bytes => "bytes",
            FieldType::Uint32 => "uint32",
            FieldType::Enum => "enum",
            FieldType::Sfixed32 => "sfixed32",
            FieldType::Sfixed64 => "sfixed64",
            FieldType::Sint32 => "sint32",
            FieldType::Sint64 => "sint64",
        }
    }

    /// Whether the value is a reference to a message or enum type
    pub fn is_reference(&self) -> bool {
        matches!(self, FieldType::Message | FieldType::Group | FieldType::Enum)
    }

    /// Whether the value is carried as a length-delimited (or group) record on the wire
    pub fn is_length_delimited(&self) -> bool {
        matches!(
            self,
            FieldType::String | FieldType::Bytes | FieldType::Message | FieldType::Group
        )
    }

    /// Whether repeated values of this type may use packed encoding
    pub fn is_packable(&self) -> bool {
        !self.is_length_delimited()
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.proto_name())
    }
}
