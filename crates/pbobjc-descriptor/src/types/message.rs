use serde::{Deserialize, Serialize};

use super::field::FieldSpec;

/// Message descriptor, reduced to the parts extension lowering looks at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSpec {
    /// Simple message name (e.g., "Foo")
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nested_types: Vec<MessageSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_types: Vec<EnumSpec>,

    /// Extensions declared inside this message's scope
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<FieldSpec>,
}

/// Enum descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumSpec {
    pub name: String,

    #[serde(default)]
    pub values: Vec<EnumValueSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValueSpec {
    pub name: String,
    pub number: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_message_deserialization() {
        let json = serde_json::json!({
            "name": "Outer",
            "nestedTypes": [{ "name": "Inner" }],
            "enumTypes": [{
                "name": "Kind",
                "values": [{ "name": "KIND_A", "number": 1 }, { "name": "KIND_B", "number": 2 }]
            }],
            "extensions": [{ "name": "ext", "number": 10, "type": "string", "extendee": "Base" }]
        });
        let msg: MessageSpec = serde_json::from_value(json).unwrap();
        assert_eq!(msg.nested_types[0].name, "Inner");
        assert_eq!(msg.enum_types[0].values.len(), 2);
        assert_eq!(msg.extensions[0].name, "ext");
    }
}
