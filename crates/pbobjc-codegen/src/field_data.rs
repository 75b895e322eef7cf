//! Pieces of the `CGPFieldData` record that describes an extension to the
//! runtime: type tag, flags, default value, and serialized options.

use pbobjc_descriptor::{Cardinality, DefaultValue, FieldDescriptor, FieldType, ValueKind};

/// Prefix of the runtime's field type enum constants.
pub const FIELD_TYPE_PREFIX: &str = "ComGoogleProtobufDescriptors_FieldDescriptor_Type_Enum_";

/// Runtime enum constant for a field type (e.g., `..._Type_Enum_INT32`).
pub fn type_enum_name(field_type: FieldType) -> String {
    format!(
        "{FIELD_TYPE_PREFIX}{}",
        field_type.proto_name().to_ascii_uppercase()
    )
}

/// `CGPFieldFlag` bits for an extension.
pub fn flags(field: &FieldDescriptor) -> String {
    let mut flags = vec!["CGPFieldFlagExtension"];
    if field.is_repeated() {
        flags.push("CGPFieldFlagRepeated");
    }
    if field.packed {
        flags.push("CGPFieldFlagPacked");
    }
    flags.join(" | ")
}

/// Serialized `FieldOptions` as a C string literal, or `None` when no
/// option is set.
pub fn options_data(field: &FieldDescriptor) -> Option<String> {
    let mut data = String::new();
    // packed = 2 (varint), deprecated = 3 (varint)
    if field.packed {
        data.push_str("\\x10\\x01");
    }
    if field.deprecated {
        data.push_str("\\x18\\x01");
    }
    (!data.is_empty()).then(|| format!("\"{data}\""))
}

/// Member of the `defaultValue` union and its initializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultInit {
    pub member: &'static str,
    pub literal: String,
}

/// The `defaultValue` initializer for a field, if one is emitted.
///
/// Enum extensions always carry one: the declared default, else the first
/// declared value. Message and group extensions never do.
pub fn default_init(field: &FieldDescriptor) -> Option<DefaultInit> {
    let init = |member, literal| Some(DefaultInit { member, literal });

    match (field.field_type, &field.default) {
        (FieldType::Enum, None) => match &field.value {
            ValueKind::Enum(e) => {
                let first = e.first_value().unwrap_or_else(|| {
                    panic!(
                        "extension {}: enum {} declares no values",
                        field.full_name, e.type_ref.full_name
                    )
                });
                init("valueInt", int32_literal(first.number))
            }
            other => panic!(
                "extension {}: enum field carries value kind {other:?}",
                field.full_name
            ),
        },
        (_, None) => None,
        (
            FieldType::Int32 | FieldType::Sint32 | FieldType::Sfixed32,
            Some(DefaultValue::Int32(v)),
        ) => init("valueInt", int32_literal(*v)),
        (FieldType::Uint32 | FieldType::Fixed32, Some(DefaultValue::UInt32(v))) => {
            init("valueInt", uint32_literal(*v))
        }
        (
            FieldType::Int64 | FieldType::Sint64 | FieldType::Sfixed64,
            Some(DefaultValue::Int64(v)),
        ) => init("valueLong", int64_literal(*v)),
        (FieldType::Uint64 | FieldType::Fixed64, Some(DefaultValue::UInt64(v))) => {
            init("valueLong", uint64_literal(*v))
        }
        (FieldType::Float, Some(DefaultValue::Float(v))) => init("valueFloat", float_literal(*v)),
        (FieldType::Double, Some(DefaultValue::Double(v))) => {
            init("valueDouble", double_literal(*v))
        }
        (FieldType::Bool, Some(DefaultValue::Bool(v))) => init("valueBool", v.to_string()),
        (FieldType::String, Some(DefaultValue::String(s))) => {
            init("valueId", objc_string_literal(s))
        }
        (FieldType::Bytes, Some(DefaultValue::Bytes(b))) => init("valueBytes", bytes_literal(b)),
        (FieldType::Enum, Some(DefaultValue::Enum { number, .. })) => {
            init("valueInt", int32_literal(*number))
        }
        (field_type, Some(default)) => panic!(
            "extension {}: default {default:?} does not fit a {field_type} field",
            field.full_name
        ),
    }
}

/// Panic unless the descriptor is one the lowering supports.
///
/// These are the guarantees the resolver establishes; reaching one here
/// means a descriptor was built by hand without them.
pub fn check_contract(field: &FieldDescriptor) {
    let name = &field.full_name;

    if field.cardinality == Cardinality::Required {
        panic!("extension {name} is required; extensions must be optional or repeated");
    }

    let kind_matches = match field.field_type {
        FieldType::Message | FieldType::Group => matches!(field.value, ValueKind::Message(_)),
        FieldType::Enum => matches!(field.value, ValueKind::Enum(_)),
        _ => matches!(field.value, ValueKind::Scalar),
    };
    if !kind_matches {
        panic!(
            "extension {name}: {} field has mismatched value kind {:?}",
            field.field_type, field.value
        );
    }

    if field.default.is_some() {
        if field.is_repeated() {
            panic!("extension {name} is repeated and cannot have a default");
        }
        if matches!(field.field_type, FieldType::Message | FieldType::Group) {
            panic!("extension {name}: {} fields cannot have a default", field.field_type);
        }
    }

    if field.packed && (!field.is_repeated() || !field.field_type.is_packable()) {
        panic!(
            "extension {name}: packed is only valid on repeated numeric, bool, or enum fields"
        );
    }

    // Surfaces default/type mismatches and value-less enums up front.
    let _ = default_init(field);
}

pub fn int32_literal(v: i32) -> String {
    if v == i32::MIN {
        "(jint) 0x80000000".to_string()
    } else {
        v.to_string()
    }
}

pub fn uint32_literal(v: u32) -> String {
    if v > i32::MAX as u32 {
        format!("(jint) 0x{v:08x}")
    } else {
        v.to_string()
    }
}

pub fn int64_literal(v: i64) -> String {
    if v == i64::MIN {
        "(jlong) 0x8000000000000000LL".to_string()
    } else {
        format!("{v}LL")
    }
}

pub fn uint64_literal(v: u64) -> String {
    if v > i64::MAX as u64 {
        format!("(jlong) 0x{v:016x}ULL")
    } else {
        format!("{v}LL")
    }
}

/// Shortest literal that reads back as exactly `v`.
pub fn float_literal(v: f32) -> String {
    if v.is_nan() {
        "NAN".to_string()
    } else if v.is_infinite() {
        (if v > 0.0 { "INFINITY" } else { "-INFINITY" }).to_string()
    } else {
        format!("{v:?}f")
    }
}

/// Shortest literal that reads back as exactly `v`.
pub fn double_literal(v: f64) -> String {
    if v.is_nan() {
        "NAN".to_string()
    } else if v.is_infinite() {
        (if v > 0.0 { "INFINITY" } else { "-INFINITY" }).to_string()
    } else {
        format!("{v:?}")
    }
}

/// `@"..."` literal. Non-ASCII text is kept as UTF-8.
pub fn objc_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 3);
    out.push_str("@\"");
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '?' => out.push_str("\\?"),
            c if c.is_ascii_control() => out.push_str(&format!("\\{:03o}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// `{ .data = "...", .length = N }` for a bytes default.
pub fn bytes_literal(bytes: &[u8]) -> String {
    let mut data = String::with_capacity(bytes.len() * 4);
    for &b in bytes {
        match b {
            b'"' => data.push_str("\\\""),
            b'\\' => data.push_str("\\\\"),
            b'?' => data.push_str("\\?"),
            0x20..=0x7e => data.push(b as char),
            _ => data.push_str(&format!("\\{b:03o}")),
        }
    }
    format!("{{ .data = \"{data}\", .length = {} }}", bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pbobjc_descriptor::{EnumRef, EnumValue, FileRef, Scope, TypeRef};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn file() -> Arc<FileRef> {
        Arc::new(FileRef::new("t.proto", "t"))
    }

    fn scalar(field_type: FieldType) -> FieldDescriptor {
        FieldDescriptor::new(
            Scope::File(file()),
            "v",
            3,
            field_type,
            ValueKind::Scalar,
            TypeRef::new(file(), ["Foo"]),
        )
    }

    fn color(values: Vec<EnumValue>) -> FieldDescriptor {
        FieldDescriptor::new(
            Scope::File(file()),
            "color",
            4,
            FieldType::Enum,
            ValueKind::Enum(EnumRef {
                type_ref: TypeRef::new(file(), ["Color"]),
                values,
            }),
            TypeRef::new(file(), ["Foo"]),
        )
    }

    fn literal(field: &FieldDescriptor) -> Option<String> {
        default_init(field).map(|d| format!("{} = {}", d.member, d.literal))
    }

    #[test]
    fn test_type_enum_name() {
        assert_eq!(
            type_enum_name(FieldType::Sfixed64),
            "ComGoogleProtobufDescriptors_FieldDescriptor_Type_Enum_SFIXED64"
        );
    }

    #[test]
    fn test_flags_and_options() {
        let plain = scalar(FieldType::Int32);
        assert_eq!(flags(&plain), "CGPFieldFlagExtension");
        assert_eq!(options_data(&plain), None);

        let packed = scalar(FieldType::Int32)
            .with_cardinality(Cardinality::Repeated)
            .packed()
            .deprecated();
        assert_eq!(
            flags(&packed),
            "CGPFieldFlagExtension | CGPFieldFlagRepeated | CGPFieldFlagPacked"
        );
        assert_eq!(options_data(&packed).as_deref(), Some(r#""\x10\x01\x18\x01""#));
    }

    #[test]
    fn test_integer_literals() {
        assert_eq!(int32_literal(-1), "-1");
        assert_eq!(int32_literal(i32::MIN), "(jint) 0x80000000");
        assert_eq!(uint32_literal(7), "7");
        assert_eq!(uint32_literal(u32::MAX), "(jint) 0xffffffff");
        assert_eq!(int64_literal(-5), "-5LL");
        assert_eq!(int64_literal(i64::MIN), "(jlong) 0x8000000000000000LL");
        assert_eq!(uint64_literal(u64::MAX), "(jlong) 0xffffffffffffffffULL");
    }

    #[test]
    fn test_float_literals_round_trip() {
        assert_eq!(float_literal(3.5), "3.5f");
        assert_eq!(double_literal(3.5), "3.5");
        assert_eq!(double_literal(0.1), "0.1");
        assert_eq!(float_literal(f32::NEG_INFINITY), "-INFINITY");
        assert_eq!(double_literal(f64::NAN), "NAN");

        let text = float_literal(0.1);
        let parsed: f32 = text.trim_end_matches('f').parse().unwrap();
        assert_eq!(parsed, 0.1f32);
    }

    #[test]
    fn test_string_and_bytes_literals() {
        assert_eq!(objc_string_literal("a\"b\\c\n"), r#"@"a\"b\\c\n""#);
        assert_eq!(objc_string_literal("\u{1}é"), "@\"\\001é\"");
        assert_eq!(
            bytes_literal(&[0, b'a', 0xff]),
            r#"{ .data = "\000a\377", .length = 3 }"#
        );
        assert_eq!(bytes_literal(&[]), r#"{ .data = "", .length = 0 }"#);
    }

    #[test]
    fn test_default_init_by_type() {
        assert_eq!(literal(&scalar(FieldType::Int32)), None);
        assert_eq!(
            literal(&scalar(FieldType::Int32).with_default(DefaultValue::Int32(-1))),
            Some("valueInt = -1".into())
        );
        assert_eq!(
            literal(&scalar(FieldType::Fixed64).with_default(DefaultValue::UInt64(10))),
            Some("valueLong = 10LL".into())
        );
        assert_eq!(
            literal(&scalar(FieldType::Float).with_default(DefaultValue::Float(3.5))),
            Some("valueFloat = 3.5f".into())
        );
        assert_eq!(
            literal(&scalar(FieldType::Bool).with_default(DefaultValue::Bool(true))),
            Some("valueBool = true".into())
        );
        assert_eq!(
            literal(&scalar(FieldType::String).with_default(DefaultValue::String("hi".into()))),
            Some("valueId = @\"hi\"".into())
        );
    }

    #[test]
    fn test_enum_default_falls_back_to_first_value() {
        let values = vec![
            EnumValue {
                name: "RED".into(),
                number: 7,
            },
            EnumValue {
                name: "BLUE".into(),
                number: 9,
            },
        ];
        assert_eq!(literal(&color(values.clone())), Some("valueInt = 7".into()));
        let declared = color(values).with_default(DefaultValue::Enum {
            name: "BLUE".into(),
            number: 9,
        });
        assert_eq!(literal(&declared), Some("valueInt = 9".into()));
    }

    #[test]
    fn test_enum_min_value_uses_int32_literal() {
        let values = vec![EnumValue {
            name: "LOWEST".into(),
            number: i32::MIN,
        }];
        let expected = Some("valueInt = (jint) 0x80000000".to_string());
        assert_eq!(literal(&color(values.clone())), expected);
        let declared = color(values).with_default(DefaultValue::Enum {
            name: "LOWEST".into(),
            number: i32::MIN,
        });
        assert_eq!(literal(&declared), expected);
    }

    #[test]
    #[should_panic(expected = "required")]
    fn test_required_violates_contract() {
        check_contract(&scalar(FieldType::Int32).with_cardinality(Cardinality::Required));
    }

    #[test]
    #[should_panic(expected = "cannot have a default")]
    fn test_repeated_default_violates_contract() {
        check_contract(
            &scalar(FieldType::Int32)
                .with_cardinality(Cardinality::Repeated)
                .with_default(DefaultValue::Int32(1)),
        );
    }

    #[test]
    #[should_panic(expected = "does not fit")]
    fn test_mismatched_default_violates_contract() {
        check_contract(&scalar(FieldType::Int64).with_default(DefaultValue::Int32(1)));
    }

    #[test]
    #[should_panic(expected = "packed")]
    fn test_packed_string_violates_contract() {
        check_contract(
            &scalar(FieldType::String)
                .with_cardinality(Cardinality::Repeated)
                .packed(),
        );
    }

    #[test]
    #[should_panic(expected = "mismatched value kind")]
    fn test_value_kind_mismatch_violates_contract() {
        check_contract(&scalar(FieldType::Message));
    }

    #[test]
    #[should_panic(expected = "declares no values")]
    fn test_empty_enum_violates_contract() {
        check_contract(&color(Vec::new()));
    }
}
