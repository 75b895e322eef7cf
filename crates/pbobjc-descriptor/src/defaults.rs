//! Parsing of `default_value` strings as protoc writes them into descriptors.

use crate::descriptor::{DefaultValue, ValueKind};
use crate::types::field::FieldType;

/// Parse a textual default for a field of the given type.
///
/// Returns a human-readable reason on failure; the resolver turns it into an
/// `E_INVALID_DEFAULT` entry.
pub fn parse_default(
    field_type: FieldType,
    raw: &str,
    value: &ValueKind,
) -> Result<DefaultValue, String> {
    match field_type {
        FieldType::Int32 | FieldType::Sint32 | FieldType::Sfixed32 => {
            let n = parse_integer(raw)?;
            i32::try_from(n)
                .map(DefaultValue::Int32)
                .map_err(|_| format!("'{raw}' is out of range for {field_type}"))
        }
        FieldType::Int64 | FieldType::Sint64 | FieldType::Sfixed64 => {
            let n = parse_integer(raw)?;
            i64::try_from(n)
                .map(DefaultValue::Int64)
                .map_err(|_| format!("'{raw}' is out of range for {field_type}"))
        }
        FieldType::Uint32 | FieldType::Fixed32 => {
            let n = parse_integer(raw)?;
            u32::try_from(n)
                .map(DefaultValue::UInt32)
                .map_err(|_| format!("'{raw}' is out of range for {field_type}"))
        }
        FieldType::Uint64 | FieldType::Fixed64 => {
            let n = parse_integer(raw)?;
            u64::try_from(n)
                .map(DefaultValue::UInt64)
                .map_err(|_| format!("'{raw}' is out of range for {field_type}"))
        }
        FieldType::Float => raw
            .trim()
            .parse::<f32>()
            .map(DefaultValue::Float)
            .map_err(|_| format!("'{raw}' is not a valid float")),
        FieldType::Double => raw
            .trim()
            .parse::<f64>()
            .map(DefaultValue::Double)
            .map_err(|_| format!("'{raw}' is not a valid double")),
        FieldType::Bool => match raw.trim() {
            "true" => Ok(DefaultValue::Bool(true)),
            "false" => Ok(DefaultValue::Bool(false)),
            _ => Err(format!("'{raw}' is not a valid bool (expected true or false)")),
        },
        FieldType::String => Ok(DefaultValue::String(raw.to_string())),
        FieldType::Bytes => unescape_c(raw).map(DefaultValue::Bytes),
        FieldType::Enum => match value {
            ValueKind::Enum(e) => e
                .find_value(raw.trim())
                .map(|v| DefaultValue::Enum {
                    name: v.name.clone(),
                    number: v.number,
                })
                .ok_or_else(|| {
                    format!(
                        "enum {} has no value named '{}'",
                        e.type_ref.full_name,
                        raw.trim()
                    )
                }),
            _ => Err("enum default on a field that does not reference an enum".to_string()),
        },
        FieldType::Message | FieldType::Group => {
            Err(format!("{field_type} fields cannot declare a default"))
        }
    }
}

/// Parse a decimal, `0x` hexadecimal, or leading-zero octal integer with an optional sign.
pub fn parse_integer(raw: &str) -> Result<i128, String> {
    let text = raw.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let invalid = || format!("'{raw}' is not a valid integer");

    let (radix, body) = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        (16, hex)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits)
    };

    // The radix parsers accept a sign of their own; only one is allowed.
    if body.is_empty() || body.starts_with(|c: char| c == '+' || c == '-') {
        return Err(invalid());
    }

    let magnitude = i128::from_str_radix(body, radix).map_err(|_| invalid())?;
    if negative {
        magnitude.checked_neg().ok_or_else(invalid)
    } else {
        Ok(magnitude)
    }
}

/// Undo protoc's C-style escaping of a bytes default.
pub fn unescape_c(raw: &str) -> Result<Vec<u8>, String> {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b != b'\\' {
            out.push(b);
            i += 1;
            continue;
        }

        let Some(&esc) = bytes.get(i + 1) else {
            return Err("trailing backslash in bytes default".to_string());
        };
        i += 2;

        match esc {
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'a' => out.push(0x07),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0c),
            b'v' => out.push(0x0b),
            b'\\' | b'\'' | b'"' | b'?' => out.push(esc),
            b'0'..=b'7' => {
                let mut value = u32::from(esc - b'0');
                let mut taken = 0;
                while taken < 2 {
                    match bytes.get(i) {
                        Some(&d @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(d - b'0');
                            i += 1;
                            taken += 1;
                        }
                        _ => break,
                    }
                }
                let byte = u8::try_from(value)
                    .map_err(|_| format!("octal escape \\{value:o} does not fit in a byte"))?;
                out.push(byte);
            }
            b'x' | b'X' => {
                let start = i;
                while i < bytes.len() && i - start < 2 && bytes[i].is_ascii_hexdigit() {
                    i += 1;
                }
                if start == i {
                    return Err("\\x escape without hex digits".to_string());
                }
                let text = std::str::from_utf8(&bytes[start..i])
                    .map_err(|_| "invalid hex escape".to_string())?;
                let byte = u8::from_str_radix(text, 16)
                    .map_err(|_| format!("invalid hex escape \\x{text}"))?;
                out.push(byte);
            }
            other => {
                return Err(format!("unknown escape sequence \\{}", other as char));
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{EnumRef, EnumValue, FileRef, TypeRef};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn color_enum() -> ValueKind {
        ValueKind::Enum(EnumRef {
            type_ref: TypeRef::new(Arc::new(FileRef::new("c.proto", "c")), ["Color"]),
            values: vec![
                EnumValue {
                    name: "RED".into(),
                    number: 1,
                },
                EnumValue {
                    name: "GREEN".into(),
                    number: 2,
                },
            ],
        })
    }

    #[test]
    fn test_parse_signed_defaults() {
        assert_eq!(
            parse_default(FieldType::Int32, "-1", &ValueKind::Scalar),
            Ok(DefaultValue::Int32(-1))
        );
        assert_eq!(
            parse_default(FieldType::Sint64, "-9223372036854775808", &ValueKind::Scalar),
            Ok(DefaultValue::Int64(i64::MIN))
        );
        assert!(parse_default(FieldType::Int32, "2147483648", &ValueKind::Scalar).is_err());
    }

    #[test]
    fn test_parse_unsigned_defaults() {
        assert_eq!(
            parse_default(FieldType::Uint32, "4294967295", &ValueKind::Scalar),
            Ok(DefaultValue::UInt32(u32::MAX))
        );
        assert_eq!(
            parse_default(FieldType::Fixed64, "0xffffffffffffffff", &ValueKind::Scalar),
            Ok(DefaultValue::UInt64(u64::MAX))
        );
        assert!(parse_default(FieldType::Uint32, "-1", &ValueKind::Scalar).is_err());
    }

    #[test]
    fn test_parse_integer_forms() {
        assert_eq!(parse_integer("42"), Ok(42));
        assert_eq!(parse_integer("-0x10"), Ok(-16));
        assert_eq!(parse_integer("017"), Ok(15));
        assert_eq!(parse_integer("0"), Ok(0));
        assert!(parse_integer("abc").is_err());
    }

    #[test]
    fn test_parse_integer_rejects_extra_signs() {
        for raw in ["--5", "-+5", "+-5", "0x-1", "-0x-10", "0-7", "-", "0x", ""] {
            assert!(parse_integer(raw).is_err(), "accepted {raw:?}");
        }
        assert_eq!(
            parse_default(FieldType::Int32, "--5", &ValueKind::Scalar),
            Err("'--5' is not a valid integer".to_string())
        );
    }

    #[test]
    fn test_parse_integer_out_of_range_is_error() {
        assert!(parse_integer("--170141183460469231731687303715884105728").is_err());
        assert!(parse_integer("-170141183460469231731687303715884105728").is_err());
        assert_eq!(parse_integer("-170141183460469231731687303715884105727"), Ok(-i128::MAX));
        assert!(
            parse_default(FieldType::Int64, "-99999999999999999999", &ValueKind::Scalar).is_err()
        );
    }

    #[test]
    fn test_parse_float_defaults() {
        assert_eq!(
            parse_default(FieldType::Float, "3.5", &ValueKind::Scalar),
            Ok(DefaultValue::Float(3.5))
        );
        assert_eq!(
            parse_default(FieldType::Double, "-inf", &ValueKind::Scalar),
            Ok(DefaultValue::Double(f64::NEG_INFINITY))
        );
        match parse_default(FieldType::Double, "nan", &ValueKind::Scalar) {
            Ok(DefaultValue::Double(d)) => assert!(d.is_nan()),
            other => panic!("expected NaN, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_bool_default() {
        assert_eq!(
            parse_default(FieldType::Bool, "true", &ValueKind::Scalar),
            Ok(DefaultValue::Bool(true))
        );
        assert!(parse_default(FieldType::Bool, "yes", &ValueKind::Scalar).is_err());
    }

    #[test]
    fn test_parse_enum_default() {
        assert_eq!(
            parse_default(FieldType::Enum, "GREEN", &color_enum()),
            Ok(DefaultValue::Enum {
                name: "GREEN".into(),
                number: 2
            })
        );
        let err = parse_default(FieldType::Enum, "BLUE", &color_enum()).unwrap_err();
        assert!(err.contains(".c.Color"));
    }

    #[test]
    fn test_message_default_rejected() {
        assert!(parse_default(FieldType::Message, "x", &ValueKind::Scalar).is_err());
    }

    #[test]
    fn test_unescape_bytes() {
        assert_eq!(unescape_c(r"abc"), Ok(b"abc".to_vec()));
        assert_eq!(unescape_c(r"\001\x02\n"), Ok(vec![1, 2, b'\n']));
        assert_eq!(unescape_c(r#"\"\\"#), Ok(vec![b'"', b'\\']));
        assert_eq!(unescape_c(r"\377"), Ok(vec![0xff]));
        assert!(unescape_c(r"\q").is_err());
        assert!(unescape_c("\\").is_err());
    }
}
