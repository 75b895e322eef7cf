//! Objective-C names for proto elements.
//!
//! Every name is derived from the Java class the element would produce:
//! `java_package` becomes a capitalized prefix (`com.google.foo` ->
//! `ComGoogleFoo`), nesting is joined with `_`, and unless the file sets
//! `java_multiple_files` all types live inside the outer class.

use pbobjc_descriptor::{FieldDescriptor, FieldType, FileRef, Scope, TypeRef, ValueKind};

/// Words that cannot be used verbatim as the member part of a generated name.
const RESERVED_WORDS: &[&str] = &[
    // C
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while",
    // Objective-C
    "BOOL", "Class", "IMP", "NO", "NULL", "Nil", "Protocol", "SEL", "YES", "bycopy", "byref",
    "id", "in", "inout", "nil", "oneway", "out", "self", "super",
    // NSObject members
    "alloc", "class", "copy", "dealloc", "description", "hash", "init", "isa", "new", "release",
    "retain", "retainCount", "zone",
];

/// Protobuf's underscore-to-camel-case rule.
///
/// Any non-alphanumeric character starts a new capitalized word and is
/// dropped; a digit is kept and capitalizes the letter that follows it.
pub fn underscores_to_camel_case(input: &str, cap_first: bool) -> String {
    let mut result = String::with_capacity(input.len());
    let mut cap_next = cap_first;

    for (i, c) in input.chars().enumerate() {
        if c.is_ascii_lowercase() {
            if cap_next {
                result.push(c.to_ascii_uppercase());
            } else {
                result.push(c);
            }
            cap_next = false;
        } else if c.is_ascii_uppercase() {
            if i == 0 && !cap_first {
                result.push(c.to_ascii_lowercase());
            } else {
                result.push(c);
            }
            cap_next = false;
        } else if c.is_ascii_digit() {
            result.push(c);
            cap_next = true;
        } else {
            cap_next = true;
        }
    }

    result
}

pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// Java package of the classes generated for a file.
pub fn java_package(file: &FileRef) -> &str {
    file.java_package.as_deref().unwrap_or(&file.package)
}

/// Name of the outer class generated for a file.
pub fn outer_classname(file: &FileRef) -> String {
    if let Some(explicit) = &file.java_outer_classname {
        return explicit.clone();
    }

    let base = file.name.rsplit('/').next().unwrap_or(&file.name);
    let base = base.strip_suffix(".proto").unwrap_or(base);
    let name = underscores_to_camel_case(base, true);

    if file.top_level_types.iter().any(|t| *t == name) {
        format!("{name}OuterClass")
    } else {
        name
    }
}

/// Class-name prefix for a Java package (`com.google.foo` -> `ComGoogleFoo`).
pub fn package_prefix(java_package: &str) -> String {
    java_package
        .split('.')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Objective-C class of the outer class of a file.
pub fn outer_class_name(file: &FileRef) -> String {
    format!("{}{}", package_prefix(java_package(file)), outer_classname(file))
}

/// Objective-C class of a message or enum type.
pub fn class_name(type_ref: &TypeRef) -> String {
    let file = &type_ref.file;
    let nested = type_ref.path.join("_");
    if file.java_multiple_files {
        format!("{}{}", package_prefix(java_package(file)), nested)
    } else {
        format!("{}_{}", outer_class_name(file), nested)
    }
}

/// Objective-C class that holds an extension declared in `scope`.
pub fn scope_class_name(scope: &Scope) -> String {
    match scope {
        Scope::File(file) => outer_class_name(file),
        Scope::Message(type_ref) => class_name(type_ref),
    }
}

/// Member part of an extension's name (`my_ext` -> `myExt`).
pub fn extension_member_name(field: &FieldDescriptor) -> String {
    let name = underscores_to_camel_case(&field.name, false);
    if is_reserved_word(&name) {
        format!("{name}_")
    } else {
        name
    }
}

/// Global variable holding an extension (`ComFooBarProto_myExt`).
pub fn extension_name(field: &FieldDescriptor) -> String {
    format!(
        "{}_{}",
        scope_class_name(&field.scope),
        extension_member_name(field)
    )
}

/// Java-style capitalized name of the field (`my_ext` -> `MyExt`).
pub fn java_field_name(field: &FieldDescriptor) -> String {
    underscores_to_camel_case(&field.name, true)
}

/// Simple name of the Java top-level class that contains a type.
pub fn unit_name(type_ref: &TypeRef) -> String {
    if type_ref.file.java_multiple_files {
        type_ref.top_level_name().to_string()
    } else {
        outer_classname(&type_ref.file)
    }
}

/// Simple name of the Java top-level class that contains a scope.
pub fn scope_unit_name(scope: &Scope) -> String {
    match scope {
        Scope::File(file) => outer_classname(file),
        Scope::Message(type_ref) => unit_name(type_ref),
    }
}

/// Objective-C class used to box an extension's values.
pub fn value_class_name(field: &FieldDescriptor) -> String {
    match &field.value {
        ValueKind::Message(type_ref) => class_name(type_ref),
        ValueKind::Enum(enum_ref) => class_name(&enum_ref.type_ref),
        ValueKind::Scalar => scalar_value_class(field.field_type).to_string(),
    }
}

fn scalar_value_class(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Int32
        | FieldType::Uint32
        | FieldType::Sint32
        | FieldType::Fixed32
        | FieldType::Sfixed32 => "JavaLangInteger",
        FieldType::Int64
        | FieldType::Uint64
        | FieldType::Sint64
        | FieldType::Fixed64
        | FieldType::Sfixed64 => "JavaLangLong",
        FieldType::Float => "JavaLangFloat",
        FieldType::Double => "JavaLangDouble",
        FieldType::Bool => "JavaLangBoolean",
        FieldType::String => "NSString",
        FieldType::Bytes => "ComGoogleProtobufByteString",
        FieldType::Message | FieldType::Group | FieldType::Enum => {
            panic!("{field_type} values are not scalars")
        }
    }
}
