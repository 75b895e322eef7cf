use std::sync::Arc;

use crate::defaults;
use crate::descriptor::{
    Cardinality, FieldDescriptor, FileRef, ResolvedFile, Scope, TypeRef, ValueKind,
};
use crate::index::{TypeEntry, TypeIndex, TypeKind};
use crate::loader::LoadedSet;
use crate::types::error::{
    ErrorEntry, ValidationReport, E_INVALID_DEFAULT, E_INVALID_FIELD, E_MISSING_FIELD,
    E_REF_NOT_FOUND, E_REF_TYPE_MISMATCH,
};
use crate::types::field::{FieldSpec, FieldType, Label};
use crate::types::file::FileSpec;
use crate::types::message::MessageSpec;

/// Largest legal field number (2^29 - 1)
pub const MAX_FIELD_NUMBER: i32 = 536_870_911;
/// Field numbers reserved for the protocol buffer implementation
pub const RESERVED_NUMBERS: std::ops::RangeInclusive<i32> = 19_000..=19_999;

/// Result of resolving a type name
#[derive(Debug, Clone)]
pub enum ResolveResult<'a> {
    /// Resolved to a type of the expected kind
    Found(&'a TypeEntry),
    /// No type with that name is visible from the scope
    NotFound,
    /// Found but of the wrong kind
    TypeMismatch {
        expected: TypeKind,
        found: &'a TypeEntry,
    },
}

/// Turns parsed extension specs into [`FieldDescriptor`]s.
///
/// Name lookup follows protoc: absolute names (leading dot) are used as-is,
/// relative names are tried in the innermost scope first and then in each
/// enclosing scope out to the root package.
pub struct Resolver<'a> {
    index: &'a TypeIndex,
}

impl<'a> Resolver<'a> {
    pub fn new(index: &'a TypeIndex) -> Self {
        Self { index }
    }

    /// Find the type a name refers to from within `scope` (e.g., ".foo.Outer").
    pub fn lookup(&self, name: &str, scope: &str) -> Option<&'a TypeEntry> {
        if name.starts_with('.') {
            return self.index.lookup(name);
        }

        let mut scope = scope.to_string();
        loop {
            let candidate = format!("{scope}.{name}");
            if let Some(entry) = self.index.lookup(&candidate) {
                return Some(entry);
            }
            match scope.rfind('.') {
                Some(pos) => scope.truncate(pos),
                None => return None,
            }
        }
    }

    /// Resolve a name, checking that it names the expected kind of type.
    pub fn resolve(&self, name: &str, scope: &str, expected: TypeKind) -> ResolveResult<'a> {
        match self.lookup(name, scope) {
            Some(entry) if entry.kind == expected => ResolveResult::Found(entry),
            Some(entry) => ResolveResult::TypeMismatch {
                expected,
                found: entry,
            },
            None => ResolveResult::NotFound,
        }
    }

    /// Resolve every extension in a file, top-level ones first.
    pub fn resolve_file(
        &self,
        rel_path: &str,
        spec: &FileSpec,
    ) -> (ResolvedFile, ValidationReport) {
        let mut report = ValidationReport::success();
        let file = self
            .index
            .file(&spec.name)
            .cloned()
            .unwrap_or_else(|| Arc::new(FileRef::from_spec(spec)));

        let mut extensions = Vec::new();
        let file_scope = Scope::File(file.clone());
        for (i, field) in spec.extensions.iter().enumerate() {
            let json_path = format!("$.extensions[{i}]");
            match self.resolve_extension(rel_path, &file_scope, field, &json_path) {
                Ok(descriptor) => extensions.push(descriptor),
                Err(entry) => report.push(entry),
            }
        }

        for (i, msg) in spec.message_types.iter().enumerate() {
            let json_path = format!("$.messageTypes[{i}]");
            self.resolve_message_extensions(
                rel_path,
                &file,
                &[],
                msg,
                &json_path,
                &mut extensions,
                &mut report,
            );
        }

        tracing::debug!(
            file = %spec.name,
            extensions = extensions.len(),
            errors = report.errors.len(),
            "resolved file"
        );

        (
            ResolvedFile {
                path: rel_path.to_string(),
                file,
                extensions,
            },
            report,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn resolve_message_extensions(
        &self,
        rel_path: &str,
        file: &Arc<FileRef>,
        parent: &[String],
        msg: &MessageSpec,
        json_path: &str,
        out: &mut Vec<FieldDescriptor>,
        report: &mut ValidationReport,
    ) {
        let mut nesting = parent.to_vec();
        nesting.push(msg.name.clone());
        let scope = Scope::Message(TypeRef::new(file.clone(), nesting.clone()));

        for (i, field) in msg.extensions.iter().enumerate() {
            let field_path = format!("{json_path}.extensions[{i}]");
            match self.resolve_extension(rel_path, &scope, field, &field_path) {
                Ok(descriptor) => out.push(descriptor),
                Err(entry) => report.push(entry),
            }
        }

        for (i, nested) in msg.nested_types.iter().enumerate() {
            let nested_path = format!("{json_path}.nestedTypes[{i}]");
            self.resolve_message_extensions(
                rel_path,
                file,
                &nesting,
                nested,
                &nested_path,
                out,
                report,
            );
        }
    }

    /// Resolve and check one extension declaration.
    #[allow(clippy::result_large_err)]
    pub fn resolve_extension(
        &self,
        rel_path: &str,
        scope: &Scope,
        field: &FieldSpec,
        json_path: &str,
    ) -> Result<FieldDescriptor, ErrorEntry> {
        let scope_name = scope.full_name();
        let invalid =
            |message: String| ErrorEntry::error(E_INVALID_FIELD, message, rel_path, json_path);

        if field.number < 1 || field.number > MAX_FIELD_NUMBER {
            return Err(invalid(format!(
                "Extension '{}' has number {} outside 1..={MAX_FIELD_NUMBER}",
                field.name, field.number
            )));
        }
        if RESERVED_NUMBERS.contains(&field.number) {
            return Err(invalid(format!(
                "Extension '{}' uses number {}, which is reserved for the protocol buffer implementation",
                field.name, field.number
            ))
            .with_suggestion("Pick a number outside 19000..=19999"));
        }

        let cardinality = match field.label {
            Label::Optional => Cardinality::Optional,
            Label::Repeated => Cardinality::Repeated,
            Label::Required => {
                return Err(invalid(format!(
                    "Extension '{}' cannot be required",
                    field.name
                )));
            }
        };

        let extendee_name = field.extendee.as_deref().ok_or_else(|| {
            ErrorEntry::error(
                E_MISSING_FIELD,
                format!("Extension '{}' does not name the message it extends", field.name),
                rel_path,
                json_path,
            )
        })?;
        let extendee = self
            .expect_type(extendee_name, &scope_name, TypeKind::Message, rel_path, json_path)?
            .type_ref
            .clone();

        let value = match field.field_type {
            FieldType::Message | FieldType::Group | FieldType::Enum => {
                let type_name = field.type_name.as_deref().ok_or_else(|| {
                    ErrorEntry::error(
                        E_MISSING_FIELD,
                        format!(
                            "Extension '{}' of type {} needs a typeName",
                            field.name, field.field_type
                        ),
                        rel_path,
                        json_path,
                    )
                })?;
                if field.field_type == FieldType::Enum {
                    let entry = self.expect_type(
                        type_name,
                        &scope_name,
                        TypeKind::Enum,
                        rel_path,
                        json_path,
                    )?;
                    let enum_ref = entry.to_enum_ref().ok_or_else(|| {
                        invalid(format!("'{}' is not an enum", entry.full_name()))
                    })?;
                    if enum_ref.values.is_empty() {
                        return Err(invalid(format!(
                            "Enum {} used by extension '{}' declares no values",
                            enum_ref.type_ref.full_name, field.name
                        )));
                    }
                    ValueKind::Enum(enum_ref)
                } else {
                    let entry = self.expect_type(
                        type_name,
                        &scope_name,
                        TypeKind::Message,
                        rel_path,
                        json_path,
                    )?;
                    ValueKind::Message(entry.type_ref.clone())
                }
            }
            _ => ValueKind::Scalar,
        };

        if field.options.packed
            && (cardinality != Cardinality::Repeated || !field.field_type.is_packable())
        {
            return Err(invalid(format!(
                "Extension '{}' is packed but is not a repeated numeric, bool, or enum field",
                field.name
            )));
        }

        let mut descriptor = FieldDescriptor::new(
            scope.clone(),
            field.name.clone(),
            field.number as u32,
            field.field_type,
            value,
            extendee,
        )
        .with_cardinality(cardinality);

        if let Some(raw) = &field.default_value {
            if cardinality == Cardinality::Repeated {
                return Err(invalid(format!(
                    "Repeated extension '{}' cannot declare a default",
                    field.name
                )));
            }
            let default = defaults::parse_default(field.field_type, raw, &descriptor.value)
                .map_err(|reason| {
                    ErrorEntry::error(
                        E_INVALID_DEFAULT,
                        format!("Invalid default for extension '{}': {reason}", field.name),
                        rel_path,
                        &format!("{json_path}.defaultValue"),
                    )
                })?;
            descriptor = descriptor.with_default(default);
        }

        if field.options.packed {
            descriptor = descriptor.packed();
        }
        if field.options.deprecated {
            descriptor = descriptor.deprecated();
        }

        Ok(descriptor)
    }

    #[allow(clippy::result_large_err)]
    fn expect_type(
        &self,
        name: &str,
        scope: &str,
        expected: TypeKind,
        rel_path: &str,
        json_path: &str,
    ) -> Result<&'a TypeEntry, ErrorEntry> {
        match self.resolve(name, scope, expected) {
            ResolveResult::Found(entry) => Ok(entry),
            ResolveResult::NotFound => Err(ErrorEntry::error(
                E_REF_NOT_FOUND,
                format!("{expected} '{name}' not found from scope '{scope}'"),
                rel_path,
                json_path,
            )
            .with_suggestion("Check the package name and that the defining file is loaded")),
            ResolveResult::TypeMismatch { expected, found } => Err(ErrorEntry::error(
                E_REF_TYPE_MISMATCH,
                format!(
                    "'{name}' resolves to {} {}, expected a {expected}",
                    found.kind,
                    found.full_name()
                ),
                rel_path,
                json_path,
            )),
        }
    }
}

/// Index and resolve a whole descriptor set.
pub fn resolve_set(set: &LoadedSet) -> (Vec<ResolvedFile>, ValidationReport) {
    let (index, mut report) = TypeIndex::build(&set.files);
    let resolver = Resolver::new(&index);

    let resolved = set
        .files
        .iter()
        .map(|(rel_path, spec)| {
            let (file, file_report) = resolver.resolve_file(rel_path, spec);
            report.merge(file_report);
            file
        })
        .collect();

    (resolved, report)
}
