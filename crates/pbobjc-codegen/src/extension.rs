//! Lowering of one extension field into the Objective-C pieces the J2ObjC
//! protobuf runtime needs: a public declaration, its definition, a
//! `CGPFieldData` record, the statement that builds the extension from that
//! record, and the statement that registers it.

use pbobjc_descriptor::{FieldDescriptor, ValueKind};

use crate::context::ImportSet;
use crate::field_data;
use crate::header_map::HeaderMap;
use crate::naming;
use crate::traits::OutputSink;

/// Header map used when the caller does not supply one.
static DEFAULT_HEADER_MAP: HeaderMap = HeaderMap::new();

/// Generates the code for a single extension.
///
/// Holds nothing but borrowed, immutable inputs, so every operation can run
/// any number of times in any order and always emits the same text.
pub struct ExtensionGenerator<'a> {
    descriptor: &'a FieldDescriptor,
    headers: &'a HeaderMap,
}

impl<'a> ExtensionGenerator<'a> {
    /// # Panics
    ///
    /// If the descriptor is not a valid extension (see
    /// [`field_data::check_contract`]).
    pub fn new(descriptor: &'a FieldDescriptor) -> Self {
        Self::with_header_map(descriptor, &DEFAULT_HEADER_MAP)
    }

    pub fn with_header_map(descriptor: &'a FieldDescriptor, headers: &'a HeaderMap) -> Self {
        field_data::check_contract(descriptor);
        Self {
            descriptor,
            headers,
        }
    }

    pub fn descriptor(&self) -> &'a FieldDescriptor {
        self.descriptor
    }

    /// Name of the global variable holding the extension.
    pub fn name(&self) -> String {
        naming::extension_name(self.descriptor)
    }

    /// Objective-C type of the extension object, without the pointer star.
    fn extension_type(&self) -> String {
        let extendee = naming::class_name(&self.descriptor.extendee);
        let value = naming::value_class_name(self.descriptor);
        if self.descriptor.is_repeated() {
            format!("CGPGeneratedExtension<{extendee} *, NSArray<{value} *> *>")
        } else {
            format!("CGPGeneratedExtension<{extendee} *, {value} *>")
        }
    }

    /// Header of the class the extension is declared in.
    fn scope_header(&self) -> String {
        self.headers.header_for(
            naming::java_package(self.descriptor.file()),
            &naming::scope_unit_name(&self.descriptor.scope),
        )
    }

    /// Add the headers the generated source needs for the extension's value
    /// type. Scalars need none, and a type declared in the same header as
    /// the extension is never imported.
    pub fn collect_source_imports(&self, imports: &mut ImportSet) {
        let Some(type_ref) = self.descriptor.value.type_ref() else {
            return;
        };
        let header = self.headers.header_for_type(type_ref);
        if header != self.scope_header() {
            imports.insert(header);
        }
    }

    /// Add the classes the header declaration refers to, for `@class`
    /// forward declarations.
    pub fn collect_header_forward_declarations(&self, classes: &mut ImportSet) {
        classes.insert("CGPGeneratedExtension");
        classes.insert(naming::class_name(&self.descriptor.extendee));
        let value = naming::value_class_name(self.descriptor);
        if value != "NSString" {
            classes.insert(value);
        }
    }

    /// Emit the public declaration of the extension variable.
    pub fn generate_members_header(&self, out: &mut dyn OutputSink) {
        let d = self.descriptor;
        let value_type = match &d.value {
            ValueKind::Scalar => d.field_type.proto_name().to_string(),
            ValueKind::Message(t) => t.full_name.trim_start_matches('.').to_string(),
            ValueKind::Enum(e) => e.type_ref.full_name.trim_start_matches('.').to_string(),
        };
        let number = d.number.to_string();
        let attributes = if d.deprecated {
            " __attribute__((deprecated))"
        } else {
            ""
        };

        out.print(
            "\n/*! extend $extendee$ { $label$ $value_type$ $field$ = $number$; } */\n\
             FOUNDATION_EXPORT $type$ *$name$$attributes$;\n",
            &[
                ("extendee", d.extendee.full_name.trim_start_matches('.')),
                ("label", d.cardinality.proto_name()),
                ("value_type", value_type.as_str()),
                ("field", d.name.as_str()),
                ("number", number.as_str()),
                ("type", self.extension_type().as_str()),
                ("name", self.name().as_str()),
                ("attributes", attributes),
            ],
        );
    }

    /// Emit the definition matching [`generate_members_header`](Self::generate_members_header).
    pub fn generate_source_definition(&self, out: &mut dyn OutputSink) {
        out.print(
            "$type$ *$name$;\n",
            &[("type", self.extension_type().as_str()), ("name", self.name().as_str())],
        );
    }

    /// Emit the static `CGPFieldData` record describing the extension.
    pub fn generate_field_data(&self, out: &mut dyn OutputSink) {
        let d = self.descriptor;
        let name = self.name();
        let class_name = match &d.value {
            ValueKind::Scalar => "NULL".to_string(),
            _ => format!("\"{}\"", naming::value_class_name(d)),
        };

        out.print("\nstatic CGPFieldData $name$_FieldData = {\n", &[("name", name.as_str())]);
        out.indent();
        out.print(
            ".name = \"$field$\",\n\
             .javaName = \"$java_name$\",\n\
             .number = $number$,\n\
             .flags = $flags$,\n\
             .type = $type$,\n",
            &[
                ("field", d.name.as_str()),
                ("java_name", naming::java_field_name(d).as_str()),
                ("number", d.number.to_string().as_str()),
                ("flags", field_data::flags(d).as_str()),
                ("type", field_data::type_enum_name(d.field_type).as_str()),
            ],
        );
        if let Some(default) = field_data::default_init(d) {
            out.print(
                ".defaultValue.$member$ = $literal$,\n",
                &[("member", default.member), ("literal", default.literal.as_str())],
            );
        }
        out.print(
            ".className = $class_name$,\n\
             .containingType = \"$containing$\",\n\
             .optionsData = $options$,\n",
            &[
                ("class_name", class_name.as_str()),
                ("containing", naming::class_name(&d.extendee).as_str()),
                (
                    "options",
                    field_data::options_data(d).as_deref().unwrap_or("NULL"),
                ),
            ],
        );
        out.outdent();
        out.print("};\n", &[]);
    }

    /// Emit the statement that creates the extension from its field data.
    pub fn generate_source_initializer(&self, out: &mut dyn OutputSink) {
        out.print(
            "$name$ = CGPNewGeneratedExtension(&$name$_FieldData);\n",
            &[("name", self.name().as_str())],
        );
    }

    /// Emit the statement that adds the extension to `extensionRegistry`.
    /// Must run after the initializer.
    pub fn generate_registration_code(&self, out: &mut dyn OutputSink) {
        out.print(
            "CGPExtensionRegistryAdd(extensionRegistry, \"$containing$\", $number$, $name$);\n",
            &[
                ("containing", naming::class_name(&self.descriptor.extendee).as_str()),
                ("number", self.descriptor.number.to_string().as_str()),
                ("name", self.name().as_str()),
            ],
        );
    }
}
