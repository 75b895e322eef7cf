use std::collections::BTreeMap;
use std::path::Path;

use pbobjc_descriptor::{FieldDescriptor, FileRef, ResolvedFile};

use crate::config::GeneratorOptions;
use crate::context::{ImportSet, Printer};
use crate::error::CodegenError;
use crate::extension::ExtensionGenerator;
use crate::header_map::{self, HeaderMap};
use crate::naming;
use crate::traits::OutputSink;

/// Header of the runtime declarations generated sources rely on.
const RUNTIME_HEADER: &str = "com/google/protobuf/GeneratedMessage_PackagePrivate.h";

/// A collection of generated files, keyed by relative path.
#[derive(Debug, Clone, Default)]
pub struct GeneratedFiles {
    /// Files keyed by relative path (sorted for deterministic output)
    files: BTreeMap<String, String>,
}

impl GeneratedFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to the output.
    pub fn add_file(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    /// Get all generated files.
    pub fn files(&self) -> &BTreeMap<String, String> {
        &self.files
    }

    /// Number of generated files.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Write all generated files to the given output directory.
    pub fn write_to_disk(&self, output_dir: &Path) -> Result<(), CodegenError> {
        for (rel_path, content) in &self.files {
            let full_path = output_dir.join(rel_path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&full_path, content)?;
        }
        Ok(())
    }
}

/// Generates the header and source of a proto file's outer class, which
/// declares, defines, initializes, and registers all of the file's
/// extensions.
pub struct FileGenerator<'a> {
    file: &'a FileRef,
    extensions: Vec<ExtensionGenerator<'a>>,
    headers: &'a HeaderMap,
}

impl<'a> FileGenerator<'a> {
    pub fn new(
        file: &'a FileRef,
        extensions: &'a [FieldDescriptor],
        headers: &'a HeaderMap,
    ) -> Self {
        let extensions = extensions
            .iter()
            .map(|ext| ExtensionGenerator::with_header_map(ext, headers))
            .collect();
        Self {
            file,
            extensions,
            headers,
        }
    }

    /// Objective-C name of the outer class.
    pub fn class_name(&self) -> String {
        naming::outer_class_name(self.file)
    }

    /// Qualified Java name of the outer class.
    pub fn qualified_name(&self) -> String {
        header_map::qualified_name(
            naming::java_package(self.file),
            &naming::outer_classname(self.file),
        )
    }

    /// Output path of the generated pair, without extension.
    pub fn output_path(&self) -> String {
        self.headers.output_path(
            naming::java_package(self.file),
            &naming::outer_classname(self.file),
        )
    }

    /// Path of the generated header, as other files include it.
    pub fn header_path(&self) -> String {
        format!("{}.h", self.output_path())
    }

    pub fn generate_header(&self) -> String {
        let class_name = self.class_name();
        let mut out = Printer::default();

        self.print_banner(&mut out);
        out.print(
            "\n#ifndef $class$_H\n\
             #define $class$_H\n\
             \n\
             #include \"J2ObjC_header.h\"\n\
             \n",
            &[("class", class_name.as_str())],
        );

        let mut classes = ImportSet::new();
        classes.insert("ComGoogleProtobufExtensionRegistryLite");
        for ext in &self.extensions {
            ext.collect_header_forward_declarations(&mut classes);
        }
        for class in classes.sorted() {
            out.print("@class $class$;\n", &[("class", class)]);
        }

        out.print(
            "\n@interface $class$ : NSObject\n\
             \n\
             + (void)registerAllExtensionsWithComGoogleProtobufExtensionRegistryLite:\
             (ComGoogleProtobufExtensionRegistryLite *)extensionRegistry;\n\
             \n\
             @end\n\
             \n\
             J2OBJC_STATIC_INIT($class$)\n",
            &[("class", class_name.as_str())],
        );

        for ext in &self.extensions {
            ext.generate_members_header(&mut out);
        }

        out.print("\n#endif // $class$_H\n", &[("class", class_name.as_str())]);
        out.into_string()
    }

    pub fn generate_source(&self) -> String {
        let class_name = self.class_name();
        let own_header = self.header_path();
        let mut out = Printer::default();

        self.print_banner(&mut out);

        let mut imports = ImportSet::new();
        for ext in &self.extensions {
            ext.collect_source_imports(&mut imports);
        }
        imports.remove(&own_header);
        imports.remove(RUNTIME_HEADER);

        out.print(
            "\n#include \"J2ObjC_source.h\"\n\
             #include \"$own$\"\n\
             #include \"$runtime$\"\n",
            &[("own", own_header.as_str()), ("runtime", RUNTIME_HEADER)],
        );
        for header in imports.sorted() {
            out.print("#include \"$header$\"\n", &[("header", header)]);
        }

        if !self.extensions.is_empty() {
            out.print("\n", &[]);
        }
        for ext in &self.extensions {
            ext.generate_source_definition(&mut out);
        }
        for ext in &self.extensions {
            ext.generate_field_data(&mut out);
        }

        out.print(
            "\nJ2OBJC_INITIALIZED_DEFN($class$)\n\
             \n\
             @implementation $class$\n\
             \n\
             + (void)initialize {\n\
             \x20 if (self == [$class$ class]) {\n",
            &[("class", class_name.as_str())],
        );
        out.indent();
        out.indent();
        for ext in &self.extensions {
            ext.generate_source_initializer(&mut out);
        }
        out.print("J2OBJC_SET_INITIALIZED($class$)\n", &[("class", class_name.as_str())]);
        out.outdent();
        out.print("}\n", &[]);
        out.outdent();
        out.print(
            "}\n\
             \n\
             + (void)registerAllExtensionsWithComGoogleProtobufExtensionRegistryLite:\
             (ComGoogleProtobufExtensionRegistryLite *)extensionRegistry {\n",
            &[],
        );
        out.indent();
        out.print("$class$_initialize();\n", &[("class", class_name.as_str())]);
        for ext in &self.extensions {
            ext.generate_registration_code(&mut out);
        }
        out.outdent();
        out.print("}\n\n@end\n", &[]);

        out.into_string()
    }

    fn print_banner(&self, out: &mut dyn OutputSink) {
        out.print(
            "// Generated by pbobjc.  DO NOT EDIT!\n\
             // source: $source$\n",
            &[("source", self.file.name.as_str())],
        );
    }

    /// Generate both files into `out`.
    pub fn generate(&self, out: &mut GeneratedFiles) {
        let base = self.output_path();
        out.add_file(format!("{base}.h"), self.generate_header());
        out.add_file(format!("{base}.m"), self.generate_source());
        tracing::debug!(
            file = %self.file.name,
            class = %self.class_name(),
            extensions = self.extensions.len(),
            "generated outer class"
        );
    }
}

/// Generates code for every resolved file that declares extensions.
#[derive(Debug, Clone, Default)]
pub struct CodeGenerator {
    headers: HeaderMap,
    options: GeneratorOptions,
}

impl CodeGenerator {
    /// Create a generator, loading any header mappings the options name.
    pub fn new(options: GeneratorOptions) -> Result<Self, CodegenError> {
        let headers = options.header_map()?;
        Ok(Self { headers, options })
    }

    pub fn with_header_map(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn header_map(&self) -> &HeaderMap {
        &self.headers
    }

    /// Generate the outer class of every file with extensions. Each generated
    /// header is recorded in the header map.
    pub fn generate(&mut self, files: &[ResolvedFile]) -> GeneratedFiles {
        let mut output = GeneratedFiles::new();
        let mut produced = Vec::new();

        for resolved in files {
            if resolved.extensions.is_empty() {
                tracing::debug!(file = %resolved.file.name, "no extensions, skipping");
                continue;
            }
            let gen = FileGenerator::new(&resolved.file, &resolved.extensions, &self.headers);
            gen.generate(&mut output);
            produced.push((gen.qualified_name(), gen.header_path()));
        }

        for (name, header) in produced {
            self.headers.put(name, header);
        }

        output
    }

    /// Write the header map to the configured output mapping file, if any.
    pub fn write_output_mapping(&self) -> Result<bool, CodegenError> {
        match &self.options.output_mapping {
            Some(path) => {
                self.headers.print_mappings(path)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
