//! Maps Java top-level classes to the Objective-C headers that declare them.

use std::collections::BTreeMap;
use std::path::Path;

use pbobjc_descriptor::TypeRef;

use crate::config::OutputStyle;
use crate::error::CodegenError;
use crate::naming;

/// Mapping file read when no other mapping files are configured.
pub const DEFAULT_MAPPING_FILE: &str = "mappings.j2objc";

/// Packages shipped with the J2ObjC libraries. Their headers always live in
/// package directories, whatever the output style.
const PLATFORM_PACKAGES: &[&str] = &[
    "android",
    "com.android.internal.util",
    "com.google.common",
    "com.google.common.annotations",
    "com.google.common.base",
    "com.google.common.cache",
    "com.google.common.collect",
    "com.google.common.hash",
    "com.google.common.io",
    "com.google.common.math",
    "com.google.common.net",
    "com.google.common.primitives",
    "com.google.common.util",
    "com.google.j2objc",
    "com.google.protobuf",
    "dalvik",
    "java",
    "javax",
    "junit",
    "libcore",
    "org.apache.harmony",
    "org.hamcrest",
    "org.json",
    "org.junit",
    "org.kxml2",
    "org.mockito",
    "org.w3c",
    "org.xml.sax",
    "org.xmlpull",
    "sun.misc",
];

#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    output_style: OutputStyle,
    /// Qualified Java class name -> header path
    mappings: BTreeMap<String, String>,
}

impl HeaderMap {
    pub const fn new() -> Self {
        Self {
            output_style: OutputStyle::Package,
            mappings: BTreeMap::new(),
        }
    }

    pub fn with_output_style(mut self, output_style: OutputStyle) -> Self {
        self.output_style = output_style;
        self
    }

    /// Record an explicit header for a qualified class name.
    pub fn put(&mut self, qualified_name: impl Into<String>, header: impl Into<String>) {
        self.mappings.insert(qualified_name.into(), header.into());
    }

    pub fn get_mapped(&self, qualified_name: &str) -> Option<&str> {
        self.mappings.get(qualified_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Header declaring the top-level class `unit` of `java_package`.
    pub fn header_for(&self, java_package: &str, unit: &str) -> String {
        match self.get_mapped(&qualified_name(java_package, unit)) {
            Some(header) => header.to_string(),
            None => format!("{}.h", self.output_path(java_package, unit)),
        }
    }

    /// Header declaring a message or enum type.
    pub fn header_for_type(&self, type_ref: &TypeRef) -> String {
        self.header_for(
            naming::java_package(&type_ref.file),
            &naming::unit_name(type_ref),
        )
    }

    /// Generated file path for a top-level class, without extension.
    pub fn output_path(&self, java_package: &str, unit: &str) -> String {
        format!("{}{unit}", self.output_dir(java_package))
    }

    fn output_dir(&self, java_package: &str) -> String {
        if java_package.is_empty() {
            return String::new();
        }
        let style = if is_platform_package(java_package) {
            OutputStyle::Package
        } else {
            self.output_style
        };
        match style {
            OutputStyle::Package => format!("{}/", java_package.replace('.', "/")),
            OutputStyle::None => String::new(),
        }
    }

    /// Parse mappings in properties-file syntax. Returns how many were read.
    pub fn parse_mappings(&mut self, content: &str, source: &str) -> Result<usize, CodegenError> {
        let mut count = 0;
        let mut pending = String::new();
        let mut start_line = 0;

        for (i, raw) in content.lines().enumerate() {
            let line = raw.trim_start();
            if pending.is_empty() {
                if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                    continue;
                }
                start_line = i + 1;
            }

            // A trailing backslash continues the entry on the next line.
            if let Some(continued) = line.strip_suffix('\\') {
                pending.push_str(continued);
                continue;
            }
            pending.push_str(line);

            let entry = std::mem::take(&mut pending);
            let (key, value) = split_property(&entry);
            if value.is_empty() {
                return Err(CodegenError::Mapping {
                    file: source.to_string(),
                    line: start_line,
                    message: format!("no header given for '{key}'"),
                });
            }
            self.put(key, value);
            count += 1;
        }

        if !pending.is_empty() {
            return Err(CodegenError::Mapping {
                file: source.to_string(),
                line: start_line,
                message: "entry continues past the end of the file".to_string(),
            });
        }

        Ok(count)
    }

    /// Load mappings from a properties file.
    pub fn load_mappings(&mut self, path: &Path) -> Result<usize, CodegenError> {
        let content = std::fs::read_to_string(path)?;
        let count = self.parse_mappings(&content, &path.to_string_lossy())?;
        tracing::debug!(file = %path.display(), count, "loaded header mappings");
        Ok(count)
    }

    /// All mappings as `name=header` lines, sorted by name.
    pub fn format_mappings(&self) -> String {
        self.mappings
            .iter()
            .map(|(name, header)| format!("{name}={header}\n"))
            .collect()
    }

    /// Write all mappings to a file, creating parent directories as needed.
    pub fn print_mappings(&self, path: &Path) -> Result<(), CodegenError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.format_mappings())?;
        Ok(())
    }
}

/// Dotted Java name of a top-level class.
pub fn qualified_name(java_package: &str, unit: &str) -> String {
    if java_package.is_empty() {
        unit.to_string()
    } else {
        format!("{java_package}.{unit}")
    }
}

/// Whether a package, or any package it is nested in, ships with J2ObjC.
pub fn is_platform_package(java_package: &str) -> bool {
    let mut prefix = String::new();
    for part in java_package.split('.') {
        if !prefix.is_empty() {
            prefix.push('.');
        }
        prefix.push_str(part);
        if PLATFORM_PACKAGES.contains(&prefix.as_str()) {
            return true;
        }
    }
    false
}

/// Split a properties entry at the first `=`, `:`, or whitespace.
fn split_property(entry: &str) -> (&str, &str) {
    match entry.find(|c: char| matches!(c, '=' | ':' | ' ' | '\t')) {
        Some(pos) => {
            let key = &entry[..pos];
            let rest = entry[pos..].trim_start();
            let rest = rest
                .strip_prefix('=')
                .or_else(|| rest.strip_prefix(':'))
                .unwrap_or(rest);
            (key, rest.trim())
        }
        None => (entry, ""),
    }
}
