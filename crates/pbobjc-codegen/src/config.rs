use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CodegenError;
use crate::header_map::{HeaderMap, DEFAULT_MAPPING_FILE};

/// Where generated files are placed relative to the output directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    /// One directory per Java package segment (`com/example/Foo.h`)
    #[default]
    Package,
    /// Everything directly in the output directory
    None,
}

/// Generator configuration (`pbobjc.config.json`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorOptions {
    #[serde(default)]
    pub output_style: OutputStyle,

    /// Properties files mapping Java class names to header paths
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub header_mappings: Vec<PathBuf>,

    /// Where to write the mappings of the generated headers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_mapping: Option<PathBuf>,
}

impl GeneratorOptions {
    pub const FILE_NAME: &'static str = "pbobjc.config.json";

    /// Load options from a JSON file. Relative paths inside are taken
    /// relative to the file's directory.
    pub fn load(path: &Path) -> Result<Self, CodegenError> {
        let content = std::fs::read_to_string(path)?;
        let mut options: Self = serde_json::from_str(&content)
            .map_err(|e| CodegenError::Config(format!("{}: {e}", path.display())))?;

        if let Some(base) = path.parent() {
            for mapping in &mut options.header_mappings {
                if mapping.is_relative() {
                    *mapping = base.join(mapping.as_path());
                }
            }
            if let Some(out) = options.output_mapping.as_mut().filter(|p| p.is_relative()) {
                *out = base.join(out.as_path());
            }
        }

        Ok(options)
    }

    /// Build the header map these options describe.
    ///
    /// Without explicit mapping files, `mappings.j2objc` in the working
    /// directory is used when present.
    pub fn header_map(&self) -> Result<HeaderMap, CodegenError> {
        let mut map = HeaderMap::new().with_output_style(self.output_style);

        if self.header_mappings.is_empty() {
            let default = Path::new(DEFAULT_MAPPING_FILE);
            if default.is_file() {
                map.load_mappings(default)?;
            }
        } else {
            for path in &self.header_mappings {
                map.load_mappings(path)?;
            }
        }

        Ok(map)
    }
}
