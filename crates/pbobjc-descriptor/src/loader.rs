use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::parser;
use crate::types::error::{ErrorEntry, ValidationReport, E_DUPLICATE_FILE, E_PARSE_ERROR};
use crate::types::file::FileSpec;

/// A loaded set of descriptor files
#[derive(Debug, Clone)]
pub struct LoadedSet {
    /// Root directory the set was loaded from
    pub root: PathBuf,
    /// All parsed descriptor files with their relative paths, sorted by path
    pub files: Vec<(String, FileSpec)>,
}

/// Load and parse every descriptor file under a directory.
/// Accumulates errors instead of failing on the first one.
#[allow(clippy::result_large_err)]
pub fn load_descriptor_set(dir: &Path) -> Result<(LoadedSet, ValidationReport), LoadError> {
    let mut report = ValidationReport::success();

    if !dir.is_dir() {
        return Err(LoadError::DirectoryNotFound(
            dir.to_string_lossy().into_owned(),
        ));
    }

    let mut files: Vec<(String, FileSpec)> = Vec::new();

    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if !parser::detect_descriptor_file(path) {
            continue;
        }

        let rel_path = path
            .strip_prefix(dir)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(file = %rel_path, error = %e, "skipping unreadable descriptor");
                report.push(ErrorEntry::error(
                    E_PARSE_ERROR,
                    format!("Failed to read file: {e}"),
                    &rel_path,
                    "$",
                ));
                continue;
            }
        };

        match parser::parse_file(&content, &rel_path) {
            Ok(spec) => {
                if let Some((first, _)) = files.iter().find(|(_, s)| s.name == spec.name) {
                    report.push(
                        ErrorEntry::error(
                            E_DUPLICATE_FILE,
                            format!("Proto file '{}' is also described by {first}", spec.name),
                            &rel_path,
                            "$.name",
                        )
                        .with_suggestion("Remove one of the duplicate descriptor files"),
                    );
                    continue;
                }
                files.push((rel_path, spec));
            }
            Err(entry) => {
                tracing::warn!(file = %rel_path, "skipping descriptor that failed to parse");
                report.push(entry);
            }
        }
    }

    tracing::info!(
        root = %dir.display(),
        files = files.len(),
        "loaded descriptor set"
    );

    Ok((
        LoadedSet {
            root: dir.to_path_buf(),
            files,
        },
        report,
    ))
}

/// Load a single descriptor file.
#[allow(clippy::result_large_err)]
pub fn load_descriptor_file(path: &Path) -> Result<FileSpec, LoadError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| LoadError::IoError(path.to_string_lossy().into_owned(), e))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    parser::parse_file(&content, &name).map_err(LoadError::ParseError)
}

/// Errors that prevent loading entirely
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Descriptor directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("Failed to parse descriptor: {0}")]
    ParseError(ErrorEntry),

    #[error("I/O error reading {0}: {1}")]
    IoError(String, std::io::Error),
}
