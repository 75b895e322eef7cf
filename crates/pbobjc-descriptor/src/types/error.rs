use serde::{Deserialize, Serialize};

use super::common::Severity;

// ── Error code constants ──

pub const E_PARSE_ERROR: &str = "E_PARSE_ERROR";
pub const E_DUPLICATE_SYMBOL: &str = "E_DUPLICATE_SYMBOL";
pub const E_DUPLICATE_FILE: &str = "E_DUPLICATE_FILE";
pub const E_REF_NOT_FOUND: &str = "E_REF_NOT_FOUND";
pub const E_REF_TYPE_MISMATCH: &str = "E_REF_TYPE_MISMATCH";
pub const E_MISSING_FIELD: &str = "E_MISSING_FIELD";
pub const E_INVALID_FIELD: &str = "E_INVALID_FIELD";
pub const E_INVALID_DEFAULT: &str = "E_INVALID_DEFAULT";

/// A single parsing/resolution error entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// Machine-readable stable error code
    pub code: String,
    /// Severity level
    pub severity: Severity,
    /// Human-readable error message
    pub message: String,
    /// Relative file path where the error occurred
    pub file: String,
    /// JSONPath to the offending element
    pub path: String,
    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Aggregated report of everything that went wrong while loading or resolving
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Whether the descriptors are usable (no errors, warnings are ok)
    pub ok: bool,
    /// All collected errors, warnings, and info entries
    pub errors: Vec<ErrorEntry>,
}

impl ValidationReport {
    /// Create a successful (empty) report
    pub fn success() -> Self {
        Self {
            ok: true,
            errors: Vec::new(),
        }
    }

    /// Create a report from a list of error entries
    pub fn from_errors(errors: Vec<ErrorEntry>) -> Self {
        let ok = !errors.iter().any(|e| e.severity == Severity::Error);
        Self { ok, errors }
    }

    /// Add an error entry and update the ok flag
    pub fn push(&mut self, entry: ErrorEntry) {
        if entry.severity == Severity::Error {
            self.ok = false;
        }
        self.errors.push(entry);
    }

    /// Merge another report into this one
    pub fn merge(&mut self, other: ValidationReport) {
        for entry in other.errors {
            self.push(entry);
        }
    }

    /// Count entries of a specific severity
    pub fn count(&self, severity: Severity) -> usize {
        self.errors.iter().filter(|e| e.severity == severity).count()
    }

    /// Check if any errors exist (not warnings/info)
    pub fn has_errors(&self) -> bool {
        !self.ok
    }
}

impl ErrorEntry {
    /// Create a new error entry
    pub fn error(code: &str, message: impl Into<String>, file: &str, path: &str) -> Self {
        Self {
            code: code.to_string(),
            severity: Severity::Error,
            message: message.into(),
            file: file.to_string(),
            path: path.to_string(),
            suggestion: None,
        }
    }

    /// Create a warning entry
    pub fn warning(code: &str, message: impl Into<String>, file: &str, path: &str) -> Self {
        Self {
            code: code.to_string(),
            severity: Severity::Warning,
            message: message.into(),
            file: file.to_string(),
            path: path.to_string(),
            suggestion: None,
        }
    }

    /// Add a suggestion to this entry
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl std::fmt::Display for ErrorEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} ({} at {})",
            self.code, self.message, self.file, self.path
        )
    }
}
