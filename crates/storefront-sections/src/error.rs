//! Error types for operator-facing section inputs.
//!
//! Configuration documents are never rejected; these errors cover the strict
//! inputs only (profile overrides, JSON row patches, section kind names).

use thiserror::Error;

/// Primary error type for section configuration operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SectionError {
    /// Field contained an invalid value.
    #[error("invalid value for '{field}' in '{section}': {message}")]
    InvalidField {
        /// Section (profile or patch) that failed validation.
        section: String,
        /// Field that failed validation.
        field: String,
        /// Human-readable error description.
        message: String,
    },
    /// Field did not exist in the target section.
    #[error("unknown field '{field}' in '{section}'")]
    UnknownField {
        /// Section where the unknown field was encountered.
        section: String,
        /// Name of the unexpected field.
        field: String,
    },
    /// A row patch payload was not a JSON object.
    #[error("row patch must be a JSON object")]
    InvalidPatch,
    /// Section kind identifier was not recognised.
    #[error("unknown section kind '{value}'")]
    UnknownSectionKind {
        /// Kind payload provided by the caller.
        value: String,
    },
    /// A min/max pair was inverted or a default fell outside it.
    #[error("invalid range for '{field}': {min}..={max} (default {default})")]
    InvalidRange {
        /// Range being configured (`limit` or `columns`).
        field: &'static str,
        /// Lower bound supplied.
        min: i64,
        /// Upper bound supplied.
        max: i64,
        /// Default value supplied.
        default: i64,
    },
}

impl SectionError {
    pub(crate) fn invalid_field(section: &str, field: &str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            section: section.to_string(),
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Convenience alias for section results.
pub type SectionResult<T> = Result<T, SectionError>;
