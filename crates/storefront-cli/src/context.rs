//! Resolved command context, document I/O and CLI error types.

use std::fs;
use std::path::Path;

use anyhow::{Context, anyhow};
use serde_json::Value;
use storefront_sections::{ConfigurationDocument, SectionKind, SectionProfile, document_from_value};
use tracing::{debug, warn};

/// Error surfaced to the operator; the variant picks the exit code.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

/// Everything a command needs besides its own arguments.
#[derive(Debug, Clone)]
pub(crate) struct AppContext {
    pub(crate) profile: SectionProfile,
}

impl AppContext {
    /// Built-in profile for `kind`, with the optional override file applied on top.
    pub(crate) fn resolve(kind: SectionKind, overrides: Option<&Path>) -> CliResult<Self> {
        let mut profile = SectionProfile::for_kind(kind);
        if let Some(path) = overrides {
            let value = read_json(path)?;
            profile = profile
                .with_overrides(&value)
                .map_err(|err| CliError::validation(format!("{}: {err}", path.display())))?;
        }
        debug!(
            section = %profile.kind,
            limit_default = profile.limit.default,
            columns_default = profile.columns.default,
            overrides = overrides.is_some(),
            "section profile resolved"
        );
        Ok(Self { profile })
    }

    /// Deprecated top-level keys specific to this profile.
    pub(crate) const fn extra_deprecated(&self) -> [&'static str; 1] {
        [self.profile.legacy_item_key]
    }
}

pub(crate) fn read_json(path: &Path) -> CliResult<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))
        .map_err(CliError::failure)?;
    serde_json::from_str(&text).map_err(|err| {
        CliError::validation(format!("{} is not valid JSON: {err}", path.display()))
    })
}

/// Read a section document. A non-object root is read as an empty document.
pub(crate) fn read_document(path: &Path) -> CliResult<ConfigurationDocument> {
    let value = read_json(path)?;
    if !value.is_object() {
        warn!(path = %path.display(), "document root is not an object; treating it as empty");
    }
    Ok(document_from_value(value))
}

pub(crate) fn write_document(path: &Path, document: &ConfigurationDocument) -> CliResult<()> {
    let mut text = serde_json::to_string_pretty(document)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    text.push('\n');
    fs::write(path, text)
        .with_context(|| format!("failed to write {}", path.display()))
        .map_err(CliError::failure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::NamedTempFile;

    fn temp_json(value: &Value) -> NamedTempFile {
        let file = NamedTempFile::new().expect("temp file");
        fs::write(file.path(), value.to_string()).expect("write temp file");
        file
    }

    #[test]
    fn cli_error_exit_codes() {
        assert_eq!(CliError::validation("bad").exit_code(), 2);
        assert_eq!(CliError::failure(anyhow!("boom")).exit_code(), 3);
        assert_eq!(CliError::validation("bad").display_message(), "bad");
    }

    #[test]
    fn resolve_applies_override_file() {
        let file = temp_json(&json!({ "defaultLimit": 12 }));
        let ctx = AppContext::resolve(SectionKind::ProductsByCategory, Some(file.path()))
            .expect("overrides apply");
        assert_eq!(ctx.profile.limit.default, 12);
    }

    #[test]
    fn resolve_rejects_unknown_override_keys() {
        let file = temp_json(&json!({ "pageSize": 12 }));
        let err = AppContext::resolve(SectionKind::ProductsByCategory, Some(file.path()))
            .expect_err("unknown key is rejected");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn missing_document_is_a_failure() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = read_document(&dir.path().join("absent.json")).expect_err("missing file");
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn non_object_document_reads_as_empty() {
        let file = temp_json(&json!([1, 2, 3]));
        let document = read_document(file.path()).expect("tolerated");
        assert!(document.is_empty());
    }
}
