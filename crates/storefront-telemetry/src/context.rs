//! Command-level span helpers.

use tracing::Span;

use crate::init::build_sha;

/// Span wrapping one CLI command, tagged with the section kind and build.
#[must_use]
pub fn command_span(command: &str, section: &str) -> Span {
    tracing::info_span!("command", command, section, build_sha = %build_sha())
}
