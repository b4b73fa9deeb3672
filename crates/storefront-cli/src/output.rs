//! Renderers for documents and row listings.

use std::io::Write;

use anyhow::anyhow;
use storefront_sections::{ConfigurationDocument, RowCollection};

use crate::cli::OutputFormat;
use crate::context::{CliError, CliResult};

pub(crate) fn render_document(
    document: &ConfigurationDocument,
    out: &mut dyn Write,
) -> CliResult<()> {
    let text = serde_json::to_string_pretty(document)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    writeln!(out, "{text}").map_err(write_failed)
}

pub(crate) fn render_rows(
    rows: &RowCollection,
    format: OutputFormat,
    out: &mut dyn Write,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            let text = serde_json::to_string_pretty(rows.as_slice())
                .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
            writeln!(out, "{text}").map_err(write_failed)?;
        }
        OutputFormat::Table => {
            writeln!(
                out,
                "{:<28} {:<12} {:>5} {:>4} {:<8} {:<16} ITEMS",
                "ID", "STRATEGY", "LIMIT", "COLS", "STYLE", "SELECTOR"
            )
            .map_err(write_failed)?;
            for row in rows {
                writeln!(
                    out,
                    "{:<28} {:<12} {:>5} {:>4} {:<8} {:<16} {}",
                    row.id,
                    row.strategy.as_str(),
                    row.limit,
                    row.columns,
                    row.display_style.as_str(),
                    row.selector_id.as_deref().unwrap_or("-"),
                    format_items(&row.item_ids)
                )
                .map_err(write_failed)?;
            }
        }
    }
    Ok(())
}

#[must_use]
pub(crate) fn format_items(item_ids: &[String]) -> String {
    if item_ids.is_empty() {
        "-".to_string()
    } else {
        item_ids.join(",")
    }
}

fn write_failed(err: std::io::Error) -> CliError {
    CliError::failure(anyhow!("failed to write output: {err}"))
}
