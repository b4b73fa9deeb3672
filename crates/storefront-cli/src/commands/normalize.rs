use std::io::Write;

use storefront_sections::{TimestampIds, parse_document, serialize_with};
use tracing::info;

use crate::cli::NormalizeArgs;
use crate::context::{AppContext, CliResult, read_document};
use crate::output::render_document;

pub(crate) fn handle_normalize(
    ctx: &AppContext,
    args: &NormalizeArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let base = read_document(&args.file)?;
    let report = parse_document(&base, &ctx.profile, &mut TimestampIds);
    if args.warnings {
        for warning in &report.warnings {
            eprintln!("warning: {warning}");
        }
    }
    info!(
        path = %args.file.display(),
        shape = ?report.shape,
        rows = report.rows.len(),
        warnings = report.warnings.len(),
        "document normalised"
    );
    let document = serialize_with(&base, &report.rows, None, &ctx.extra_deprecated());
    render_document(&document, out)
}
