use std::io::Write;

use storefront_sections::{TimestampIds, parse_rows};

use crate::cli::RowsArgs;
use crate::context::{AppContext, CliResult, read_document};
use crate::output::render_rows;

pub(crate) fn handle_rows(ctx: &AppContext, args: &RowsArgs, out: &mut dyn Write) -> CliResult<()> {
    let document = read_document(&args.file)?;
    let rows = parse_rows(&document, &ctx.profile, &mut TimestampIds);
    render_rows(&rows, args.format, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use serde_json::Value;
    use storefront_sections::SectionKind;
    use storefront_test_support::fixtures::malformed_document;
    use tempfile::NamedTempFile;

    #[test]
    fn lists_clamped_rows_as_json() {
        let file = NamedTempFile::new().expect("temp file");
        std::fs::write(file.path(), malformed_document().to_string()).expect("write document");
        let ctx = AppContext::resolve(SectionKind::ProductsByCategory, None).expect("profile");
        let args = RowsArgs {
            file: file.path().to_path_buf(),
            format: OutputFormat::Json,
        };
        let mut out = Vec::new();
        handle_rows(&ctx, &args, &mut out).expect("rows succeeds");

        let rows: Vec<Value> = serde_json::from_slice(&out).expect("output is JSON");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["columns"], Value::from(6));
        assert_eq!(rows[2]["id"], Value::from("kept"));
        assert_eq!(rows[2]["limit"], Value::from(1));
    }
}
