use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use serde_json::Value;
use storefront_sections::{Emission, RowPatch, SyncController, TimestampIds, serialize_with};
use tracing::{info, warn};

use crate::cli::{EditAction, EditArgs};
use crate::context::{AppContext, CliError, CliResult, read_document, write_document};
use crate::output::render_document;

pub(crate) fn handle_edit(ctx: &AppContext, args: &EditArgs, out: &mut dyn Write) -> CliResult<()> {
    let base = read_document(&args.file)?;
    let emitted: Rc<RefCell<Option<Emission>>> = Rc::default();
    let sink = {
        let emitted = Rc::clone(&emitted);
        move |emission: &Emission| {
            *emitted.borrow_mut() = Some(emission.clone());
        }
    };
    let mut controller = SyncController::new(ctx.profile.clone(), base, TimestampIds, sink);

    let changed = apply(&mut controller, &args.action)?;
    let emission = emitted.borrow_mut().take();
    let document = match emission {
        Some(emission) => emission.document,
        None => serialize_with(
            controller.document(),
            controller.rows(),
            None,
            &[controller.profile().legacy_item_key],
        ),
    };
    info!(
        path = %args.file.display(),
        changed,
        rows = controller.rows().len(),
        "row command applied"
    );

    if args.in_place {
        write_document(&args.file, &document)
    } else {
        render_document(&document, out)
    }
}

fn apply(controller: &mut SyncController, action: &EditAction) -> CliResult<bool> {
    let changed = match action {
        EditAction::Add => controller.add_row(),
        EditAction::Remove { id } => {
            warn_if_unknown(controller, id);
            controller.remove_row(id)
        }
        EditAction::Update { id, patch } => {
            let patch = parse_patch(patch)?;
            warn_if_unknown(controller, id);
            controller.update_row(id, &patch)
        }
        EditAction::Move { id, direction } => {
            warn_if_unknown(controller, id);
            controller.move_row(id, (*direction).into())
        }
    };
    Ok(changed)
}

fn parse_patch(raw: &str) -> CliResult<RowPatch> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|err| CliError::validation(format!("--patch is not valid JSON: {err}")))?;
    RowPatch::from_value(&value).map_err(|err| CliError::validation(format!("--patch: {err}")))
}

fn warn_if_unknown(controller: &SyncController, id: &str) {
    if controller.rows().position(id).is_none() {
        warn!(row_id = id, "no row with this id; document left unchanged");
    }
}
