//! Sync controller: local row state bound to an externally owned document.
//!
//! # Design
//! - The owner supplies documents through [`SyncController::receive`] and is told about local
//!   commits through a [`ChangeSink`]. Neither side needs to know how the other stores state.
//! - Every outbound document is tagged with an [`EchoToken`]. The controller remembers the
//!   emissions not yet echoed and ignores them when they come back, so a write-back never
//!   clobbers local state, even when echoes arrive late or out of order.
//! - Inbound documents that are not echoes are parsed and adopted only when the rows actually
//!   differ; re-supplying an equivalent document leaves the current snapshot in place.
//! - Commands are synchronous and the sink runs while the controller is mutably borrowed, so an
//!   owner cannot re-enter the controller from inside the callback.

use std::collections::VecDeque;

use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use crate::equality::rows_equal;
use crate::ids::RowIdGenerator;
use crate::model::{ConfigurationDocument, Row, RowCollection, RowPatch};
use crate::ops::{self, MoveDirection};
use crate::parser::parse_rows;
use crate::profile::SectionProfile;
use crate::serialize::serialize_with;

/// Unacknowledged emissions kept for echo matching; older ones are forgotten.
const MAX_PENDING_ECHOES: usize = 16;

/// Tag attached to each outbound document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EchoToken(u64);

impl EchoToken {
    /// Raw sequence number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// One committed local change, as handed to the owner.
#[derive(Debug, Clone, PartialEq)]
pub struct Emission {
    /// Tag the owner may hand back with the echoed document.
    pub token: EchoToken,
    /// Sanitized document to persist.
    pub document: ConfigurationDocument,
}

/// Outward change callback.
pub trait ChangeSink {
    /// Called once per committed local mutation.
    fn document_changed(&mut self, emission: &Emission);
}

impl<F> ChangeSink for F
where
    F: FnMut(&Emission),
{
    fn document_changed(&mut self, emission: &Emission) {
        self(emission);
    }
}

/// Whether a local commit is still waiting for its echo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Local rows match what the owner last supplied.
    InSync,
    /// A commit was emitted and its echo has not been observed yet.
    LocalEditPending,
}

/// What an inbound document did to local state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The document was the echo of the given emission; nothing changed.
    EchoConsumed(EchoToken),
    /// The document parsed to the rows already held; nothing changed.
    Unchanged,
    /// The document came from elsewhere and its rows replaced local state.
    Adopted,
}

/// Per-row view handed to row editors.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    /// Current row values.
    pub row: &'a Row,
    /// Display position.
    pub index: usize,
    /// Whether a remove control should be offered (`len > 1`).
    pub can_remove: bool,
    /// Whether the row can move towards index 0.
    pub can_move_up: bool,
    /// Whether the row can move towards the end.
    pub can_move_down: bool,
}

/// Owns the editable rows for one section instance.
pub struct SyncController {
    profile: SectionProfile,
    ids: Box<dyn RowIdGenerator>,
    sink: Box<dyn ChangeSink>,
    base: ConfigurationDocument,
    rows: RowCollection,
    pending: VecDeque<Emission>,
    next_token: u64,
}

impl std::fmt::Debug for SyncController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncController")
            .field("kind", &self.profile.kind)
            .field("rows", &self.rows.len())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl SyncController {
    /// Seed the controller by parsing `initial`.
    pub fn new(
        profile: SectionProfile,
        initial: ConfigurationDocument,
        ids: impl RowIdGenerator + 'static,
        sink: impl ChangeSink + 'static,
    ) -> Self {
        let mut ids: Box<dyn RowIdGenerator> = Box::new(ids);
        let rows = parse_rows(&initial, &profile, ids.as_mut());
        debug!(section = %profile.kind, rows = rows.len(), "section editor seeded");
        Self {
            profile,
            ids,
            sink: Box::new(sink),
            base: initial,
            rows,
            pending: VecDeque::new(),
            next_token: 1,
        }
    }

    /// Current rows.
    #[must_use]
    pub const fn rows(&self) -> &RowCollection {
        &self.rows
    }

    /// Profile driving defaults and clamps.
    #[must_use]
    pub const fn profile(&self) -> &SectionProfile {
        &self.profile
    }

    /// Last document supplied by the owner or emitted by this controller.
    #[must_use]
    pub const fn document(&self) -> &ConfigurationDocument {
        &self.base
    }

    /// Whether an emitted commit is awaiting its echo.
    #[must_use]
    pub fn state(&self) -> SyncState {
        if self.pending.is_empty() {
            SyncState::InSync
        } else {
            SyncState::LocalEditPending
        }
    }

    /// Token of the newest emission awaiting its echo, if any.
    #[must_use]
    pub fn pending_token(&self) -> Option<EchoToken> {
        self.pending.back().map(|emission| emission.token)
    }

    /// Handle a document re-supplied by the owner.
    ///
    /// A document equal to an unacknowledged emission is recognised as its echo. When several
    /// pending emissions carry the same document, the newest one is matched.
    pub fn receive(&mut self, document: &ConfigurationDocument) -> SyncOutcome {
        match self
            .pending
            .iter()
            .rposition(|emission| emission.document == *document)
        {
            Some(index) => self.consume_echo(index, document),
            None => self.receive_external(document),
        }
    }

    /// Handle a document the owner explicitly tagged with the token it was emitted under.
    ///
    /// A token that matches no unacknowledged emission is treated as an external change.
    pub fn receive_tagged(
        &mut self,
        token: EchoToken,
        document: &ConfigurationDocument,
    ) -> SyncOutcome {
        match self
            .pending
            .iter()
            .position(|emission| emission.token == token)
        {
            Some(index) => self.consume_echo(index, document),
            None => self.receive_external(document),
        }
    }

    /// Switch to a different configuration context, discarding local rows and any pending echo.
    pub fn reset(&mut self, document: ConfigurationDocument) {
        self.rows = parse_rows(&document, &self.profile, self.ids.as_mut());
        self.base = document;
        self.pending.clear();
        debug!(section = %self.profile.kind, rows = self.rows.len(), "section editor reset");
    }

    /// Row views in display order.
    pub fn row_views(&self) -> impl Iterator<Item = RowView<'_>> {
        let len = self.rows.len();
        self.rows.iter().enumerate().map(move |(index, row)| RowView {
            row,
            index,
            can_remove: len > 1,
            can_move_up: index > 0,
            can_move_down: index + 1 < len,
        })
    }

    /// Append a default row. Returns whether a change was committed.
    pub fn add_row(&mut self) -> bool {
        let next = ops::add_row(&self.rows, &self.profile, self.ids.as_mut());
        self.commit(next, None)
    }

    /// Remove the row with `id`; the last row is replaced by a fresh default.
    pub fn remove_row(&mut self, id: &str) -> bool {
        let next = ops::remove_row(&self.rows, id, &self.profile, self.ids.as_mut());
        self.commit(next, None)
    }

    /// Merge `patch` into the row with `id`. Unknown ids are ignored.
    pub fn update_row(&mut self, id: &str, patch: &RowPatch) -> bool {
        let next = ops::update_row(&self.rows, id, patch, &self.profile);
        self.commit(next, None)
    }

    /// Swap the row with `id` with its neighbour. Edge moves and unknown ids are ignored.
    pub fn move_row(&mut self, id: &str, direction: MoveDirection) -> bool {
        let next = ops::move_row(&self.rows, id, direction);
        self.commit(next, None)
    }

    /// Set a section-level flag (e.g. `sidebarEnabled`) alongside the rows.
    pub fn set_ancillary(&mut self, key: &str, value: Value) -> bool {
        if self.base.get(key) == Some(&value) {
            trace!(key, "ancillary value unchanged");
            return false;
        }
        let mut overrides = Map::new();
        overrides.insert(key.to_string(), value);
        self.commit(self.rows.clone(), Some(overrides))
    }

    /// Drop the matched emission and everything older. Only the newest echo refreshes the base
    /// document; an older one describes a state local edits have already moved past.
    fn consume_echo(&mut self, index: usize, document: &ConfigurationDocument) -> SyncOutcome {
        let Some(token) = self.pending.drain(..=index).last().map(|emission| emission.token) else {
            return SyncOutcome::Unchanged;
        };
        if self.pending.is_empty() {
            self.base.clone_from(document);
        }
        debug!(
            section = %self.profile.kind,
            token = token.get(),
            outstanding = self.pending.len(),
            "echo consumed"
        );
        SyncOutcome::EchoConsumed(token)
    }

    /// The owner's own document supersedes every emission still awaiting its echo.
    fn receive_external(&mut self, document: &ConfigurationDocument) -> SyncOutcome {
        if !self.pending.is_empty() {
            debug!(
                section = %self.profile.kind,
                dropped = self.pending.len(),
                "owner document supersedes pending emissions"
            );
            self.pending.clear();
        }
        if *document == self.base {
            trace!(section = %self.profile.kind, "document re-supplied unchanged");
            return SyncOutcome::Unchanged;
        }
        self.base.clone_from(document);
        let parsed = parse_rows(document, &self.profile, self.ids.as_mut());
        if rows_equal(&self.rows, &parsed) {
            debug!(section = %self.profile.kind, "external document matches local rows");
            return SyncOutcome::Unchanged;
        }
        debug!(
            section = %self.profile.kind,
            rows = parsed.len(),
            "adopting externally changed rows"
        );
        self.rows = parsed;
        SyncOutcome::Adopted
    }

    fn commit(&mut self, next: RowCollection, overrides: Option<Map<String, Value>>) -> bool {
        if overrides.is_none() && rows_equal(&self.rows, &next) {
            trace!(section = %self.profile.kind, "command produced no change");
            return false;
        }
        let document = serialize_with(
            &self.base,
            &next,
            overrides.as_ref(),
            &[self.profile.legacy_item_key],
        );
        let token = EchoToken(self.next_token);
        self.next_token += 1;

        self.rows = next;
        self.base.clone_from(&document);
        self.pending.push_back(Emission { token, document });
        if self.pending.len() > MAX_PENDING_ECHOES {
            warn!(
                section = %self.profile.kind,
                "owner has not echoed {MAX_PENDING_ECHOES} emissions; forgetting the oldest"
            );
            self.pending.pop_front();
        }
        trace!(
            section = %self.profile.kind,
            token = token.get(),
            rows = self.rows.len(),
            "emitting section document"
        );
        if let Some(emission) = self.pending.back() {
            self.sink.document_changed(emission);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::model::{Strategy, document_from_value};
    use crate::profile::SectionKind;
    use serde_json::json;
    use storefront_test_support::Recorder;

    fn controller(initial: Value) -> (SyncController, Recorder<Emission>) {
        let recorder = Recorder::default();
        let sink = recorder.clone();
        let controller = SyncController::new(
            SectionProfile::for_kind(SectionKind::ProductsByCategory),
            document_from_value(initial),
            SequentialIds::default(),
            move |emission: &Emission| sink.push(emission.clone()),
        );
        (controller, recorder)
    }

    #[test]
    fn seeds_from_initial_document_in_sync() {
        let (controller, recorder) = controller(json!({ "categoryId": "c1" }));
        assert_eq!(controller.state(), SyncState::InSync);
        assert_eq!(controller.rows().len(), 1);
        assert!(recorder.is_empty(), "seeding never emits");
    }

    #[test]
    fn echo_of_last_emission_is_consumed_without_touching_rows() {
        let (mut controller, recorder) = controller(json!({ "rows": [{ "id": "r1" }] }));
        assert!(controller.add_row());
        assert_eq!(controller.state(), SyncState::LocalEditPending);
        let snapshot = controller.rows().clone();

        let echoed = recorder.last().expect("commit should emit");
        let outcome = controller.receive(&echoed.document);
        assert_eq!(outcome, SyncOutcome::EchoConsumed(echoed.token));
        assert_eq!(controller.state(), SyncState::InSync);
        assert!(RowCollection::ptr_eq(&snapshot, controller.rows()));
    }

    #[test]
    fn tagged_echo_is_matched_by_token() {
        let (mut controller, recorder) = controller(json!({ "rows": [{ "id": "r1" }] }));
        controller.update_row(
            "r1",
            &RowPatch {
                title: Some(Some("Shelf".into())),
                ..RowPatch::default()
            },
        );
        let emission = recorder.last().expect("commit should emit");
        let mut decorated = emission.document.clone();
        decorated.insert("updatedAt".into(), json!("2026-01-01T00:00:00Z"));
        let outcome = controller.receive_tagged(emission.token, &decorated);
        assert_eq!(outcome, SyncOutcome::EchoConsumed(emission.token));
        assert_eq!(controller.document()["updatedAt"], json!("2026-01-01T00:00:00Z"));
    }

    #[test]
    fn equivalent_external_document_keeps_current_snapshot() {
        let (mut controller, _recorder) = controller(json!({ "rows": [{ "id": "r1", "limit": 4 }] }));
        let snapshot = controller.rows().clone();
        let outcome = controller.receive(&document_from_value(json!({
            "rows": [{ "id": "r1", "limit": "4" }],
            "note": "re-rendered"
        })));
        assert_eq!(outcome, SyncOutcome::Unchanged);
        assert!(RowCollection::ptr_eq(&snapshot, controller.rows()));
    }

    #[test]
    fn different_external_document_is_adopted() {
        let (mut controller, _recorder) = controller(json!({ "rows": [{ "id": "r1" }] }));
        let outcome = controller.receive(&document_from_value(json!({
            "rows": [{ "id": "other", "strategy": "featured" }]
        })));
        assert_eq!(outcome, SyncOutcome::Adopted);
        assert_eq!(controller.rows().as_slice()[0].id, "other");
        assert_eq!(controller.rows().as_slice()[0].strategy, Strategy::Featured);
    }

    #[test]
    fn no_op_commands_do_not_emit() {
        let (mut controller, recorder) = controller(json!({ "rows": [{ "id": "r1" }] }));
        assert!(!controller.update_row("missing", &RowPatch::default()));
        assert!(!controller.move_row("r1", MoveDirection::Up));
        assert!(!controller.remove_row("missing"));
        assert!(recorder.is_empty());
        assert_eq!(controller.state(), SyncState::InSync);
    }

    #[test]
    fn removing_the_sole_row_emits_a_fresh_default() {
        let (mut controller, recorder) = controller(json!({ "rows": [{ "id": "r1" }] }));
        assert!(controller.remove_row("r1"));
        assert_eq!(controller.rows().len(), 1);
        assert_ne!(controller.rows().as_slice()[0].id, "r1");
        assert_eq!(recorder.len(), 1);
    }

    #[test]
    fn ancillary_flags_ride_along_and_persist() {
        let (mut controller, recorder) =
            controller(json!({ "rows": [{ "id": "r1" }], "sidebarEnabled": false }));
        assert!(controller.set_ancillary("sidebarEnabled", json!(true)));
        assert!(!controller.set_ancillary("sidebarEnabled", json!(true)));
        let emission = recorder.last().expect("ancillary change should emit");
        assert_eq!(emission.document["sidebarEnabled"], json!(true));

        controller.receive(&emission.document);
        controller.add_row();
        let next = recorder.last().expect("add should emit");
        assert_eq!(next.document["sidebarEnabled"], json!(true));
    }

    #[test]
    fn late_echo_of_older_emission_does_not_roll_back() {
        let (mut controller, recorder) = controller(json!({ "rows": [{ "id": "r1" }] }));
        controller.add_row();
        let first = recorder.last().expect("first commit");
        controller.add_row();
        let second = recorder.last().expect("second commit");
        assert_eq!(controller.pending_token(), Some(second.token));

        let outcome = controller.receive(&first.document);
        assert_eq!(outcome, SyncOutcome::EchoConsumed(first.token));
        assert_eq!(controller.rows().len(), 3);
        assert_eq!(controller.state(), SyncState::LocalEditPending);

        let outcome = controller.receive(&second.document);
        assert_eq!(outcome, SyncOutcome::EchoConsumed(second.token));
        assert_eq!(controller.state(), SyncState::InSync);
    }

    #[test]
    fn stale_document_after_echo_is_external() {
        let (mut controller, recorder) = controller(json!({ "rows": [{ "id": "r1" }] }));
        controller.add_row();
        let first = recorder.last().expect("first commit");
        controller.add_row();
        let second = recorder.last().expect("second commit");

        controller.receive(&second.document);
        let outcome = controller.receive(&first.document);
        assert_eq!(outcome, SyncOutcome::Adopted);
        assert_eq!(controller.rows().len(), 2);
    }

    #[test]
    fn rejected_edit_resolves_pending_state() {
        let initial = json!({ "rows": [{ "id": "r1" }] });
        let (mut controller, recorder) = controller(initial.clone());
        controller.add_row();
        let emitted = recorder.last().expect("add should emit");

        let outcome = controller.receive(&document_from_value(initial));
        assert_eq!(outcome, SyncOutcome::Adopted);
        assert_eq!(controller.state(), SyncState::InSync);
        assert_eq!(controller.rows().len(), 1);

        let outcome = controller.receive(&emitted.document);
        assert_eq!(outcome, SyncOutcome::Adopted, "owner document is no longer an echo");
        assert_eq!(controller.rows().len(), 2);
    }

    #[test]
    fn repeated_document_matches_newest_emission() {
        let (mut controller, recorder) =
            controller(json!({ "rows": [{ "id": "r1" }], "sidebarEnabled": false }));
        controller.set_ancillary("sidebarEnabled", json!(true));
        controller.set_ancillary("sidebarEnabled", json!(false));
        controller.set_ancillary("sidebarEnabled", json!(true));
        let emissions = recorder.snapshot();
        assert_eq!(emissions.len(), 3);
        assert_eq!(emissions[0].document, emissions[2].document);

        let outcome = controller.receive(&emissions[2].document);
        assert_eq!(outcome, SyncOutcome::EchoConsumed(emissions[2].token));
        assert_eq!(controller.state(), SyncState::InSync);
    }

    #[test]
    fn reset_discards_pending_echo() {
        let (mut controller, _recorder) = controller(json!({ "rows": [{ "id": "r1" }] }));
        controller.add_row();
        controller.reset(document_from_value(json!({ "rows": [{ "id": "x" }] })));
        assert_eq!(controller.state(), SyncState::InSync);
        assert_eq!(controller.rows().as_slice()[0].id, "x");
    }

    #[test]
    fn row_views_expose_editor_flags() {
        let (mut controller, _recorder) = controller(json!({ "rows": [{ "id": "r1" }] }));
        let single: Vec<_> = controller.row_views().collect();
        assert!(!single[0].can_remove);
        assert!(!single[0].can_move_up && !single[0].can_move_down);

        controller.add_row();
        let views: Vec<_> = controller.row_views().collect();
        assert!(views.iter().all(|view| view.can_remove));
        assert!(views[0].can_move_down && !views[0].can_move_up);
        assert!(views[1].can_move_up && !views[1].can_move_down);
    }
}
