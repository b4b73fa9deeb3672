//! Row identifier generators.
//!
//! Ids only need to be unique within one collection and stable across edits;
//! the parser enforces collection-wide uniqueness on top of whatever a generator returns.

use chrono::Utc;
use rand::Rng;
use rand::distr::Alphanumeric;
use uuid::Uuid;

use crate::defaults::{ROW_ID_PREFIX, ROW_ID_SUFFIX_LEN};

/// Source of fresh row identifiers.
pub trait RowIdGenerator {
    /// Produce the next identifier.
    fn next_id(&mut self) -> String;
}

impl<G: RowIdGenerator + ?Sized> RowIdGenerator for Box<G> {
    fn next_id(&mut self) -> String {
        (**self).next_id()
    }
}

/// `row-<unix millis>-<random suffix>`, the shape persisted documents already carry.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimestampIds;

impl RowIdGenerator for TimestampIds {
    fn next_id(&mut self) -> String {
        let suffix: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(ROW_ID_SUFFIX_LEN)
            .map(|byte| char::from(byte).to_ascii_lowercase())
            .collect();
        format!(
            "{ROW_ID_PREFIX}-{}-{suffix}",
            Utc::now().timestamp_millis()
        )
    }
}

/// `row-<uuid v4>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl RowIdGenerator for UuidIds {
    fn next_id(&mut self) -> String {
        format!("{ROW_ID_PREFIX}-{}", Uuid::new_v4())
    }
}

/// Deterministic `<prefix>-<n>` counter, starting at 1.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    /// Counter producing `<prefix>-1`, `<prefix>-2`, ...
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new(ROW_ID_PREFIX)
    }
}

impl RowIdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
