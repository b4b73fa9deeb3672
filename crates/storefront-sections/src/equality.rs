//! Structural comparison of row collections.
//!
//! This gates every state replacement in the sync controller: a re-supplied document that
//! parses to the same rows must not replace local state.

use crate::model::{Row, RowCollection};

/// Whether `a` and `b` hold the same rows in the same order.
#[must_use]
pub fn rows_equal(a: &RowCollection, b: &RowCollection) -> bool {
    if RowCollection::ptr_eq(a, b) {
        return true;
    }
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).all(|(left, right)| row_equal(left, right))
}

/// Field-by-field row comparison.
#[must_use]
pub fn row_equal(a: &Row, b: &Row) -> bool {
    a.id == b.id
        && a.selector_id == b.selector_id
        && a.title == b.title
        && a.strategy == b.strategy
        && a.limit == b.limit
        && a.columns == b.columns
        && a.display_style == b.display_style
        && a.show_display_title == b.show_display_title
        && a.show_selector_label == b.show_selector_label
        && a.show_strategy_label == b.show_strategy_label
        && item_ids_equal(&a.item_ids, &b.item_ids)
}

fn item_ids_equal(a: &[String], b: &[String]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(left, right)| left == right)
}
