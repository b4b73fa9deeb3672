//! Pure row commands. Each returns the next collection; a no-op returns the input snapshot.

use tracing::trace;

use crate::ids::RowIdGenerator;
use crate::model::{Row, RowCollection, RowPatch, create_default_row};
use crate::profile::SectionProfile;

/// Direction for [`move_row`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    /// Towards index 0.
    Up,
    /// Towards the end.
    Down,
}

/// Append a fresh default row.
pub fn add_row(
    rows: &RowCollection,
    profile: &SectionProfile,
    ids: &mut dyn RowIdGenerator,
) -> RowCollection {
    let mut next = rows.to_vec();
    let row = fresh_row(&next, profile, ids);
    next.push(row);
    RowCollection::derived(next)
}

/// Remove the row with `id`; removing the last row leaves one fresh default row.
pub fn remove_row(
    rows: &RowCollection,
    id: &str,
    profile: &SectionProfile,
    ids: &mut dyn RowIdGenerator,
) -> RowCollection {
    if rows.position(id).is_none() {
        trace!(row_id = id, "remove ignored; unknown row");
        return rows.clone();
    }
    let remaining: Vec<Row> = rows.iter().filter(|row| row.id != id).cloned().collect();
    if remaining.is_empty() {
        return RowCollection::single(fresh_row(&[], profile, ids));
    }
    RowCollection::derived(remaining)
}

/// Default row whose id is not already taken in `existing`.
///
/// Collisions get `-<index>` appended, `index` being the slot the row will occupy.
fn fresh_row(existing: &[Row], profile: &SectionProfile, ids: &mut dyn RowIdGenerator) -> Row {
    let mut row = create_default_row(profile, ids);
    let index = existing.len();
    while existing.iter().any(|taken| taken.id == row.id) {
        trace!(row_id = %row.id, "generated id already in use");
        row.id = format!("{}-{index}", row.id);
    }
    row
}

/// Merge `patch` into the row with `id`.
#[must_use]
pub fn update_row(
    rows: &RowCollection,
    id: &str,
    patch: &RowPatch,
    profile: &SectionProfile,
) -> RowCollection {
    let Some(index) = rows.position(id) else {
        trace!(row_id = id, "update ignored; unknown row");
        return rows.clone();
    };
    let mut next = rows.to_vec();
    next[index] = next[index].apply_patch(patch, profile);
    RowCollection::derived(next)
}

/// Swap the row with `id` with its neighbour in `direction`.
#[must_use]
pub fn move_row(rows: &RowCollection, id: &str, direction: MoveDirection) -> RowCollection {
    let Some(index) = rows.position(id) else {
        trace!(row_id = id, "move ignored; unknown row");
        return rows.clone();
    };
    let target = match direction {
        MoveDirection::Up => index.checked_sub(1),
        MoveDirection::Down => Some(index + 1).filter(|target| *target < rows.len()),
    };
    let Some(target) = target else {
        trace!(row_id = id, ?direction, "move ignored; already at the edge");
        return rows.clone();
    };
    let mut next = rows.to_vec();
    next.swap(index, target);
    RowCollection::derived(next)
}
