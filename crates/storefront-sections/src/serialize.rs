//! Sanitizing serializer: rows back into the persisted document shape.
//!
//! # Design
//! - Unrelated top-level keys survive untouched; deprecated flat keys never do.
//! - Rows are projected field by field so stray keys from hand-edited JSON cannot leak back out.

use serde_json::{Map, Value};

use crate::defaults::{DEPRECATED_KEYS, ROWS_KEY};
use crate::model::{ConfigurationDocument, Row, RowCollection};

/// Produce the outbound document for `rows` on top of `base`.
///
/// `overrides` (ancillary flags such as `sidebarEnabled`) are merged verbatim last.
#[must_use]
pub fn serialize(
    base: &ConfigurationDocument,
    rows: &RowCollection,
    overrides: Option<&Map<String, Value>>,
) -> ConfigurationDocument {
    serialize_with(base, rows, overrides, &[])
}

/// As [`serialize`], additionally stripping `extra_deprecated` top-level keys
/// (profile-specific legacy item keys such as `postIds`).
#[must_use]
pub fn serialize_with(
    base: &ConfigurationDocument,
    rows: &RowCollection,
    overrides: Option<&Map<String, Value>>,
    extra_deprecated: &[&str],
) -> ConfigurationDocument {
    let mut document = base.clone();
    for key in DEPRECATED_KEYS.iter().chain(extra_deprecated) {
        document.remove(*key);
    }
    document.insert(
        ROWS_KEY.to_string(),
        Value::Array(rows.iter().map(project_row).collect()),
    );
    if let Some(overrides) = overrides {
        for (key, value) in overrides {
            document.insert(key.clone(), value.clone());
        }
    }
    document
}

/// Current-schema fields of one row. Absent optional text is omitted.
#[must_use]
pub fn project_row(row: &Row) -> Value {
    let mut map = Map::new();
    map.insert("id".to_string(), Value::from(row.id.as_str()));
    if let Some(selector_id) = &row.selector_id {
        map.insert("selectorId".to_string(), Value::from(selector_id.as_str()));
    }
    if let Some(title) = &row.title {
        map.insert("title".to_string(), Value::from(title.as_str()));
    }
    map.insert("strategy".to_string(), Value::from(row.strategy.as_str()));
    map.insert(
        "itemIds".to_string(),
        Value::Array(row.item_ids.iter().map(|id| Value::from(id.as_str())).collect()),
    );
    map.insert("limit".to_string(), Value::from(row.limit));
    map.insert("columns".to_string(), Value::from(row.columns));
    map.insert(
        "displayStyle".to_string(),
        Value::from(row.display_style.as_str()),
    );
    map.insert(
        "showDisplayTitle".to_string(),
        Value::Bool(row.show_display_title),
    );
    map.insert(
        "showSelectorLabel".to_string(),
        Value::Bool(row.show_selector_label),
    );
    map.insert(
        "showStrategyLabel".to_string(),
        Value::Bool(row.show_strategy_label),
    );
    Value::Object(map)
}
