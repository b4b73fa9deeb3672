//! Document keys and fixed defaults shared by the parser and serializer.
//!
//! # Design
//! - Centralise key names so the parser and serializer cannot drift apart.
//! - Keep deprecated keys explicit; they are accepted on input and never emitted.

/// Key holding the current-schema row sequence.
pub const ROWS_KEY: &str = "rows";

/// Deprecated top-level keys from the flat single-row schema.
pub const DEPRECATED_KEYS: [&str; 5] = ["categoryId", "productIds", "sort", "limit", "displayStyle"];

/// Keys a serialized row may carry. Anything else is dropped on output.
pub const ROW_FIELDS: [&str; 11] = [
    "id",
    "selectorId",
    "title",
    "strategy",
    "itemIds",
    "limit",
    "columns",
    "displayStyle",
    "showDisplayTitle",
    "showSelectorLabel",
    "showStrategyLabel",
];

/// Inclusive bounds for grid columns.
pub const COLUMNS_RANGE: (i64, i64) = (1, 6);

/// Prefix used by the built-in id generators.
pub const ROW_ID_PREFIX: &str = "row";

/// Length of the random suffix appended to timestamp ids.
pub(crate) const ROW_ID_SUFFIX_LEN: usize = 6;
