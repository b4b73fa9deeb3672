//! Typed row model for multi-row section documents.
//!
//! # Design
//! - `Row` is the canonical, fully defaulted shape; loosely typed input never reaches it unvalidated.
//! - `RowCollection` is an immutable, shared snapshot that is never empty.
//! - Mutations produce new collections so reference identity doubles as a cheap "unchanged" signal.

use std::rc::Rc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{SectionError, SectionResult};
use crate::ids::RowIdGenerator;
use crate::profile::SectionProfile;
use crate::validate::{
    coerce_bool, coerce_item_ids, ensure_number, normalize_item_ids, normalize_text, optional_text,
};

/// Externally owned, semi-structured configuration record for one section block.
pub type ConfigurationDocument = Map<String, Value>;

/// Interpret an arbitrary JSON value as a document; non-objects become empty documents.
#[must_use]
pub fn document_from_value(value: Value) -> ConfigurationDocument {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Selection policy for a row's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Most recently published items.
    Latest,
    /// Items flagged as featured.
    Featured,
    /// Items ranked by sales.
    Bestsellers,
    /// Explicitly chosen `item_ids`.
    Custom,
}

impl Strategy {
    /// Every strategy, in display order.
    pub const ALL: [Self; 4] = [Self::Latest, Self::Featured, Self::Bestsellers, Self::Custom];

    /// Render the strategy as its canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Latest => "latest",
            Self::Featured => "featured",
            Self::Bestsellers => "bestsellers",
            Self::Custom => "custom",
        }
    }

    /// Resolve canonical names and the aliases older documents used.
    #[must_use]
    pub fn from_alias(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "latest" | "newest" | "recent" => Some(Self::Latest),
            "featured" => Some(Self::Featured),
            "bestsellers" | "best_sellers" | "best-sellers" | "bestseller" | "popular" => {
                Some(Self::Bestsellers)
            }
            "custom" | "manual" | "selected" => Some(Self::Custom),
            _ => None,
        }
    }
}

/// Presentation of a row's items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStyle {
    /// Static grid.
    Grid,
    /// Horizontally scrolling carousel.
    Carousel,
}

impl DisplayStyle {
    /// Render the style as its canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::Carousel => "carousel",
        }
    }

    /// Resolve canonical names and the `slider` alias.
    #[must_use]
    pub fn from_alias(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "grid" => Some(Self::Grid),
            "carousel" | "slider" => Some(Self::Carousel),
            _ => None,
        }
    }
}

/// One configurable block within a multi-row section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    /// Identifier, unique within its collection and stable across edits.
    pub id: String,
    /// Referenced category (or other selector entity).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector_id: Option<String>,
    /// Display title override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Content selection policy.
    pub strategy: Strategy,
    /// Explicit selection; only consulted under [`Strategy::Custom`].
    pub item_ids: Vec<String>,
    /// Maximum number of items shown.
    pub limit: u32,
    /// Grid column count.
    pub columns: u32,
    /// Grid or carousel presentation.
    pub display_style: DisplayStyle,
    /// Whether the row title is rendered.
    pub show_display_title: bool,
    /// Whether the selector (category) label is rendered.
    pub show_selector_label: bool,
    /// Whether the strategy label is rendered.
    pub show_strategy_label: bool,
}

/// Produce a fresh row with a new id and the profile's defaults.
pub fn create_default_row(profile: &SectionProfile, ids: &mut dyn RowIdGenerator) -> Row {
    Row {
        id: ids.next_id(),
        selector_id: None,
        title: None,
        strategy: profile.default_strategy,
        item_ids: Vec::new(),
        limit: profile.limit.default,
        columns: profile.columns.default,
        display_style: profile.default_display_style,
        show_display_title: true,
        show_selector_label: true,
        show_strategy_label: true,
    }
}

impl Row {
    /// Merge `patch` into a copy of this row, re-clamping numeric fields against `profile`.
    ///
    /// Text and item ids are normalised the way the parser reads them, so the result survives a
    /// serialize/parse round trip. A strategy the profile does not allow is ignored. The id never
    /// changes.
    #[must_use]
    pub fn apply_patch(&self, patch: &RowPatch, profile: &SectionProfile) -> Self {
        let mut next = self.clone();
        if let Some(selector_id) = &patch.selector_id {
            next.selector_id = selector_id.as_deref().and_then(normalize_text);
        }
        if let Some(title) = &patch.title {
            next.title = title.as_deref().and_then(normalize_text);
        }
        if let Some(strategy) = patch.strategy.filter(|s| profile.allows(*s)) {
            next.strategy = strategy;
        }
        if let Some(item_ids) = &patch.item_ids {
            next.item_ids = normalize_item_ids(item_ids);
        }
        if let Some(limit) = patch.limit {
            next.limit = profile.limit.clamp(limit, self.limit);
        }
        if let Some(columns) = patch.columns {
            next.columns = profile.columns.clamp(columns, self.columns);
        }
        if let Some(display_style) = patch.display_style {
            next.display_style = display_style;
        }
        if let Some(flag) = patch.show_display_title {
            next.show_display_title = flag;
        }
        if let Some(flag) = patch.show_selector_label {
            next.show_selector_label = flag;
        }
        if let Some(flag) = patch.show_strategy_label {
            next.show_strategy_label = flag;
        }
        next
    }
}

/// Partial row fields supplied by a row editor.
///
/// `None` leaves a field untouched. For the optional text fields, `Some(None)` clears them.
/// Numeric fields are raw editor input; non-finite values keep the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowPatch {
    /// Selector reference update.
    pub selector_id: Option<Option<String>>,
    /// Title override update.
    pub title: Option<Option<String>>,
    /// Strategy update.
    pub strategy: Option<Strategy>,
    /// Replacement explicit selection.
    pub item_ids: Option<Vec<String>>,
    /// Raw limit input.
    pub limit: Option<f64>,
    /// Raw column count input.
    pub columns: Option<f64>,
    /// Display style update.
    pub display_style: Option<DisplayStyle>,
    /// Title visibility update.
    pub show_display_title: Option<bool>,
    /// Selector label visibility update.
    pub show_selector_label: Option<bool>,
    /// Strategy label visibility update.
    pub show_strategy_label: Option<bool>,
}

impl RowPatch {
    /// Decode a patch from a JSON object using the document field names.
    ///
    /// Values are coerced as tolerantly as documents are; only the envelope is strict.
    ///
    /// # Errors
    ///
    /// Returns [`SectionError::InvalidPatch`] when `value` is not an object,
    /// [`SectionError::UnknownField`] for keys that are not row fields (including `id`),
    /// and [`SectionError::InvalidField`] for enum values that cannot be resolved.
    pub fn from_value(value: &Value) -> SectionResult<Self> {
        let Some(map) = value.as_object() else {
            return Err(SectionError::InvalidPatch);
        };
        let mut patch = Self::default();
        for (key, raw) in map {
            match key.as_str() {
                "selectorId" => patch.selector_id = Some(optional_text(Some(raw))),
                "title" => patch.title = Some(optional_text(Some(raw))),
                "strategy" => {
                    let strategy = raw
                        .as_str()
                        .and_then(Strategy::from_alias)
                        .ok_or_else(|| {
                            SectionError::invalid_field("row_patch", key, "unknown strategy")
                        })?;
                    patch.strategy = Some(strategy);
                }
                "itemIds" => {
                    let mut ignored = Vec::new();
                    patch.item_ids = Some(coerce_item_ids(Some(raw), &mut ignored));
                }
                "limit" => patch.limit = Some(ensure_number(Some(raw), f64::NAN)),
                "columns" => patch.columns = Some(ensure_number(Some(raw), f64::NAN)),
                "displayStyle" => {
                    let style = raw
                        .as_str()
                        .and_then(DisplayStyle::from_alias)
                        .ok_or_else(|| {
                            SectionError::invalid_field("row_patch", key, "unknown display style")
                        })?;
                    patch.display_style = Some(style);
                }
                "showDisplayTitle" => {
                    patch.show_display_title = Some(required_bool(raw, key)?);
                }
                "showSelectorLabel" => {
                    patch.show_selector_label = Some(required_bool(raw, key)?);
                }
                "showStrategyLabel" => {
                    patch.show_strategy_label = Some(required_bool(raw, key)?);
                }
                other => {
                    return Err(SectionError::UnknownField {
                        section: "row_patch".to_string(),
                        field: other.to_string(),
                    });
                }
            }
        }
        Ok(patch)
    }
}

fn required_bool(raw: &Value, field: &str) -> SectionResult<bool> {
    if raw.is_boolean() || raw.is_string() || raw.is_number() {
        Ok(coerce_bool(Some(raw), false))
    } else {
        Err(SectionError::invalid_field(
            "row_patch",
            field,
            "must be a boolean",
        ))
    }
}

/// Ordered, never-empty snapshot of rows.
#[derive(Debug, Clone)]
pub struct RowCollection {
    rows: Rc<[Row]>,
}

impl RowCollection {
    /// Wrap `rows`, substituting `fallback()` when the list is empty.
    pub fn from_rows(mut rows: Vec<Row>, fallback: impl FnOnce() -> Row) -> Self {
        if rows.is_empty() {
            rows.push(fallback());
        }
        Self { rows: rows.into() }
    }

    /// Wrap rows rebuilt from an existing snapshot of the same length.
    pub(crate) fn derived(rows: Vec<Row>) -> Self {
        debug_assert!(!rows.is_empty(), "derived collections keep their length");
        Self { rows: rows.into() }
    }

    /// Collection holding exactly `row`.
    #[must_use]
    pub fn single(row: Row) -> Self {
        Self {
            rows: Rc::from(vec![row]),
        }
    }

    /// Number of rows; always at least one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in display order.
    #[must_use]
    pub fn as_slice(&self) -> &[Row] {
        &self.rows
    }

    /// Iterate rows in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Row with the given id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Row> {
        self.rows.iter().find(|row| row.id == id)
    }

    /// Index of the row with the given id.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id)
    }

    /// Whether both handles share the same snapshot.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.rows, &b.rows)
    }

    /// Copy the rows out for building the next snapshot.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Row> {
        self.rows.to_vec()
    }
}

impl<'a> IntoIterator for &'a RowCollection {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::profile::SectionKind;
    use serde_json::json;

    fn products() -> SectionProfile {
        SectionProfile::for_kind(SectionKind::ProductsByCategory)
    }

    #[test]
    fn default_row_uses_profile_defaults() {
        let mut ids = SequentialIds::default();
        let row = create_default_row(&products(), &mut ids);
        assert_eq!(row.id, "row-1");
        assert_eq!(row.strategy, Strategy::Latest);
        assert!(row.item_ids.is_empty());
        assert_eq!(row.limit, 8);
        assert_eq!(row.columns, 4);
        assert_eq!(row.display_style, DisplayStyle::Grid);
        assert!(row.show_display_title && row.show_selector_label && row.show_strategy_label);
    }

    #[test]
    fn patch_clamps_and_keeps_previous_on_nan() {
        let profile = products();
        let row = create_default_row(&profile, &mut SequentialIds::default());
        let patched = row.apply_patch(
            &RowPatch {
                columns: Some(99.0),
                limit: Some(f64::NAN),
                title: Some(Some("Shelf".to_string())),
                ..RowPatch::default()
            },
            &profile,
        );
        assert_eq!(patched.columns, 6);
        assert_eq!(patched.limit, row.limit);
        assert_eq!(patched.title.as_deref(), Some("Shelf"));
        assert_eq!(patched.id, row.id);
    }

    #[test]
    fn patch_text_and_item_ids_are_normalised() {
        let profile = products();
        let row = create_default_row(&profile, &mut SequentialIds::default());
        let patched = row.apply_patch(
            &RowPatch {
                selector_id: Some(Some("   ".to_string())),
                title: Some(Some(" Shelf ".to_string())),
                item_ids: Some(vec![" p1".to_string(), String::new(), "p2 ".to_string()]),
                ..RowPatch::default()
            },
            &profile,
        );
        assert_eq!(patched.selector_id, None);
        assert_eq!(patched.title.as_deref(), Some("Shelf"));
        assert_eq!(patched.item_ids, vec!["p1", "p2"]);
    }

    #[test]
    fn patch_from_value_decodes_document_names() {
        let patch = RowPatch::from_value(&json!({
            "selectorId": "cat-9",
            "title": "",
            "strategy": "Manual",
            "itemIds": ["p1", 2],
            "limit": "5",
            "displayStyle": "slider",
            "showSelectorLabel": false
        }))
        .expect("patch should decode");
        assert_eq!(patch.selector_id, Some(Some("cat-9".to_string())));
        assert_eq!(patch.title, Some(None));
        assert_eq!(patch.strategy, Some(Strategy::Custom));
        assert_eq!(patch.item_ids, Some(vec!["p1".to_string(), "2".to_string()]));
        assert_eq!(patch.limit, Some(5.0));
        assert_eq!(patch.display_style, Some(DisplayStyle::Carousel));
        assert_eq!(patch.show_selector_label, Some(false));
    }

    #[test]
    fn patch_from_value_rejects_bad_envelopes() {
        assert_eq!(
            RowPatch::from_value(&json!([1, 2])),
            Err(SectionError::InvalidPatch)
        );
        assert!(matches!(
            RowPatch::from_value(&json!({ "id": "other" })),
            Err(SectionError::UnknownField { .. })
        ));
        assert!(matches!(
            RowPatch::from_value(&json!({ "strategy": "random" })),
            Err(SectionError::InvalidField { .. })
        ));
    }

    #[test]
    fn collection_is_never_empty() {
        let collection = RowCollection::from_rows(Vec::new(), || {
            create_default_row(&products(), &mut SequentialIds::new("fallback"))
        });
        assert_eq!(collection.len(), 1);
        assert!(!collection.is_empty());
        assert_eq!(collection.as_slice()[0].id, "fallback-1");
    }

    #[test]
    fn document_from_value_tolerates_non_objects() {
        assert!(document_from_value(json!([1, 2, 3])).is_empty());
        assert_eq!(document_from_value(json!({ "a": 1 })).len(), 1);
    }
}
