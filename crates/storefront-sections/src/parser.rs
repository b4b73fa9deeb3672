//! Document parser: current `rows` schema and the legacy flat schema.
//!
//! # Design
//! - Resolve the schema once into [`DocumentShape`]; nothing downstream looks at flat keys.
//! - Never fail. Every field falls back to its profile default and the fallback is reported as a warning.
//! - Row ids are made unique across the collection without touching ids that already are.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::defaults::ROWS_KEY;
use crate::ids::RowIdGenerator;
use crate::model::{ConfigurationDocument, DisplayStyle, Row, RowCollection, Strategy, create_default_row};
use crate::profile::SectionProfile;
use crate::validate::{coerce_bool, coerce_item_ids, optional_text};

/// Raw field lookups for one row, shared by both schemas.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowFields<'a> {
    id: Option<&'a Value>,
    selector_id: Option<&'a Value>,
    title: Option<&'a Value>,
    strategy: Option<&'a Value>,
    item_ids: Option<&'a Value>,
    limit: Option<&'a Value>,
    columns: Option<&'a Value>,
    display_style: Option<&'a Value>,
    show_display_title: Option<&'a Value>,
    show_selector_label: Option<&'a Value>,
    show_strategy_label: Option<&'a Value>,
}

impl<'a> RowFields<'a> {
    fn from_row_object(map: &'a Map<String, Value>) -> Self {
        Self {
            id: map.get("id"),
            selector_id: map.get("selectorId"),
            title: map.get("title"),
            strategy: map.get("strategy"),
            item_ids: map.get("itemIds"),
            limit: map.get("limit"),
            columns: map.get("columns"),
            display_style: map.get("displayStyle"),
            show_display_title: map.get("showDisplayTitle"),
            show_selector_label: map.get("showSelectorLabel"),
            show_strategy_label: map.get("showStrategyLabel"),
        }
    }

    fn from_legacy(doc: &'a ConfigurationDocument, profile: &SectionProfile) -> Self {
        let first = move |keys: &[&str]| {
            keys.iter()
                .find_map(|key| doc.get(*key).filter(|value| !value.is_null()))
        };
        Self {
            selector_id: first(&["categoryId", "selectorId"]),
            strategy: first(&["sort", "strategy"]),
            item_ids: first(&["productIds", "itemIds", profile.legacy_item_key]),
            limit: doc.get("limit"),
            display_style: doc.get("displayStyle"),
            ..Self::default()
        }
    }
}

/// A document resolved to exactly one schema.
#[derive(Debug, Clone, Copy)]
pub enum DocumentShape<'a> {
    /// Multi-row schema: a non-empty `rows` sequence.
    Current(&'a [Value]),
    /// Flat single-row schema written before `rows` existed.
    Legacy(RowFields<'a>),
}

impl<'a> DocumentShape<'a> {
    /// Classify `doc`. Anything other than a non-empty `rows` array is read as legacy.
    #[must_use]
    pub fn classify(doc: &'a ConfigurationDocument, profile: &SectionProfile) -> Self {
        match doc.get(ROWS_KEY).and_then(Value::as_array) {
            Some(rows) if !rows.is_empty() => Self::Current(rows.as_slice()),
            _ => Self::Legacy(RowFields::from_legacy(doc, profile)),
        }
    }

    /// Schema discriminator without the borrowed payload.
    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Current(_) => ShapeKind::Current,
            Self::Legacy(_) => ShapeKind::Legacy,
        }
    }
}

/// Which schema a document was read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// `rows` sequence.
    Current,
    /// Flat fields, migrated to a single row.
    Legacy,
}

/// Parsed rows plus the fallbacks applied while reading them.
#[derive(Debug, Clone)]
pub struct ParseReport {
    /// Normalised collection.
    pub rows: RowCollection,
    /// Schema the document was read as.
    pub shape: ShapeKind,
    /// One entry per fallback or clamp applied.
    pub warnings: Vec<String>,
}

/// Parse `doc` into a never-empty row collection.
pub fn parse_rows(
    doc: &ConfigurationDocument,
    profile: &SectionProfile,
    ids: &mut dyn RowIdGenerator,
) -> RowCollection {
    parse_document(doc, profile, ids).rows
}

/// Parse `doc` and report every fallback applied.
pub fn parse_document(
    doc: &ConfigurationDocument,
    profile: &SectionProfile,
    ids: &mut dyn RowIdGenerator,
) -> ParseReport {
    let shape = DocumentShape::classify(doc, profile);
    let mut warnings = Vec::new();
    if doc.get(ROWS_KEY).is_some_and(|rows| !rows.is_array() && !rows.is_null()) {
        warnings.push("rows is not a list; reading legacy fields instead".to_string());
    }

    let rows = match shape {
        DocumentShape::Current(elements) => parse_current(elements, profile, ids, &mut warnings),
        DocumentShape::Legacy(fields) => {
            let id = ids.next_id();
            let row = row_from_fields(id, &fields, profile, &mut warnings);
            info!(section = %profile.kind, "migrated legacy flat section document to 1 row");
            RowCollection::single(row)
        }
    };

    for warning in &warnings {
        debug!(section = %profile.kind, "{warning}");
    }

    ParseReport {
        rows,
        shape: shape.kind(),
        warnings,
    }
}

fn parse_current(
    elements: &[Value],
    profile: &SectionProfile,
    ids: &mut dyn RowIdGenerator,
    warnings: &mut Vec<String>,
) -> RowCollection {
    let mut seen = HashSet::with_capacity(elements.len());
    let mut rows = Vec::with_capacity(elements.len());

    for (index, element) in elements.iter().enumerate() {
        let fields = if let Some(map) = element.as_object() {
            RowFields::from_row_object(map)
        } else {
            warnings.push(format!("rows[{index}] is not an object; using defaults"));
            RowFields::default()
        };

        let given = optional_text(fields.id);
        let generated = given.is_none();
        let mut id = given.unwrap_or_else(|| ids.next_id());
        if index > 0 && (generated || seen.contains(&id)) {
            id = format!("{id}-{index}");
        }
        while seen.contains(&id) {
            id = format!("{id}-{index}");
        }
        seen.insert(id.clone());

        let mut row_warnings = Vec::new();
        rows.push(row_from_fields(id, &fields, profile, &mut row_warnings));
        warnings.extend(
            row_warnings
                .into_iter()
                .map(|warning| format!("rows[{index}]: {warning}")),
        );
    }

    RowCollection::from_rows(rows, || create_default_row(profile, ids))
}

fn row_from_fields(
    id: String,
    fields: &RowFields<'_>,
    profile: &SectionProfile,
    warnings: &mut Vec<String>,
) -> Row {
    Row {
        id,
        selector_id: optional_text(fields.selector_id),
        title: optional_text(fields.title),
        strategy: strategy_field(fields.strategy, profile, warnings),
        item_ids: coerce_item_ids(fields.item_ids, warnings),
        limit: profile.limit.coerce(fields.limit, "limit", warnings),
        columns: profile.columns.coerce(fields.columns, "columns", warnings),
        display_style: display_style_field(fields.display_style, profile, warnings),
        show_display_title: coerce_bool(fields.show_display_title, true),
        show_selector_label: coerce_bool(fields.show_selector_label, true),
        show_strategy_label: coerce_bool(fields.show_strategy_label, true),
    }
}

fn strategy_field(
    raw: Option<&Value>,
    profile: &SectionProfile,
    warnings: &mut Vec<String>,
) -> Strategy {
    let fallback = profile.default_strategy;
    let Some(value) = raw.filter(|value| !value.is_null()) else {
        return fallback;
    };
    match value.as_str().and_then(Strategy::from_alias) {
        Some(strategy) if profile.allows(strategy) => strategy,
        Some(strategy) => {
            warnings.push(format!(
                "strategy '{}' is not offered by {}; using '{}'",
                strategy.as_str(),
                profile.kind,
                fallback.as_str()
            ));
            fallback
        }
        None => {
            warnings.push(format!(
                "unknown strategy {value}; using '{}'",
                fallback.as_str()
            ));
            fallback
        }
    }
}

fn display_style_field(
    raw: Option<&Value>,
    profile: &SectionProfile,
    warnings: &mut Vec<String>,
) -> DisplayStyle {
    let fallback = profile.default_display_style;
    let Some(value) = raw.filter(|value| !value.is_null()) else {
        return fallback;
    };
    value
        .as_str()
        .and_then(DisplayStyle::from_alias)
        .unwrap_or_else(|| {
            warnings.push(format!(
                "unknown displayStyle {value}; using '{}'",
                fallback.as_str()
            ));
            fallback
        })
}
