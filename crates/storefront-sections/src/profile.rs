//! Per-editor section profiles: schema-specific defaults and clamps.
//!
//! # Design
//! - Each multi-row editor (products, news, ...) shares the engine and differs only in its profile.
//! - Documents are tolerated, but profile overrides are operator input and validated strictly.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::defaults::COLUMNS_RANGE;
use crate::error::{SectionError, SectionResult};
use crate::model::{DisplayStyle, Strategy};
use crate::validate::{clamp_int, coerce_int};

const SECTION: &str = "section_profile";

/// Editors that embed the synchronization engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// Product shelves driven by a category.
    ProductsByCategory,
    /// News/blog post lists driven by a category.
    NewsByCategory,
}

impl SectionKind {
    /// Render the kind as its canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProductsByCategory => "products-by-category",
            Self::NewsByCategory => "news-by-category",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKind {
    type Err = SectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "products-by-category" | "products" => Ok(Self::ProductsByCategory),
            "news-by-category" | "news" => Ok(Self::NewsByCategory),
            _ => Err(SectionError::UnknownSectionKind {
                value: s.to_string(),
            }),
        }
    }
}

/// Inclusive numeric bounds with a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Smallest accepted value.
    pub min: u32,
    /// Largest accepted value.
    pub max: u32,
    /// Value used when input is missing or unusable.
    pub default: u32,
}

impl Bounds {
    /// Clamp raw editor input; non-finite input keeps `previous`.
    #[must_use]
    pub fn clamp(&self, raw: f64, previous: u32) -> u32 {
        let clamped = clamp_int(
            raw,
            i64::from(self.min),
            i64::from(self.max),
            i64::from(previous),
        );
        u32::try_from(clamped).unwrap_or(self.default)
    }

    pub(crate) fn coerce(&self, raw: Option<&Value>, field: &str, warnings: &mut Vec<String>) -> u32 {
        let clamped = coerce_int(
            raw,
            field,
            (i64::from(self.min), i64::from(self.max)),
            i64::from(self.default),
            warnings,
        );
        u32::try_from(clamped).unwrap_or(self.default)
    }

    fn validate(self, field: &'static str) -> SectionResult<Self> {
        if self.min == 0 || self.min > self.max || !(self.min..=self.max).contains(&self.default) {
            return Err(SectionError::InvalidRange {
                field,
                min: i64::from(self.min),
                max: i64::from(self.max),
                default: i64::from(self.default),
            });
        }
        Ok(self)
    }
}

/// Schema-specific defaults and clamps for one editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionProfile {
    /// Editor this profile belongs to.
    pub kind: SectionKind,
    /// Strategy for fresh rows and the fallback for unusable input.
    pub default_strategy: Strategy,
    /// Strategies this editor offers.
    pub strategies: Vec<Strategy>,
    /// Item count bounds.
    pub limit: Bounds,
    /// Grid column bounds.
    pub columns: Bounds,
    /// Presentation for fresh rows.
    pub default_display_style: DisplayStyle,
    /// Flat-schema key that held explicit item ids before `itemIds`.
    pub legacy_item_key: &'static str,
}

impl SectionProfile {
    /// Built-in profile for `kind`.
    #[must_use]
    pub fn for_kind(kind: SectionKind) -> Self {
        match kind {
            SectionKind::ProductsByCategory => Self {
                kind,
                default_strategy: Strategy::Latest,
                strategies: Strategy::ALL.to_vec(),
                limit: Bounds {
                    min: 1,
                    max: 48,
                    default: 8,
                },
                columns: Bounds {
                    min: 1,
                    max: 6,
                    default: 4,
                },
                default_display_style: DisplayStyle::Grid,
                legacy_item_key: "productIds",
            },
            SectionKind::NewsByCategory => Self {
                kind,
                default_strategy: Strategy::Latest,
                strategies: vec![Strategy::Latest, Strategy::Featured, Strategy::Custom],
                limit: Bounds {
                    min: 1,
                    max: 24,
                    default: 3,
                },
                columns: Bounds {
                    min: 1,
                    max: 6,
                    default: 3,
                },
                default_display_style: DisplayStyle::Grid,
                legacy_item_key: "postIds",
            },
        }
    }

    /// Whether the editor offers `strategy`.
    #[must_use]
    pub fn allows(&self, strategy: Strategy) -> bool {
        self.strategies.contains(&strategy)
    }

    /// Apply an operator-supplied override object on top of this profile.
    ///
    /// # Errors
    ///
    /// Returns `SectionError` when the overrides are not an object, contain unknown
    /// fields, carry values of the wrong type, or produce an invalid range.
    pub fn with_overrides(&self, overrides: &Value) -> SectionResult<Self> {
        let Some(map) = overrides.as_object() else {
            return Err(SectionError::invalid_field(
                SECTION,
                "<root>",
                "overrides must be a JSON object",
            ));
        };

        let mut next = self.clone();
        for (key, value) in map {
            match key.as_str() {
                "defaultLimit" => next.limit.default = required_u32(value, key)?,
                "minLimit" => next.limit.min = required_u32(value, key)?,
                "maxLimit" => next.limit.max = required_u32(value, key)?,
                "defaultColumns" => next.columns.default = required_u32(value, key)?,
                "minColumns" => next.columns.min = required_u32(value, key)?,
                "maxColumns" => next.columns.max = required_u32(value, key)?,
                "defaultDisplayStyle" => {
                    next.default_display_style = value
                        .as_str()
                        .and_then(DisplayStyle::from_alias)
                        .ok_or_else(|| {
                            SectionError::invalid_field(SECTION, key, "must be 'grid' or 'carousel'")
                        })?;
                }
                "defaultStrategy" => {
                    let strategy = value
                        .as_str()
                        .and_then(Strategy::from_alias)
                        .ok_or_else(|| SectionError::invalid_field(SECTION, key, "unknown strategy"))?;
                    if !next.allows(strategy) {
                        return Err(SectionError::invalid_field(
                            SECTION,
                            key,
                            format!("'{}' is not offered by {}", strategy.as_str(), next.kind),
                        ));
                    }
                    next.default_strategy = strategy;
                }
                other => {
                    return Err(SectionError::UnknownField {
                        section: SECTION.to_string(),
                        field: other.to_string(),
                    });
                }
            }
        }

        next.limit = next.limit.validate("limit")?;
        next.columns = next.columns.validate("columns")?;
        let (columns_floor, columns_ceiling) = COLUMNS_RANGE;
        if i64::from(next.columns.min) < columns_floor || i64::from(next.columns.max) > columns_ceiling
        {
            return Err(SectionError::InvalidRange {
                field: "columns",
                min: i64::from(next.columns.min),
                max: i64::from(next.columns.max),
                default: i64::from(next.columns.default),
            });
        }
        Ok(next)
    }
}

fn required_u32(value: &Value, field: &str) -> SectionResult<u32> {
    value
        .as_u64()
        .and_then(|raw| u32::try_from(raw).ok())
        .ok_or_else(|| SectionError::invalid_field(SECTION, field, "must be a non-negative integer"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kinds_parse_and_format() {
        assert_eq!(
            "products-by-category".parse::<SectionKind>(),
            Ok(SectionKind::ProductsByCategory)
        );
        assert_eq!("NEWS_BY_CATEGORY".parse::<SectionKind>(), Ok(SectionKind::NewsByCategory));
        assert!("footer".parse::<SectionKind>().is_err());
        assert_eq!(SectionKind::NewsByCategory.to_string(), "news-by-category");
    }

    #[test]
    fn news_profile_excludes_bestsellers() {
        let news = SectionProfile::for_kind(SectionKind::NewsByCategory);
        assert!(!news.allows(Strategy::Bestsellers));
        assert!(news.allows(Strategy::Custom));
        assert_eq!(news.legacy_item_key, "postIds");
    }

    #[test]
    fn bounds_clamp_keeps_previous_for_nan() {
        let bounds = Bounds {
            min: 1,
            max: 6,
            default: 4,
        };
        assert_eq!(bounds.clamp(99.0, 4), 6);
        assert_eq!(bounds.clamp(-3.0, 4), 1);
        assert_eq!(bounds.clamp(f64::NAN, 2), 2);
    }

    #[test]
    fn overrides_apply_and_validate() {
        let base = SectionProfile::for_kind(SectionKind::ProductsByCategory);
        let next = base
            .with_overrides(&json!({
                "defaultLimit": 12,
                "maxLimit": 24,
                "defaultDisplayStyle": "carousel"
            }))
            .expect("overrides should apply");
        assert_eq!(next.limit.default, 12);
        assert_eq!(next.limit.max, 24);
        assert_eq!(next.default_display_style, DisplayStyle::Carousel);

        assert!(matches!(
            base.with_overrides(&json!({ "defaultLimit": 100 })),
            Err(SectionError::InvalidRange { field: "limit", .. })
        ));
        assert!(matches!(
            base.with_overrides(&json!({ "maxColumns": 8, "defaultColumns": 4 })),
            Err(SectionError::InvalidRange { field: "columns", .. })
        ));
        assert!(matches!(
            base.with_overrides(&json!({ "colour": "red" })),
            Err(SectionError::UnknownField { .. })
        ));
        assert!(matches!(
            base.with_overrides(&json!({ "minLimit": "two" })),
            Err(SectionError::InvalidField { .. })
        ));
    }

    #[test]
    fn overrides_reject_strategies_the_editor_does_not_offer() {
        let news = SectionProfile::for_kind(SectionKind::NewsByCategory);
        let err = news
            .with_overrides(&json!({ "defaultStrategy": "bestsellers" }))
            .expect_err("bestsellers is not a news strategy");
        assert!(err.to_string().contains("not offered"));
    }
}
