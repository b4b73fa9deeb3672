//! Tolerant coercion and clamping helpers for loosely typed document fields.
//!
//! # Design
//! - Never fail: every helper returns the nearest valid value or the supplied fallback.
//! - Callers that care about fallbacks pass a warning sink; the helpers stay pure.

use serde_json::Value;

/// Return `value` as a finite number, coercing numeric strings, else `fallback`.
///
/// Booleans, arrays, objects, `null` and non-numeric strings all yield the fallback.
#[must_use]
pub fn ensure_number(value: Option<&Value>, fallback: f64) -> f64 {
    match value {
        Some(Value::Number(number)) => number
            .as_f64()
            .filter(|candidate| candidate.is_finite())
            .unwrap_or(fallback),
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return fallback;
            }
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|candidate| candidate.is_finite())
                .unwrap_or(fallback)
        }
        _ => fallback,
    }
}

/// Clamp `value` to `min..=max`, truncating toward zero.
///
/// A non-finite `value` keeps `previous` (itself clamped) instead of snapping to `min`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn clamp_int(value: f64, min: i64, max: i64, previous: i64) -> i64 {
    let (low, high) = if min <= max { (min, max) } else { (max, min) };
    if !value.is_finite() {
        return previous.clamp(low, high);
    }
    let truncated = value.trunc();
    if truncated <= low as f64 {
        low
    } else if truncated >= high as f64 {
        high
    } else {
        truncated as i64
    }
}

/// Coerce a field to a clamped integer, recording a warning when the raw value was unusable
/// or out of range.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn coerce_int(
    raw: Option<&Value>,
    field: &str,
    (min, max): (i64, i64),
    fallback: i64,
    warnings: &mut Vec<String>,
) -> i64 {
    let number = ensure_number(raw, f64::NAN);
    if raw.is_some_and(|value| !value.is_null()) && number.is_nan() {
        warnings.push(format!("{field} is not numeric; using {fallback}"));
    }
    let clamped = clamp_int(number, min, max, fallback);
    if number.is_finite() && number.trunc() != clamped as f64 {
        warnings.push(format!("{field} of {number} is outside {min}..={max}; clamped to {clamped}"));
    }
    clamped
}

/// Optional trimmed text. Numbers are accepted and rendered; empty text becomes `None`.
pub(crate) fn optional_text(raw: Option<&Value>) -> Option<String> {
    match raw {
        Some(Value::String(text)) => normalize_text(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    }
}

/// Trimmed text, or `None` when nothing is left.
pub(crate) fn normalize_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Trimmed item identifiers with blank entries removed, order kept.
pub(crate) fn normalize_item_ids(ids: &[String]) -> Vec<String> {
    ids.iter().filter_map(|id| normalize_text(id)).collect()
}

/// Boolean toggle with tolerant coercion of `"true"`/`"false"` and `0`/`1`.
pub(crate) fn coerce_bool(raw: Option<&Value>, fallback: bool) -> bool {
    match raw {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            _ => fallback,
        },
        Some(Value::Number(number)) => number.as_f64().map_or(fallback, |n| n != 0.0),
        _ => fallback,
    }
}

/// Ordered item identifiers. Strings are trimmed, integers stringified, anything else dropped.
pub(crate) fn coerce_item_ids(raw: Option<&Value>, warnings: &mut Vec<String>) -> Vec<String> {
    let Some(value) = raw else {
        return Vec::new();
    };
    let Some(items) = value.as_array() else {
        if !value.is_null() {
            warnings.push("itemIds is not a list; using an empty selection".to_string());
        }
        return Vec::new();
    };
    let mut ids = Vec::with_capacity(items.len());
    let mut dropped = 0_usize;
    for item in items {
        match item {
            Value::String(text) => match normalize_text(text) {
                Some(id) => ids.push(id),
                None => dropped += 1,
            },
            Value::Number(number) if number.is_i64() || number.is_u64() => {
                ids.push(number.to_string());
            }
            _ => dropped += 1,
        }
    }
    if dropped > 0 {
        warnings.push(format!("dropped {dropped} unusable itemIds entries"));
    }
    ids
}
