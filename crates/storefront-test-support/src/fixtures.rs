//! Sample section documents in both schemas.

use serde_json::{Value, json};

/// Flat single-row document written before the `rows` schema existed.
#[must_use]
pub fn legacy_products_document() -> Value {
    json!({
        "categoryId": "cat-123",
        "sort": "featured",
        "limit": 6,
        "displayStyle": "grid",
        "sidebarEnabled": true
    })
}

/// Legacy news document carrying its own explicit item key.
#[must_use]
pub fn legacy_news_document() -> Value {
    json!({
        "categoryId": "news-7",
        "sort": "manual",
        "postIds": ["n1", "n2", "n3"],
        "limit": "3"
    })
}

/// Current-schema document with one custom row.
#[must_use]
pub fn custom_row_document() -> Value {
    json!({
        "rows": [
            {
                "id": "r1",
                "selectorId": "cat-9",
                "strategy": "custom",
                "itemIds": ["p1", "p2"],
                "limit": 2,
                "displayStyle": "grid",
                "showDisplayTitle": true,
                "showSelectorLabel": true,
                "showStrategyLabel": true
            }
        ]
    })
}

/// Current-schema document with malformed fields and stray keys throughout.
#[must_use]
pub fn malformed_document() -> Value {
    json!({
        "rows": [
            { "id": "", "limit": "lots", "columns": 99, "strategy": 7, "legacyFlag": true },
            "not-a-row",
            { "id": "kept", "itemIds": "p1,p2", "displayStyle": "masonry", "limit": -2 }
        ],
        "sidebarEnabled": false,
        "productIds": ["stale"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_are_objects() {
        for fixture in [
            legacy_products_document(),
            legacy_news_document(),
            custom_row_document(),
            malformed_document(),
        ] {
            assert!(fixture.is_object());
        }
    }
}
