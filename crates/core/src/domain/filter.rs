use std::fmt;

use serde::{Deserialize, Serialize};

/// Rows returned per page when the caller does not ask for a limit.
pub const DEFAULT_PAGE_SIZE: u32 = 24;
/// Hard cap on rows per page; larger requests are clamped, not rejected.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Store-document identifier for a category: 24 lowercase hex characters.
///
/// Construction goes through [`CategoryId::parse`], which returns `None` for
/// anything that is not identifier-shaped. Malformed ids are dropped at the
/// boundary rather than surfaced as errors.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CategoryId(String);

impl CategoryId {
    pub fn parse(value: &str) -> Option<Self> {
        let candidate = value.trim();
        if candidate.len() == 24 && candidate.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Some(Self(candidate.to_ascii_lowercase()));
        }
        None
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Allowed result orderings. Anything else coerces to a default at the
/// boundary instead of failing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Relevance,
    PriceAsc,
    PriceDesc,
    Newest,
}

impl SortKey {
    /// Parse a caller-supplied sort value, accepting only the allowed set.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "relevance" => Some(Self::Relevance),
            "price_asc" => Some(Self::PriceAsc),
            "price_desc" => Some(Self::PriceDesc),
            "newest" => Some(Self::Newest),
            _ => None,
        }
    }

    pub fn is_price_based(self) -> bool {
        matches!(self, Self::PriceAsc | Self::PriceDesc)
    }
}

/// Inclusive price window in whole dollars. Either bound may be absent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}

impl Price {
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// The canonical, composable filter payload passed between every component.
///
/// Every field is optional; list fields are never present and empty at the
/// same time (pruning replaces empty collections with `None`). List values
/// are canonical taxonomy tokens once the payload has been through
/// [`crate::normalize::normalize`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_ids: Option<Vec<CategoryId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occasion: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silhouette: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl FilterPayload {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// True when at least one product-level categorical field is present.
    pub fn has_categorical(&self) -> bool {
        self.category_ids.is_some()
            || self.brand.is_some()
            || self.material.is_some()
            || self.pattern.is_some()
            || self.silhouette.is_some()
            || self.fit.is_some()
            || self.occasion.is_some()
            || self.season.is_some()
    }

    /// Maximum budget, when a price window with an upper bound is present.
    pub fn price_max(&self) -> Option<i64> {
        self.price.as_ref().and_then(|price| price.max)
    }

    /// Minimum budget, when a price window with a lower bound is present.
    pub fn price_min(&self) -> Option<i64> {
        self.price.as_ref().and_then(|price| price.min)
    }
}

/// Per-turn flags derived from the utterance; never persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentFlags {
    pub is_event_flow: bool,
    pub wants_outfit: bool,
}

#[cfg(test)]
mod tests {
    use super::{CategoryId, FilterPayload, Price, SortKey};

    #[test]
    fn category_id_accepts_object_id_shapes() {
        let id = CategoryId::parse("64b5f0c2a1d2e3f4a5b6c7d8").expect("valid id");
        assert_eq!(id.as_str(), "64b5f0c2a1d2e3f4a5b6c7d8");

        let upper = CategoryId::parse("64B5F0C2A1D2E3F4A5B6C7D8").expect("valid id");
        assert_eq!(upper.as_str(), "64b5f0c2a1d2e3f4a5b6c7d8");
    }

    #[test]
    fn category_id_rejects_malformed_input() {
        assert!(CategoryId::parse("").is_none());
        assert!(CategoryId::parse("dresses").is_none());
        assert!(CategoryId::parse("64b5f0c2a1d2e3f4a5b6c7").is_none());
        assert!(CategoryId::parse("zzb5f0c2a1d2e3f4a5b6c7d8").is_none());
    }

    #[test]
    fn sort_key_parses_only_allowed_values() {
        assert_eq!(SortKey::parse("price_asc"), Some(SortKey::PriceAsc));
        assert_eq!(SortKey::parse(" NEWEST "), Some(SortKey::Newest));
        assert_eq!(SortKey::parse("price"), None);
        assert_eq!(SortKey::parse(""), None);
    }

    #[test]
    fn absent_fields_are_skipped_in_serialization() {
        let payload = FilterPayload {
            colors: Some(vec!["navy".to_string()]),
            price: Some(Price { min: None, max: Some(100) }),
            in_stock: Some(true),
            ..FilterPayload::default()
        };

        let json = serde_json::to_value(&payload).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "colors": ["navy"],
                "price": { "max": 100 },
                "in_stock": true,
            })
        );
    }
}
