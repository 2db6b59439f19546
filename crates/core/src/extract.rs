//! Lexical extraction of filters and intent flags from raw utterances.
//!
//! Matching is case-insensitive, whitespace-normalized, word-boundary
//! search against the taxonomy plus a handful of fixed pattern rules for
//! sizes, budgets, and brands. There is no model here: an unmatched phrase
//! simply contributes nothing.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::filter::{FilterPayload, IntentFlags, Price};
use crate::normalize::{canon_color, normalize};
use crate::taxonomy;

/// Result of one extraction pass: a normalized, pruned payload plus the
/// per-turn intent flags.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub filters: FilterPayload,
    pub intent: IntentFlags,
}

static SIZE_RULES: LazyLock<[(Regex, &'static str); 5]> = LazyLock::new(|| {
    [
        (Regex::new(r"(?i)\b(?:x{1,2}[-\s]?small|xs|xxs)\b").unwrap(), "XS"),
        (Regex::new(r"(?i)\b(?:small|^s$)\b").unwrap(), "S"),
        (Regex::new(r"(?i)\b(?:medium|^m$)\b").unwrap(), "M"),
        (Regex::new(r"(?i)\b(?:large|^l$)\b").unwrap(), "L"),
        (Regex::new(r"(?i)\b(?:x{1,2}[-\s]?large|xl|xxl)\b").unwrap(), "XL"),
    ]
});

static NUMERIC_SIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:size\s*)?(\d{1,2})(?:\s*(?:us|eu))?\b").unwrap());

static BUDGET_BETWEEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)between\s*\$?(\d+)\s*(?:and|to|-)\s*\$?(\d+)").unwrap());
static BUDGET_UNDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:under|below|less than|<=|≤)\s*\$?(\d+)").unwrap());
static BUDGET_CAP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:max|max\.|up to|budget|no more than)\s*\$?(\d+)").unwrap()
});
static BUDGET_AROUND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\baround\s*\$?(\d+)").unwrap());

static BRAND_FALLBACK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:by|from)\s+([A-Za-z0-9&\-'. ]{2,})\b").unwrap());

static EVENT_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:wedding|bridesmaid|ceremony|reception|black[-\s]?tie|formal)\b").unwrap()
});
static OUTFIT_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:outfit|complete the look|match with|pair with)\b").unwrap()
});

fn normalize_text(input: &str) -> String {
    input.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}

fn parse_sizes(text: &str) -> Vec<String> {
    let mut sizes = Vec::new();
    for (rule, label) in SIZE_RULES.iter() {
        if rule.is_match(text) {
            push_unique(&mut sizes, (*label).to_string());
        }
    }
    // Bare 1-2 digit numbers are taken as literal numeric sizes.
    for capture in NUMERIC_SIZE.captures_iter(text) {
        push_unique(&mut sizes, capture[1].to_string());
    }
    sizes
}

fn parse_budget(text: &str) -> Option<Price> {
    if let Some(capture) = BUDGET_BETWEEN.captures(text) {
        if let (Ok(min), Ok(max)) = (capture[1].parse::<i64>(), capture[2].parse::<i64>()) {
            return Some(Price { min: Some(min), max: Some(max) });
        }
    }
    if let Some(capture) = BUDGET_UNDER.captures(text) {
        if let Ok(max) = capture[1].parse::<i64>() {
            return Some(Price { min: None, max: Some(max) });
        }
    }
    if let Some(capture) = BUDGET_CAP.captures(text) {
        if let Ok(max) = capture[1].parse::<i64>() {
            return Some(Price { min: None, max: Some(max) });
        }
    }
    if let Some(capture) = BUDGET_AROUND.captures(text) {
        if let Ok(approx) = capture[1].parse::<i64>() {
            return Some(Price { min: Some((approx - 20).max(0)), max: Some(approx + 20) });
        }
    }
    None
}

fn parse_brands(text: &str, known_brands: &[String]) -> Vec<String> {
    let mut brands = Vec::new();
    for brand in known_brands {
        let escaped = regex::escape(brand);
        let Ok(matcher) = Regex::new(&format!(r"(?i)\b{escaped}\b")) else {
            continue;
        };
        if matcher.is_match(text) {
            push_unique(&mut brands, brand.clone());
        }
    }

    if brands.is_empty() {
        if let Some(capture) = BRAND_FALLBACK.captures(text) {
            let guess = capture[1].trim().to_string();
            if (2..=40).contains(&guess.len()) {
                brands.push(guess);
            }
        }
    }
    brands
}

fn wrap(values: Vec<String>) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

/// Extract filters and intent flags from user text.
///
/// The returned payload has already been normalized and pruned; presence in
/// the catalog (`in_stock`) defaults to true on every run.
pub fn extract(input: &str, known_brands: &[String]) -> Extraction {
    let text = normalize_text(input);
    if text.is_empty() {
        return Extraction {
            filters: FilterPayload { in_stock: Some(true), ..FilterPayload::default() },
            intent: IntentFlags::default(),
        };
    }

    let include_categories = taxonomy::CATEGORIES.find_all(&text);
    let colors = taxonomy::COLORS.find_all(&text);
    let occasion = taxonomy::OCCASION.find_all(&text);
    let season = taxonomy::SEASON.find_all(&text);
    let fit = taxonomy::FIT.find_all(&text);
    let silhouette = taxonomy::SILHOUETTE.find_all(&text);
    let pattern = taxonomy::PATTERN.find_all(&text);
    let material = taxonomy::MATERIAL.find_all(&text);
    let sizes = parse_sizes(&text);
    let brand = parse_brands(&text, known_brands);
    let price = parse_budget(&text);

    let intent = IntentFlags {
        is_event_flow: occasion.iter().any(|o| o == "wedding") || EVENT_HINT.is_match(&text),
        wants_outfit: OUTFIT_HINT.is_match(&text),
    };

    let filters = FilterPayload {
        include_categories: wrap(include_categories),
        colors: wrap(colors),
        sizes: wrap(sizes),
        price,
        occasion: wrap(occasion),
        season: wrap(season),
        fit: wrap(fit),
        silhouette: wrap(silhouette),
        material: wrap(material),
        pattern: wrap(pattern),
        brand: wrap(brand),
        in_stock: Some(true),
        ..FilterPayload::default()
    };

    Extraction { filters: normalize(filters), intent }
}

/// Basic image-analysis output mapped onto a filter payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageAnalysis {
    pub item_type: Option<String>,
    pub colors: Option<Vec<String>>,
    pub pattern: Option<String>,
    pub material: Option<String>,
}

const TYPE_KEYWORDS: [(&str, &[&str]); 7] = [
    ("dresses", &["dress"]),
    (
        "tops",
        &["shirt", "top", "blouse", "tee", "t-shirt", "sweater", "hoodie", "camisole", "tank", "polo"],
    ),
    ("pants", &["pant", "trouser", "jean", "denim", "chino", "legging"]),
    ("skirts", &["skirt"]),
    ("shoes", &["shoe", "heel", "pump", "sandal", "sneaker", "boot", "flat"]),
    (
        "accessories",
        &["bag", "belt", "hat", "jewel", "earring", "necklace", "bracelet", "scarf", "clutch"],
    ),
    ("outerwear", &["jacket", "coat", "blazer", "cardigan", "trench", "parka"]),
];

/// Map an image-analysis record to a filter payload usable by the query
/// compiler. The item type picks a single category by keyword; colors are
/// canonicalized; pattern and material become lower-cased singletons.
pub fn filters_from_image_analysis(analysis: &ImageAnalysis) -> FilterPayload {
    let item_type = analysis.item_type.as_deref().map(normalize_text).unwrap_or_default();
    let include_categories = if item_type.is_empty() {
        None
    } else {
        TYPE_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|keyword| item_type.contains(keyword)))
            .map(|(category, _)| vec![(*category).to_string()])
    };

    let colors = analysis
        .colors
        .as_ref()
        .map(|colors| colors.iter().map(|color| canon_color(color)).collect::<Vec<_>>());

    let filters = FilterPayload {
        include_categories,
        colors,
        pattern: analysis.pattern.as_deref().map(|p| vec![normalize_text(p)]),
        material: analysis.material.as_deref().map(|m| vec![normalize_text(m)]),
        in_stock: Some(true),
        ..FilterPayload::default()
    };

    normalize(filters)
}
