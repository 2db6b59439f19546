//! Static vocabulary tables mapping surface phrases to canonical tokens.
//!
//! Each dimension is compiled once at first use into an immutable table of
//! canonical token → word-boundary matcher, and is read-only afterwards.

use std::sync::LazyLock;

use regex::Regex;

/// One dimension of the taxonomy: an ordered list of canonical tokens, each
/// with a case-insensitive whole-word matcher over its synonym phrases.
pub struct DimensionTable {
    matchers: Vec<(&'static str, Regex)>,
}

impl DimensionTable {
    fn new(entries: &[(&'static str, &[&'static str])]) -> Self {
        let matchers = entries
            .iter()
            .map(|(token, synonyms)| {
                let alternation = synonyms
                    .iter()
                    .map(|synonym| regex::escape(synonym))
                    .collect::<Vec<_>>()
                    .join("|");
                let pattern = Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))
                    .expect("taxonomy synonym pattern");
                (*token, pattern)
            })
            .collect();
        Self { matchers }
    }

    fn flat(tokens: &'static [&'static str]) -> Self {
        let entries: Vec<(&'static str, &[&'static str])> =
            tokens.iter().map(|token| (*token, std::slice::from_ref(token))).collect();
        Self::new(&entries)
    }

    /// All canonical tokens whose synonyms occur in `text` as whole words.
    /// Each token appears at most once; order follows the table.
    pub fn find_all(&self, text: &str) -> Vec<String> {
        self.matchers
            .iter()
            .filter(|(_, matcher)| matcher.is_match(text))
            .map(|(token, _)| (*token).to_string())
            .collect()
    }
}

pub static COLORS: LazyLock<DimensionTable> = LazyLock::new(|| {
    DimensionTable::flat(&[
        "black",
        "white",
        "ivory",
        "cream",
        "beige",
        "tan",
        "brown",
        "grey",
        "gray",
        "charcoal",
        "navy",
        "blue",
        "light-blue",
        "teal",
        "green",
        "olive",
        "red",
        "burgundy",
        "pink",
        "blush",
        "rose",
        "purple",
        "yellow",
        "mustard",
        "orange",
        "coral",
        "gold",
        "silver",
        "metallic",
        "pastel-pink",
        "pastel-blue",
        "pastel-green",
        "pastel-purple",
        "pastel-yellow",
    ])
});

pub static CATEGORIES: LazyLock<DimensionTable> = LazyLock::new(|| {
    DimensionTable::new(&[
        ("dresses", &["dress", "dresses", "gown", "maxi", "midi", "mini", "slip dress", "evening gown"]),
        (
            "tops",
            &["top", "tops", "shirt", "blouse", "tee", "t-shirt", "sweater", "hoodie", "camisole", "tank", "polo"],
        ),
        ("pants", &["pants", "trousers", "jeans", "denim", "chinos", "slacks", "leggings"]),
        ("skirts", &["skirt", "skirts"]),
        ("shoes", &["shoes", "heels", "pumps", "sandals", "sneakers", "boots", "booties", "flats"]),
        (
            "accessories",
            &[
                "accessory",
                "accessories",
                "bag",
                "belt",
                "hat",
                "jewelry",
                "earrings",
                "necklace",
                "bracelet",
                "scarf",
                "clutch",
            ],
        ),
        ("outerwear", &["jacket", "coat", "blazer", "cardigan", "trench", "parka"]),
    ])
});

pub static OCCASION: LazyLock<DimensionTable> = LazyLock::new(|| {
    DimensionTable::flat(&[
        "wedding",
        "bridesmaid",
        "black tie",
        "black-tie",
        "formal",
        "cocktail",
        "party",
        "work",
        "office",
        "business",
        "casual",
        "vacation",
        "beach",
        "date night",
        "date-night",
        "graduation",
    ])
});

pub static SEASON: LazyLock<DimensionTable> =
    LazyLock::new(|| DimensionTable::flat(&["spring", "summer", "fall", "autumn", "winter"]));

pub static FIT: LazyLock<DimensionTable> = LazyLock::new(|| {
    DimensionTable::flat(&["slim", "regular", "relaxed", "oversized", "tailored", "bodycon"])
});

pub static SILHOUETTE: LazyLock<DimensionTable> = LazyLock::new(|| {
    DimensionTable::flat(&[
        "a-line",
        "aline",
        "wrap",
        "sheath",
        "fit-and-flare",
        "fit & flare",
        "mermaid",
        "bodycon",
        "shift",
        "straight",
        "wide-leg",
        "bootcut",
        "skinny",
    ])
});

pub static PATTERN: LazyLock<DimensionTable> = LazyLock::new(|| {
    DimensionTable::flat(&[
        "solid",
        "striped",
        "stripes",
        "floral",
        "checked",
        "check",
        "plaid",
        "polka",
        "polka dots",
        "dots",
        "animal",
        "leopard",
        "houndstooth",
    ])
});

pub static MATERIAL: LazyLock<DimensionTable> = LazyLock::new(|| {
    DimensionTable::flat(&[
        "cotton",
        "silk",
        "satin",
        "linen",
        "denim",
        "knit",
        "wool",
        "leather",
        "chiffon",
        "cashmere",
        "polyester",
    ])
});

/// The full canonical pastel palette used by the normalizer's pastel
/// expansion.
pub const PASTEL_PALETTE: [&str; 5] =
    ["pastel-pink", "pastel-blue", "pastel-green", "pastel-purple", "pastel-yellow"];

#[cfg(test)]
mod tests {
    use super::{CATEGORIES, COLORS, OCCASION, SILHOUETTE};

    #[test]
    fn finds_every_matching_token_not_just_the_first() {
        let hits = COLORS.find_all("a navy or black dress");
        assert_eq!(hits, vec!["black".to_string(), "navy".to_string()]);
    }

    #[test]
    fn category_matches_through_any_synonym() {
        assert_eq!(CATEGORIES.find_all("an evening gown please"), vec!["dresses".to_string()]);
        assert_eq!(CATEGORIES.find_all("jeans and a blazer"), vec!["pants".to_string(), "outerwear".to_string()]);
    }

    #[test]
    fn matching_is_case_insensitive_and_whole_word() {
        assert_eq!(OCCASION.find_all("Black Tie gala"), vec!["black tie".to_string()]);
        // "scarlet" must not match "car" or any other token
        assert!(COLORS.find_all("scarlet").is_empty());
    }

    #[test]
    fn phrase_synonyms_with_punctuation_match() {
        let hits = SILHOUETTE.find_all("a fit & flare silhouette");
        assert!(hits.contains(&"fit & flare".to_string()));
    }

    #[test]
    fn no_match_yields_empty_not_error() {
        assert!(CATEGORIES.find_all("entirely unrelated text").is_empty());
    }
}
