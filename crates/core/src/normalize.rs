//! Canonicalization of filter values plus pruning of vacuous fields.
//!
//! `normalize` is pure and idempotent; every payload a caller sees has been
//! through it, so list fields only ever carry canonical tokens.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::filter::FilterPayload;
use crate::taxonomy::PASTEL_PALETTE;

static BLACK_TIE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)black[-\s]?tie").unwrap());
static DATE_NIGHT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)date[-\s]?night").unwrap());
static PASTEL_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bpastels?\b").unwrap());

pub fn canon_color(color: &str) -> String {
    let lowered = color.to_lowercase();
    match lowered.as_str() {
        "gray" => "grey".to_string(),
        "light blue" => "light-blue".to_string(),
        _ => lowered,
    }
}

fn canon_occasion(value: &str) -> String {
    let replaced = BLACK_TIE.replace_all(value, "formal");
    DATE_NIGHT.replace_all(&replaced, "date night").into_owned()
}

fn canon_season(value: &str) -> String {
    if value.eq_ignore_ascii_case("autumn") {
        "fall".to_string()
    } else {
        value.to_string()
    }
}

fn canon_silhouette(value: &str) -> String {
    if value.eq_ignore_ascii_case("aline") {
        "a-line".to_string()
    } else {
        value.to_string()
    }
}

fn canon_pattern(value: &str) -> String {
    match value.to_lowercase().as_str() {
        "stripes" => "striped".to_string(),
        "polka dots" | "dots" => "polka".to_string(),
        "checked" => "check".to_string(),
        _ => value.to_string(),
    }
}

/// Mentioning pastels broadens to the whole palette: when any color token
/// carries the word "pastel", the list becomes the union of its existing
/// `pastel-*` entries with the full canonical palette.
fn expand_pastels(colors: Vec<String>) -> Vec<String> {
    if !colors.iter().any(|color| PASTEL_WORD.is_match(color)) {
        return colors;
    }

    let mut expanded: Vec<String> =
        colors.into_iter().filter(|color| color.starts_with("pastel-")).collect();
    for member in PASTEL_PALETTE {
        if !expanded.iter().any(|color| color == member) {
            expanded.push(member.to_string());
        }
    }
    expanded
}

fn canon_list(values: Vec<String>, canon: impl Fn(&str) -> String) -> Vec<String> {
    let mut seen = HashSet::new();
    values.iter().map(|value| canon(value)).filter(|value| seen.insert(value.clone())).collect()
}

/// Canonicalize every taxonomy-backed field and prune vacuous ones.
pub fn normalize(mut filters: FilterPayload) -> FilterPayload {
    if let Some(colors) = filters.colors.take() {
        filters.colors = Some(expand_pastels(canon_list(colors, canon_color)));
    }
    if let Some(occasion) = filters.occasion.take() {
        filters.occasion = Some(canon_list(occasion, canon_occasion));
    }
    if let Some(season) = filters.season.take() {
        filters.season = Some(canon_list(season, canon_season));
    }
    if let Some(silhouette) = filters.silhouette.take() {
        filters.silhouette = Some(canon_list(silhouette, canon_silhouette));
    }
    if let Some(pattern) = filters.pattern.take() {
        filters.pattern = Some(canon_list(pattern, canon_pattern));
    }

    prune(filters)
}

/// Remove fields that carry no information: empty lists, blank text, a price
/// object with neither bound. The returned payload never has vacuous keys.
pub fn prune(mut filters: FilterPayload) -> FilterPayload {
    fn non_empty(values: Option<Vec<String>>) -> Option<Vec<String>> {
        values.filter(|list| !list.is_empty())
    }

    filters.include_categories = non_empty(filters.include_categories);
    filters.colors = non_empty(filters.colors);
    filters.sizes = non_empty(filters.sizes);
    filters.occasion = non_empty(filters.occasion);
    filters.season = non_empty(filters.season);
    filters.fit = non_empty(filters.fit);
    filters.silhouette = non_empty(filters.silhouette);
    filters.material = non_empty(filters.material);
    filters.pattern = non_empty(filters.pattern);
    filters.brand = non_empty(filters.brand);
    filters.category_ids = filters.category_ids.filter(|ids| !ids.is_empty());
    filters.q = filters.q.filter(|text| !text.trim().is_empty());
    filters.price = filters.price.filter(|price| !price.is_empty());

    filters
}
