//! Boundary coercion of loosely-typed filter input.
//!
//! Accepts both query-string-shaped maps (every value a string, lists as
//! CSV or repeated keys) and chat-style JSON payloads, and produces a
//! validated [`FilterPayload`]. Coercion is total: malformed values become
//! absent fields, out-of-range paging clamps, unknown sorts default.

use serde_json::Value;

use crate::domain::filter::{
    CategoryId, FilterPayload, Price, SortKey, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use crate::normalize::prune;

fn get<'a>(input: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let object = input.as_object()?;
    keys.iter().filter_map(|key| object.get(*key)).find(|value| !value.is_null())
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn to_csv_list(value: &Value) -> Option<Vec<String>> {
    let raw: Vec<String> = match value {
        Value::Array(items) => items.iter().filter_map(scalar_to_string).collect(),
        Value::String(text) => text.split(',').map(str::to_string).collect(),
        other => scalar_to_string(other).into_iter().collect(),
    };
    let cleaned: Vec<String> =
        raw.iter().map(|item| item.trim().to_string()).filter(|item| !item.is_empty()).collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

fn to_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) if !text.trim().is_empty() => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

fn to_i64(value: &Value) -> Option<i64> {
    to_number(value).map(|number| number as i64)
}

fn to_bool(value: &Value) -> Option<bool> {
    let text = match value {
        Value::Bool(flag) => return Some(*flag),
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        _ => return None,
    };
    match text.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn to_category_ids(value: &Value) -> Option<Vec<CategoryId>> {
    let entries = to_csv_list(value)?;
    let ids: Vec<CategoryId> =
        entries.iter().filter_map(|entry| CategoryId::parse(entry)).collect();
    if ids.is_empty() {
        None
    } else {
        Some(ids)
    }
}

fn sanitize_page(value: Option<&Value>) -> u32 {
    match value.and_then(to_number) {
        Some(number) if number >= 1.0 => number.floor() as u32,
        _ => 1,
    }
}

fn sanitize_limit(value: Option<&Value>) -> u32 {
    match value.and_then(to_number) {
        Some(number) if number >= 1.0 => (number.floor() as u32).min(MAX_PAGE_SIZE),
        _ => DEFAULT_PAGE_SIZE,
    }
}

/// Coerce filters from either request-parameter strings or a chatbot JSON
/// payload into one consistent, pruned [`FilterPayload`].
pub fn normalize_filters(input: &Value) -> FilterPayload {
    let q = get(input, &["q", "query", "text"])
        .and_then(scalar_to_string)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());

    let single_id = get(input, &["categoryId", "category_id"])
        .and_then(scalar_to_string)
        .and_then(|id| CategoryId::parse(&id));
    let category_ids = get(input, &["categoryIds", "category_ids"])
        .and_then(to_category_ids)
        .or_else(|| single_id.map(|id| vec![id]));

    let include_categories =
        get(input, &["include_categories", "includeCategories"]).and_then(to_csv_list);
    let brand = get(input, &["brand", "brands"]).and_then(to_csv_list);
    let colors = get(input, &["colors", "color"]).and_then(to_csv_list);
    let sizes = get(input, &["sizes", "size"]).and_then(to_csv_list);
    let material = get(input, &["material", "materials"]).and_then(to_csv_list);
    let pattern = get(input, &["pattern", "patterns"]).and_then(to_csv_list);
    let silhouette = get(input, &["silhouette", "silhouettes"]).and_then(to_csv_list);
    let fit = get(input, &["fit", "fits"]).and_then(to_csv_list);
    let occasion = get(input, &["occasion", "occasions"]).and_then(to_csv_list);
    let season = get(input, &["season", "seasons"]).and_then(to_csv_list);

    let price_object = input.get("price").and_then(Value::as_object);
    let price_min = price_object
        .and_then(|price| price.get("min"))
        .and_then(to_i64)
        .or_else(|| {
            get(input, &["price_min", "min_price", "minPrice", "priceMin"]).and_then(to_i64)
        });
    let price_max = price_object
        .and_then(|price| price.get("max"))
        .and_then(to_i64)
        .or_else(|| {
            get(input, &["price_max", "max_price", "maxPrice", "priceMax"]).and_then(to_i64)
        });
    let price = (price_min.is_some() || price_max.is_some())
        .then_some(Price { min: price_min, max: price_max });

    let in_stock = get(input, &["in_stock", "inStock"]).and_then(to_bool);

    let sort = get(input, &["sort"])
        .and_then(scalar_to_string)
        .and_then(|value| SortKey::parse(&value))
        .unwrap_or(if q.is_some() { SortKey::Relevance } else { SortKey::Newest });

    let page = sanitize_page(get(input, &["page"]));
    let limit = sanitize_limit(get(input, &["limit"]));

    prune(FilterPayload {
        include_categories,
        category_ids,
        colors,
        sizes,
        price,
        occasion,
        season,
        fit,
        silhouette,
        material,
        pattern,
        brand,
        q,
        in_stock,
        sort: Some(sort),
        page: Some(page),
        limit: Some(limit),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::normalize_filters;
    use crate::domain::filter::{Price, SortKey};

    #[test]
    fn csv_and_repeated_values_become_lists() {
        let filters = normalize_filters(&json!({
            "colors": "black, navy ,",
            "sizes": ["M", "L"],
        }));
        assert_eq!(filters.colors, Some(vec!["black".to_string(), "navy".to_string()]));
        assert_eq!(filters.sizes, Some(vec!["M".to_string(), "L".to_string()]));
    }

    #[test]
    fn boolean_strings_coerce_or_vanish() {
        assert_eq!(normalize_filters(&json!({ "in_stock": "yes" })).in_stock, Some(true));
        assert_eq!(normalize_filters(&json!({ "inStock": "0" })).in_stock, Some(false));
        assert_eq!(normalize_filters(&json!({ "in_stock": "maybe" })).in_stock, None);
    }

    #[test]
    fn invalid_category_ids_are_dropped_not_errors() {
        let filters = normalize_filters(&json!({
            "category_ids": "64b5f0c2a1d2e3f4a5b6c7d8,not-an-id",
        }));
        let ids = filters.category_ids.expect("ids");
        assert_eq!(ids.len(), 1);
        assert_eq!(ids[0].as_str(), "64b5f0c2a1d2e3f4a5b6c7d8");

        assert_eq!(normalize_filters(&json!({ "category_ids": "garbage" })).category_ids, None);
    }

    #[test]
    fn single_category_id_alias_is_accepted() {
        let filters = normalize_filters(&json!({ "categoryId": "64b5f0c2a1d2e3f4a5b6c7d8" }));
        assert_eq!(filters.category_ids.map(|ids| ids.len()), Some(1));
    }

    #[test]
    fn sort_defaults_depend_on_text_query() {
        assert_eq!(normalize_filters(&json!({})).sort, Some(SortKey::Newest));
        assert_eq!(
            normalize_filters(&json!({ "q": "linen dress" })).sort,
            Some(SortKey::Relevance)
        );
        assert_eq!(
            normalize_filters(&json!({ "sort": "price_desc" })).sort,
            Some(SortKey::PriceDesc)
        );
        assert_eq!(normalize_filters(&json!({ "sort": "bogus" })).sort, Some(SortKey::Newest));
    }

    #[test]
    fn paging_clamps_instead_of_failing() {
        let filters = normalize_filters(&json!({ "page": "0", "limit": "500" }));
        assert_eq!(filters.page, Some(1));
        assert_eq!(filters.limit, Some(100));

        let filters = normalize_filters(&json!({ "limit": 0 }));
        assert_eq!(filters.limit, Some(24));

        let filters = normalize_filters(&json!({ "page": "2.9", "limit": "7" }));
        assert_eq!(filters.page, Some(2));
        assert_eq!(filters.limit, Some(7));
    }

    #[test]
    fn price_accepts_nested_and_flat_aliases() {
        let filters = normalize_filters(&json!({ "price": { "max": 100 } }));
        assert_eq!(filters.price, Some(Price { min: None, max: Some(100) }));

        let filters = normalize_filters(&json!({ "min_price": "50", "priceMax": "120" }));
        assert_eq!(filters.price, Some(Price { min: Some(50), max: Some(120) }));

        assert_eq!(normalize_filters(&json!({ "price_min": "NaN" })).price, None);
    }

    #[test]
    fn query_text_aliases_and_trimming() {
        assert_eq!(
            normalize_filters(&json!({ "query": "  silk blouse  " })).q,
            Some("silk blouse".to_string())
        );
        assert_eq!(normalize_filters(&json!({ "text": "   " })).q, None);
    }
}
