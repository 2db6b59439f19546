//! Merge a per-turn filter delta into the prior conversation filters.
//!
//! List fields union; `price` merges per bound preferring the delta;
//! scalars are last-delta-wins. A field missing from the delta means "no
//! opinion", never "clear". The result is pruned like any other payload.

use crate::domain::filter::{CategoryId, FilterPayload, Price};
use crate::normalize::prune;

fn union_strings(base: Option<Vec<String>>, delta: &[String]) -> Option<Vec<String>> {
    let mut merged = base.unwrap_or_default();
    for value in delta {
        if !merged.contains(value) {
            merged.push(value.clone());
        }
    }
    Some(merged)
}

fn union_ids(base: Option<Vec<CategoryId>>, delta: &[CategoryId]) -> Option<Vec<CategoryId>> {
    let mut merged = base.unwrap_or_default();
    for id in delta {
        if !merged.contains(id) {
            merged.push(id.clone());
        }
    }
    Some(merged)
}

/// Pure, total merge of `delta` into `base`. Commutative and associative on
/// list fields; order-sensitive on scalars and price, so callers apply
/// deltas in chronological turn order.
pub fn merge(base: &FilterPayload, delta: &FilterPayload) -> FilterPayload {
    let mut merged = base.clone();

    if let Some(values) = &delta.include_categories {
        merged.include_categories = union_strings(merged.include_categories.take(), values);
    }
    if let Some(values) = &delta.colors {
        merged.colors = union_strings(merged.colors.take(), values);
    }
    if let Some(values) = &delta.sizes {
        merged.sizes = union_strings(merged.sizes.take(), values);
    }
    if let Some(values) = &delta.occasion {
        merged.occasion = union_strings(merged.occasion.take(), values);
    }
    if let Some(values) = &delta.season {
        merged.season = union_strings(merged.season.take(), values);
    }
    if let Some(values) = &delta.fit {
        merged.fit = union_strings(merged.fit.take(), values);
    }
    if let Some(values) = &delta.silhouette {
        merged.silhouette = union_strings(merged.silhouette.take(), values);
    }
    if let Some(values) = &delta.material {
        merged.material = union_strings(merged.material.take(), values);
    }
    if let Some(values) = &delta.pattern {
        merged.pattern = union_strings(merged.pattern.take(), values);
    }
    if let Some(values) = &delta.brand {
        merged.brand = union_strings(merged.brand.take(), values);
    }
    if let Some(ids) = &delta.category_ids {
        merged.category_ids = union_ids(merged.category_ids.take(), ids);
    }

    if let Some(delta_price) = &delta.price {
        let base_price = merged.price.unwrap_or_default();
        merged.price = Some(Price {
            min: delta_price.min.or(base_price.min),
            max: delta_price.max.or(base_price.max),
        });
    }
    // Contradictory turns can invert the window; swap the bounds.
    if let Some(price) = &mut merged.price {
        if let (Some(min), Some(max)) = (price.min, price.max) {
            if min > max {
                price.min = Some(max);
                price.max = Some(min);
            }
        }
    }

    if delta.in_stock.is_some() {
        merged.in_stock = delta.in_stock;
    }
    if delta.sort.is_some() {
        merged.sort = delta.sort;
    }
    if delta.page.is_some() {
        merged.page = delta.page;
    }
    if delta.limit.is_some() {
        merged.limit = delta.limit;
    }
    if delta.q.is_some() {
        merged.q = delta.q.clone();
    }

    prune(merged)
}
