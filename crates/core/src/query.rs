//! Compilation of a normalized filter payload into an ordered query plan.
//!
//! The plan is a flat list of tagged stages for an external document-store
//! executor. Stage order is a hard invariant: the price-range match reads
//! the derived minimum-price field, the relevance sort reads the text-search
//! score, and pagination always follows sorting. The compiler performs no
//! I/O and holds no state.

use serde::{Deserialize, Serialize};

use crate::domain::filter::{FilterPayload, SortKey, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// An "is one of" condition over a product-level field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldIn {
    pub field: String,
    pub any_of: Vec<String>,
}

/// Scope of the variant-level conditions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VariantConstraint {
    /// At least one variant entry must satisfy every given condition: its
    /// color in `colors` (when given) and, within that same variant, at
    /// least one size entry whose label is in `sizes` (when given) with
    /// stock on hand (when `require_stock`).
    PerVariant {
        #[serde(skip_serializing_if = "Option::is_none")]
        colors: Option<Vec<String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        sizes: Option<Vec<String>>,
        require_stock: bool,
    },
    /// Looser check used when only stock is requested: any size entry of
    /// any variant with stock on hand, not scoped to a single variant.
    AnySizeInStock,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    RelevanceScore,
    MinPrice,
    CreatedAt,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    fn asc(field: SortField) -> Self {
        Self { field, direction: SortDirection::Ascending }
    }

    fn desc(field: SortField) -> Self {
        Self { field, direction: SortDirection::Descending }
    }
}

/// One ordered unit of the compiled query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum Stage {
    /// Product-level "is one of" conditions, all ANDed.
    CategoricalMatch { conditions: Vec<FieldIn> },
    /// Full-text match; the executor adds a relevance score per document.
    TextSearch { query: String },
    /// Conditions over the nested variant/size sub-collections.
    VariantMatch { constraint: VariantConstraint },
    /// Per-product minimum of the base price and every per-size override
    /// (override when present, else base; nulls excluded).
    DerivedMinPrice,
    /// Inclusive bounds applied to the derived minimum price.
    PriceRange {
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
    },
    Sort { keys: Vec<SortSpec> },
    Skip { count: u64 },
    Limit { count: u64 },
    Project { fields: Vec<String> },
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::CategoricalMatch { .. } => "categorical_match",
            Stage::TextSearch { .. } => "text_search",
            Stage::VariantMatch { .. } => "variant_match",
            Stage::DerivedMinPrice => "derived_min_price",
            Stage::PriceRange { .. } => "price_range",
            Stage::Sort { .. } => "sort",
            Stage::Skip { .. } => "skip",
            Stage::Limit { .. } => "limit",
            Stage::Project { .. } => "project",
        }
    }
}

/// An ordered, stateless query plan; built fresh per compile call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryPlan {
    pub stages: Vec<Stage>,
}

impl QueryPlan {
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(Stage::name).collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompileOptions {
    /// Field set to project in the final stage, when the caller wants one.
    pub project_fields: Option<Vec<String>>,
}

fn effective_sort(filters: &FilterPayload) -> SortKey {
    filters.sort.unwrap_or(if filters.q.is_some() {
        SortKey::Relevance
    } else {
        SortKey::Newest
    })
}

fn sort_keys(sort: SortKey, has_query: bool) -> Vec<SortSpec> {
    match sort {
        SortKey::Relevance if has_query => {
            vec![SortSpec::desc(SortField::RelevanceScore), SortSpec::desc(SortField::CreatedAt)]
        }
        SortKey::PriceAsc => {
            vec![SortSpec::asc(SortField::MinPrice), SortSpec::desc(SortField::CreatedAt)]
        }
        SortKey::PriceDesc => {
            vec![SortSpec::desc(SortField::MinPrice), SortSpec::desc(SortField::CreatedAt)]
        }
        // A relevance sort without a text query has no score to read.
        SortKey::Relevance | SortKey::Newest => vec![SortSpec::desc(SortField::CreatedAt)],
    }
}

/// Compile a filter payload into an ordered query plan.
///
/// Callers resolve category names to identifiers beforehand; unresolved
/// names simply contribute no `category_ids` and therefore no condition.
pub fn compile(filters: &FilterPayload, options: &CompileOptions) -> QueryPlan {
    let mut stages = Vec::new();

    // 1. Product-level categorical match.
    let mut conditions = Vec::new();
    if let Some(ids) = &filters.category_ids {
        conditions.push(FieldIn {
            field: "category_id".to_string(),
            any_of: ids.iter().map(|id| id.to_string()).collect(),
        });
    }
    let list_fields: [(&str, &Option<Vec<String>>); 7] = [
        ("brand", &filters.brand),
        ("material", &filters.material),
        ("pattern", &filters.pattern),
        ("silhouette", &filters.silhouette),
        ("fit", &filters.fit),
        ("occasion", &filters.occasion),
        ("season", &filters.season),
    ];
    for (field, values) in list_fields {
        if let Some(values) = values {
            conditions.push(FieldIn { field: field.to_string(), any_of: values.clone() });
        }
    }
    if !conditions.is_empty() {
        stages.push(Stage::CategoricalMatch { conditions });
    }

    // 2. Text search.
    if let Some(query) = &filters.q {
        stages.push(Stage::TextSearch { query: query.clone() });
    }

    // 3. Variant-level match.
    let require_stock = filters.in_stock == Some(true);
    if filters.colors.is_some() || filters.sizes.is_some() || require_stock {
        let constraint = if filters.colors.is_some() || filters.sizes.is_some() {
            VariantConstraint::PerVariant {
                colors: filters.colors.clone(),
                sizes: filters.sizes.clone(),
                require_stock,
            }
        } else {
            VariantConstraint::AnySizeInStock
        };
        stages.push(Stage::VariantMatch { constraint });
    }

    // 4/5. Derived minimum price, then the range over it.
    let sort = effective_sort(filters);
    let price = filters.price.filter(|price| !price.is_empty());
    if price.is_some() || sort.is_price_based() {
        stages.push(Stage::DerivedMinPrice);
        if let Some(price) = price {
            stages.push(Stage::PriceRange { min: price.min, max: price.max });
        }
    }

    // 6. Sort.
    stages.push(Stage::Sort { keys: sort_keys(sort, filters.q.is_some()) });

    // 7. Pagination.
    let limit = match filters.limit {
        None | Some(0) => DEFAULT_PAGE_SIZE,
        Some(requested) => requested.min(MAX_PAGE_SIZE),
    };
    let page = filters.page.map_or(1, |page| page.max(1));
    stages.push(Stage::Skip { count: u64::from(page - 1) * u64::from(limit) });
    stages.push(Stage::Limit { count: u64::from(limit) });

    // 8. Optional projection.
    if let Some(fields) = &options.project_fields {
        if !fields.is_empty() {
            stages.push(Stage::Project { fields: fields.clone() });
        }
    }

    QueryPlan { stages }
}

#[cfg(test)]
mod tests {
    use super::{
        compile, CompileOptions, SortDirection, SortField, Stage, VariantConstraint,
    };
    use crate::domain::filter::{CategoryId, FilterPayload, Price, SortKey};

    fn compile_default(filters: &FilterPayload) -> super::QueryPlan {
        compile(filters, &CompileOptions::default())
    }

    #[test]
    fn canonical_stage_order_for_text_color_price_query() {
        let filters = FilterPayload {
            q: Some("dress".to_string()),
            colors: Some(vec!["black".to_string()]),
            price: Some(Price { min: None, max: Some(100) }),
            sort: Some(SortKey::PriceAsc),
            ..FilterPayload::default()
        };

        let plan = compile_default(&filters);
        assert_eq!(
            plan.stage_names(),
            vec![
                "text_search",
                "variant_match",
                "derived_min_price",
                "price_range",
                "sort",
                "skip",
                "limit",
            ]
        );

        let Stage::Sort { keys } = &plan.stages[4] else { panic!("sort stage") };
        assert_eq!(keys[0].field, SortField::MinPrice);
        assert_eq!(keys[0].direction, SortDirection::Ascending);
        assert_eq!(keys[1].field, SortField::CreatedAt);
        assert_eq!(keys[1].direction, SortDirection::Descending);

        assert_eq!(plan.stages[5], Stage::Skip { count: 0 });
        assert_eq!(plan.stages[6], Stage::Limit { count: 24 });
    }

    #[test]
    fn categorical_stage_collects_every_present_field() {
        let filters = FilterPayload {
            category_ids: CategoryId::parse("64b5f0c2a1d2e3f4a5b6c7d8").map(|id| vec![id]),
            brand: Some(vec!["Zara".to_string()]),
            season: Some(vec!["summer".to_string()]),
            ..FilterPayload::default()
        };

        let plan = compile_default(&filters);
        let Stage::CategoricalMatch { conditions } = &plan.stages[0] else {
            panic!("categorical stage first");
        };
        let fields: Vec<&str> = conditions.iter().map(|c| c.field.as_str()).collect();
        assert_eq!(fields, vec!["category_id", "brand", "season"]);
    }

    #[test]
    fn color_and_stock_constraints_share_one_variant() {
        let filters = FilterPayload {
            colors: Some(vec!["navy".to_string()]),
            sizes: Some(vec!["M".to_string()]),
            in_stock: Some(true),
            ..FilterPayload::default()
        };

        let plan = compile_default(&filters);
        let Stage::VariantMatch { constraint } = &plan.stages[0] else {
            panic!("variant stage first");
        };
        assert_eq!(
            constraint,
            &VariantConstraint::PerVariant {
                colors: Some(vec!["navy".to_string()]),
                sizes: Some(vec!["M".to_string()]),
                require_stock: true,
            }
        );
    }

    #[test]
    fn stock_alone_uses_the_ungrouped_check() {
        let filters = FilterPayload { in_stock: Some(true), ..FilterPayload::default() };
        let plan = compile_default(&filters);
        assert_eq!(
            plan.stages[0],
            Stage::VariantMatch { constraint: VariantConstraint::AnySizeInStock }
        );
    }

    #[test]
    fn price_sort_without_price_filter_still_derives_min_price() {
        let filters =
            FilterPayload { sort: Some(SortKey::PriceDesc), ..FilterPayload::default() };
        let plan = compile_default(&filters);
        assert_eq!(plan.stage_names(), vec!["derived_min_price", "sort", "skip", "limit"]);
    }

    #[test]
    fn relevance_sort_without_query_falls_back_to_newest() {
        let filters =
            FilterPayload { sort: Some(SortKey::Relevance), ..FilterPayload::default() };
        let plan = compile_default(&filters);
        let Stage::Sort { keys } = &plan.stages[0] else { panic!("sort stage") };
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].field, SortField::CreatedAt);
    }

    #[test]
    fn pagination_clamps_page_and_limit() {
        let filters = FilterPayload {
            page: Some(0),
            limit: Some(500),
            ..FilterPayload::default()
        };
        let plan = compile_default(&filters);
        assert!(plan.stages.contains(&Stage::Skip { count: 0 }));
        assert!(plan.stages.contains(&Stage::Limit { count: 100 }));

        let filters = FilterPayload { limit: Some(0), ..FilterPayload::default() };
        let plan = compile_default(&filters);
        assert!(plan.stages.contains(&Stage::Limit { count: 24 }));

        let filters = FilterPayload {
            page: Some(3),
            limit: Some(10),
            ..FilterPayload::default()
        };
        let plan = compile_default(&filters);
        assert!(plan.stages.contains(&Stage::Skip { count: 20 }));
    }

    #[test]
    fn projection_is_always_the_last_stage() {
        let options = CompileOptions {
            project_fields: Some(vec!["title".to_string(), "base_price".to_string()]),
        };
        let filters = FilterPayload {
            q: Some("coat".to_string()),
            ..FilterPayload::default()
        };
        let plan = compile(&filters, &options);
        assert_eq!(plan.stages.last().map(Stage::name), Some("project"));
    }

    #[test]
    fn stages_serialize_with_tag_and_payload() {
        let json = serde_json::to_value(Stage::Skip { count: 48 }).expect("serialize");
        assert_eq!(json, serde_json::json!({ "stage": "skip", "count": 48 }));

        let json = serde_json::to_value(Stage::DerivedMinPrice).expect("serialize");
        assert_eq!(json, serde_json::json!({ "stage": "derived_min_price" }));
    }
}
