use async_trait::async_trait;
use boutique_core::{CategoryId, CategoryResolver, StoreError};

struct CategoryEntry {
    id: CategoryId,
    slug: &'static str,
    name: &'static str,
}

/// Category lookup backed by a fixed table. Matching is exact and
/// case-insensitive on slug or display name; unmatched names are omitted.
pub struct StaticCategoryResolver {
    entries: Vec<CategoryEntry>,
}

impl StaticCategoryResolver {
    pub fn with_default_catalog() -> Self {
        let table: [(&str, &str, &str); 7] = [
            ("64a1b2c3d4e5f6a7b8c90001", "dresses", "Dresses"),
            ("64a1b2c3d4e5f6a7b8c90002", "tops", "Tops"),
            ("64a1b2c3d4e5f6a7b8c90003", "pants", "Pants"),
            ("64a1b2c3d4e5f6a7b8c90004", "skirts", "Skirts"),
            ("64a1b2c3d4e5f6a7b8c90005", "shoes", "Shoes"),
            ("64a1b2c3d4e5f6a7b8c90006", "accessories", "Accessories"),
            ("64a1b2c3d4e5f6a7b8c90007", "outerwear", "Outerwear"),
        ];
        let entries = table
            .iter()
            .filter_map(|(id, slug, name)| {
                CategoryId::parse(id).map(|id| CategoryEntry { id, slug, name })
            })
            .collect();
        Self { entries }
    }
}

#[async_trait]
impl CategoryResolver for StaticCategoryResolver {
    async fn resolve(&self, names: &[String]) -> Result<Vec<CategoryId>, StoreError> {
        let mut ids = Vec::new();
        for name in names {
            let wanted = name.trim();
            let matched = self.entries.iter().find(|entry| {
                entry.slug.eq_ignore_ascii_case(wanted) || entry.name.eq_ignore_ascii_case(wanted)
            });
            if let Some(entry) = matched {
                if !ids.contains(&entry.id) {
                    ids.push(entry.id.clone());
                }
            }
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use boutique_core::CategoryResolver;

    use super::StaticCategoryResolver;

    #[tokio::test]
    async fn resolves_slugs_and_names_case_insensitively() {
        let resolver = StaticCategoryResolver::with_default_catalog();
        let ids = resolver
            .resolve(&["dresses".to_string(), "Shoes".to_string()])
            .await
            .expect("resolve");
        assert_eq!(ids.len(), 2);
    }

    #[tokio::test]
    async fn unmatched_names_are_omitted_silently() {
        let resolver = StaticCategoryResolver::with_default_catalog();
        let ids = resolver
            .resolve(&["dresses".to_string(), "spaceships".to_string()])
            .await
            .expect("resolve");
        assert_eq!(ids.len(), 1);
    }

    #[tokio::test]
    async fn duplicates_collapse_to_one_id() {
        let resolver = StaticCategoryResolver::with_default_catalog();
        let ids = resolver
            .resolve(&["tops".to_string(), "Tops".to_string()])
            .await
            .expect("resolve");
        assert_eq!(ids.len(), 1);
    }
}
