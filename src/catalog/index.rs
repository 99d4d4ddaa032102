use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::types::{CatalogError, Category, Item, ItemId, RawCategory, RawItem};
use crate::util::sanitize_label;

/// Maximum catalog file size (8 MiB).
const MAX_FILE_SIZE: u64 = 8 * 1_048_576;

/// Ordered, read-only list of catalog items with unique ids.
///
/// Built once at form start and never mutated afterwards. Lookups by id go
/// through a position map so membership checks stay O(1) while `all()`
/// keeps source order.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    items: Vec<Item>,
    positions: HashMap<ItemId, usize>,
}

impl CatalogIndex {
    /// Build an index from raw items.
    ///
    /// Fails on the first item without an id, or the first id seen twice.
    /// Names are sanitized (control characters stripped, whitespace trimmed).
    pub fn load<I>(raw_items: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = RawItem>,
    {
        let raw_items = raw_items.into_iter();
        let (lower, _) = raw_items.size_hint();
        let mut items = Vec::with_capacity(lower);
        let mut positions = HashMap::with_capacity(lower);

        for (index, raw) in raw_items.enumerate() {
            let id = raw.id.ok_or(CatalogError::MissingId { index })?;
            if positions.insert(id, items.len()).is_some() {
                return Err(CatalogError::DuplicateId { id });
            }
            items.push(Item {
                id,
                name: Arc::from(sanitize_label(&raw.name)),
                category: raw.category.map(|RawCategory { id, name }| Category {
                    id,
                    name: Arc::from(sanitize_label(&name)),
                }),
            });
        }

        tracing::debug!(items = items.len(), "Catalog index built");
        Ok(Self { items, positions })
    }

    /// Parse a JSON array of `{id, name, category?}` objects.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let raw: Vec<RawItem> = serde_json::from_str(json)?;
        Self::load(raw)
    }

    /// Read and parse a JSON catalog file.
    pub fn load_file(path: &Path) -> Result<Self, CatalogError> {
        let meta = std::fs::metadata(path)?;
        if meta.len() > MAX_FILE_SIZE {
            return Err(CatalogError::TooLarge(format!(
                "Catalog file is {} bytes (max {} bytes)",
                meta.len(),
                MAX_FILE_SIZE
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&content)?;
        tracing::info!(
            path = %path.display(),
            items = catalog.len(),
            "Loaded catalog"
        );
        Ok(catalog)
    }

    /// The demonstration catalog the form ships with.
    pub fn sample() -> Self {
        let bracelets = || {
            Some(RawCategory {
                id: 14866,
                name: "Bracelets".to_string(),
            })
        };
        let raw = [
            (14864, "Recurring Item", None),
            (14865, "Jasinthe Bracelet", bracelets()),
            (14867, "Jasinthe Bracelet", bracelets()),
            (14870, "Inspire Bracelet", bracelets()),
            (14868, "Zero amount item with questions", None),
            (14872, "Normal item with questions", None),
            (14873, "Normal item", None),
        ]
        .into_iter()
        .map(|(id, name, category)| RawItem {
            id: Some(id),
            name: name.to_string(),
            category,
        });

        // Ids above are literal and unique, so the only failure path is unreachable.
        Self::load(raw).unwrap_or_default()
    }

    /// All items in catalog order.
    pub fn all(&self) -> &[Item] {
        &self.items
    }

    /// All ids in catalog order.
    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(Item::id).collect()
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.positions.get(&id).map(|&pos| &self.items[pos])
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.positions.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::UNCATEGORIZED;
    use pretty_assertions::assert_eq;

    fn raw(id: Option<ItemId>, name: &str) -> RawItem {
        RawItem {
            id,
            name: name.to_string(),
            category: None,
        }
    }

    #[test]
    fn test_load_preserves_order() {
        let catalog =
            CatalogIndex::load(vec![raw(Some(3), "c"), raw(Some(1), "a"), raw(Some(2), "b")])
                .unwrap();
        assert_eq!(catalog.ids(), vec![3, 1, 2]);
        assert_eq!(catalog.all()[1].name(), "a");
    }

    #[test]
    fn test_load_missing_id_is_malformed() {
        let err = CatalogIndex::load(vec![raw(Some(1), "a"), raw(None, "b")]).unwrap_err();
        assert!(matches!(err, CatalogError::MissingId { index: 1 }));
        assert!(err.is_malformed());
    }

    #[test]
    fn test_load_duplicate_id_is_malformed() {
        let err = CatalogIndex::load(vec![raw(Some(7), "a"), raw(Some(7), "b")]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { id: 7 }));
        assert!(err.is_malformed());
        assert!(err.to_string().contains("duplicate item id 7"));
    }

    #[test]
    fn test_load_empty_catalog() {
        let catalog = CatalogIndex::load(Vec::<RawItem>::new()).unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.ids().is_empty());
    }

    #[test]
    fn test_load_sanitizes_names() {
        let catalog = CatalogIndex::load(vec![RawItem {
            id: Some(1),
            name: " \x1b[31mRed\x1b[0m Bracelet ".to_string(),
            category: Some(RawCategory {
                id: 9,
                name: "Bracelets\x07".to_string(),
            }),
        }])
        .unwrap();
        let item = catalog.get(1).unwrap();
        assert_eq!(item.name(), "Red Bracelet");
        assert_eq!(item.category_label(), "Bracelets");
    }

    #[test]
    fn test_lookup_helpers() {
        let catalog = CatalogIndex::sample();
        assert!(catalog.contains(14870));
        assert!(!catalog.contains(14866)); // category id, not an item
        assert_eq!(catalog.get(14873).map(Item::name), Some("Normal item"));
        assert!(catalog.get(1).is_none());
    }

    #[test]
    fn test_sample_catalog() {
        let catalog = CatalogIndex::sample();
        assert_eq!(
            catalog.ids(),
            vec![14864, 14865, 14867, 14870, 14868, 14872, 14873]
        );
        assert_eq!(catalog.get(14864).unwrap().category_label(), UNCATEGORIZED);
        assert_eq!(catalog.get(14865).unwrap().category_label(), "Bracelets");
        assert_eq!(catalog.get(14865).unwrap().category().map(|c| c.id), Some(14866));
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"[
            {"id": 1, "name": "Recurring Item", "category": null},
            {"id": 2, "name": "Inspire Bracelet", "category": {"id": 10, "name": "Bracelets"}},
            {"id": 3, "name": "Normal item"}
        ]"#;
        let catalog = CatalogIndex::from_json_str(json).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(2).unwrap().category_label(), "Bracelets");
        assert_eq!(catalog.get(3).unwrap().category_label(), UNCATEGORIZED);
    }

    #[test]
    fn test_from_json_str_missing_id() {
        let err = CatalogIndex::from_json_str(r#"[{"name": "no id"}]"#).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_from_json_str_invalid() {
        let err = CatalogIndex::from_json_str("not json").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
        assert!(!err.is_malformed());
    }

    #[test]
    fn test_load_file_round_trip() {
        let dir = std::env::temp_dir().join("taxform_catalog_test_file");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("catalog.json");
        std::fs::write(&path, r#"[{"id": 5, "name": "Normal item"}]"#).unwrap();

        let catalog = CatalogIndex::load_file(&path).unwrap();
        assert_eq!(catalog.ids(), vec![5]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_file_missing() {
        let path = Path::new("/tmp/taxform_test_nonexistent_catalog.json");
        let err = CatalogIndex::load_file(path).unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
