use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Item identifier as it appears in the catalog source.
pub type ItemId = i64;

/// Category identifier as it appears in the catalog source.
pub type CategoryId = i64;

/// Grouping label for items without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

// ============================================================================
// Error Types
// ============================================================================

/// Errors raised while building a [`CatalogIndex`](super::CatalogIndex).
///
/// `MissingId` and `DuplicateId` mean the catalog itself is malformed and no
/// form session can proceed. The remaining variants belong to the file
/// transport.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Malformed catalog: item at position {index} has no id")]
    MissingId { index: usize },

    #[error("Malformed catalog: duplicate item id {id}")]
    DuplicateId { id: ItemId },

    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON in catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog file too large: {0}")]
    TooLarge(String),
}

impl CatalogError {
    /// True when the catalog content violates the id constraints, as opposed
    /// to failing to be read or parsed.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            CatalogError::MissingId { .. } | CatalogError::DuplicateId { .. }
        )
    }
}

// ============================================================================
// Raw Input Shape
// ============================================================================

/// Item as supplied by the catalog source, before validation.
///
/// `id` is optional here so that a missing id surfaces as
/// [`CatalogError::MissingId`] instead of a generic parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub id: Option<ItemId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: Option<RawCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCategory {
    pub id: CategoryId,
    pub name: String,
}

// ============================================================================
// Data Structures
// ============================================================================

/// A real category entity. "Uncategorized" is never one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: Arc<str>,
}

/// A catalog item. Only [`CatalogIndex`](super::CatalogIndex) constructs
/// these, so every `Item` a caller holds has an id that exists in some
/// loaded catalog.
///
/// `name` uses `Arc<str>` so grouped views and rendered rows clone cheaply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub(crate) id: ItemId,
    pub(crate) name: Arc<str>,
    pub(crate) category: Option<Category>,
}

impl Item {
    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Option<&Category> {
        self.category.as_ref()
    }

    /// Label this item is grouped under: its category name, or
    /// [`UNCATEGORIZED`].
    pub fn category_label(&self) -> &str {
        self.category
            .as_ref()
            .map(|c| &*c.name)
            .unwrap_or(UNCATEGORIZED)
    }
}
