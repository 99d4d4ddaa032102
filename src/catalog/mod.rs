//! Catalog of items the tax rule can apply to.

mod index;
mod types;

pub use index::CatalogIndex;
pub use types::{
    CatalogError, Category, CategoryId, Item, ItemId, RawCategory, RawItem, UNCATEGORIZED,
};
