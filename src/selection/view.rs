use std::collections::HashMap;
use std::slice;

use serde::Serialize;

use crate::catalog::{CatalogIndex, Item};

// ============================================================================
// Search Filter
// ============================================================================

/// Lazy iterator over the catalog items whose name matches a search term.
///
/// Cloning restarts the scan from the position of the clone, so a fresh
/// [`filter`] result can be walked any number of times.
#[derive(Debug, Clone)]
pub struct Filtered<'a> {
    items: slice::Iter<'a, Item>,
    needle: String,
}

impl<'a> Iterator for Filtered<'a> {
    type Item = &'a Item;

    fn next(&mut self) -> Option<Self::Item> {
        let needle = self.needle.as_str();
        self.items
            .by_ref()
            .find(|item| needle.is_empty() || item.name().to_lowercase().contains(needle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.items.size_hint().1)
    }
}

/// Case-insensitive substring match on item names, in catalog order.
///
/// An empty term matches every item.
pub fn filter<'a>(catalog: &'a CatalogIndex, search_term: &str) -> Filtered<'a> {
    Filtered {
        items: catalog.all().iter(),
        needle: search_term.to_lowercase(),
    }
}

// ============================================================================
// Grouped View
// ============================================================================

/// One category section of the grouped view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup<'a> {
    pub label: &'a str,
    pub items: Vec<&'a Item>,
}

impl CategoryGroup<'_> {
    pub fn ids(&self) -> impl Iterator<Item = crate::catalog::ItemId> + '_ {
        self.items.iter().map(|item| item.id())
    }
}

/// Items partitioned by category label.
///
/// Groups appear in the order their label is first encountered; items keep
/// the order they were fed in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GroupedView<'a> {
    groups: Vec<CategoryGroup<'a>>,
}

impl<'a> GroupedView<'a> {
    pub fn groups(&self) -> &[CategoryGroup<'a>] {
        &self.groups
    }

    pub fn iter(&self) -> slice::Iter<'_, CategoryGroup<'a>> {
        self.groups.iter()
    }

    pub fn get(&self, label: &str) -> Option<&CategoryGroup<'a>> {
        self.groups.iter().find(|group| group.label == label)
    }

    pub fn labels(&self) -> Vec<&'a str> {
        self.groups.iter().map(|group| group.label).collect()
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of items across all groups.
    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|group| group.items.len()).sum()
    }

    /// Concatenate every group's items back into one sequence.
    pub fn flatten(&self) -> Vec<&'a Item> {
        self.groups
            .iter()
            .flat_map(|group| group.items.iter().copied())
            .collect()
    }
}

impl<'a> IntoIterator for GroupedView<'a> {
    type Item = CategoryGroup<'a>;
    type IntoIter = std::vec::IntoIter<CategoryGroup<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl<'v, 'a> IntoIterator for &'v GroupedView<'a> {
    type Item = &'v CategoryGroup<'a>;
    type IntoIter = slice::Iter<'v, CategoryGroup<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Partition items by [`Item::category_label`].
pub fn group<'a, I>(items: I) -> GroupedView<'a>
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut groups: Vec<CategoryGroup<'a>> = Vec::new();
    let mut slots: HashMap<&'a str, usize> = HashMap::new();

    for item in items {
        let label = item.category_label();
        let slot = *slots.entry(label).or_insert_with(|| {
            groups.push(CategoryGroup {
                label,
                items: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].items.push(item);
    }

    GroupedView { groups }
}
