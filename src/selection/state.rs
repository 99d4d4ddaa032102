use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;

use crate::catalog::{CatalogIndex, Item, ItemId};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The id is not in the catalog. The UI should only ever offer catalog
    /// ids, so callers treat this as a no-op rather than a failure.
    #[error("Item {0} is not in the catalog")]
    UnknownItem(ItemId),
}

// ============================================================================
// Selection State
// ============================================================================

/// Set of selected item ids.
///
/// Values are immutable from the outside: every transition goes through
/// [`toggle_item`] or [`toggle_category`] and yields a new state. The set is
/// ordered by id so equality and debug output are deterministic; callers
/// that need catalog order use [`SelectionState::in_catalog_order`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectionState {
    ids: BTreeSet<ItemId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.ids.iter().copied()
    }

    /// Selected ids in the order the catalog lists them.
    pub fn in_catalog_order(&self, catalog: &CatalogIndex) -> Vec<ItemId> {
        catalog
            .all()
            .iter()
            .map(Item::id)
            .filter(|id| self.ids.contains(id))
            .collect()
    }
}

/// Flip membership of `item_id`.
///
/// Ids missing from `catalog` are rejected with
/// [`SelectionError::UnknownItem`], which keeps every selection a subset of
/// the catalog.
pub fn toggle_item(
    selection: &SelectionState,
    catalog: &CatalogIndex,
    item_id: ItemId,
) -> Result<SelectionState, SelectionError> {
    if !catalog.contains(item_id) {
        return Err(SelectionError::UnknownItem(item_id));
    }

    let mut ids = selection.ids.clone();
    if !ids.remove(&item_id) {
        ids.insert(item_id);
    }
    Ok(SelectionState { ids })
}

/// Select (`checked`) or deselect every item of a category group.
///
/// Checking is a union with the group's ids; unchecking is a difference.
/// Ids outside the group are never touched.
pub fn toggle_category<'a, I>(
    selection: &SelectionState,
    category_items: I,
    checked: bool,
) -> SelectionState
where
    I: IntoIterator<Item = &'a Item>,
{
    let group: BTreeSet<ItemId> = category_items.into_iter().map(Item::id).collect();
    let ids = if checked {
        selection.ids.union(&group).copied().collect()
    } else {
        selection.ids.difference(&group).copied().collect()
    };
    SelectionState { ids }
}

// ============================================================================
// Category Check State
// ============================================================================

/// Tri-state value of a category's bulk-select checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    Checked,
    Unchecked,
    Indeterminate,
}

impl CheckState {
    /// Boolean "every item selected" view of the state, for front ends that
    /// render a plain checkbox.
    pub fn is_checked(self) -> bool {
        self == CheckState::Checked
    }
}

/// Derive a category checkbox from the selection.
///
/// An empty group reports `Checked`, matching "every item is selected"
/// semantics. Groups produced by [`group`](super::group) are never empty.
pub fn category_check_state<'a, I>(selection: &SelectionState, category_items: I) -> CheckState
where
    I: IntoIterator<Item = &'a Item>,
{
    let (mut selected, mut total) = (0usize, 0usize);
    for item in category_items {
        total += 1;
        if selection.contains(item.id()) {
            selected += 1;
        }
    }

    if selected == total {
        CheckState::Checked
    } else if selected == 0 {
        CheckState::Unchecked
    } else {
        CheckState::Indeterminate
    }
}
