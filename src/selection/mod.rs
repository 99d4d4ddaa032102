//! Selection engine: search filtering, category grouping and the selected-id
//! set with per-item and per-category toggles.
//!
//! Every operation is a pure function. State goes in by reference and a new
//! value comes out, so transitions can be tested without any UI harness.
//!
//! ```
//! use taxform::catalog::CatalogIndex;
//! use taxform::selection::{self, CheckState, SelectionState};
//!
//! let catalog = CatalogIndex::sample();
//! let view = selection::group(selection::filter(&catalog, "bracelet"));
//! let bracelets = view.get("Bracelets").unwrap();
//!
//! let s = selection::toggle_category(&SelectionState::new(), bracelets.items.iter().copied(), true);
//! assert_eq!(
//!     selection::category_check_state(&s, bracelets.items.iter().copied()),
//!     CheckState::Checked
//! );
//! ```

mod state;
mod view;

pub use state::{
    category_check_state, toggle_category, toggle_item, CheckState, SelectionError,
    SelectionState,
};
pub use view::{filter, group, CategoryGroup, Filtered, GroupedView};
