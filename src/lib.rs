//! Engine behind an "Add Tax" form: a catalog of items, a selection that can
//! be toggled per item or per category, and a validator that turns the form
//! draft into a [`rule::TaxRule`] submission record.
//!
//! The engine is UI-agnostic. A front end feeds events (search input,
//! checkbox toggles, submit) into a [`form::FormSession`] and renders what
//! comes back.
//!
//! ```
//! use taxform::catalog::CatalogIndex;
//! use taxform::config::Config;
//! use taxform::form::FormSession;
//!
//! let mut session = FormSession::new(CatalogIndex::sample(), &Config::default());
//! session.set_search("bracelet").unwrap();
//! session.toggle_category("Bracelets", true).unwrap();
//! session.set_name("VAT").unwrap();
//! session.set_rate("7").unwrap();
//!
//! let rule = session.submit().unwrap();
//! assert_eq!(rule.item_ids, vec![14865, 14867, 14870]);
//! ```

pub mod catalog;
pub mod config;
pub mod form;
pub mod render;
pub mod rule;
pub mod selection;
pub mod util;
