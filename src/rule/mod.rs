//! Tax rule validation and the submission record it produces.

mod types;
mod validate;

pub use types::{AppliesTo, Field, FieldError, FieldErrorKind, TaxRule, TaxRuleInput};
pub use validate::{parse_rate, resolve_items, validate};
