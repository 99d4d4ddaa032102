use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::ItemId;
use crate::selection::SelectionState;

// ============================================================================
// Scope
// ============================================================================

/// Which items a tax rule targets.
///
/// The form sends `"all"` for the whole catalog; every other value means
/// "the items I selected". Serialized output uses `"all"` / `"some"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppliesTo {
    #[serde(rename = "all")]
    All,
    #[default]
    #[serde(rename = "some", alias = "specific")]
    SomeSelected,
}

impl AppliesTo {
    /// Map a raw form value: `"all"` is [`AppliesTo::All`], anything else is
    /// [`AppliesTo::SomeSelected`].
    pub fn from_form_value(value: &str) -> Self {
        if value == "all" {
            AppliesTo::All
        } else {
            AppliesTo::SomeSelected
        }
    }

    /// Value of the radio button that selects this scope.
    pub fn form_value(self) -> &'static str {
        match self {
            AppliesTo::All => "all",
            AppliesTo::SomeSelected => "specific",
        }
    }

    /// Value written to the `applied to` field of a submitted rule.
    pub fn as_str(self) -> &'static str {
        match self {
            AppliesTo::All => "all",
            AppliesTo::SomeSelected => "some",
        }
    }
}

impl FromStr for AppliesTo {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_form_value(s))
    }
}

impl fmt::Display for AppliesTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Form Input
// ============================================================================

/// Draft values of the form at submit time.
///
/// `rate` is the raw text of the rate field: a whole-number percentage such
/// as `"7"`. Blank text counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxRuleInput {
    pub name: String,
    pub rate: String,
    pub applies_to: AppliesTo,
    pub selection: SelectionState,
}

// ============================================================================
// Field Errors
// ============================================================================

/// Form field a [`FieldError`] is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Field {
    #[serde(rename = "taxName")]
    Name,
    #[serde(rename = "taxRate")]
    Rate,
    #[serde(rename = "items")]
    Items,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "taxName",
            Field::Rate => "taxRate",
            Field::Items => "items",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldErrorKind {
    Required,
    NotANumber,
    MustBePositive,
    MustBeInteger,
    ExceedsMaximum,
    MinimumSelection,
}

/// A user-facing validation failure on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub kind: FieldErrorKind,
    pub message: &'static str,
}

impl FieldError {
    pub fn new(field: Field, kind: FieldErrorKind) -> Self {
        Self {
            field,
            kind,
            message: message_for(field, kind),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn message_for(field: Field, kind: FieldErrorKind) -> &'static str {
    use FieldErrorKind::*;
    match (field, kind) {
        (Field::Name, _) => "Tax Name is required",
        (Field::Rate, Required) => "Tax Rate is required",
        (Field::Rate, NotANumber) => "Tax Rate must be a number",
        (Field::Rate, MustBePositive) => "Tax Rate must be positive",
        (Field::Rate, MustBeInteger) => "Tax Rate must be an integer",
        (Field::Rate, ExceedsMaximum) => "Tax Rate cannot exceed 100",
        (Field::Rate, MinimumSelection) | (Field::Items, _) => {
            "You must select at least one item"
        }
    }
}

// ============================================================================
// Submission Record
// ============================================================================

/// A validated tax rule, ready to hand to whatever consumes submissions.
///
/// Serialized field names are a stable contract: `applicable items`,
/// `applied to`, `name`, `rate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxRule {
    #[serde(rename = "applicable items")]
    pub item_ids: Vec<ItemId>,
    #[serde(rename = "applied to")]
    pub applies_to: AppliesTo,
    pub name: String,
    /// Decimal fraction in `(0, 1]`.
    pub rate: f64,
}

impl fmt::Display for TaxRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<String> = self.item_ids.iter().map(ItemId::to_string).collect();
        writeln!(f, "Applicable Items: {}", ids.join(", "))?;
        writeln!(f, "Applied To: {}", self.applies_to)?;
        writeln!(f, "Name: {}", self.name)?;
        write!(f, "Rate: {}", self.rate)
    }
}
