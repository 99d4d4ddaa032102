//! One editing session of the tax form.
//!
//! `FormSession` owns the only mutable state in the crate: the selection,
//! the search term, the draft field values and the Editing/Submitted phase.
//! It forwards events to the pure selection and validation functions and
//! keeps their results.
use thiserror::Error;

use crate::catalog::{CatalogIndex, ItemId};
use crate::config::Config;
use crate::rule::{self, AppliesTo, Field, FieldError, TaxRule, TaxRuleInput};
use crate::selection::{self, CheckState, GroupedView, SelectionError, SelectionState};
use crate::util::{cap_chars, strip_control_chars};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("The form was already submitted; reset it before editing")]
    AlreadySubmitted,

    #[error("No category named '{0}' in the current view")]
    UnknownCategory(String),

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

// ============================================================================
// Form Phase
// ============================================================================

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum FormPhase {
    /// Accepting edits. `errors` holds the result of the last failed submit.
    Editing { errors: Vec<FieldError> },
    /// A rule was accepted. Only [`FormSession::reset`] leaves this phase.
    Submitted(TaxRule),
}

impl Default for FormPhase {
    fn default() -> Self {
        FormPhase::Editing { errors: Vec::new() }
    }
}

// ============================================================================
// FormSession
// ============================================================================

pub struct FormSession {
    catalog: CatalogIndex,
    default_applies_to: AppliesTo,
    max_search_length: usize,

    search: String,
    draft: TaxRuleInput,
    phase: FormPhase,
}

impl FormSession {
    /// Start an empty session over `catalog`.
    pub fn new(catalog: CatalogIndex, config: &Config) -> Self {
        tracing::debug!(
            items = catalog.len(),
            applies_to = %config.default_applies_to,
            "Form session started"
        );
        Self {
            catalog,
            default_applies_to: config.default_applies_to,
            max_search_length: config.max_search_length,
            search: String::new(),
            draft: TaxRuleInput {
                applies_to: config.default_applies_to,
                ..TaxRuleInput::default()
            },
            phase: FormPhase::default(),
        }
    }

    pub fn catalog(&self) -> &CatalogIndex {
        &self.catalog
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self.phase, FormPhase::Submitted(_))
    }

    /// The accepted rule, once submitted.
    pub fn submitted_rule(&self) -> Option<&TaxRule> {
        match &self.phase {
            FormPhase::Submitted(rule) => Some(rule),
            FormPhase::Editing { .. } => None,
        }
    }

    pub fn selection(&self) -> &SelectionState {
        &self.draft.selection
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn draft(&self) -> &TaxRuleInput {
        &self.draft
    }

    // ========================================================================
    // View
    // ========================================================================

    /// Filtered, grouped items for the current search term.
    pub fn view(&self) -> GroupedView<'_> {
        selection::group(selection::filter(&self.catalog, &self.search))
    }

    /// Check state of every category in the current view, in view order.
    pub fn category_states(&self) -> Vec<(&str, CheckState)> {
        self.view()
            .into_iter()
            .map(|group| {
                let state = selection::category_check_state(
                    &self.draft.selection,
                    group.items.iter().copied(),
                );
                (group.label, state)
            })
            .collect()
    }

    /// Errors from the last failed submit that belong to `field`.
    pub fn errors_for(&self, field: Field) -> Vec<&FieldError> {
        match &self.phase {
            FormPhase::Editing { errors } => errors.iter().filter(|e| e.field == field).collect(),
            FormPhase::Submitted(_) => Vec::new(),
        }
    }

    /// All errors from the last failed submit.
    pub fn errors(&self) -> &[FieldError] {
        match &self.phase {
            FormPhase::Editing { errors } => errors,
            FormPhase::Submitted(_) => &[],
        }
    }

    /// Caption of the submit button.
    pub fn submit_label(&self) -> String {
        format!("Apply tax to {} item(s)", self.draft.selection.len())
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Replace the search term. Control characters are stripped and the term
    /// is cut to the configured maximum length. Spaces are kept as typed.
    pub fn set_search(&mut self, term: &str) -> Result<(), FormError> {
        self.ensure_editing()?;
        let cleaned = strip_control_chars(term);
        let capped = cap_chars(&cleaned, self.max_search_length);
        if capped.len() < cleaned.len() {
            tracing::debug!(
                max = self.max_search_length,
                "Search term exceeds maximum length, truncated"
            );
        }
        self.search = capped.to_string();
        tracing::debug!(search = %self.search, "Search term changed");
        Ok(())
    }

    /// Flip one item. Ids missing from the catalog leave the selection
    /// unchanged and are reported back as [`FormError::Selection`].
    pub fn toggle_item(&mut self, item_id: ItemId) -> Result<(), FormError> {
        self.ensure_editing()?;
        match selection::toggle_item(&self.draft.selection, &self.catalog, item_id) {
            Ok(next) => {
                self.draft.selection = next;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(item_id, "Ignoring toggle of unknown item");
                Err(e.into())
            }
        }
    }

    /// Check or uncheck the category checkbox labelled `label`.
    ///
    /// Only items visible under the current search are affected, the same as
    /// clicking the checkbox in the rendered view.
    pub fn toggle_category(&mut self, label: &str, checked: bool) -> Result<(), FormError> {
        self.ensure_editing()?;
        let next = {
            let view = self.view();
            let group = view
                .get(label)
                .ok_or_else(|| FormError::UnknownCategory(label.to_string()))?;
            selection::toggle_category(
                &self.draft.selection,
                group.items.iter().copied(),
                checked,
            )
        };
        tracing::debug!(label, checked, selected = next.len(), "Category toggled");
        self.draft.selection = next;
        Ok(())
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), FormError> {
        self.ensure_editing()?;
        self.draft.name = name.to_string();
        Ok(())
    }

    pub fn set_rate(&mut self, rate: &str) -> Result<(), FormError> {
        self.ensure_editing()?;
        self.draft.rate = rate.to_string();
        Ok(())
    }

    pub fn set_applies_to(&mut self, applies_to: AppliesTo) -> Result<(), FormError> {
        self.ensure_editing()?;
        self.draft.applies_to = applies_to;
        Ok(())
    }

    /// Validate the draft.
    ///
    /// Success moves the session to Submitted and returns the rule. Failure
    /// keeps the session in Editing with the errors stored for
    /// [`errors_for`](Self::errors_for), and returns them.
    pub fn submit(&mut self) -> Result<&TaxRule, Vec<FieldError>> {
        if !self.is_submitted() {
            match rule::validate(&self.draft, &self.catalog) {
                Ok(accepted) => {
                    tracing::info!(
                        name = %accepted.name,
                        rate = accepted.rate,
                        applies_to = %accepted.applies_to,
                        items = accepted.item_ids.len(),
                        "Tax rule submitted"
                    );
                    self.phase = FormPhase::Submitted(accepted);
                }
                Err(errors) => {
                    tracing::warn!(errors = errors.len(), "Tax rule rejected");
                    self.phase = FormPhase::Editing {
                        errors: errors.clone(),
                    };
                    return Err(errors);
                }
            }
        }

        match &self.phase {
            FormPhase::Submitted(rule) => Ok(rule),
            FormPhase::Editing { errors } => Err(errors.clone()),
        }
    }

    /// Return to a fresh Editing phase with an empty selection, search and
    /// draft. The catalog is kept.
    pub fn reset(&mut self) {
        self.search.clear();
        self.draft = TaxRuleInput {
            applies_to: self.default_applies_to,
            ..TaxRuleInput::default()
        };
        self.phase = FormPhase::default();
        tracing::debug!("Form session reset");
    }

    fn ensure_editing(&self) -> Result<(), FormError> {
        if self.is_submitted() {
            return Err(FormError::AlreadySubmitted);
        }
        Ok(())
    }
}
