//! Plain-text rendering of a form session.
//!
//! This is the presentation collaborator used by the command-line front end.
//! It only reads engine output; nothing here feeds back into selection or
//! validation.
use std::fmt::Write;

use crate::config::Config;
use crate::form::FormSession;
use crate::rule::FieldError;
use crate::selection::{self, CheckState, GroupedView, SelectionState};
use crate::util::{display_width, truncate_to_width};

/// Presentation choices for [`render_view`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Show partially selected categories as `[-]`. When false they render
    /// as `[ ]`, like a plain "every item selected" checkbox.
    pub show_indeterminate: bool,
    /// Columns available for an item name.
    pub name_width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for RenderOptions {
    fn from(config: &Config) -> Self {
        Self {
            show_indeterminate: config.show_indeterminate,
            name_width: config.name_width,
        }
    }
}

fn checkbox(state: CheckState, opts: RenderOptions) -> &'static str {
    match state {
        CheckState::Checked => "[x]",
        CheckState::Indeterminate if opts.show_indeterminate => "[-]",
        CheckState::Indeterminate | CheckState::Unchecked => "[ ]",
    }
}

/// Render the grouped view as an indented checkbox list.
///
/// ```text
/// [-] Bracelets
///     [x] Jasinthe Bracelet  #14865
///     [ ] Inspire Bracelet   #14870
/// ```
pub fn render_view(
    view: &GroupedView<'_>,
    selected: &SelectionState,
    opts: RenderOptions,
) -> String {
    // Pad names to the widest one shown so the ids line up.
    let column = view
        .iter()
        .flat_map(|group| group.items.iter())
        .map(|item| display_width(item.name()).min(opts.name_width))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for group in view {
        let state = selection::category_check_state(selected, group.items.iter().copied());
        let _ = writeln!(out, "{} {}", checkbox(state, opts), group.label);

        for item in &group.items {
            let mark = if selected.contains(item.id()) {
                "[x]"
            } else {
                "[ ]"
            };
            let name = truncate_to_width(item.name(), opts.name_width);
            let pad = column.saturating_sub(display_width(&name));
            let _ = writeln!(
                out,
                "    {} {}{}  #{}",
                mark,
                name,
                " ".repeat(pad),
                item.id()
            );
        }
    }
    out
}

/// Render one line per field error.
pub fn render_errors(errors: &[FieldError]) -> String {
    errors.iter().fold(String::new(), |mut out, error| {
        let _ = writeln!(out, "{}", error);
        out
    })
}

/// Render the session's current view followed by the submit button caption.
pub fn render_session(session: &FormSession, opts: RenderOptions) -> String {
    let view = session.view();
    let mut out = if view.is_empty() {
        format!("No items match '{}'\n", session.search())
    } else {
        render_view(&view, session.selection(), opts)
    };
    let _ = writeln!(out, "\n{}", session.submit_label());
    out
}
