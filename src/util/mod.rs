//! Text helpers shared by catalog loading, search handling and rendering.
//!
//! - **Sanitizing**: strip control characters and escape sequences from
//!   externally supplied names and search terms
//! - **Measuring**: Unicode-aware display width and truncation for the
//!   plain-text renderer

mod text;

pub use text::{cap_chars, display_width, sanitize_label, strip_control_chars, truncate_to_width};

/// Default maximum search term length, in characters.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
