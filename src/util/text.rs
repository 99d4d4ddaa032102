use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Ellipsis appended to names cut by [`truncate_to_width`].
const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Removes control characters and ANSI escape sequences.
///
/// Catalog names and search terms come from outside the process and end up
/// printed to a terminal, so anything that can move the cursor or recolor
/// output is dropped. Tabs are kept; other whitespace is left alone.
///
/// Returns `Cow::Borrowed` when the input is already clean.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(|c| c.is_control() && c != '\t') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\x1b' => match chars.peek() {
                // CSI: parameters until a final byte in @..~
                Some('[') => {
                    chars.next();
                    for next in chars.by_ref() {
                        if ('\x40'..='\x7e').contains(&next) {
                            break;
                        }
                    }
                }
                // OSC: until BEL or ST
                Some(']') => {
                    chars.next();
                    while let Some(next) = chars.next() {
                        if next == '\x07' {
                            break;
                        }
                        if next == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            },
            '\t' => out.push(c),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// [`strip_control_chars`] followed by trimming surrounding whitespace.
///
/// ```
/// use taxform::util::sanitize_label;
///
/// assert_eq!(sanitize_label("  Bracelets "), "Bracelets");
/// assert_eq!(sanitize_label("\x1b[31mRed\x1b[0m Bracelet"), "Red Bracelet");
/// ```
pub fn sanitize_label(s: &str) -> Cow<'_, str> {
    match strip_control_chars(s) {
        Cow::Borrowed(clean) => Cow::Borrowed(clean.trim()),
        Cow::Owned(clean) => Cow::Owned(clean.trim().to_owned()),
    }
}

/// Caps `s` at `max_chars` characters without splitting a code point.
pub fn cap_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}

/// Number of terminal columns `s` occupies.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncates `s` to at most `max_width` terminal columns, appending "..."
/// when something was cut.
///
/// Widths too narrow for an ellipsis keep whatever characters fit.
///
/// ```
/// use taxform::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Jasinthe Bracelet", 20), "Jasinthe Bracelet");
/// assert_eq!(truncate_to_width("Jasinthe Bracelet", 11), "Jasinthe...");
/// assert_eq!(truncate_to_width("Jasinthe Bracelet", 2), "Ja");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let (budget, suffix) = if max_width > ELLIPSIS_WIDTH {
        (max_width - ELLIPSIS_WIDTH, ELLIPSIS)
    } else {
        (max_width, "")
    };

    let mut used = 0;
    let mut cut = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        cut = idx + c.len_utf8();
    }

    Cow::Owned(format!("{}{}", &s[..cut], suffix))
}
