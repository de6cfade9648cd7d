//! Text Mutation Primitives
//!
//! Every content change the editor makes is expressed through the four
//! primitives here, each operating on a [`TextSurface`] and returning the
//! new (always collapsed) selection:
//!
//! - [`insert_text`]: replace the selection with text
//! - [`wrap_selection`]: surround the selection with delimiters
//! - [`replace_current_line`]: rewrite the whole line under the caret
//! - [`delete_previous_char`]: remove the character before the selection
//!
//! # Usage
//! ```ignore
//! use crate::editor::mutator::wrap_selection;
//! use crate::editor::selection::{Selection, TextBuffer};
//!
//! let mut buffer = TextBuffer::with_selection("Hello world", Selection::new(0, 5));
//! wrap_selection(&mut buffer, "**", "**");
//! assert_eq!(buffer.text(), "**Hello** world");
//! ```

use crate::editor::selection::{line_bounds, Selection, TextSurface};
use crate::string_utils::{byte_index_to_char_index, floor_char_boundary, prev_char_boundary};
use log::debug;

// ─────────────────────────────────────────────────────────────────────────────
// Auto-Markdown Triggers
// ─────────────────────────────────────────────────────────────────────────────

/// Line prefixes that turn into block markers when followed by a space.
///
/// Matching is exact: `##x` is not a trigger. There is deliberately no `1.`
/// entry; numbered lists are only reachable from the palette.
pub const AUTO_MARKDOWN_TRIGGERS: &[(&str, &str)] = &[
    ("#", "# "),
    ("##", "## "),
    ("###", "### "),
    ("-", "- "),
    (">", "> "),
];

/// The replacement line for `line_prefix`, if it is an auto-markdown trigger.
pub fn auto_markdown_replacement(line_prefix: &str) -> Option<&'static str> {
    AUTO_MARKDOWN_TRIGGERS
        .iter()
        .find(|(trigger, _)| *trigger == line_prefix)
        .map(|(_, replacement)| *replacement)
}

// ─────────────────────────────────────────────────────────────────────────────
// Primitives
// ─────────────────────────────────────────────────────────────────────────────

/// Replace the current selection with `text` and put the caret after it.
pub fn insert_text<S: TextSurface + ?Sized>(surface: &mut S, text: &str) -> Selection {
    let range = surface.selection();
    surface.replace_range(range, text);

    let caret = Selection::caret(range.start + text.len());
    surface.set_selection(caret);
    debug!(
        "insert_text: {} bytes at {} (replaced {})",
        text.len(),
        range.start,
        range.len()
    );
    caret
}

/// Surround the current selection with `before` and `after`.
///
/// A collapsed selection wraps the empty string. The caret ends up after
/// the closing delimiter; the wrapped span is not re-selected.
pub fn wrap_selection<S: TextSurface + ?Sized>(
    surface: &mut S,
    before: &str,
    after: &str,
) -> Selection {
    let range = surface.selection();
    let wrapped = format!("{}{}{}", before, surface.text_at(range), after);
    surface.replace_range(range, &wrapped);

    let caret = Selection::caret(range.start + wrapped.len());
    surface.set_selection(caret);
    debug!("wrap_selection: {}..{} with {:?}", range.start, range.end, before);
    caret
}

/// Replace the whole line holding the caret with `replacement`.
pub fn replace_current_line<S: TextSurface + ?Sized>(
    surface: &mut S,
    replacement: &str,
) -> Selection {
    let (start, end) = line_bounds(surface);
    surface.replace_range(Selection::new(start, end), replacement);

    let caret = Selection::caret(start + replacement.len());
    surface.set_selection(caret);
    debug!("replace_current_line: {}..{} -> {:?}", start, end, replacement);
    caret
}

/// Delete the single character before the start of the selection.
///
/// Returns `None` (and leaves the surface untouched) at document start.
pub fn delete_previous_char<S: TextSurface + ?Sized>(surface: &mut S) -> Option<Selection> {
    let start = surface.selection().start;
    if start == 0 {
        return None;
    }

    let from = prev_char_boundary(surface.text(), start);
    surface.replace_range(Selection::new(from, start), "");

    let caret = Selection::caret(from);
    surface.set_selection(caret);
    debug!("delete_previous_char: {}..{}", from, start);
    Some(caret)
}

/// Move the caret up by `lines`, keeping its column where the target line allows.
///
/// Stops at the first line. The selection is collapsed at its start first.
pub fn move_caret_up<S: TextSurface + ?Sized>(surface: &mut S, lines: usize) -> Selection {
    let text = surface.text();
    let caret = surface.selection().start;

    let mut line_begin = text[..caret].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = byte_index_to_char_index(&text[line_begin..], caret - line_begin);

    for _ in 0..lines {
        if line_begin == 0 {
            break;
        }
        // line_begin - 1 is the newline ending the previous line
        line_begin = text[..line_begin - 1]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0);
    }

    let line = &text[line_begin..];
    let line = &line[..line.find('\n').unwrap_or(line.len())];
    let target = line
        .char_indices()
        .nth(column)
        .map(|(i, _)| line_begin + i)
        .unwrap_or(line_begin + line.len());

    let caret = Selection::caret(floor_char_boundary(text, target));
    surface.set_selection(caret);
    caret
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
