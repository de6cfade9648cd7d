//! Selection tracking for the editor surface.
//!
//! The editing core never talks to a rendering surface directly. Everything
//! it needs from one (the current selection, text lookup, range
//! replacement and a caret rectangle for anchoring popups) goes through the
//! [`TextSurface`] trait. [`TextBuffer`] is the in-memory implementation
//! used by the stdio host and by tests.
//!
//! Offsets are byte offsets into the UTF-8 document. Any offset coming in
//! from outside is clamped to the document and snapped to a character
//! boundary, so no selection can ever point into the middle of a character.

use crate::string_utils::{
    byte_index_to_char_index, ceil_char_boundary, floor_char_boundary, safe_slice,
};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Selection
// ─────────────────────────────────────────────────────────────────────────────

/// A range `[start, end)` into the document text.
///
/// Collapsed (a caret) when `start == end`. Constructors keep
/// `start <= end`; bounding against the document happens in the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Create a selection, swapping the ends if they are reversed.
    pub fn new(start: usize, end: usize) -> Self {
        if start > end {
            Self {
                start: end,
                end: start,
            }
        } else {
            Self { start, end }
        }
    }

    /// A collapsed selection at `offset`.
    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }

    /// Order, clamp into `text` and snap both ends to character boundaries.
    ///
    /// Reversed ends are swapped first, so a selection built from its fields
    /// or deserialized behaves like one from [`Selection::new`]. A caret is
    /// floored. For a range the start is floored and the end is ceiled so
    /// that a partially covered character ends up fully inside.
    pub fn clamp_to(self, text: &str) -> Self {
        let ordered = Self::new(self.start, self.end);
        let start = floor_char_boundary(text, ordered.start);
        if ordered.is_collapsed() {
            return Self::caret(start);
        }
        let end = ceil_char_boundary(text, ordered.end);
        Self::new(start, end.max(start))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Caret Geometry
// ─────────────────────────────────────────────────────────────────────────────

/// Bounding rectangle of the current selection, in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CaretRect {
    pub left: f32,
    pub top: f32,
    pub bottom: f32,
}

/// Cell metrics used by [`TextBuffer`] to fake a layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    pub line_height: f32,
    pub char_width: f32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            line_height: 20.0,
            char_width: 8.0,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Text Surface Abstraction
// ─────────────────────────────────────────────────────────────────────────────

/// The minimal view of an editable surface the editing core relies on.
///
/// Implementors own the text and the live selection. Implementations must
/// keep `0 <= start <= end <= text().len()` at all times and must accept
/// arbitrary (out-of-range or mid-character) ranges by clamping them.
pub trait TextSurface {
    /// Full document text.
    fn text(&self) -> &str;

    /// Current selection.
    fn selection(&self) -> Selection;

    /// Move the selection. Out-of-range values are clamped.
    fn set_selection(&mut self, selection: Selection);

    /// Replace the text covered by `range` with `text`.
    ///
    /// The selection is left for the caller to position; implementations
    /// only re-clamp it so that it stays inside the new text.
    fn replace_range(&mut self, range: Selection, text: &str);

    /// Bounding rectangle of the current selection.
    fn caret_rect(&self) -> CaretRect;

    /// Text covered by `range`, clamped to the document.
    fn text_at(&self, range: Selection) -> &str {
        if range.is_collapsed() {
            return "";
        }
        safe_slice(self.text(), range.start, range.end)
    }

    fn len(&self) -> usize {
        self.text().len()
    }

    fn is_empty(&self) -> bool {
        self.text().is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// In-Memory Text Buffer
// ─────────────────────────────────────────────────────────────────────────────

/// A plain `String` plus a selection.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    text: String,
    selection: Selection,
    metrics: LayoutMetrics,
}

impl TextBuffer {
    /// Create a buffer holding `text` with the caret at the start.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            selection: Selection::default(),
            metrics: LayoutMetrics::default(),
        }
    }

    /// Create a buffer with the given selection (clamped).
    pub fn with_selection(text: impl Into<String>, selection: Selection) -> Self {
        let mut buffer = Self::new(text);
        buffer.set_selection(selection);
        buffer
    }

    /// Use different layout metrics for caret geometry.
    pub fn with_metrics(mut self, metrics: LayoutMetrics) -> Self {
        self.metrics = metrics;
        self
    }
}

impl TextSurface for TextBuffer {
    fn text(&self) -> &str {
        &self.text
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn set_selection(&mut self, selection: Selection) {
        self.selection = selection.clamp_to(&self.text);
    }

    fn replace_range(&mut self, range: Selection, text: &str) {
        let range = range.clamp_to(&self.text);
        self.text.replace_range(range.start..range.end, text);
        self.selection = self.selection.clamp_to(&self.text);
    }

    fn caret_rect(&self) -> CaretRect {
        let caret = self.selection.start;
        let before = &self.text[..caret];
        let line = before.matches('\n').count();
        let line_begin = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = byte_index_to_char_index(&self.text[line_begin..], caret - line_begin);

        let top = line as f32 * self.metrics.line_height;
        CaretRect {
            left: column as f32 * self.metrics.char_width,
            top,
            bottom: top + self.metrics.line_height,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Selection Tracker
// ─────────────────────────────────────────────────────────────────────────────

/// Text of the current line from its beginning up to `offset`.
///
/// Empty for an empty document or a caret at the start of a line.
pub fn line_prefix_at(text: &str, offset: usize) -> &str {
    let offset = floor_char_boundary(text, offset);
    let head = &text[..offset];
    match head.rfind('\n') {
        Some(i) => &head[i + 1..],
        None => head,
    }
}

/// Bounds of the line containing `offset`.
///
/// `start` is just after the preceding newline (or 0); `end` is the index
/// of the next newline (or the end of the text). An empty document yields
/// `(0, 0)`.
pub fn line_bounds_at(text: &str, offset: usize) -> (usize, usize) {
    let offset = floor_char_boundary(text, offset);
    let start = text[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let end = text[offset..]
        .find('\n')
        .map(|i| offset + i)
        .unwrap_or(text.len());
    (start, end)
}

/// Line prefix up to the start of the surface's current selection.
pub fn line_start<S: TextSurface + ?Sized>(surface: &S) -> &str {
    line_prefix_at(surface.text(), surface.selection().start)
}

/// Bounds of the line holding the start of the surface's current selection.
pub fn line_bounds<S: TextSurface + ?Sized>(surface: &S) -> (usize, usize) {
    line_bounds_at(surface.text(), surface.selection().start)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
