//! UTF-8 Safe Offset Utilities
//!
//! Selection offsets cross the host boundary as plain byte positions, and a
//! host is free to hand us a position that lands inside a multi-byte
//! character (`ø`, `中`, `🎉`). Slicing there would panic, so every offset is
//! snapped to a character boundary through these helpers before use.
//!
//! # Example
//! ```ignore
//! use crate::string_utils::{floor_char_boundary, prev_char_boundary};
//!
//! let text = "Hei på deg";
//! assert_eq!(floor_char_boundary(text, 6), 5);
//! assert_eq!(prev_char_boundary(text, 7), 5);
//! ```

// ─────────────────────────────────────────────────────────────────────────────
// Character Boundary Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Largest character boundary that is `<= index`, clamped to `s.len()`.
#[inline]
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }

    let bytes = s.as_bytes();
    let mut i = index;
    while i > 0 && !is_utf8_char_start(bytes[i]) {
        i -= 1;
    }
    i
}

/// Smallest character boundary that is `>= index`, clamped to `s.len()`.
#[inline]
pub fn ceil_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }

    let bytes = s.as_bytes();
    let mut i = index;
    while i < bytes.len() && !is_utf8_char_start(bytes[i]) {
        i += 1;
    }
    i
}

/// Boundary of the character immediately before `index`.
///
/// Returns 0 when `index` is already at the start of the string.
#[inline]
pub fn prev_char_boundary(s: &str, index: usize) -> usize {
    let index = floor_char_boundary(s, index);
    s[..index]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// A byte starts a character unless it is a continuation byte (10xxxxxx).
#[inline]
fn is_utf8_char_start(byte: u8) -> bool {
    (byte & 0b1100_0000) != 0b1000_0000
}

// ─────────────────────────────────────────────────────────────────────────────
// Slicing and Counting
// ─────────────────────────────────────────────────────────────────────────────

/// Slice `s[start..end]` after snapping start down and end up.
///
/// Returns an empty string when the adjusted range is empty or inverted.
#[inline]
pub fn safe_slice(s: &str, start: usize, end: usize) -> &str {
    let start = floor_char_boundary(s, start);
    let end = ceil_char_boundary(s, end);

    if start >= end {
        return "";
    }

    &s[start..end]
}

/// Number of characters before `byte_index` (which is floored first).
pub fn byte_index_to_char_index(s: &str, byte_index: usize) -> usize {
    let byte_index = floor_char_boundary(s, byte_index);
    s[..byte_index].chars().count()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_ascii() {
        let s = "Hello";
        assert_eq!(floor_char_boundary(s, 0), 0);
        assert_eq!(floor_char_boundary(s, 2), 2);
        assert_eq!(floor_char_boundary(s, 10), 5);
    }

    #[test]
    fn test_floor_norwegian() {
        let s = "Hei på deg"; // 'å' occupies bytes 5..7
        assert_eq!(floor_char_boundary(s, 5), 5);
        assert_eq!(floor_char_boundary(s, 6), 5);
        assert_eq!(floor_char_boundary(s, 7), 7);
    }

    #[test]
    fn test_ceil_chinese() {
        let s = "你好"; // 3 bytes each
        assert_eq!(ceil_char_boundary(s, 1), 3);
        assert_eq!(ceil_char_boundary(s, 3), 3);
        assert_eq!(ceil_char_boundary(s, 4), 6);
    }

    #[test]
    fn test_prev_char_boundary() {
        let s = "a🎉b"; // 🎉 occupies bytes 1..5
        assert_eq!(prev_char_boundary(s, 0), 0);
        assert_eq!(prev_char_boundary(s, 1), 0);
        assert_eq!(prev_char_boundary(s, 5), 1);
        assert_eq!(prev_char_boundary(s, 3), 0); // mid-emoji floors to 1 first
        assert_eq!(prev_char_boundary(s, 6), 5);
    }

    #[test]
    fn test_safe_slice() {
        let s = "Hi🎉Bye";
        assert_eq!(safe_slice(s, 2, 6), "🎉");
        assert_eq!(safe_slice(s, 3, 4), "🎉");
        assert_eq!(safe_slice(s, 6, 100), "Bye");
        assert_eq!(safe_slice(s, 4, 2), "");
    }

    #[test]
    fn test_byte_to_char_index() {
        let s = "på deg";
        assert_eq!(byte_index_to_char_index(s, 0), 0);
        assert_eq!(byte_index_to_char_index(s, 3), 2);
        assert_eq!(byte_index_to_char_index(s, 2), 1);
        assert_eq!(byte_index_to_char_index(s, 99), 6);
    }
}
