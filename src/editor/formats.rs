//! Formatting state at the caret.
//!
//! A lightweight, line-local scan of the raw markdown around an offset. It
//! is used to fill the `formats` map of a saved editor state so hosts can
//! reflect toolbar toggles without parsing the document themselves.

use crate::string_utils::floor_char_boundary;
use std::collections::BTreeMap;

/// Formatting active at a given offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattingState {
    pub is_bold: bool,
    pub is_italic: bool,
    pub is_strikethrough: bool,
    pub is_inline_code: bool,
    pub is_code_block: bool,
    /// Heading level 1-6, if the line is a heading
    pub heading_level: Option<u8>,
    pub is_bullet_list: bool,
    pub is_numbered_list: bool,
    pub is_blockquote: bool,
}

impl FormattingState {
    /// Active formats as a name → flag map. Only true flags are included.
    pub fn to_map(&self) -> BTreeMap<String, bool> {
        let flags = [
            ("bold", self.is_bold),
            ("italic", self.is_italic),
            ("strike", self.is_strikethrough),
            ("code", self.is_inline_code),
            ("codeBlock", self.is_code_block),
            ("bullet", self.is_bullet_list),
            ("numbered", self.is_numbered_list),
            ("blockquote", self.is_blockquote),
        ];

        let mut map: BTreeMap<String, bool> = flags
            .iter()
            .filter(|(_, on)| *on)
            .map(|(name, on)| (name.to_string(), *on))
            .collect();
        if let Some(level) = self.heading_level {
            map.insert(format!("heading{}", level), true);
        }
        map
    }
}

/// Detect the formatting state at `offset` in `text`.
pub fn detect_formatting_state(text: &str, offset: usize) -> FormattingState {
    let offset = floor_char_boundary(text, offset);
    let mut state = FormattingState::default();

    let line_start = text[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line_end = text[offset..]
        .find('\n')
        .map(|i| offset + i)
        .unwrap_or(text.len());
    let trimmed = text[line_start..line_end].trim_start();

    let hashes = trimmed.chars().take_while(|&c| c == '#').count();
    if (1..=6).contains(&hashes) && trimmed[hashes..].starts_with(' ') {
        state.heading_level = Some(hashes as u8);
    }

    state.is_blockquote = trimmed.starts_with("> ");
    state.is_bullet_list = is_bullet_item(trimmed);
    state.is_numbered_list = is_numbered_item(trimmed);
    state.is_code_block = inside_code_fence(&text[..offset]);

    let before = &text[line_start..offset];
    let after = &text[offset..line_end];
    state.is_bold = has_open_marker(before, after, "**");
    state.is_italic = has_open_marker(before, after, "*") && !state.is_bold;
    state.is_strikethrough = has_open_marker(before, after, "~~");
    state.is_inline_code = has_open_marker(before, after, "`") && !state.is_code_block;

    state
}

fn is_bullet_item(trimmed: &str) -> bool {
    trimmed.starts_with("- ") || trimmed.starts_with("* ") || trimmed.starts_with("+ ")
}

fn is_numbered_item(trimmed: &str) -> bool {
    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    digits > 0 && {
        let rest = &trimmed[digits..];
        rest.starts_with(". ") || rest.starts_with(") ")
    }
}

/// Odd number of fence lines before the offset means we are inside one.
fn inside_code_fence(before: &str) -> bool {
    before
        .lines()
        .filter(|line| line.trim_start().starts_with("```"))
        .count()
        % 2
        == 1
}

/// An odd count of `marker` before the caret with one still ahead on the line.
fn has_open_marker(before: &str, after: &str, marker: &str) -> bool {
    before.matches(marker).count() % 2 == 1 && after.contains(marker)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
