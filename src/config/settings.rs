//! Settings and preferences for the editor surface
//!
//! This module defines the [`Settings`] struct read by the editor surface
//! and the host binary, with serde support for JSON persistence.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Content Mode
// ─────────────────────────────────────────────────────────────────────────────

/// How the document text is interpreted when rendering HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentMode {
    /// Markdown source, rendered through the markdown pipeline
    #[default]
    Plain,
    /// The document already holds HTML and is passed through untouched
    Html,
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// Editor preferences.
///
/// All fields have sensible defaults via the `Default` trait and `#[serde(default)]`,
/// so partial config files load cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rewrite `#`, `##`, `###`, `-` and `>` followed by a space into block markers
    pub auto_markdown: bool,

    /// Open the slash palette when `/` is typed on an empty line
    pub command_palette: bool,

    pub content_mode: ContentMode,

    /// Vertical gap between the caret rectangle and the palette, in pixels
    pub palette_offset: f32,

    /// Hint shown by hosts while the document is empty
    pub placeholder: String,

    /// Line height used for caret geometry
    pub line_height: f32,

    /// Character cell width used for caret geometry
    pub char_width: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_markdown: true,
            command_palette: true,
            content_mode: ContentMode::Plain,
            palette_offset: 5.0,
            placeholder: "Start writing...".to_string(),
            line_height: 20.0,
            char_width: 8.0,
        }
    }
}

impl Settings {
    /// Maximum palette offset
    pub const MAX_PALETTE_OFFSET: f32 = 64.0;
    /// Minimum line height
    pub const MIN_LINE_HEIGHT: f32 = 4.0;
    /// Maximum line height
    pub const MAX_LINE_HEIGHT: f32 = 200.0;
    /// Minimum character width
    pub const MIN_CHAR_WIDTH: f32 = 1.0;
    /// Maximum character width
    pub const MAX_CHAR_WIDTH: f32 = 100.0;

    /// Clamp out-of-range values loaded from disk.
    pub fn sanitize(&mut self) {
        // NaN would survive clamp()
        if self.palette_offset.is_nan() {
            self.palette_offset = Settings::default().palette_offset;
        }
        self.palette_offset = self.palette_offset.clamp(0.0, Self::MAX_PALETTE_OFFSET);

        if self.line_height.is_nan() {
            self.line_height = Settings::default().line_height;
        }
        self.line_height = self
            .line_height
            .clamp(Self::MIN_LINE_HEIGHT, Self::MAX_LINE_HEIGHT);

        if self.char_width.is_nan() {
            self.char_width = Settings::default().char_width;
        }
        self.char_width = self
            .char_width
            .clamp(Self::MIN_CHAR_WIDTH, Self::MAX_CHAR_WIDTH);
    }

    /// Deserialize from JSON and sanitize in one step.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert!(settings.auto_markdown);
        assert!(settings.command_palette);
        assert_eq!(settings.content_mode, ContentMode::Plain);
        assert_eq!(settings.palette_offset, 5.0);
        assert_eq!(settings.placeholder, "Start writing...");
    }

    #[test]
    fn test_content_mode_serde() {
        assert_eq!(
            serde_json::to_string(&ContentMode::Html).unwrap(),
            "\"html\""
        );
        let mode: ContentMode = serde_json::from_str("\"plain\"").unwrap();
        assert_eq!(mode, ContentMode::Plain);
        assert!(serde_json::from_str::<ContentMode>("\"rich\"").is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"auto_markdown": false}"#).unwrap();
        assert!(!settings.auto_markdown);
        assert!(settings.command_palette);
        assert_eq!(settings.line_height, 20.0);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let result: Result<Settings, _> =
            serde_json::from_str(r#"{"theme": "dark", "content_mode": "html"}"#);
        assert_eq!(result.unwrap().content_mode, ContentMode::Html);
    }

    #[test]
    fn test_sanitize_clamps() {
        let mut settings = Settings {
            palette_offset: 500.0,
            line_height: 0.0,
            char_width: -3.0,
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.palette_offset, Settings::MAX_PALETTE_OFFSET);
        assert_eq!(settings.line_height, Settings::MIN_LINE_HEIGHT);
        assert_eq!(settings.char_width, Settings::MIN_CHAR_WIDTH);

        let mut settings = Settings {
            palette_offset: -1.0,
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.palette_offset, 0.0);
    }

    #[test]
    fn test_sanitize_nan_falls_back_to_default() {
        let mut settings = Settings {
            palette_offset: f32::NAN,
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.palette_offset, 5.0);
    }

    #[test]
    fn test_from_json_sanitized() {
        let settings = Settings::from_json_sanitized(r#"{"palette_offset": 99.0}"#).unwrap();
        assert_eq!(settings.palette_offset, Settings::MAX_PALETTE_OFFSET);
        assert!(Settings::from_json_sanitized("{ not json").is_err());
    }
}
