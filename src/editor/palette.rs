//! Slash command palette.
//!
//! Typing `/` at the very start of an empty line opens a fixed list of
//! block inserts anchored under the caret. Choosing an item, pressing
//! Escape or deleting the `/` closes it again. The palette never filters;
//! other keys while it is open leave it as it is.

use crate::editor::selection::CaretRect;
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Palette Items
// ─────────────────────────────────────────────────────────────────────────────

/// An entry of the slash palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteItem {
    Heading1,
    Heading2,
    Heading3,
    Bullet,
    Numbered,
    Quote,
    Code,
}

/// Fenced code block inserted by the `code` item and `InsertCodeBlock`.
pub const CODE_FENCE: &str = "```\n\n```";

impl PaletteItem {
    /// All items, in display order.
    pub const ALL: [PaletteItem; 7] = [
        PaletteItem::Heading1,
        PaletteItem::Heading2,
        PaletteItem::Heading3,
        PaletteItem::Bullet,
        PaletteItem::Numbered,
        PaletteItem::Quote,
        PaletteItem::Code,
    ];

    /// Identifier the host uses to pick this item.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Heading1 => "heading1",
            Self::Heading2 => "heading2",
            Self::Heading3 => "heading3",
            Self::Bullet => "bullet",
            Self::Numbered => "numbered",
            Self::Quote => "quote",
            Self::Code => "code",
        }
    }

    /// Look up an item by identifier (exact match).
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|item| item.id() == id)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Heading1 => "Heading 1",
            Self::Heading2 => "Heading 2",
            Self::Heading3 => "Heading 3",
            Self::Bullet => "Bullet List",
            Self::Numbered => "Numbered List",
            Self::Quote => "Blockquote",
            Self::Code => "Code Block",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Heading1 => "H1",
            Self::Heading2 => "H2",
            Self::Heading3 => "H3",
            Self::Bullet => "\u{2022}", // bullet •
            Self::Numbered => "1.",
            Self::Quote => "\"",
            Self::Code => "{}",
        }
    }

    /// Text inserted at the caret when the item is chosen.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Heading1 => "# ",
            Self::Heading2 => "## ",
            Self::Heading3 => "### ",
            Self::Bullet => "- ",
            Self::Numbered => "1. ",
            Self::Quote => "> ",
            Self::Code => CODE_FENCE,
        }
    }

    /// Lines the caret moves up after inserting the marker.
    pub fn caret_lines_up(&self) -> usize {
        match self {
            Self::Code => 1,
            _ => 0,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Palette State Machine
// ─────────────────────────────────────────────────────────────────────────────

/// Where the palette is drawn, in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Anchor {
    pub x: f32,
    pub y: f32,
}

impl Anchor {
    /// Below the caret rectangle, `gap` units down.
    pub fn below(rect: CaretRect, gap: f32) -> Self {
        Self {
            x: rect.left,
            y: rect.bottom + gap,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PaletteState {
    #[default]
    Hidden,
    Visible { anchor: Anchor },
}

/// Palette visibility, for the lifetime of an editor surface.
#[derive(Debug, Clone, Default)]
pub struct CommandPalette {
    state: PaletteState,
}

impl CommandPalette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PaletteState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.state, PaletteState::Visible { .. })
    }

    pub fn anchor(&self) -> Option<Anchor> {
        match self.state {
            PaletteState::Visible { anchor } => Some(anchor),
            PaletteState::Hidden => None,
        }
    }

    /// The palette opens only for `/` typed on an empty line prefix.
    pub fn should_open(typed: char, line_prefix: &str) -> bool {
        typed == '/' && line_prefix.is_empty()
    }

    /// Show at `anchor`. Re-showing while visible moves the palette there.
    pub fn show(&mut self, anchor: Anchor) {
        self.state = PaletteState::Visible { anchor };
    }

    /// Hide. Returns whether the palette was visible.
    pub fn hide(&mut self) -> bool {
        let was_visible = self.is_visible();
        self.state = PaletteState::Hidden;
        was_visible
    }

    /// The static item list, in display order.
    pub fn items(&self) -> &'static [PaletteItem] {
        &PaletteItem::ALL
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
