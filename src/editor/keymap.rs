//! Keyboard model and host shortcut bindings.
//!
//! "Mod" is the platform command modifier (Cmd on macOS, Ctrl elsewhere);
//! hosts fold both into [`Modifiers::command`].

use crate::editor::command::Command;

/// A key as seen by the editor surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Escape,
    Tab,
}

impl Key {
    /// Parse a DOM-style key name (`"a"`, `"/"`, `"Escape"`, `"Enter"`).
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "Enter" => Some(Key::Enter),
            "Backspace" => Some(Key::Backspace),
            "Escape" | "Esc" => Some(Key::Escape),
            "Tab" => Some(Key::Tab),
            " " | "Space" => Some(Key::Char(' ')),
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Key::Char(c)),
                    _ => None,
                }
            }
        }
    }

    /// Text the key types when pressed without the command modifier.
    pub fn typed_text(&self) -> Option<String> {
        match self {
            Key::Char(c) => Some(c.to_string()),
            Key::Enter => Some("\n".to_string()),
            Key::Tab => Some("\t".to_string()),
            Key::Backspace | Key::Escape => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub command: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        command: false,
        shift: false,
    };
    pub const COMMAND: Modifiers = Modifiers {
        command: true,
        shift: false,
    };
    pub const COMMAND_SHIFT: Modifiers = Modifiers {
        command: true,
        shift: true,
    };
}

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// A plain key press without modifiers.
    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    /// A character typed without modifiers (shift is implied by the char).
    pub fn char(c: char) -> Self {
        Self::plain(Key::Char(c))
    }

    /// `Mod+<c>`.
    pub fn command(c: char) -> Self {
        Self::new(Key::Char(c), Modifiers::COMMAND)
    }
}

/// The command bound to `event`, if any.
///
/// Letters match case-insensitively, since hosts report `Z` for Shift+Z.
pub fn shortcut_for(event: &KeyEvent) -> Option<Command> {
    if !event.modifiers.command {
        return None;
    }
    let Key::Char(c) = event.key else {
        return None;
    };

    match (c.to_ascii_lowercase(), event.modifiers.shift) {
        ('b', false) => Some(Command::ToggleBold),
        ('i', false) => Some(Command::ToggleItalic),
        ('k', false) => Some(Command::InsertLink { url: None }),
        ('z', false) => Some(Command::Undo),
        ('z', true) => Some(Command::Redo),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
