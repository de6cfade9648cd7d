//! Editor module for Slipbox
//!
//! The in-page editing core: selection tracking, text mutation, command
//! dispatch, change notification and the slash command palette, tied
//! together by [`EditorSurface`].

pub mod command;
pub mod dispatcher;
pub mod formats;
pub mod keymap;
pub mod mutator;
pub mod notifier;
pub mod palette;
pub mod selection;
pub mod state;
pub mod surface;

pub use command::{Command, CommandRequest};
pub use dispatcher::{HistoryAction, Outcome};
pub use formats::{detect_formatting_state, FormattingState};
pub use keymap::{shortcut_for, Key, KeyEvent, Modifiers};
pub use notifier::{ChangeNotifier, ContentChangeEvent};
pub use palette::{Anchor, CommandPalette, PaletteItem, PaletteState};
pub use selection::{CaretRect, LayoutMetrics, Selection, TextBuffer, TextSurface};
pub use state::EditorState;
pub use surface::{EditorSurface, Readiness};
