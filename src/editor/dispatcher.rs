//! Command dispatch.
//!
//! Maps a [`Command`] or [`PaletteItem`] onto the mutation primitives. The
//! dispatcher does not notify anyone; the editor surface decides what to
//! emit based on the returned [`Outcome`].

use crate::editor::command::Command;
use crate::editor::mutator::{delete_previous_char, insert_text, move_caret_up, wrap_selection};
use crate::editor::palette::{PaletteItem, CODE_FENCE};
use crate::editor::selection::{Selection, TextSurface};
use crate::error::{Error, Result};
use log::debug;

/// Undo/redo requests handed back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAction {
    Undo,
    Redo,
}

/// What executing a command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The document changed
    Mutated,
    /// Nothing changed (e.g. the link prompt was cancelled)
    Unchanged,
    /// Reply to `GetContent`
    Content(String),
    /// The host's native editing history must handle this
    Delegated(HistoryAction),
}

impl Outcome {
    pub fn is_mutated(&self) -> bool {
        matches!(self, Outcome::Mutated)
    }
}

/// Execute a host command against `surface`.
///
/// `prompt_url` is called only for `InsertLink` without a URL; returning
/// `None` or an empty string cancels the link.
pub fn execute<S, P>(command: &Command, surface: &mut S, mut prompt_url: P) -> Result<Outcome>
where
    S: TextSurface + ?Sized,
    P: FnMut() -> Option<String>,
{
    debug!("execute: {}", command.action_name());

    let outcome = match command {
        Command::ToggleBold => wrap(surface, "**", "**"),
        Command::ToggleItalic => wrap(surface, "*", "*"),
        Command::ToggleStrikethrough => wrap(surface, "~~", "~~"),
        Command::ToggleUnderline => wrap(surface, "<u>", "</u>"),
        Command::ToggleInlineCode => wrap(surface, "`", "`"),
        Command::InsertHeading { level } => {
            if !(1..=6).contains(level) {
                return Err(Error::invalid_command(format!(
                    "heading level {} out of range",
                    level
                )));
            }
            let marker = format!("{} ", "#".repeat(*level as usize));
            insert_text(surface, &marker);
            Outcome::Mutated
        }
        Command::InsertList { ordered } => {
            insert_text(surface, if *ordered { "1. " } else { "- " });
            Outcome::Mutated
        }
        Command::InsertBlockquote => {
            insert_text(surface, "> ");
            Outcome::Mutated
        }
        Command::InsertCodeBlock => {
            insert_text(surface, CODE_FENCE);
            move_caret_up(surface, 1);
            Outcome::Mutated
        }
        Command::InsertLink { url } => {
            let url = url.clone().or_else(&mut prompt_url);
            match url.filter(|url| !url.is_empty()) {
                Some(url) => {
                    wrap_selection(surface, "[", &format!("]({})", url));
                    Outcome::Mutated
                }
                None => {
                    debug!("insertLink cancelled: no URL");
                    Outcome::Unchanged
                }
            }
        }
        Command::InsertImage { src } => {
            if src.is_empty() {
                return Err(Error::invalid_command("insertImage requires a non-empty src"));
            }
            insert_text(surface, &format!("![]({})", src));
            Outcome::Mutated
        }
        Command::InsertText { text } => {
            if text.is_empty() && surface.selection().is_collapsed() {
                Outcome::Unchanged
            } else {
                insert_text(surface, text);
                Outcome::Mutated
            }
        }
        Command::SetContent { text } => {
            let whole = Selection::new(0, surface.len());
            surface.replace_range(whole, text);
            surface.set_selection(Selection::caret(0));
            Outcome::Mutated
        }
        Command::GetContent => Outcome::Content(surface.text().to_string()),
        Command::Undo => Outcome::Delegated(HistoryAction::Undo),
        Command::Redo => Outcome::Delegated(HistoryAction::Redo),
    };

    Ok(outcome)
}

fn wrap<S: TextSurface + ?Sized>(surface: &mut S, before: &str, after: &str) -> Outcome {
    wrap_selection(surface, before, after);
    Outcome::Mutated
}

/// Execute a palette item: remove the `/` that opened the palette, then
/// insert the item's marker.
pub fn execute_palette<S: TextSurface + ?Sized>(item: PaletteItem, surface: &mut S) -> Outcome {
    debug!("execute_palette: {}", item.id());
    delete_previous_char(surface);
    insert_text(surface, item.marker());
    if item.caret_lines_up() > 0 {
        move_caret_up(surface, item.caret_lines_up());
    }
    Outcome::Mutated
}

/// Execute a palette item by identifier. Unknown identifiers leave the
/// surface untouched.
pub fn execute_palette_id<S: TextSurface + ?Sized>(id: &str, surface: &mut S) -> Result<Outcome> {
    let item = PaletteItem::from_id(id)
        .ok_or_else(|| Error::invalid_command(format!("unknown palette item '{}'", id)))?;
    Ok(execute_palette(item, surface))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::selection::TextBuffer;

    fn no_prompt() -> Option<String> {
        None
    }

    fn run(command: Command, text: &str, start: usize, end: usize) -> (TextBuffer, Outcome) {
        let mut buffer = TextBuffer::with_selection(text, Selection::new(start, end));
        let outcome = execute(&command, &mut buffer, no_prompt).unwrap();
        (buffer, outcome)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Palette dispatch
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_palette_heading2_replaces_slash() {
        let mut buffer = TextBuffer::with_selection("/", Selection::caret(1));
        let outcome = execute_palette_id("heading2", &mut buffer).unwrap();
        assert_eq!(outcome, Outcome::Mutated);
        assert_eq!(buffer.text(), "## ");
        assert_eq!(buffer.selection(), Selection::caret(3));
    }

    #[test]
    fn test_palette_every_marker() {
        let expected = [
            ("heading1", "# "),
            ("heading3", "### "),
            ("bullet", "- "),
            ("numbered", "1. "),
            ("quote", "> "),
        ];
        for (id, line) in expected {
            let mut buffer = TextBuffer::with_selection("intro\n/", Selection::caret(7));
            execute_palette_id(id, &mut buffer).unwrap();
            assert_eq!(buffer.text(), format!("intro\n{}", line), "item {}", id);
        }
    }

    #[test]
    fn test_palette_code_puts_caret_on_blank_line() {
        let mut buffer = TextBuffer::with_selection("/", Selection::caret(1));
        execute_palette(PaletteItem::Code, &mut buffer);
        assert_eq!(buffer.text(), "```\n\n```");
        assert_eq!(buffer.selection(), Selection::caret(4));
    }

    #[test]
    fn test_unknown_palette_id_does_nothing() {
        let mut buffer = TextBuffer::with_selection("/", Selection::caret(1));
        let err = execute_palette_id("table", &mut buffer).unwrap_err();
        assert!(matches!(err, Error::InvalidCommand(_)));
        assert_eq!(buffer.text(), "/");
        assert_eq!(buffer.selection(), Selection::caret(1));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Host commands
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_toggle_bold_and_italic() {
        let (buffer, outcome) = run(Command::ToggleBold, "Hello world", 0, 5);
        assert_eq!(buffer.text(), "**Hello** world");
        assert!(outcome.is_mutated());

        let (buffer, _) = run(Command::ToggleItalic, "Hello world", 6, 11);
        assert_eq!(buffer.text(), "Hello *world*");
    }

    #[test]
    fn test_other_inline_wrappers() {
        let (buffer, _) = run(Command::ToggleStrikethrough, "old", 0, 3);
        assert_eq!(buffer.text(), "~~old~~");
        let (buffer, _) = run(Command::ToggleUnderline, "key", 0, 3);
        assert_eq!(buffer.text(), "<u>key</u>");
        let (buffer, _) = run(Command::ToggleInlineCode, "x = 1", 0, 5);
        assert_eq!(buffer.text(), "`x = 1`");
    }

    #[test]
    fn test_host_heading_does_not_delete_previous_char() {
        let (buffer, _) = run(Command::InsertHeading { level: 2 }, "ab", 2, 2);
        assert_eq!(buffer.text(), "ab## ");
    }

    #[test]
    fn test_heading_level_out_of_range() {
        let mut buffer = TextBuffer::new("x");
        let err = execute(&Command::InsertHeading { level: 0 }, &mut buffer, no_prompt);
        assert!(matches!(err, Err(Error::InvalidCommand(_))));
        assert_eq!(buffer.text(), "x");
    }

    #[test]
    fn test_lists_and_quote() {
        let (buffer, _) = run(Command::InsertList { ordered: true }, "", 0, 0);
        assert_eq!(buffer.text(), "1. ");
        let (buffer, _) = run(Command::InsertList { ordered: false }, "", 0, 0);
        assert_eq!(buffer.text(), "- ");
        let (buffer, _) = run(Command::InsertBlockquote, "", 0, 0);
        assert_eq!(buffer.text(), "> ");
    }

    #[test]
    fn test_code_block_command() {
        let (buffer, _) = run(Command::InsertCodeBlock, "", 0, 0);
        assert_eq!(buffer.text(), "```\n\n```");
        assert_eq!(buffer.selection(), Selection::caret(4));
    }

    #[test]
    fn test_link_with_url() {
        let command = Command::InsertLink {
            url: Some("https://example.com".to_string()),
        };
        let (buffer, outcome) = run(command, "Click here", 6, 10);
        assert_eq!(buffer.text(), "Click [here](https://example.com)");
        assert!(outcome.is_mutated());
    }

    #[test]
    fn test_link_prompts_host() {
        let mut buffer = TextBuffer::with_selection("docs", Selection::new(0, 4));
        let mut asked = 0;
        let outcome = execute(&Command::InsertLink { url: None }, &mut buffer, || {
            asked += 1;
            Some("https://docs.rs".to_string())
        })
        .unwrap();
        assert_eq!(asked, 1);
        assert_eq!(outcome, Outcome::Mutated);
        assert_eq!(buffer.text(), "[docs](https://docs.rs)");
    }

    #[test]
    fn test_link_cancelled_prompt_is_unchanged() {
        let (buffer, outcome) = run(Command::InsertLink { url: None }, "docs", 0, 4);
        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(buffer.text(), "docs");

        let mut buffer = TextBuffer::with_selection("docs", Selection::new(0, 4));
        let outcome = execute(&Command::InsertLink { url: None }, &mut buffer, || {
            Some(String::new())
        })
        .unwrap();
        assert_eq!(outcome, Outcome::Unchanged);
    }

    #[test]
    fn test_insert_image() {
        let command = Command::InsertImage {
            src: "data:image/jpeg;base64,AAAA".to_string(),
        };
        let (buffer, _) = run(command, "pic: ", 5, 5);
        assert_eq!(buffer.text(), "pic: ![](data:image/jpeg;base64,AAAA)");
    }

    #[test]
    fn test_insert_empty_text_is_unchanged() {
        let command = Command::InsertText {
            text: String::new(),
        };
        let (buffer, outcome) = run(command.clone(), "abc", 1, 1);
        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(buffer.text(), "abc");

        let (buffer, outcome) = run(command, "abc", 1, 2);
        assert_eq!(outcome, Outcome::Mutated);
        assert_eq!(buffer.text(), "ac");
    }

    #[test]
    fn test_set_and_get_content() {
        let command = Command::SetContent {
            text: "# New".to_string(),
        };
        let (mut buffer, outcome) = run(command, "old text", 3, 5);
        assert!(outcome.is_mutated());
        assert_eq!(buffer.text(), "# New");
        assert_eq!(buffer.selection(), Selection::caret(0));

        let outcome = execute(&Command::GetContent, &mut buffer, no_prompt).unwrap();
        assert_eq!(outcome, Outcome::Content("# New".to_string()));
    }

    #[test]
    fn test_history_is_delegated() {
        let (buffer, outcome) = run(Command::Undo, "abc", 3, 3);
        assert_eq!(outcome, Outcome::Delegated(HistoryAction::Undo));
        assert_eq!(buffer.text(), "abc");
        let (_, outcome) = run(Command::Redo, "abc", 3, 3);
        assert_eq!(outcome, Outcome::Delegated(HistoryAction::Redo));
    }
}
