//! The Editor Surface
//!
//! [`EditorSurface`] owns the document (through a [`TextSurface`]), the
//! slash palette, the change notifier and the readiness lifecycle. It is
//! the single entry point for both host calls (`set_content`,
//! `execute_command`, ...) and self-triggered editing (key presses that
//! open the palette or fire auto-markdown).
//!
//! Every discrete mutation emits exactly one [`ContentChangeEvent`];
//! rejected calls and no-ops emit nothing.

use crate::config::Settings;
use crate::editor::command::Command;
use crate::editor::dispatcher::{self, Outcome};
use crate::editor::formats::detect_formatting_state;
use crate::editor::keymap::{shortcut_for, Key, KeyEvent};
use crate::editor::mutator::{self, auto_markdown_replacement};
use crate::editor::notifier::{ChangeNotifier, ContentChangeEvent};
use crate::editor::palette::{Anchor, CommandPalette};
use crate::editor::selection::{line_start, LayoutMetrics, Selection, TextBuffer, TextSurface};
use crate::editor::state::EditorState;
use crate::error::{Error, Result};
use crate::render::render_html;
use log::{debug, info, warn};
use std::sync::mpsc::Receiver;

// ─────────────────────────────────────────────────────────────────────────────
// Readiness
// ─────────────────────────────────────────────────────────────────────────────

/// Lifecycle of the surface. Host calls are accepted in every state but
/// `Loading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Loading,
    Ready,
    /// Initial content failed to load; editing an empty document
    Fallback,
}

type UrlPrompt = Box<dyn FnMut() -> Option<String> + Send>;

// ─────────────────────────────────────────────────────────────────────────────
// Editor Surface
// ─────────────────────────────────────────────────────────────────────────────

pub struct EditorSurface<S: TextSurface = TextBuffer> {
    surface: S,
    palette: CommandPalette,
    notifier: ChangeNotifier,
    readiness: Readiness,
    load_error: Option<Error>,
    settings: Settings,
    url_prompt: Option<UrlPrompt>,
}

impl<S: TextSurface + std::fmt::Debug> std::fmt::Debug for EditorSurface<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSurface")
            .field("surface", &self.surface)
            .field("palette", &self.palette)
            .field("notifier", &self.notifier)
            .field("readiness", &self.readiness)
            .field("load_error", &self.load_error)
            .finish_non_exhaustive()
    }
}

impl EditorSurface<TextBuffer> {
    /// An in-memory surface whose caret geometry follows `settings`.
    pub fn new(settings: Settings) -> Self {
        let metrics = LayoutMetrics {
            line_height: settings.line_height,
            char_width: settings.char_width,
        };
        Self::with_surface(TextBuffer::new("").with_metrics(metrics), settings)
    }
}

impl<S: TextSurface> EditorSurface<S> {
    /// Wrap an existing text surface. The editor starts out `Loading`.
    pub fn with_surface(surface: S, settings: Settings) -> Self {
        Self {
            surface,
            palette: CommandPalette::new(),
            notifier: ChangeNotifier::new(),
            readiness: Readiness::Loading,
            load_error: None,
            settings,
            url_prompt: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Load the initial document and become ready.
    ///
    /// A failing loader never propagates: the surface falls back to an empty
    /// document and keeps the failure in [`load_error`](Self::load_error).
    /// Loading is one-shot; calling this again once ready does nothing.
    pub fn load<F>(&mut self, loader: F) -> Readiness
    where
        F: FnOnce() -> Result<String>,
    {
        if self.readiness != Readiness::Loading {
            debug!("load ignored: surface already {:?}", self.readiness);
            return self.readiness;
        }

        match loader() {
            Ok(content) => {
                self.reset_document(&content);
                self.readiness = Readiness::Ready;
                info!("Editor surface ready ({} bytes)", content.len());
            }
            Err(err) => {
                warn!("Editor content failed to load, starting empty: {}", err);
                self.reset_document("");
                self.load_error = Some(Error::ContentLoadFailed {
                    reason: err.to_string(),
                });
                self.readiness = Readiness::Fallback;
            }
        }
        self.readiness
    }

    /// Become ready with whatever the surface currently holds.
    pub fn mark_ready(&mut self) {
        if self.readiness == Readiness::Loading {
            self.readiness = Readiness::Ready;
            info!("Editor surface ready");
        }
    }

    pub fn readiness(&self) -> Readiness {
        self.readiness
    }

    pub fn is_ready(&self) -> bool {
        self.readiness != Readiness::Loading
    }

    /// The failure that put the surface into `Fallback`, if any.
    pub fn load_error(&self) -> Option<&Error> {
        self.load_error.as_ref()
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(Error::NotReady)
        }
    }

    fn reset_document(&mut self, content: &str) {
        let whole = Selection::new(0, self.surface.len());
        self.surface.replace_range(whole, content);
        self.surface.set_selection(Selection::caret(0));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn palette(&self) -> &CommandPalette {
        &self.palette
    }

    /// Read-only view of the underlying text surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Placeholder to show, or `None` once the document has text.
    pub fn placeholder(&self) -> Option<&str> {
        if self.surface.is_empty() {
            Some(self.settings.placeholder.as_str())
        } else {
            None
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Subscriptions
    // ─────────────────────────────────────────────────────────────────────────

    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&ContentChangeEvent) + Send + 'static,
    {
        self.notifier.subscribe(observer);
    }

    pub fn subscribe_channel(&mut self) -> Receiver<ContentChangeEvent> {
        self.notifier.subscribe_channel()
    }

    /// Install the synchronous URL prompt used by `insertLink` without a URL.
    pub fn set_url_prompt<F>(&mut self, prompt: F)
    where
        F: FnMut() -> Option<String> + Send + 'static,
    {
        self.url_prompt = Some(Box::new(prompt));
    }

    fn emit(&mut self) {
        self.notifier.notify(self.surface.text());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Host Boundary
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the document wholesale; the caret goes to the start.
    pub fn set_content(&mut self, text: &str) -> Result<()> {
        self.ensure_ready()?;
        self.reset_document(text);
        self.emit();
        Ok(())
    }

    pub fn get_content(&self) -> Result<String> {
        self.ensure_ready()?;
        Ok(self.surface.text().to_string())
    }

    pub fn selection(&self) -> Selection {
        self.surface.selection()
    }

    /// Move the selection. Offsets are clamped and reversed ends swapped.
    pub fn set_selection(&mut self, selection: Selection) -> Result<()> {
        self.ensure_ready()?;
        self.surface.set_selection(selection);
        Ok(())
    }

    /// Run a host command. Emits one event when the document changed.
    pub fn execute_command(&mut self, command: &Command) -> Result<Outcome> {
        self.ensure_ready()?;

        let Self {
            surface,
            url_prompt,
            ..
        } = self;
        let outcome = dispatcher::execute(command, surface, || {
            url_prompt.as_mut().and_then(|prompt| prompt())
        })?;

        if outcome.is_mutated() {
            self.emit();
        }
        Ok(outcome)
    }

    /// Run a palette item by identifier and close the palette.
    ///
    /// Items can only be chosen while the palette is open. A closed palette
    /// or an unknown identifier is rejected without touching the document
    /// or the palette.
    pub fn execute_palette_item(&mut self, id: &str) -> Result<Outcome> {
        self.ensure_ready()?;
        if !self.palette.is_visible() {
            return Err(Error::invalid_command(format!(
                "palette is not open for item '{}'",
                id
            )));
        }
        let outcome = dispatcher::execute_palette_id(id, &mut self.surface)?;
        self.palette.hide();
        self.emit();
        Ok(outcome)
    }

    /// Snapshot content, selection and the formats active at the caret.
    pub fn save_state(&self) -> Result<EditorState> {
        self.ensure_ready()?;
        let selection = self.surface.selection();
        Ok(EditorState {
            content: self.surface.text().to_string(),
            selection: Some(selection),
            formats: detect_formatting_state(self.surface.text(), selection.start).to_map(),
        })
    }

    /// Restore a snapshot: content first (one event), then the selection.
    pub fn restore_state(&mut self, state: &EditorState) -> Result<()> {
        self.set_content(&state.content)?;
        if let Some(selection) = state.selection {
            self.surface.set_selection(selection);
        }
        Ok(())
    }

    /// Current document rendered as HTML.
    pub fn html(&self) -> Result<String> {
        self.ensure_ready()?;
        Ok(render_html(self.surface.text(), self.settings.content_mode))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Keyboard and Text Input
    // ─────────────────────────────────────────────────────────────────────────

    /// Handle a key press.
    ///
    /// Shortcuts go to the dispatcher. `/` on an empty line opens the
    /// palette under the caret (moving it if already open) and is typed
    /// like any other character. Escape closes the palette, as does a
    /// Backspace that leaves the caret's line empty again. Any other key
    /// leaves the palette as it is.
    pub fn handle_key(&mut self, event: &KeyEvent) -> Result<Outcome> {
        self.ensure_ready()?;

        if let Some(command) = shortcut_for(event) {
            return self.execute_command(&command);
        }
        if event.modifiers.command {
            return Ok(Outcome::Unchanged);
        }

        match event.key {
            Key::Escape => {
                if self.palette.hide() {
                    debug!("palette dismissed");
                }
                Ok(Outcome::Unchanged)
            }
            Key::Backspace => {
                if self.delete_previous_char()?.is_none() {
                    return Ok(Outcome::Unchanged);
                }
                if self.palette.is_visible() && line_start(&self.surface).is_empty() {
                    self.palette.hide();
                    debug!("palette closed: slash removed");
                }
                Ok(Outcome::Mutated)
            }
            Key::Char(c)
                if self.settings.command_palette
                    && CommandPalette::should_open(c, line_start(&self.surface)) =>
            {
                let anchor = Anchor::below(self.surface.caret_rect(), self.settings.palette_offset);
                self.palette.show(anchor);
                debug!("palette opened at ({}, {})", anchor.x, anchor.y);
                self.handle_input(&c.to_string())
            }
            key => match key.typed_text() {
                Some(text) => self.handle_input(&text),
                None => Ok(Outcome::Unchanged),
            },
        }
    }

    /// Insert typed text at the caret.
    ///
    /// A single space first checks the line prefix against the
    /// auto-markdown triggers; on a match the line is rewritten to the
    /// marker and the space is not inserted separately.
    pub fn handle_input(&mut self, text: &str) -> Result<Outcome> {
        self.ensure_ready()?;
        if text.is_empty() {
            return Ok(Outcome::Unchanged);
        }

        if text == " " && self.settings.auto_markdown && self.surface.selection().is_collapsed() {
            if let Some(replacement) = auto_markdown_replacement(line_start(&self.surface)) {
                debug!("auto-markdown: {:?}", replacement);
                self.replace_current_line(replacement)?;
                return Ok(Outcome::Mutated);
            }
        }

        self.insert_text(text)?;
        Ok(Outcome::Mutated)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutation Primitives (one event each)
    // ─────────────────────────────────────────────────────────────────────────

    pub fn insert_text(&mut self, text: &str) -> Result<Selection> {
        self.ensure_ready()?;
        let caret = mutator::insert_text(&mut self.surface, text);
        self.emit();
        Ok(caret)
    }

    pub fn wrap_selection(&mut self, before: &str, after: &str) -> Result<Selection> {
        self.ensure_ready()?;
        let caret = mutator::wrap_selection(&mut self.surface, before, after);
        self.emit();
        Ok(caret)
    }

    pub fn replace_current_line(&mut self, replacement: &str) -> Result<Selection> {
        self.ensure_ready()?;
        let caret = mutator::replace_current_line(&mut self.surface, replacement);
        self.emit();
        Ok(caret)
    }

    /// `Ok(None)` at document start, where nothing changes and nothing is emitted.
    pub fn delete_previous_char(&mut self) -> Result<Option<Selection>> {
        self.ensure_ready()?;
        let caret = mutator::delete_previous_char(&mut self.surface);
        if caret.is_some() {
            self.emit();
        }
        Ok(caret)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
