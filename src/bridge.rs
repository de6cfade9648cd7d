//! Host bridge
//!
//! The host talks to the editor surface through JSON messages. Requests
//! and events are `type`-tagged objects, one per line on the stdio host:
//!
//! ```text
//! {"type":"command","action":"toggleBold"}
//! {"type":"key","key":"/","mod":false,"shift":false}
//! {"type":"contentChanged","markdown":"/","timestamp":1700000000000}
//! ```
//!
//! [`SurfaceHandle`] is the cross-thread entry point. Calls are serviced
//! one at a time under a mutex, so a second call waits for the first to
//! finish and mutations never interleave.

use crate::editor::{
    Anchor, Command, CommandRequest, ContentChangeEvent, EditorState, EditorSurface,
    HistoryAction, Key, KeyEvent, Modifiers, Outcome, PaletteItem, Selection,
};
use crate::error::{Error, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex};

// ─────────────────────────────────────────────────────────────────────────────
// Messages
// ─────────────────────────────────────────────────────────────────────────────

/// A call from the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BridgeRequest {
    /// Host command. `url` answers the link prompt for `insertLink`.
    Command {
        action: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<Map<String, Value>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    /// A palette item was picked
    Palette { id: String },
    Key {
        key: String,
        #[serde(default, rename = "mod")]
        command: bool,
        #[serde(default)]
        shift: bool,
    },
    /// Text typed or composed by the input method
    Input { text: String },
    Select { start: usize, end: usize },
    /// Ask for a saved-state snapshot
    State,
    Restore { state: EditorState },
    Html,
}

/// A message to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BridgeEvent {
    ContentChanged { markdown: String, timestamp: u64 },
    /// Reply to `getContent`
    Content { markdown: String },
    State { state: EditorState },
    Html { html: String },
    /// Palette shown, moved or hidden. `items` is filled while visible.
    Palette {
        visible: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        anchor: Option<Anchor>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        items: Vec<PaletteEntry>,
    },
    /// Undo/redo for the host's native history
    History { action: String },
    Error { message: String },
}

/// A palette row as the host draws it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub id: String,
    pub label: String,
    pub icon: String,
}

impl From<&PaletteItem> for PaletteEntry {
    fn from(item: &PaletteItem) -> Self {
        Self {
            id: item.id().to_string(),
            label: item.label().to_string(),
            icon: item.icon().to_string(),
        }
    }
}

impl From<&ContentChangeEvent> for BridgeEvent {
    fn from(event: &ContentChangeEvent) -> Self {
        BridgeEvent::ContentChanged {
            markdown: event.serialized_content.clone(),
            timestamp: event.timestamp_millis,
        }
    }
}

impl From<&Error> for BridgeEvent {
    fn from(err: &Error) -> Self {
        BridgeEvent::Error {
            message: err.to_string(),
        }
    }
}

impl BridgeEvent {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Surface Handle
// ─────────────────────────────────────────────────────────────────────────────

/// Shared, serialized access to an [`EditorSurface`].
///
/// Observers registered on the surface run while the handle's lock is
/// held; they must not call back into the same handle.
#[derive(Debug, Clone)]
pub struct SurfaceHandle {
    inner: Arc<Mutex<EditorSurface>>,
}

impl SurfaceHandle {
    pub fn new(surface: EditorSurface) -> Self {
        Self {
            inner: Arc::new(Mutex::new(surface)),
        }
    }

    /// Run `f` with exclusive access to the surface.
    ///
    /// A poisoned lock means an earlier call panicked mid-flight; the call
    /// is reported as not delivered.
    pub fn with<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut EditorSurface) -> Result<R>,
    {
        let mut surface = self.inner.lock().map_err(|_| Error::BridgeClosed)?;
        f(&mut surface)
    }

    /// Parse one JSON line and handle it. Failures become an `error` event.
    pub fn handle_line(&self, line: &str) -> Vec<BridgeEvent> {
        let result = serde_json::from_str::<BridgeRequest>(line)
            .map_err(Error::from)
            .and_then(|request| self.handle(request));

        match result {
            Ok(replies) => replies,
            Err(err) => {
                warn!("Bridge request failed: {}", err);
                vec![BridgeEvent::from(&err)]
            }
        }
    }

    /// Handle one request and return the replies for the host.
    ///
    /// Content change events are not part of the replies; they reach the
    /// host through the surface's subscribers.
    pub fn handle(&self, request: BridgeRequest) -> Result<Vec<BridgeEvent>> {
        self.with(|surface| {
            let palette_before = surface.palette().state();
            let mut replies = Vec::new();

            match request {
                BridgeRequest::Command { action, data, url } => {
                    let command = resolve_command(CommandRequest { action, data }, url)?;
                    let outcome = surface.execute_command(&command)?;
                    replies.extend(outcome_reply(outcome));
                }
                BridgeRequest::Palette { id } => {
                    surface.execute_palette_item(&id)?;
                }
                BridgeRequest::Key {
                    key,
                    command,
                    shift,
                } => {
                    let key = Key::parse(&key)
                        .ok_or_else(|| Error::invalid_command(format!("unknown key '{}'", key)))?;
                    let event = KeyEvent::new(key, Modifiers { command, shift });
                    let outcome = surface.handle_key(&event)?;
                    replies.extend(outcome_reply(outcome));
                }
                BridgeRequest::Input { text } => {
                    surface.handle_input(&text)?;
                }
                BridgeRequest::Select { start, end } => {
                    surface.set_selection(Selection::new(start, end))?;
                }
                BridgeRequest::State => {
                    replies.push(BridgeEvent::State {
                        state: surface.save_state()?,
                    });
                }
                BridgeRequest::Restore { state } => {
                    surface.restore_state(&state)?;
                }
                BridgeRequest::Html => {
                    replies.push(BridgeEvent::Html {
                        html: surface.html()?,
                    });
                }
            }

            let palette = surface.palette();
            if palette.state() != palette_before {
                debug!("palette visible: {}", palette.is_visible());
                let items = if palette.is_visible() {
                    palette.items().iter().map(PaletteEntry::from).collect()
                } else {
                    Vec::new()
                };
                replies.push(BridgeEvent::Palette {
                    visible: palette.is_visible(),
                    anchor: palette.anchor(),
                    items,
                });
            }
            Ok(replies)
        })
    }
}

/// Build the typed command, filling the link URL from the request.
fn resolve_command(request: CommandRequest, url: Option<String>) -> Result<Command> {
    let command = Command::try_from(request)?;
    Ok(match command {
        Command::InsertLink { url: None } => Command::InsertLink { url },
        other => other,
    })
}

fn outcome_reply(outcome: Outcome) -> Option<BridgeEvent> {
    match outcome {
        Outcome::Content(markdown) => Some(BridgeEvent::Content { markdown }),
        Outcome::Delegated(action) => Some(BridgeEvent::History {
            action: match action {
                HistoryAction::Undo => "undo".to_string(),
                HistoryAction::Redo => "redo".to_string(),
            },
        }),
        Outcome::Mutated | Outcome::Unchanged => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
