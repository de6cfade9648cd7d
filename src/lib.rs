//! Slipbox - an embeddable markdown editing surface
//!
//! The crate holds the editing core a host application embeds: selection
//! tracking, text mutation, command dispatch, change notification, the
//! slash command palette and auto-markdown, plus a JSON bridge for hosts
//! that live in another process or thread.
//!
//! ```ignore
//! use slipbox::config::Settings;
//! use slipbox::editor::{EditorSurface, KeyEvent};
//!
//! let mut editor = EditorSurface::new(Settings::default());
//! editor.mark_ready();
//! editor.subscribe(|event| println!("{}", event.serialized_content));
//! editor.handle_key(&KeyEvent::char('#'))?;
//! editor.handle_key(&KeyEvent::char(' '))?; // line becomes "# "
//! ```

pub mod bridge;
pub mod config;
pub mod editor;
pub mod error;
pub mod render;
pub mod string_utils;

pub use error::{Error, Result};
