//! Saved editor state.
//!
//! A snapshot hosts keep across surface reloads (e.g. when a view is torn
//! down and rebuilt). Restoring sets the content first and then the
//! selection, clamped to the new text.

use crate::editor::selection::Selection;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorState {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<Selection>,
    /// Formats active at the caret when the snapshot was taken
    #[serde(default)]
    pub formats: BTreeMap<String, bool>,
}

impl EditorState {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
