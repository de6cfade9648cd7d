//! Editor Commands
//!
//! [`Command`] is the closed set of actions a host can ask the editor
//! surface to perform. Each variant carries exactly the payload it needs,
//! so there is no runtime type checking once a command has been built.
//!
//! Hosts that speak JSON send a [`CommandRequest`] (`{"action": ...,
//! "data": {...}}`) which is converted with `Command::try_from`. Unknown
//! actions and malformed payloads become `Error::InvalidCommand`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ─────────────────────────────────────────────────────────────────────────────
// Command Enum
// ─────────────────────────────────────────────────────────────────────────────

/// A single editor action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Wrap the selection with `**`
    ToggleBold,
    /// Wrap the selection with `*`
    ToggleItalic,
    /// Wrap the selection with `~~`
    ToggleStrikethrough,
    /// Wrap the selection with `<u>` / `</u>`
    ToggleUnderline,
    /// Wrap the selection with backticks
    ToggleInlineCode,
    /// Insert a heading marker (level 1-6)
    InsertHeading { level: u8 },
    /// Insert a bullet (`- `) or numbered (`1. `) list marker
    InsertList { ordered: bool },
    /// Insert `> `
    InsertBlockquote,
    /// Insert an empty fenced code block and put the caret inside it
    InsertCodeBlock,
    /// Wrap the selection as a link; the host is prompted when `url` is `None`
    InsertLink { url: Option<String> },
    /// Insert `![](src)` at the caret
    InsertImage { src: String },
    /// Insert literal text at the caret
    InsertText { text: String },
    /// Replace the whole document
    SetContent { text: String },
    /// Read the whole document
    GetContent,
    /// Handled by the host's native editing history
    Undo,
    /// Handled by the host's native editing history
    Redo,
}

impl Command {
    /// Canonical action name, as used on the wire.
    pub fn action_name(&self) -> &'static str {
        match self {
            Self::ToggleBold => "toggleBold",
            Self::ToggleItalic => "toggleItalic",
            Self::ToggleStrikethrough => "toggleStrikethrough",
            Self::ToggleUnderline => "toggleUnderline",
            Self::ToggleInlineCode => "toggleInlineCode",
            Self::InsertHeading { .. } => "insertHeading",
            Self::InsertList { .. } => "insertList",
            Self::InsertBlockquote => "insertBlockquote",
            Self::InsertCodeBlock => "insertCodeBlock",
            Self::InsertLink { .. } => "insertLink",
            Self::InsertImage { .. } => "insertImage",
            Self::InsertText { .. } => "insertText",
            Self::SetContent { .. } => "setContent",
            Self::GetContent => "getContent",
            Self::Undo => "undo",
            Self::Redo => "redo",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire Format
// ─────────────────────────────────────────────────────────────────────────────

/// JSON form of a command: an action name plus an optional payload map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

impl CommandRequest {
    /// A request without payload.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            data: None,
        }
    }

    /// Add one payload entry.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), value.into());
        self
    }

    fn value(&self, key: &str) -> Option<&Value> {
        self.data.as_ref().and_then(|data| data.get(key))
    }

    fn string(&self, keys: &[&str]) -> Result<String> {
        keys.iter()
            .find_map(|key| self.value(key))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                Error::invalid_command(format!("{} requires string '{}'", self.action, keys[0]))
            })
    }

    fn optional_string(&self, key: &str) -> Result<Option<String>> {
        match self.value(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(Error::invalid_command(format!(
                "{}: '{}' must be a string",
                self.action, key
            ))),
        }
    }

    fn flag(&self, key: &str) -> Result<bool> {
        match self.value(key) {
            None | Some(Value::Null) => Ok(false),
            Some(Value::Bool(b)) => Ok(*b),
            Some(_) => Err(Error::invalid_command(format!(
                "{}: '{}' must be a boolean",
                self.action, key
            ))),
        }
    }

    fn level(&self) -> Result<u8> {
        self.value("level")
            .and_then(Value::as_u64)
            .filter(|level| (1..=6).contains(level))
            .map(|level| level as u8)
            .ok_or_else(|| Error::invalid_command("insertHeading requires level 1-6"))
    }
}

impl TryFrom<CommandRequest> for Command {
    type Error = Error;

    /// Accepts the canonical action names and the short forms `bold`,
    /// `italic`, `strike`, `underline`, `inlineCode`, `heading1`-`heading3`,
    /// `insertOrderedList`, `blockquote`, `codeBlock` and `link`.
    fn try_from(request: CommandRequest) -> Result<Self> {
        let command = match request.action.as_str() {
            "toggleBold" | "bold" => Command::ToggleBold,
            "toggleItalic" | "italic" => Command::ToggleItalic,
            "toggleStrikethrough" | "strike" => Command::ToggleStrikethrough,
            "toggleUnderline" | "underline" => Command::ToggleUnderline,
            "toggleInlineCode" | "inlineCode" => Command::ToggleInlineCode,
            "insertHeading" => Command::InsertHeading {
                level: request.level()?,
            },
            "heading1" => Command::InsertHeading { level: 1 },
            "heading2" => Command::InsertHeading { level: 2 },
            "heading3" => Command::InsertHeading { level: 3 },
            "insertList" => Command::InsertList {
                ordered: request.flag("ordered")?,
            },
            "insertOrderedList" => Command::InsertList { ordered: true },
            "insertBlockquote" | "blockquote" => Command::InsertBlockquote,
            "insertCodeBlock" | "codeBlock" => Command::InsertCodeBlock,
            "insertLink" | "link" => Command::InsertLink {
                url: request.optional_string("url")?,
            },
            "insertImage" => Command::InsertImage {
                src: request.string(&["src"])?,
            },
            "insertText" => Command::InsertText {
                text: request.string(&["text"])?,
            },
            "setContent" => Command::SetContent {
                text: request.string(&["text", "html", "markdown"])?,
            },
            "getContent" => Command::GetContent,
            "undo" => Command::Undo,
            "redo" => Command::Redo,
            other => return Err(Error::invalid_command(format!("unknown action '{}'", other))),
        };
        Ok(command)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Command> {
        let request: CommandRequest = serde_json::from_str(json)?;
        Command::try_from(request)
    }

    #[test]
    fn test_parse_simple_actions() {
        assert_eq!(parse(r#"{"action":"toggleBold"}"#).unwrap(), Command::ToggleBold);
        assert_eq!(parse(r#"{"action":"italic"}"#).unwrap(), Command::ToggleItalic);
        assert_eq!(parse(r#"{"action":"undo"}"#).unwrap(), Command::Undo);
        assert_eq!(parse(r#"{"action":"getContent"}"#).unwrap(), Command::GetContent);
    }

    #[test]
    fn test_parse_heading_level() {
        assert_eq!(
            parse(r#"{"action":"insertHeading","data":{"level":3}}"#).unwrap(),
            Command::InsertHeading { level: 3 }
        );
        assert_eq!(
            parse(r#"{"action":"heading2"}"#).unwrap(),
            Command::InsertHeading { level: 2 }
        );
    }

    #[test]
    fn test_heading_level_out_of_range_is_invalid() {
        let err = parse(r#"{"action":"insertHeading","data":{"level":9}}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidCommand(_)));
        let err = parse(r#"{"action":"insertHeading"}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidCommand(_)));
    }

    #[test]
    fn test_parse_list_variants() {
        assert_eq!(
            parse(r#"{"action":"insertList"}"#).unwrap(),
            Command::InsertList { ordered: false }
        );
        assert_eq!(
            parse(r#"{"action":"insertList","data":{"ordered":true}}"#).unwrap(),
            Command::InsertList { ordered: true }
        );
        assert_eq!(
            parse(r#"{"action":"insertOrderedList"}"#).unwrap(),
            Command::InsertList { ordered: true }
        );
        assert!(parse(r#"{"action":"insertList","data":{"ordered":"yes"}}"#).is_err());
    }

    #[test]
    fn test_parse_payload_commands() {
        assert_eq!(
            parse(r#"{"action":"setContent","data":{"html":"<p>Hi</p>"}}"#).unwrap(),
            Command::SetContent {
                text: "<p>Hi</p>".to_string()
            }
        );
        assert_eq!(
            parse(r#"{"action":"insertImage","data":{"src":"a.png"}}"#).unwrap(),
            Command::InsertImage {
                src: "a.png".to_string()
            }
        );
        assert_eq!(
            parse(r#"{"action":"insertLink"}"#).unwrap(),
            Command::InsertLink { url: None }
        );
    }

    #[test]
    fn test_payload_with_wrong_type_is_invalid() {
        let err = parse(r#"{"action":"insertText","data":{"text":42}}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidCommand(_)));
        let err = parse(r#"{"action":"insertLink","data":{"url":false}}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidCommand(_)));
    }

    #[test]
    fn test_unknown_action_is_invalid() {
        let err = parse(r#"{"action":"explode"}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidCommand(msg) if msg.contains("explode")));
    }

    #[test]
    fn test_request_builder_roundtrips_through_json() {
        let request = CommandRequest::new("insertText").with("text", "hello");
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""text":"hello""#));
        assert_eq!(
            parse(&json).unwrap(),
            Command::InsertText {
                text: "hello".to_string()
            }
        );
    }

    #[test]
    fn test_action_names_parse_back() {
        let commands = [
            Command::ToggleBold,
            Command::ToggleUnderline,
            Command::InsertBlockquote,
            Command::InsertCodeBlock,
            Command::GetContent,
            Command::Redo,
        ];
        for command in commands {
            let request = CommandRequest::new(command.action_name());
            assert_eq!(Command::try_from(request).unwrap(), command);
        }
    }
}
