//! postMessage wire format between the editor iframe and its host.
//!
//! Every message in either direction is one JSON envelope:
//!
//! ```json
//! { "action": "save-items", "data": { ... }, "messageId": "markpane-3",
//!   "sessionKey": "...", "api": "component" }
//! ```
//!
//! Replies from the host carry the message they answer in `original`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::EditorError;
use crate::platform::PlatformTag;

pub const API: &str = "component";

/// Action names used on the wire.
pub mod action {
    pub const COMPONENT_REGISTERED: &str = "component-registered";
    pub const REPLY: &str = "reply";
    pub const STREAM_CONTEXT_ITEM: &str = "stream-context-item";
    pub const SAVE_ITEMS: &str = "save-items";
    pub const SET_COMPONENT_DATA: &str = "set-component-data";
}

/// One message, either direction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub action: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<Box<Envelope>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_data: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<String>,
}

impl Envelope {
    /// Outbound message from this component.
    pub fn outbound(action: &str, data: Value) -> Self {
        Self {
            action: action.to_string(),
            data,
            api: Some(API.to_string()),
            ..Default::default()
        }
    }

    pub fn from_value(value: &Value) -> Result<Self, EditorError> {
        Ok(Envelope::deserialize(value)?)
    }

    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A note as the host streams it.
///
/// Only `uuid` and `content.text` matter to the editor. Everything else is
/// kept so a save sends the item back intact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteItem {
    pub uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub content: NoteContent,
    /// Set when only the item's metadata changed; the text is stale.
    #[serde(rename = "isMetadataUpdate", default, skip_serializing_if = "is_false")]
    pub is_metadata_update: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteContent {
    #[serde(default)]
    pub text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Payload of `component-registered`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registration {
    pub session_key: Option<String>,
    pub component_data: Map<String, Value>,
    pub platform: Option<PlatformTag>,
    pub environment: Option<String>,
}

/// Inbound messages the editor acts on.
#[derive(Debug, Clone, PartialEq)]
pub enum HostMessage {
    Registered(Registration),
    ContextItem(NoteItem),
    /// Anything else; carries the action for logging.
    Ignored(String),
}

impl HostMessage {
    pub fn from_envelope(envelope: Envelope) -> Result<Self, EditorError> {
        match envelope.action.as_str() {
            action::COMPONENT_REGISTERED => Ok(HostMessage::Registered(registration(envelope))),
            action::STREAM_CONTEXT_ITEM => context_item(&envelope).map(HostMessage::ContextItem),
            action::REPLY => {
                let answers_stream = envelope
                    .original
                    .as_ref()
                    .is_some_and(|o| o.action == action::STREAM_CONTEXT_ITEM);
                if answers_stream {
                    context_item(&envelope).map(HostMessage::ContextItem)
                } else {
                    Ok(HostMessage::Ignored(envelope.action))
                }
            }
            _ => Ok(HostMessage::Ignored(envelope.action)),
        }
    }
}

fn registration(envelope: Envelope) -> Registration {
    let data = envelope.data.as_object();
    let from_data = |key: &str| data.and_then(|d| d.get(key));
    let string_at = |key: &str| from_data(key).and_then(Value::as_str).map(str::to_string);

    let component_data = envelope
        .component_data
        .or_else(|| from_data("componentData").and_then(Value::as_object).cloned())
        .unwrap_or_default();

    Registration {
        session_key: envelope.session_key.or_else(|| string_at("sessionKey")),
        component_data,
        platform: string_at("platform")
            .map(|p| PlatformTag::new(&p))
            .filter(|p| !p.as_str().is_empty()),
        environment: string_at("environment"),
    }
}

fn context_item(envelope: &Envelope) -> Result<NoteItem, EditorError> {
    let item = envelope
        .data
        .get("item")
        .ok_or_else(|| EditorError::UnexpectedMessage {
            action: envelope.action.clone(),
            reason: "missing data.item".to_string(),
        })?;
    Ok(NoteItem::deserialize(item)?)
}
