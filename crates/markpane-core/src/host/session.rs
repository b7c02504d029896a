//! Host-side state for one editor iframe.
//!
//! `HostSession` decodes inbound envelopes, keeps what the host told us
//! (session key, component data, the working note) and queues outbound
//! envelopes. It does no I/O; the platform layer posts whatever
//! `drain_outbox` returns.

use serde_json::{Map, Value, json};

use super::HostBridge;
use super::protocol::{Envelope, HostMessage, NoteItem, action};
use crate::error::EditorError;
use crate::platform::PlatformTag;

const MESSAGE_ID_PREFIX: &str = "markpane";

/// What the editor should react to after an inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// The host accepted this component. Stored values are now readable.
    Registered { platform: Option<PlatformTag> },
    /// A note was streamed in.
    Note(NoteItem),
}

#[derive(Debug, Default)]
pub struct HostSession {
    session_key: Option<String>,
    component_data: Map<String, Value>,
    platform: Option<PlatformTag>,
    environment: Option<String>,
    note: Option<NoteItem>,
    outbox: Vec<Envelope>,
    next_id: u64,
    registered: bool,
}

impl HostSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn session_key(&self) -> Option<&str> {
        self.session_key.as_deref()
    }

    pub fn platform(&self) -> Option<&PlatformTag> {
        self.platform.as_ref()
    }

    pub fn environment(&self) -> Option<&str> {
        self.environment.as_deref()
    }

    /// The note being edited, as last streamed.
    pub fn note(&self) -> Option<&NoteItem> {
        self.note.as_ref()
    }

    pub fn component_data(&self) -> &Map<String, Value> {
        &self.component_data
    }

    /// Decode and apply one inbound message.
    pub fn handle_message(&mut self, raw: &Value) -> Result<Option<HostEvent>, EditorError> {
        let envelope = Envelope::from_value(raw)?;
        match HostMessage::from_envelope(envelope)? {
            HostMessage::Registered(registration) => {
                if registration.session_key.is_some() {
                    self.session_key = registration.session_key;
                }
                self.component_data = registration.component_data;
                self.platform = registration.platform.clone();
                self.environment = registration.environment;

                // The host may re-register (theme change, reload); only
                // subscribe to the note once.
                if !self.registered {
                    self.registered = true;
                    self.send(action::STREAM_CONTEXT_ITEM, json!({}));
                }
                tracing::debug!(platform = ?self.platform, "component registered");
                Ok(Some(HostEvent::Registered {
                    platform: registration.platform,
                }))
            }
            HostMessage::ContextItem(note) => {
                tracing::debug!(
                    uuid = %note.uuid,
                    metadata_only = note.is_metadata_update,
                    "note streamed"
                );
                self.note = Some(note.clone());
                Ok(Some(HostEvent::Note(note)))
            }
            HostMessage::Ignored(action) => {
                tracing::debug!(%action, "ignoring host message");
                Ok(None)
            }
        }
    }

    /// Take every queued outbound envelope.
    pub fn drain_outbox(&mut self) -> Vec<Envelope> {
        std::mem::take(&mut self.outbox)
    }

    pub fn has_pending(&self) -> bool {
        !self.outbox.is_empty()
    }

    /// Envelopes queued over the session's lifetime, drained or not.
    pub fn messages_sent(&self) -> u64 {
        self.next_id
    }

    fn send(&mut self, action: &str, data: Value) {
        self.next_id += 1;
        let mut envelope = Envelope::outbound(action, data);
        envelope.message_id = Some(format!("{MESSAGE_ID_PREFIX}-{}", self.next_id));
        envelope.session_key = self.session_key.clone();
        self.outbox.push(envelope);
    }
}

impl HostBridge for HostSession {
    fn save_document(&mut self, text: &str) {
        if !self.registered {
            tracing::debug!("save before registration dropped");
            return;
        }
        let Some(note) = self.note.as_mut() else {
            tracing::debug!("save before any note was streamed dropped");
            return;
        };
        note.content.text = text.to_string();
        note.is_metadata_update = false;

        let item = match serde_json::to_value(&*note) {
            Ok(item) => item,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode note for save");
                return;
            }
        };
        self.send(action::SAVE_ITEMS, json!({ "items": [item] }));
    }

    fn stored_value(&self, key: &str) -> Option<Value> {
        self.component_data.get(key).cloned()
    }

    fn set_stored_value(&mut self, key: &str, value: Value) {
        if !self.registered {
            tracing::debug!(%key, "component data write before registration dropped");
            return;
        }
        self.component_data.insert(key.to_string(), value);
        let data = json!({ "componentData": self.component_data });
        self.send(action::SET_COMPONENT_DATA, data);
    }

    fn is_ready(&self) -> bool {
        self.registered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registered() -> HostSession {
        let mut session = HostSession::new();
        session
            .handle_message(&json!({
                "action": "component-registered",
                "sessionKey": "sk",
                "componentData": { "mode": 2 },
                "data": { "platform": "desktop", "environment": "desktop" },
            }))
            .unwrap();
        session
    }

    fn push_note(session: &mut HostSession, text: &str) -> Option<HostEvent> {
        session
            .handle_message(&json!({
                "action": "reply",
                "original": { "action": "stream-context-item" },
                "data": { "item": {
                    "uuid": "n1",
                    "content_type": "Note",
                    "content": { "text": text, "title": "Title" },
                }},
            }))
            .unwrap()
    }

    #[test]
    fn test_registration_subscribes_once() {
        let mut session = registered();
        assert!(session.is_ready());
        assert_eq!(session.session_key(), Some("sk"));
        assert_eq!(session.platform(), Some(&PlatformTag::new("desktop")));
        assert_eq!(session.stored_value("mode"), Some(json!(2)));

        let out = session.drain_outbox();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].action, "stream-context-item");
        assert_eq!(out[0].session_key.as_deref(), Some("sk"));
        assert_eq!(out[0].message_id.as_deref(), Some("markpane-1"));
        assert!(!session.has_pending());

        session
            .handle_message(&json!({ "action": "component-registered", "componentData": {} }))
            .unwrap();
        assert!(session.drain_outbox().is_empty());
        assert_eq!(session.stored_value("mode"), None);
        // Key from the first registration is kept.
        assert_eq!(session.session_key(), Some("sk"));
    }

    #[test]
    fn test_nothing_sent_before_registration() {
        let mut session = HostSession::new();
        assert!(!session.is_ready());
        session.save_document("lost");
        session.set_stored_value("mode", json!(1));
        assert!(session.drain_outbox().is_empty());
        assert_eq!(session.stored_value("mode"), None);
    }

    #[test]
    fn test_save_before_note_dropped() {
        let mut session = registered();
        session.drain_outbox();
        session.save_document("early");
        assert!(session.drain_outbox().is_empty());
    }

    #[test]
    fn test_save_sends_whole_item_with_new_text() {
        let mut session = registered();
        session.drain_outbox();
        let event = push_note(&mut session, "old");
        assert!(matches!(event, Some(HostEvent::Note(ref n)) if n.content.text == "old"));

        session.save_document("new text");
        let out = session.drain_outbox();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].action, "save-items");
        assert_eq!(out[0].message_id.as_deref(), Some("markpane-2"));
        let item = &out[0].data["items"][0];
        assert_eq!(item["uuid"], json!("n1"));
        assert_eq!(item["content"]["text"], json!("new text"));
        assert_eq!(item["content"]["title"], json!("Title"));
        assert_eq!(session.note().unwrap().content.text, "new text");
        assert_eq!(session.messages_sent(), 2);
    }

    #[test]
    fn test_set_stored_value_sends_whole_store() {
        let mut session = registered();
        session.drain_outbox();
        session.set_stored_value("mode", json!(1));
        session.set_stored_value("other", json!("x"));
        let out = session.drain_outbox();
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].action, "set-component-data");
        assert_eq!(
            out[1].data,
            json!({ "componentData": { "mode": 1, "other": "x" } })
        );
        assert_eq!(session.stored_value("mode"), Some(json!(1)));
    }

    #[test]
    fn test_metadata_push_replaces_working_note() {
        let mut session = registered();
        push_note(&mut session, "body");
        let event = session
            .handle_message(&json!({
                "action": "stream-context-item",
                "data": { "item": {
                    "uuid": "n1",
                    "isMetadataUpdate": true,
                    "content": { "text": "body", "title": "Renamed" },
                }},
            }))
            .unwrap();
        assert!(matches!(event, Some(HostEvent::Note(ref n)) if n.is_metadata_update));
        assert_eq!(
            session.note().unwrap().content.extra.get("title"),
            Some(&json!("Renamed"))
        );
    }

    #[test]
    fn test_ignored_and_malformed_messages() {
        let mut session = registered();
        assert_eq!(
            session.handle_message(&json!({ "action": "themes" })).unwrap(),
            None
        );
        assert!(session.handle_message(&json!("not an envelope")).is_err());
        assert!(session.is_ready());
    }
}
