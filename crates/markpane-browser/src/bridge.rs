//! postMessage transport to the embedding host.
//!
//! Outbound envelopes go to `window.parent`. Until the host registers us the
//! target origin is `*`; after that it is pinned to the registering origin
//! and messages from any other origin are dropped.

use gloo_utils::format::JsValueSerdeExt;
use serde_json::Value;
use wasm_bindgen::JsValue;
use web_sys::{MessageEvent, Window};

use markpane_core::{Envelope, HostSession, PlatformError};

use crate::dom::js_error;

const ANY_ORIGIN: &str = "*";

pub struct PostMessageTransport {
    window: Window,
    origin: Option<String>,
}

impl PostMessageTransport {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            origin: None,
        }
    }

    /// Origin outbound messages are addressed to.
    pub fn target_origin(&self) -> &str {
        self.origin.as_deref().unwrap_or(ANY_ORIGIN)
    }

    /// Pin the host origin. Opaque origins (`null`, empty) are not pinned.
    pub fn pin_origin(&mut self, origin: &str) {
        if origin.is_empty() || origin == "null" {
            return;
        }
        if self.origin.as_deref() != Some(origin) {
            tracing::debug!(%origin, "host origin pinned");
            self.origin = Some(origin.to_string());
        }
    }

    /// Whether an inbound event comes from the host we talk to.
    pub fn accepts(&self, event: &MessageEvent) -> bool {
        match &self.origin {
            Some(origin) => event.origin() == *origin,
            None => true,
        }
    }

    /// Decode an inbound event's payload. Hosts send either a JSON string or
    /// a structured-cloned object.
    pub fn decode(event: &MessageEvent) -> Option<Value> {
        let data = event.data();
        let decoded = match data.as_string() {
            Some(json) => serde_json::from_str(&json),
            None => data.into_serde::<Value>(),
        };
        match decoded {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(error = %e, "ignoring undecodable message");
                None
            }
        }
    }

    pub fn post(&self, envelope: &Envelope) -> Result<(), PlatformError> {
        let parent = self
            .window
            .parent()
            .map_err(|e| js_error("window.parent", e))?
            .ok_or_else(|| PlatformError::from("no parent window"))?;
        let message = JsValue::from_serde(envelope)
            .map_err(|e| PlatformError(format!("encode {}: {e}", envelope.action)))?;
        parent
            .post_message(&message, self.target_origin())
            .map_err(|e| js_error("postMessage", e))
    }

    /// Post everything the session has queued.
    pub fn flush(&self, session: &mut HostSession) {
        for envelope in session.drain_outbox() {
            if let Err(e) = self.post(&envelope) {
                tracing::warn!(action = %envelope.action, error = %e, "failed to reach host");
            }
        }
    }
}
