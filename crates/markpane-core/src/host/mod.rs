//! The host contract.
//!
//! The editor runs inside an iframe and everything it persists goes through
//! the embedding application. `HostBridge` is the narrow synchronous view of
//! that relationship the editor logic sees; `session::HostSession` implements
//! it over the postMessage protocol in `protocol`.
//!
//! Every call is fire-and-forget. A bridge that is not ready yet drops calls
//! silently instead of failing.

pub mod protocol;
pub mod session;

use serde_json::Value;

/// Outbound operations the editor needs from its host.
pub trait HostBridge {
    /// Persist the full note text. Called after every user edit.
    fn save_document(&mut self, text: &str);

    /// Read a value from the host's per-component key/value storage.
    fn stored_value(&self, key: &str) -> Option<Value>;

    /// Write a value to the host's per-component key/value storage.
    fn set_stored_value(&mut self, key: &str, value: Value);

    /// Whether outbound calls currently reach the host.
    fn is_ready(&self) -> bool {
        true
    }
}

/// Unit type implementation - a bridge that was never connected.
impl HostBridge for () {
    fn save_document(&mut self, _text: &str) {}

    fn stored_value(&self, _key: &str) -> Option<Value> {
        None
    }

    fn set_stored_value(&mut self, _key: &str, _value: Value) {}

    fn is_ready(&self) -> bool {
        false
    }
}

/// `None` is a bridge that is not initialized yet.
impl<T: HostBridge> HostBridge for Option<T> {
    fn save_document(&mut self, text: &str) {
        if let Some(host) = self {
            host.save_document(text);
        }
    }

    fn stored_value(&self, key: &str) -> Option<Value> {
        self.as_ref().and_then(|h| h.stored_value(key))
    }

    fn set_stored_value(&mut self, key: &str, value: Value) {
        if let Some(host) = self {
            host.set_stored_value(key, value);
        }
    }

    fn is_ready(&self) -> bool {
        self.as_ref().map(|h| h.is_ready()).unwrap_or(false)
    }
}

impl<T: HostBridge> HostBridge for &mut T {
    fn save_document(&mut self, text: &str) {
        (**self).save_document(text)
    }

    fn stored_value(&self, key: &str) -> Option<Value> {
        (**self).stored_value(key)
    }

    fn set_stored_value(&mut self, key: &str, value: Value) {
        (**self).set_stored_value(key, value)
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::testing::RecordingHost;
    use super::*;

    #[test]
    fn test_unit_bridge_is_inert() {
        let mut host = ();
        host.save_document("ignored");
        host.set_stored_value("mode", json!(1));
        assert_eq!(host.stored_value("mode"), None);
        assert!(!host.is_ready());
    }

    #[test]
    fn test_option_bridge() {
        let mut none: Option<RecordingHost> = None;
        none.save_document("dropped");
        assert_eq!(none.stored_value("mode"), None);
        assert!(!none.is_ready());

        let mut some = Some(RecordingHost::with_value("mode", json!(2)));
        some.save_document("kept");
        assert!(some.is_ready());
        assert_eq!(some.stored_value("mode"), Some(json!(2)));
        assert_eq!(some.as_ref().unwrap().saves, vec!["kept".to_string()]);
    }

    #[test]
    fn test_mut_ref_bridge_forwards() {
        fn write_through<H: HostBridge>(mut host: H) {
            host.save_document("a");
            host.set_stored_value("k", json!("v"));
        }

        let mut host = RecordingHost::default();
        write_through(&mut host);
        assert_eq!(host.saves, vec!["a".to_string()]);
        assert_eq!(host.stored_value("k"), Some(json!("v")));
    }
}
