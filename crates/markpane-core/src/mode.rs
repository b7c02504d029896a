//! View mode state machine.
//!
//! Three modes, exactly one active. Activating a mode writes its numeric value
//! to host storage so the next load can restore it; restoring silently keeps
//! the current mode when storage has nothing usable.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use smol_str::SmolStr;

use crate::config::DEFAULT_MODE_KEY;
use crate::error::EditorError;
use crate::host::HostBridge;

/// Which of the input and preview surfaces are visible.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Raw text only.
    #[default]
    Edit,
    /// Raw text and preview side by side.
    Split,
    /// Rendered preview only.
    Preview,
}

impl ViewMode {
    /// All modes in button order.
    pub const ALL: [ViewMode; 3] = [ViewMode::Edit, ViewMode::Split, ViewMode::Preview];

    /// Numeric value persisted in host storage.
    pub fn value(self) -> u8 {
        match self {
            ViewMode::Edit => 0,
            ViewMode::Split => 1,
            ViewMode::Preview => 2,
        }
    }

    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(ViewMode::Edit),
            1 => Some(ViewMode::Split),
            2 => Some(ViewMode::Preview),
            _ => None,
        }
    }

    /// Button label.
    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Edit => "Edit",
            ViewMode::Split => "Split",
            ViewMode::Preview => "Preview",
        }
    }

    /// Layout class shared by the container, input, handle and preview.
    pub fn css_class(self) -> &'static str {
        match self {
            ViewMode::Edit => "edit",
            ViewMode::Split => "split",
            ViewMode::Preview => "preview",
        }
    }

    /// Decode a value read back from host storage.
    ///
    /// Hosts have stored the mode as a number or as a numeric string over
    /// time; anything else is unrecognized.
    pub fn from_stored(value: &Value) -> Option<Self> {
        match value {
            // JavaScript numbers are doubles; `1.0` is a fine `1`.
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                .and_then(Self::from_value),
            Value::String(s) => s.trim().parse::<i64>().ok().and_then(Self::from_value),
            _ => None,
        }
    }
}

impl std::str::FromStr for ViewMode {
    type Err = EditorError;

    /// Accepts a label or class name in any case, or a stored numeric value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ViewMode::ALL
            .into_iter()
            .find(|m| m.css_class().eq_ignore_ascii_case(s))
            .or_else(|| s.parse::<i64>().ok().and_then(Self::from_value))
            .ok_or_else(|| EditorError::Config(format!("unknown view mode {s:?}")))
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The active view mode and the storage key it persists under.
#[derive(Debug, Clone)]
pub struct ModeState {
    current: ViewMode,
    key: SmolStr,
}

impl Default for ModeState {
    fn default() -> Self {
        Self::new(DEFAULT_MODE_KEY)
    }
}

impl ModeState {
    pub fn new(key: &str) -> Self {
        Self {
            current: ViewMode::default(),
            key: SmolStr::new(key),
        }
    }

    pub fn current(&self) -> ViewMode {
        self.current
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// User picked a mode: switch to it and persist it.
    pub fn activate<H: HostBridge>(&mut self, mode: ViewMode, host: &mut H) -> ViewMode {
        self.current = mode;
        host.set_stored_value(&self.key, Value::from(mode.value()));
        tracing::debug!(mode = %mode, "view mode activated");
        mode
    }

    /// Load the persisted mode, if there is a usable one.
    ///
    /// Returns the mode now active. Misses are not errors.
    pub fn restore<H: HostBridge>(&mut self, host: &H) -> ViewMode {
        match host.stored_value(&self.key) {
            Some(value) => match ViewMode::from_stored(&value) {
                Some(mode) => self.current = mode,
                None => tracing::debug!(?value, "ignoring unrecognized stored mode"),
            },
            None => tracing::debug!(key = %self.key, "no stored mode"),
        }
        self.current
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::host::testing::RecordingHost;

    #[test]
    fn test_mode_metadata() {
        let labels: Vec<_> = ViewMode::ALL.iter().map(|m| m.label()).collect();
        assert_eq!(labels, vec!["Edit", "Split", "Preview"]);
        let classes: Vec<_> = ViewMode::ALL.iter().map(|m| m.css_class()).collect();
        assert_eq!(classes, vec!["edit", "split", "preview"]);
        for mode in ViewMode::ALL {
            assert_eq!(ViewMode::from_value(mode.value() as i64), Some(mode));
        }
    }

    #[test]
    fn test_initial_state_is_edit() {
        let state = ModeState::default();
        assert_eq!(state.current(), ViewMode::Edit);
        assert_eq!(state.key(), "mode");
    }

    #[test]
    fn test_restore_each_mode() {
        for mode in ViewMode::ALL {
            let host = RecordingHost::with_value("mode", json!(mode.value()));
            let mut state = ModeState::default();
            assert_eq!(state.restore(&host), mode);
            assert_eq!(state.current(), mode);
        }
    }

    #[test]
    fn test_restore_without_value_stays_edit() {
        let host = RecordingHost::default();
        let mut state = ModeState::default();
        assert_eq!(state.restore(&host), ViewMode::Edit);

        // An uninitialized bridge is the same as an empty store.
        let none: Option<RecordingHost> = None;
        assert_eq!(state.restore(&none), ViewMode::Edit);
    }

    #[test]
    fn test_restore_ignores_garbage() {
        let mut host = RecordingHost::default();
        let mut state = ModeState::default();
        state.activate(ViewMode::Split, &mut host);

        for garbage in [json!(7), json!(-1), json!("x"), json!(null), json!(1.5), json!([1])] {
            let host = RecordingHost::with_value("mode", garbage);
            assert_eq!(state.restore(&host), ViewMode::Split);
        }
    }

    #[test]
    fn test_parse_mode_name() {
        assert_eq!("split".parse::<ViewMode>().unwrap(), ViewMode::Split);
        assert_eq!("Preview".parse::<ViewMode>().unwrap(), ViewMode::Preview);
        assert_eq!(" 0 ".parse::<ViewMode>().unwrap(), ViewMode::Edit);
        assert!("sideways".parse::<ViewMode>().is_err());
    }

    #[test]
    fn test_restore_accepts_integral_float() {
        let host = RecordingHost::with_value("mode", json!(1.0));
        let mut state = ModeState::default();
        assert_eq!(state.restore(&host), ViewMode::Split);
    }

    #[test]
    fn test_restore_accepts_numeric_string() {
        let host = RecordingHost::with_value("mode", json!("2"));
        let mut state = ModeState::default();
        assert_eq!(state.restore(&host), ViewMode::Preview);
    }

    #[test]
    fn test_activate_persists_value() {
        let mut host = RecordingHost::default();
        let mut state = ModeState::default();

        state.activate(ViewMode::Preview, &mut host);
        assert_eq!(state.current(), ViewMode::Preview);
        assert_eq!(host.store_writes, vec![("mode".to_string(), json!(2))]);
        assert!(host.saves.is_empty());

        // And it round-trips through the store.
        let mut fresh = ModeState::default();
        assert_eq!(fresh.restore(&host), ViewMode::Preview);
    }

    #[test]
    fn test_custom_key() {
        let mut host = RecordingHost::default();
        let mut state = ModeState::new("viewMode");
        state.activate(ViewMode::Split, &mut host);
        assert_eq!(host.stored_value("viewMode"), Some(json!(1)));
        assert_eq!(host.stored_value("mode"), None);
    }
}
