//! Editor configuration.
//!
//! Every field has a default, so a host can pass `{}` (or nothing) and get the
//! stock editor. Field names are camelCase to match what JavaScript passes in.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::EditorError;
use crate::render::RenderConfig;

/// Fixed gap, in pixels, kept between the drag handle and either pane edge.
pub const DEFAULT_RESIZE_MARGIN: f64 = 15.0;

/// Key the view mode is stored under in host component data.
pub const DEFAULT_MODE_KEY: &str = "mode";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub render: RenderConfig,
    /// Safety offset for the resizer, in pixels.
    pub margin: f64,
    pub mode_key: SmolStr,
    /// Text inserted by Tab (without Shift).
    pub tab_text: SmolStr,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            margin: DEFAULT_RESIZE_MARGIN,
            mode_key: SmolStr::new_static(DEFAULT_MODE_KEY),
            tab_text: SmolStr::new_static("\t"),
        }
    }
}

impl EditorConfig {
    /// Parse a config from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EditorError> {
        if self.mode_key.trim().is_empty() {
            return Err(EditorError::Config("modeKey must not be empty".into()));
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(EditorError::Config(format!(
                "margin must be a non-negative number, got {}",
                self.margin
            )));
        }
        if self.tab_text.is_empty() {
            return Err(EditorError::Config("tabText must not be empty".into()));
        }
        self.render.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = EditorConfig::from_json("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.margin, 15.0);
        assert_eq!(config.mode_key, "mode");
        assert_eq!(config.tab_text, "\t");
        assert!(config.render.linkify);
    }

    #[test]
    fn test_partial_override() {
        let config =
            EditorConfig::from_json(r#"{"margin": 4, "render": {"highlightCode": false}}"#).unwrap();
        assert_eq!(config.margin, 4.0);
        assert!(!config.render.highlight_code);
        assert!(config.render.footnotes);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            EditorConfig::from_json(r#"{"modeKey": "  "}"#),
            Err(EditorError::Config(_))
        ));
        assert!(matches!(
            EditorConfig::from_json(r#"{"margin": -1}"#),
            Err(EditorError::Config(_))
        ));
        assert!(matches!(
            EditorConfig::from_json(r#"{"render": {"linkTarget": ""}}"#),
            Err(EditorError::Config(_))
        ));
        assert!(matches!(
            EditorConfig::from_json("not json"),
            Err(EditorError::Json(_))
        ));
    }
}
