//! JsMarkpane - the editor wrapper for JavaScript.

use serde_json::Value;
use wasm_bindgen::prelude::*;

use markpane_browser::MountedEditor;
use markpane_core::{EditorConfig, MarkdownRenderer, ViewMode};

/// Decode an optional config argument: `undefined`/`null`, a JSON string, or
/// a plain object.
fn config_from_js(config: JsValue) -> Result<EditorConfig, JsError> {
    if config.is_undefined() || config.is_null() {
        return Ok(EditorConfig::default());
    }
    if let Some(json) = config.as_string() {
        return EditorConfig::from_json(&json).map_err(|e| JsError::new(&e.to_string()));
    }
    let config: EditorConfig = serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?;
    config
        .validate()
        .map_err(|e| JsError::new(&e.to_string()))?;
    Ok(config)
}

/// The editor instance exposed to JavaScript.
#[wasm_bindgen]
pub struct JsMarkpane {
    config: EditorConfig,
    mounted: Option<MountedEditor>,
}

#[wasm_bindgen]
impl JsMarkpane {
    /// Create an unmounted editor. `config` may be omitted.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsMarkpane, JsError> {
        Ok(Self {
            config: config_from_js(config)?,
            mounted: None,
        })
    }

    /// Build the editor inside the element with id `container_id` and start
    /// listening for the host. Mounting again moves the editor.
    pub fn mount(&mut self, container_id: &str) -> Result<(), JsError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsError::new("No document"))?;
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| JsError::new(&format!("Element not found: {}", container_id)))?;

        self.unmount();
        let mounted = MountedEditor::mount(&container, &self.config)
            .map_err(|e| JsError::new(&format!("Mount failed: {}", e)))?;
        self.mounted = Some(mounted);
        Ok(())
    }

    /// Remove the editor from the page. No-op if not mounted.
    pub fn unmount(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            mounted.unmount();
        }
    }

    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Current note text.
    #[wasm_bindgen(js_name = getMarkdown)]
    pub fn get_markdown(&self) -> String {
        self.mounted.as_ref().map(|m| m.text()).unwrap_or_default()
    }

    /// Load text as if the host had pushed it. Does not save.
    #[wasm_bindgen(js_name = setMarkdown)]
    pub fn set_markdown(&self, text: &str) -> Result<(), JsError> {
        self.mounted()?.set_document(text);
        Ok(())
    }

    /// Active mode: "edit", "split" or "preview".
    #[wasm_bindgen(js_name = getMode)]
    pub fn get_mode(&self) -> String {
        self.mounted
            .as_ref()
            .map(|m| m.mode())
            .unwrap_or_default()
            .css_class()
            .to_string()
    }

    /// Switch mode by name ("edit", "split", "preview") or number (0-2).
    #[wasm_bindgen(js_name = setMode)]
    pub fn set_mode(&self, mode: &str) -> Result<(), JsError> {
        let mode: ViewMode = mode.parse().map_err(|e: markpane_core::EditorError| {
            JsError::new(&e.to_string())
        })?;
        self.mounted()?.select_mode(mode);
        Ok(())
    }

    /// Hand a host message over directly, for hosts that do not use
    /// `window.postMessage`.
    #[wasm_bindgen(js_name = receiveMessage)]
    pub fn receive_message(&self, message: JsValue) -> Result<(), JsError> {
        let raw: Value = match message.as_string() {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| JsError::new(&format!("Invalid message: {}", e)))?,
            None => serde_wasm_bindgen::from_value(message)
                .map_err(|e| JsError::new(&format!("Invalid message: {}", e)))?,
        };
        self.mounted()?.receive_host_message(&raw);
        Ok(())
    }
}

impl JsMarkpane {
    fn mounted(&self) -> Result<&MountedEditor, JsError> {
        self.mounted
            .as_ref()
            .ok_or_else(|| JsError::new("Editor is not mounted"))
    }
}

/// Render markdown exactly as the preview would, without mounting anything.
#[wasm_bindgen(js_name = renderMarkdown)]
pub fn render_markdown(text: &str, config: JsValue) -> Result<String, JsError> {
    let config = config_from_js(config)?;
    Ok(MarkdownRenderer::new(config.render).render(text))
}
