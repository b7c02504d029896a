//! Browser implementation of `TextInput` over the `<textarea>`.

use wasm_bindgen::JsCast;
use web_sys::{HtmlDocument, HtmlTextAreaElement};

use markpane_core::TextInput;

pub struct TextAreaInput {
    element: HtmlTextAreaElement,
}

impl TextAreaInput {
    pub fn new(element: HtmlTextAreaElement) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &HtmlTextAreaElement {
        &self.element
    }
}

impl TextInput for TextAreaInput {
    /// `document.execCommand("insertText")`: keeps the browser's undo stack
    /// intact and fires `input` synchronously.
    fn insert_native(&mut self, text: &str) -> bool {
        let Some(document) = self
            .element
            .owner_document()
            .and_then(|d| d.dyn_into::<HtmlDocument>().ok())
        else {
            return false;
        };
        match document.exec_command_with_show_ui_and_value("insertText", false, text) {
            Ok(applied) => applied,
            Err(e) => {
                tracing::debug!(?e, "insertText unavailable");
                false
            }
        }
    }

    fn selection(&self) -> Option<(usize, usize)> {
        let start = self.element.selection_start().ok().flatten()?;
        let end = self.element.selection_end().ok().flatten()?;
        Some((start as usize, end as usize))
    }

    fn set_value(&mut self, text: &str) {
        self.element.set_value(text);
    }

    fn set_caret(&mut self, offset: usize) {
        let offset = offset as u32;
        if let Err(e) = self.element.set_selection_range(offset, offset) {
            tracing::warn!(?e, "failed to place caret");
        }
    }
}
