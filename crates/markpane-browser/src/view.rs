//! Browser implementation of `EditorView`.

use std::rc::Rc;

use markpane_core::{EditorView, PlatformTag, ViewMode};

use crate::dom::DomHandles;

const SELECTED_BUTTON: &str = "sk-button button selected info";
const UNSELECTED_BUTTON: &str = "sk-button button sk-secondary-contrast";

pub struct BrowserView {
    handles: Rc<DomHandles>,
}

impl BrowserView {
    pub fn new(handles: Rc<DomHandles>) -> Self {
        Self { handles }
    }

    pub fn handles(&self) -> &DomHandles {
        &self.handles
    }
}

impl EditorView for BrowserView {
    fn show_preview(&mut self, html: &str) {
        self.handles.preview.set_inner_html(html);
    }

    fn apply_mode(&mut self, mode: ViewMode) {
        // Class lists, not class names: the editor and handle also carry
        // drag markers that must survive a mode switch.
        for element in self.handles.mode_targets() {
            let classes = element.class_list();
            for other in ViewMode::ALL {
                if other != mode
                    && let Err(e) = classes.remove_1(other.css_class())
                {
                    tracing::warn!(?e, mode = other.css_class(), "failed to clear mode class");
                }
            }
            if let Err(e) = classes.add_1(mode.css_class()) {
                tracing::warn!(?e, mode = mode.css_class(), "failed to set mode class");
            }
        }

        for (button_mode, button) in &self.handles.buttons {
            button.set_class_name(if *button_mode == mode {
                SELECTED_BUTTON
            } else {
                UNSELECTED_BUTTON
            });
        }
    }

    fn apply_platform(&mut self, platform: &PlatformTag) {
        self.handles.root.set_class_name(&platform.root_class());
    }
}
