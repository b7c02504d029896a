//! Browser implementation of `ResizeSurface`.

use std::rc::Rc;

use markpane_core::ResizeSurface;

use crate::dom::{DRAGGING_CLASS, DomHandles, NO_SELECTION_CLASS};

pub struct BrowserResizeSurface {
    handles: Rc<DomHandles>,
}

impl BrowserResizeSurface {
    pub fn new(handles: Rc<DomHandles>) -> Self {
        Self { handles }
    }
}

impl ResizeSurface for BrowserResizeSurface {
    fn container_width(&self) -> f64 {
        self.handles.root.offset_width() as f64
    }

    fn handle_width(&self) -> f64 {
        self.handles.resizer.offset_width() as f64
    }

    fn set_handle_left(&mut self, px: f64) {
        if let Err(e) = self
            .handles
            .resizer
            .style()
            .set_property("left", &format!("{px}px"))
        {
            tracing::warn!(?e, "failed to position resize handle");
        }
    }

    fn set_editor_width(&mut self, px: f64) {
        if let Err(e) = self
            .handles
            .editor
            .style()
            .set_property("width", &format!("{px}px"))
        {
            tracing::warn!(?e, "failed to size editor pane");
        }
    }

    fn set_drag_markers(&mut self, active: bool) {
        let markers = [
            (self.handles.resizer.class_list(), DRAGGING_CLASS),
            (self.handles.editor.class_list(), NO_SELECTION_CLASS),
        ];
        for (classes, marker) in markers {
            if let Err(e) = classes.toggle_with_force(marker, active) {
                tracing::warn!(?e, marker, "failed to toggle drag marker");
            }
        }
    }

    fn clear_text_selection(&mut self) {
        let selection = web_sys::window().and_then(|w| w.get_selection().ok().flatten());
        if let Some(selection) = selection
            && let Err(e) = selection.remove_all_ranges()
        {
            tracing::warn!(?e, "failed to clear text selection");
        }
    }
}
