//! Split-pane drag resizing.
//!
//! A press on the handle starts a drag; page-level moves reposition the
//! handle and resize the editor pane; a page-level release ends it. Moves and
//! releases outside a drag are ignored.

use crate::config::DEFAULT_RESIZE_MARGIN;
use crate::platform::ResizeSurface;

/// Layout produced by one pointer move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneLayout {
    /// Left edge of the drag handle.
    pub handle_left: f64,
    /// Width of the editor pane.
    pub editor_width: f64,
}

/// Per-gesture drag state. Reset on every release.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResizeState {
    pub dragging: bool,
    /// Pointer X at the last press or move.
    pub last_x: Option<f64>,
    /// Editor width applied by the last move of this drag.
    pub pane_width: Option<f64>,
}

/// Compute the layout for pointer position `x`.
///
/// The pointer is kept `margin` pixels away from both edges, the handle is
/// centred on it, and the editor stops `margin` short of the handle. The
/// resulting width is always within `[0, container_width]`, even when the
/// container is too narrow to honour the margins.
pub fn compute_layout(x: f64, container_width: f64, handle_width: f64, margin: f64) -> PaneLayout {
    let min_x = handle_width / 2.0 + margin;
    let max_x = container_width - handle_width - margin;

    // Not `f64::clamp`: a narrow container gives max_x < min_x.
    let x = if x.is_nan() || x < min_x {
        min_x
    } else if x > max_x {
        max_x
    } else {
        x
    };

    let handle_left = x - handle_width / 2.0;
    let editor_width = (handle_left - margin).min(container_width.max(0.0)).max(0.0);

    PaneLayout {
        handle_left,
        editor_width,
    }
}

/// Drag controller over an injected layout surface.
pub struct Resizer<S> {
    surface: S,
    state: ResizeState,
    margin: f64,
}

impl<S: ResizeSurface> Resizer<S> {
    pub fn new(surface: S) -> Self {
        Self::with_margin(surface, DEFAULT_RESIZE_MARGIN)
    }

    pub fn with_margin(surface: S, margin: f64) -> Self {
        Self {
            surface,
            state: ResizeState::default(),
            margin,
        }
    }

    pub fn state(&self) -> ResizeState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state.dragging
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Pointer went down on the handle.
    pub fn press(&mut self, x: f64) {
        self.state.last_x = Some(x);
        if self.state.dragging {
            return;
        }
        self.state.dragging = true;
        self.surface.set_drag_markers(true);
    }

    /// Pointer moved anywhere on the page. Returns the applied layout, or
    /// None when no drag is in progress.
    pub fn pointer_move(&mut self, x: f64) -> Option<PaneLayout> {
        if !self.state.dragging {
            return None;
        }

        let layout = compute_layout(
            x,
            self.surface.container_width(),
            self.surface.handle_width(),
            self.margin,
        );

        self.surface.set_handle_left(layout.handle_left);
        self.surface.set_editor_width(layout.editor_width);
        self.surface.clear_text_selection();

        self.state.last_x = Some(x);
        self.state.pane_width = Some(layout.editor_width);
        Some(layout)
    }

    /// Pointer released anywhere on the page. Returns true if a drag ended.
    pub fn release(&mut self) -> bool {
        if !self.state.dragging {
            return false;
        }
        self.state = ResizeState::default();
        self.surface.set_drag_markers(false);
        true
    }
}
