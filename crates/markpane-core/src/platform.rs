//! Platform abstraction traits for the editor surfaces.
//!
//! These traits are the seam between editor logic and whatever draws it.
//! The browser implementation in `markpane-browser` owns DOM element handles
//! looked up once at mount; tests use plain structs.

use smol_str::SmolStr;

use crate::mode::ViewMode;

/// Error type for platform operations.
#[derive(Debug, Clone)]
pub struct PlatformError(pub String);

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for PlatformError {}

impl From<&str> for PlatformError {
    fn from(s: &str) -> Self {
        PlatformError(s.to_string())
    }
}

impl From<String> for PlatformError {
    fn from(s: String) -> Self {
        PlatformError(s)
    }
}

/// Host platform identifier ("desktop", "mobile", ...).
///
/// Only used to pick a CSS class on the root element. Unknown values are kept
/// verbatim rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlatformTag(SmolStr);

impl PlatformTag {
    pub fn new(tag: &str) -> Self {
        Self(SmolStr::new(tag.trim()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Class list for the root element.
    pub fn root_class(&self) -> String {
        if self.0.is_empty() {
            "sn-component".to_string()
        } else {
            format!("sn-component {}", self.0)
        }
    }
}

impl From<&str> for PlatformTag {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Where rendered output and layout state go.
pub trait EditorView {
    /// Replace the preview's rendered content with trusted HTML.
    fn show_preview(&mut self, html: &str);

    /// Apply a view mode to the layout (classes on the panes, selected button).
    fn apply_mode(&mut self, mode: ViewMode);

    /// Apply the host platform to the root element.
    fn apply_platform(&mut self, _platform: &PlatformTag) {}
}

/// Layout handles the resizer drives.
///
/// Widths and offsets are CSS pixels.
pub trait ResizeSurface {
    /// Width of the element containing both panes.
    fn container_width(&self) -> f64;

    /// Width of the drag handle itself.
    fn handle_width(&self) -> f64;

    /// Position the drag handle's left edge.
    fn set_handle_left(&mut self, px: f64);

    /// Size the editor pane.
    fn set_editor_width(&mut self, px: f64);

    /// Toggle the "dragging" marker on the handle and "no-selection" on the editor.
    fn set_drag_markers(&mut self, active: bool);

    /// Drop any text selection the drag produced.
    fn clear_text_selection(&mut self);
}

/// The raw text input the user types into.
///
/// Offsets are UTF-16 code units, matching `selectionStart`/`selectionEnd`.
pub trait TextInput {
    /// Insert text at the caret through the platform's undo-aware path.
    ///
    /// Returns false if the platform cannot do this; the caller then splices
    /// manually. A successful insert is expected to fire the input's normal
    /// change notification.
    fn insert_native(&mut self, text: &str) -> bool;

    /// Current selection as `(start, end)`, or None if unknown.
    fn selection(&self) -> Option<(usize, usize)>;

    /// Overwrite the displayed value.
    fn set_value(&mut self, text: &str);

    /// Collapse the selection to a caret at `offset`.
    fn set_caret(&mut self, offset: usize);
}

impl<T: EditorView> EditorView for &mut T {
    fn show_preview(&mut self, html: &str) {
        (**self).show_preview(html)
    }

    fn apply_mode(&mut self, mode: ViewMode) {
        (**self).apply_mode(mode)
    }

    fn apply_platform(&mut self, platform: &PlatformTag) {
        (**self).apply_platform(platform)
    }
}
