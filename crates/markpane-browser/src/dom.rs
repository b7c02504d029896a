//! Element creation.
//!
//! The ids and class names match the stylesheet hosts already ship for this
//! editor, so they are fixed.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlTextAreaElement};

use markpane_core::{PlatformError, ViewMode};

pub const ROOT_ID: &str = "simple-markdown";
pub const HEADER_ID: &str = "header";
pub const CONTAINER_ID: &str = "editor-container";
pub const EDITOR_ID: &str = "editor";
pub const RESIZER_ID: &str = "column-resizer";
pub const PREVIEW_ID: &str = "preview";

/// Marker classes toggled while the handle is dragged.
pub const DRAGGING_CLASS: &str = "dragging";
pub const NO_SELECTION_CLASS: &str = "no-selection";

/// Convert a thrown JS value into a platform error.
pub(crate) fn js_error(context: &str, err: JsValue) -> PlatformError {
    let detail = err
        .as_string()
        .or_else(|| {
            err.dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{err:?}"));
    PlatformError(format!("{context}: {detail}"))
}

fn create<T: JsCast>(document: &Document, tag: &str) -> Result<T, PlatformError> {
    document
        .create_element(tag)
        .map_err(|e| js_error(&format!("create <{tag}>"), e))?
        .dyn_into::<T>()
        .map_err(|_| PlatformError(format!("<{tag}> has an unexpected element type")))
}

fn append(parent: &Element, child: &Element) -> Result<(), PlatformError> {
    parent
        .append_child(child)
        .map(|_| ())
        .map_err(|e| js_error("append child", e))
}

/// Every element the editor touches, looked up once at mount.
pub struct DomHandles {
    pub root: HtmlElement,
    pub header: HtmlElement,
    /// One button per mode, in `ViewMode::ALL` order.
    pub buttons: Vec<(ViewMode, HtmlElement)>,
    pub container: HtmlElement,
    pub editor: HtmlTextAreaElement,
    pub resizer: HtmlElement,
    pub preview: HtmlElement,
}

impl DomHandles {
    /// Build the editor markup and append it to `parent`.
    pub fn build(document: &Document, parent: &Element) -> Result<Self, PlatformError> {
        let root: HtmlElement = create(document, "div")?;
        root.set_id(ROOT_ID);
        root.set_class_name("sn-component");
        root.set_tab_index(0);

        let header: HtmlElement = create(document, "div")?;
        header.set_id(HEADER_ID);
        let group: HtmlElement = create(document, "div")?;
        group.set_class_name("segmented-buttons-container sk-segmented-buttons");
        let row: HtmlElement = create(document, "div")?;
        row.set_class_name("buttons");

        let mut buttons = Vec::with_capacity(ViewMode::ALL.len());
        for mode in ViewMode::ALL {
            let button: HtmlElement = create(document, "button")?;
            button
                .set_attribute("type", "button")
                .map_err(|e| js_error("button type", e))?;
            button
                .set_attribute("data-mode", &mode.value().to_string())
                .map_err(|e| js_error("button data-mode", e))?;
            let label: HtmlElement = create(document, "div")?;
            label.set_class_name("sk-label");
            label.set_text_content(Some(mode.label()));
            append(&button, &label)?;
            append(&row, &button)?;
            buttons.push((mode, button));
        }
        append(&group, &row)?;
        append(&header, &group)?;

        let container: HtmlElement = create(document, "main")?;
        container.set_id(CONTAINER_ID);

        let editor: HtmlTextAreaElement = create(document, "textarea")?;
        editor.set_id(EDITOR_ID);
        editor.set_spellcheck(true);
        editor
            .set_attribute("dir", "auto")
            .map_err(|e| js_error("editor dir", e))?;

        let resizer: HtmlElement = create(document, "div")?;
        resizer.set_id(RESIZER_ID);

        let preview: HtmlElement = create(document, "section")?;
        preview.set_id(PREVIEW_ID);

        append(&container, &editor)?;
        append(&container, &resizer)?;
        append(&container, &preview)?;
        append(&root, &header)?;
        append(&root, &container)?;
        append(parent, &root)?;

        tracing::debug!("editor markup built");
        Ok(Self {
            root,
            header,
            buttons,
            container,
            editor,
            resizer,
            preview,
        })
    }

    /// The elements that carry the active mode's class.
    pub fn mode_targets(&self) -> [&Element; 4] {
        [&self.container, &self.editor, &self.resizer, &self.preview]
    }

    /// Detach the editor markup from the page.
    pub fn remove(&self) {
        self.root.remove();
    }
}
