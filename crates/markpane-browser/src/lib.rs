//! Browser DOM layer for the markpane note editor.
//!
//! This crate builds the editor's DOM, implements the `markpane-core`
//! platform traits on top of it, and wires browser events into an
//! `EditorSurface`. It assumes a `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `dom`: element creation and the handle set every other module shares
//! - `view`: `EditorView` over the preview, pane classes and mode buttons
//! - `resize`: `ResizeSurface` over the drag handle and editor pane
//! - `input`: `TextInput` over the `<textarea>`
//! - `bridge`: postMessage transport to the embedding host
//! - `mount`: event listeners and the mounted editor's lifetime
//!
//! # Re-exports
//!
//! This crate re-exports `markpane-core` for convenience, so consumers
//! only need to depend on `markpane-browser`.

// Re-export core crate
pub use markpane_core;
pub use markpane_core::*;

pub mod bridge;
pub mod dom;
pub mod input;
pub mod mount;
pub mod resize;
pub mod view;

pub use bridge::PostMessageTransport;
pub use dom::DomHandles;
pub use input::TextAreaInput;
pub use mount::MountedEditor;
pub use resize::BrowserResizeSurface;
pub use view::BrowserView;
