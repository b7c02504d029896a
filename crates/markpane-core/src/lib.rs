//! markpane-core: Pure Rust note editor logic without DOM dependencies.
//!
//! This crate provides:
//! - `DocumentBuffer` - ropey-backed note text with UTF-16 caret conversion
//! - `MarkdownRenderer` - markdown to HTML with autolinks, footnotes, task lists,
//!   highlighted code and post-processing hooks
//! - `ModeState` - Edit / Split / Preview selection persisted through the host
//! - `Resizer` - drag handle state machine for the split layout
//! - `EditorSurface` - the controller tying buffer, renderer, modes and host together
//! - `HostBridge` + `HostSession` - the host contract and its postMessage protocol

pub mod config;
pub mod editor;
pub mod error;
pub mod host;
pub mod keys;
pub mod mode;
pub mod platform;
pub mod render;
pub mod resize;
pub mod text;

pub use config::EditorConfig;
pub use editor::EditorSurface;
pub use error::EditorError;
pub use host::protocol::{Envelope, HostMessage, NoteContent, NoteItem, Registration};
pub use host::session::{HostEvent, HostSession};
pub use host::HostBridge;
pub use keys::PressedKeys;
pub use mode::{ModeState, ViewMode};
pub use platform::{EditorView, PlatformError, PlatformTag, ResizeSurface, TextInput};
pub use render::{HtmlPostProcessor, LinkTarget, MarkdownRenderer, RenderConfig};
pub use resize::{PaneLayout, ResizeState, Resizer};
pub use smol_str::SmolStr;
pub use text::DocumentBuffer;
