//! WASM bindings for the markpane note editor.
//!
//! Provides the embeddable editor component for a host page: build it with
//! an optional config object, mount it into an element, and it talks to the
//! parent window over postMessage on its own.

mod editor;
mod logging;

pub use editor::*;

use wasm_bindgen::prelude::*;

/// Initialize panic hook and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logging::init();
}
