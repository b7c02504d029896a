//! The editor surface controller.
//!
//! `EditorSurface` owns the note buffer, the renderer, the view mode and the
//! held-key set, and drives an injected host bridge and view. It never touches
//! a DOM; `markpane-browser` forwards events into it.
//!
//! Two pipelines run through here:
//!
//! - host push: buffer <- host text, render, restore mode. Never saves.
//! - user edit: buffer <- input text, save, render.

use smol_str::SmolStr;

use crate::config::EditorConfig;
use crate::host::HostBridge;
use crate::host::protocol::NoteItem;
use crate::keys::PressedKeys;
use crate::mode::{ModeState, ViewMode};
use crate::platform::{EditorView, PlatformTag, TextInput};
use crate::render::MarkdownRenderer;
use crate::text::DocumentBuffer;

pub struct EditorSurface<H, V> {
    buffer: DocumentBuffer,
    renderer: MarkdownRenderer,
    mode: ModeState,
    keys: PressedKeys,
    platform: Option<PlatformTag>,
    tab_text: SmolStr,
    host: H,
    view: V,
}

impl<H: HostBridge, V: EditorView> EditorSurface<H, V> {
    pub fn new(config: &EditorConfig, host: H, view: V) -> Self {
        Self {
            buffer: DocumentBuffer::new(),
            renderer: MarkdownRenderer::new(config.render.clone()),
            mode: ModeState::new(&config.mode_key),
            keys: PressedKeys::new(),
            platform: None,
            tab_text: config.tab_text.clone(),
            host,
            view,
        }
    }

    /// Swap in a renderer with extra post-processing hooks.
    pub fn with_renderer(mut self, renderer: MarkdownRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Host pushed new content.
    pub fn set_document(&mut self, text: &str) {
        self.buffer.set_text(text);
        self.render();
        let mode = self.mode.restore(&self.host);
        self.view.apply_mode(mode);
    }

    /// The user changed the input. `text` is the input's full value.
    pub fn handle_user_edit(&mut self, text: &str) {
        self.buffer.set_text(text);
        self.save();
        self.render();
    }

    /// A context-item push from the host.
    pub fn receive_note(&mut self, note: &NoteItem) {
        if note.is_metadata_update {
            tracing::trace!(uuid = %note.uuid, "metadata-only update, buffer untouched");
            return;
        }
        self.set_document(&note.content.text);
    }

    pub fn receive_platform(&mut self, platform: PlatformTag) {
        self.view.apply_platform(&platform);
        self.platform = Some(platform);
    }

    /// The user picked a mode.
    pub fn select_mode(&mut self, mode: ViewMode) {
        let mode = self.mode.activate(mode, &mut self.host);
        self.view.apply_mode(mode);
    }

    /// Reapply the current mode without touching storage.
    pub fn restore_mode(&mut self) -> ViewMode {
        let mode = self.mode.restore(&self.host);
        self.view.apply_mode(mode);
        mode
    }

    /// Record a keydown. Returns true when Tab without Shift is held, i.e.
    /// the caller must suppress focus navigation and insert a tab.
    pub fn key_down(&mut self, key: &str) -> bool {
        self.keys.press(key);
        self.keys.is_plain_tab()
    }

    pub fn key_up(&mut self, key: &str) {
        self.keys.release(key);
    }

    /// Focus left the input; nothing is held any more.
    pub fn blur(&mut self) {
        self.keys.clear();
    }

    /// Insert a tab at the caret. Returns whether default handling must be
    /// prevented.
    ///
    /// The native insert fires the input's own change notification, which
    /// comes back through `handle_user_edit`; only the fallback runs the
    /// edit pipeline here. A browser fires that notification while this call
    /// is still on the stack, so the caller has to replay it afterwards.
    pub fn handle_tab_key(&mut self, shift_held: bool, input: &mut impl TextInput) -> bool {
        if shift_held {
            return false;
        }
        if !input.insert_native(&self.tab_text) {
            self.insert_tab_fallback(input);
        }
        true
    }

    /// Splice the tab text over the input's selection by hand.
    fn insert_tab_fallback(&mut self, input: &mut impl TextInput) {
        let (start, end) = input.selection().unwrap_or_else(|| {
            let len = self.buffer.len_utf16();
            (len, len)
        });
        let (start, end) = (start.min(end), start.max(end));
        let char_start = self.buffer.utf16_to_char(start);
        let char_end = self.buffer.utf16_to_char(end);

        self.buffer.replace(char_start..char_end, &self.tab_text);
        let text = self.buffer.to_string();
        input.set_value(&text);

        let caret = self.buffer.char_to_utf16(char_start) + self.tab_text.encode_utf16().count();
        input.set_caret(caret);

        self.save();
        self.render();
    }

    fn save(&mut self) {
        if !self.host.is_ready() {
            tracing::trace!("host not ready, save skipped");
            return;
        }
        self.host.save_document(&self.buffer.to_string());
    }

    fn render(&mut self) {
        let html = self.renderer.render(&self.buffer.to_string());
        self.view.show_preview(&html);
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn buffer(&self) -> &DocumentBuffer {
        &self.buffer
    }

    pub fn mode(&self) -> ViewMode {
        self.mode.current()
    }

    pub fn keys(&self) -> &PressedKeys {
        &self.keys
    }

    pub fn platform(&self) -> Option<&PlatformTag> {
        self.platform.as_ref()
    }

    pub fn renderer(&self) -> &MarkdownRenderer {
        &self.renderer
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }
}
