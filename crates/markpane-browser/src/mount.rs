//! Event wiring for a mounted editor.
//!
//! Every listener holds an `Rc` to the shared state and is dropped (and so
//! detached) with the `MountedEditor`. An `input` event dispatched while the
//! editor is borrowed (`insertText` fires it synchronously from inside the
//! keydown handler) is deferred and replayed once the borrow ends.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use serde_json::Value;
use wasm_bindgen::JsCast;
use web_sys::{Element, KeyboardEvent, MessageEvent, MouseEvent};

use markpane_core::{
    EditorConfig, EditorSurface, HostBridge, HostEvent, HostSession, PlatformError, Resizer,
    ViewMode,
};

use crate::bridge::PostMessageTransport;
use crate::dom::DomHandles;
use crate::input::TextAreaInput;
use crate::resize::BrowserResizeSurface;
use crate::view::BrowserView;

type BrowserEditor = EditorSurface<HostSession, BrowserView>;

struct Shared {
    editor: RefCell<BrowserEditor>,
    resizer: RefCell<Resizer<BrowserResizeSurface>>,
    transport: RefCell<PostMessageTransport>,
    handles: Rc<DomHandles>,
    deferred_input: Cell<bool>,
}

impl Shared {
    fn flush(&self) {
        let mut editor = self.editor.borrow_mut();
        self.transport.borrow().flush(editor.host_mut());
    }

    fn input(&self) -> TextAreaInput {
        TextAreaInput::new(self.handles.editor.clone())
    }

    fn on_input(&self) {
        let Ok(mut editor) = self.editor.try_borrow_mut() else {
            self.deferred_input.set(true);
            return;
        };
        editor.handle_user_edit(&self.handles.editor.value());
        drop(editor);
        self.flush();
    }

    fn on_key_down(&self, event: &KeyboardEvent) {
        let handled = {
            let mut editor = self.editor.borrow_mut();
            let plain_tab = editor.key_down(&event.key());
            plain_tab && editor.handle_tab_key(event.shift_key(), &mut self.input())
        };
        if !handled {
            return;
        }
        event.prevent_default();

        if self.deferred_input.take() {
            self.on_input();
        } else {
            self.flush();
        }
    }

    fn on_host_message(&self, raw: &Value, origin: Option<&str>) {
        let result = self.editor.borrow_mut().host_mut().handle_message(raw);
        match result {
            Ok(Some(HostEvent::Registered { platform })) => {
                if let Some(origin) = origin {
                    self.transport.borrow_mut().pin_origin(origin);
                }
                if let Some(platform) = platform {
                    self.editor.borrow_mut().receive_platform(platform);
                }
            }
            Ok(Some(HostEvent::Note(note))) => {
                if !note.is_metadata_update {
                    self.handles.editor.set_value(&note.content.text);
                }
                self.editor.borrow_mut().receive_note(&note);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "bad host message"),
        }
        self.flush();
    }
}

/// An editor attached to the page. Dropping it detaches every listener;
/// `unmount` also removes the markup.
pub struct MountedEditor {
    shared: Rc<Shared>,
    _listeners: Vec<EventListener>,
}

impl MountedEditor {
    /// Build the editor inside `parent` and start listening to the page and
    /// the host.
    pub fn mount(parent: &Element, config: &EditorConfig) -> Result<Self, PlatformError> {
        let window = web_sys::window().ok_or_else(|| PlatformError::from("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| PlatformError::from("no document"))?;

        let handles = Rc::new(DomHandles::build(&document, parent)?);
        let mut editor = EditorSurface::new(
            config,
            HostSession::new(),
            BrowserView::new(handles.clone()),
        );
        editor.restore_mode();

        let shared = Rc::new(Shared {
            editor: RefCell::new(editor),
            resizer: RefCell::new(Resizer::with_margin(
                BrowserResizeSurface::new(handles.clone()),
                config.margin,
            )),
            transport: RefCell::new(PostMessageTransport::new(window.clone())),
            handles: handles.clone(),
            deferred_input: Cell::new(false),
        });

        let mut listeners = Vec::new();

        let s = shared.clone();
        listeners.push(EventListener::new(&handles.editor, "input", move |_| {
            s.on_input();
        }));

        let s = shared.clone();
        listeners.push(EventListener::new_with_options(
            &handles.editor,
            "keydown",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                    s.on_key_down(event);
                }
            },
        ));

        let s = shared.clone();
        listeners.push(EventListener::new(&handles.editor, "keyup", move |event| {
            if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                s.editor.borrow_mut().key_up(&event.key());
            }
        }));

        let s = shared.clone();
        listeners.push(EventListener::new(&handles.editor, "blur", move |_| {
            s.editor.borrow_mut().blur();
        }));

        for (mode, button) in &handles.buttons {
            let s = shared.clone();
            let mode = *mode;
            listeners.push(EventListener::new(button, "click", move |_| {
                s.editor.borrow_mut().select_mode(mode);
                s.flush();
            }));
        }

        let s = shared.clone();
        listeners.push(EventListener::new(&handles.resizer, "mousedown", move |event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                s.resizer.borrow_mut().press(event.client_x() as f64);
            }
        }));

        let s = shared.clone();
        listeners.push(EventListener::new(&document, "mousemove", move |event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                s.resizer.borrow_mut().pointer_move(event.client_x() as f64);
            }
        }));

        let s = shared.clone();
        listeners.push(EventListener::new(&document, "mouseup", move |_| {
            s.resizer.borrow_mut().release();
        }));

        let s = shared.clone();
        listeners.push(EventListener::new(&window, "message", move |event| {
            let Some(event) = event.dyn_ref::<MessageEvent>() else {
                return;
            };
            if !s.transport.borrow().accepts(event) {
                tracing::debug!(origin = %event.origin(), "message from foreign origin dropped");
                return;
            }
            if let Some(raw) = PostMessageTransport::decode(event) {
                s.on_host_message(&raw, Some(&event.origin()));
            }
        }));

        tracing::info!("markpane editor mounted");
        Ok(Self {
            shared,
            _listeners: listeners,
        })
    }

    /// Feed a host message directly, bypassing `window.onmessage`.
    pub fn receive_host_message(&self, raw: &Value) {
        self.shared.on_host_message(raw, None);
    }

    pub fn text(&self) -> String {
        self.shared.editor.borrow().text()
    }

    pub fn mode(&self) -> ViewMode {
        self.shared.editor.borrow().mode()
    }

    pub fn select_mode(&self, mode: ViewMode) {
        self.shared.editor.borrow_mut().select_mode(mode);
        self.shared.flush();
    }

    /// Load text as if the host had pushed it.
    pub fn set_document(&self, text: &str) {
        self.shared.handles.editor.set_value(text);
        self.shared.editor.borrow_mut().set_document(text);
    }

    pub fn is_host_ready(&self) -> bool {
        self.shared.editor.borrow().host().is_ready()
    }

    /// Envelopes sent to the host since mount.
    pub fn host_messages_sent(&self) -> u64 {
        self.shared.editor.borrow().host().messages_sent()
    }

    pub fn handles(&self) -> &DomHandles {
        &self.shared.handles
    }

    /// Detach listeners and remove the editor markup.
    pub fn unmount(self) {
        self.shared.handles.remove();
        tracing::info!("markpane editor unmounted");
    }
}
