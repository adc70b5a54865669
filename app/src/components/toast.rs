//! Toast notifications for transient messages.
//!
//! Export outcomes are reported here rather than in the inline error banner,
//! which belongs to the search flow.

use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;

/// At most this many toasts are on screen; the oldest goes first.
const MAX_TOASTS: usize = 4;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// Completed action - 3 second duration
    Info,
    /// Failed action - 6 second duration
    Error,
}

impl ToastKind {
    fn duration_ms(self) -> u32 {
        match self {
            ToastKind::Info => 3000,
            ToastKind::Error => 6000,
        }
    }

    fn class(self) -> &'static str {
        match self {
            ToastKind::Info => "toast toast-info",
            ToastKind::Error => "toast toast-error",
        }
    }
}

#[derive(Clone)]
pub struct Toast {
    pub id: u32,
    pub message: String,
    pub kind: ToastKind,
}

/// Toast queue shared through context. Access via `use_toast()`.
#[derive(Clone, Copy)]
pub struct ToastManager {
    toasts: Signal<Vec<Toast>>,
    next_id: Signal<u32>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self {
            toasts: Signal::new(vec![]),
            next_id: Signal::new(0),
        }
    }

    /// Queue a toast; it dismisses itself after its kind's duration.
    pub fn show(&mut self, message: impl Into<String>, kind: ToastKind) {
        let id = *self.next_id.peek();
        *self.next_id.write() += 1;

        {
            let mut toasts = self.toasts.write();
            if toasts.len() >= MAX_TOASTS {
                toasts.remove(0);
            }
            toasts.push(Toast {
                id,
                message: message.into(),
                kind,
            });
        }

        let mut toasts_signal = self.toasts;
        spawn(async move {
            TimeoutFuture::new(kind.duration_ms()).await;
            toasts_signal.write().retain(|t| t.id != id);
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.show(message, ToastKind::Info);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.show(message, ToastKind::Error);
    }

    pub fn dismiss(&mut self, id: u32) {
        self.toasts.write().retain(|t| t.id != id);
    }
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Install the toast manager; call once in the root component.
pub fn use_toast_provider() -> ToastManager {
    use_context_provider(ToastManager::new)
}

pub fn use_toast() -> ToastManager {
    use_context::<ToastManager>()
}

/// Renders all active toasts. Place once at the end of the main layout.
#[component]
pub fn ToastFrame() -> Element {
    let mut manager = use_toast();
    let toasts = manager.toasts.read();

    rsx! {
        div { class: "toast-container",
            for toast in toasts.iter() {
                div {
                    key: "{toast.id}",
                    class: toast.kind.class(),
                    role: "status",
                    span { class: "toast-message", "{toast.message}" }
                    button {
                        class: "toast-close",
                        onclick: {
                            let id = toast.id;
                            move |_| manager.dismiss(id)
                        },
                        "×"
                    }
                }
            }
        }
    }
}
