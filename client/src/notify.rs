use std::any::Any;
use std::cell::{Cell, RefCell};

use gloo_timers::callback::Timeout;
use leptos::mount::mount_to;
use leptos::prelude::*;
use verde_shared::ui::{NOTIFICATION_EXIT, NOTIFICATION_VISIBLE, timer_millis};

const TOAST_KEYFRAMES: &str = "\
@keyframes slideIn { from { transform: translateX(100%); opacity: 0; } to { transform: translateX(0); opacity: 1; } }
@keyframes slideOut { from { transform: translateX(0); opacity: 1; } to { transform: translateX(100%); opacity: 0; } }";

const TOAST_BASE_STYLE: &str = "position: fixed; top: 100px; right: 20px; \
background: linear-gradient(135deg, #4CAF50 0%, #45a049 100%); color: white; \
padding: 1rem 1.5rem; border-radius: 10px; box-shadow: 0 4px 12px rgba(0, 0, 0, 0.2); \
z-index: 10000; font-weight: 600;";

thread_local! {
    static TOAST_MOUNT_HANDLE: RefCell<Option<Box<dyn Any>>> = RefCell::new(None);
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Toast {
    id: u64,
    message: String,
    leaving: bool,
}

fn toast_style(leaving: bool) -> String {
    let animation = if leaving {
        "slideOut 0.3s ease forwards"
    } else {
        "slideIn 0.3s ease"
    };
    format!("{TOAST_BASE_STYLE} animation: {animation};")
}

/// Transient top-right messages. Each one slides in, stays for
/// [`NOTIFICATION_VISIBLE`], then slides out over [`NOTIFICATION_EXIT`].
pub struct Notifier {
    toasts: RwSignal<Vec<Toast>>,
    next_id: Cell<u64>,
}

impl Notifier {
    /// Inject the keyframes and mount the toast host at the end of `<body>`.
    pub fn mount() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let body = document.body()?;

        if let (Some(head), Ok(style)) = (document.head(), document.create_element("style")) {
            style.set_text_content(Some(TOAST_KEYFRAMES));
            let _ = head.append_child(&style);
        }

        let toasts = RwSignal::new(Vec::<Toast>::new());
        TOAST_MOUNT_HANDLE.with(move |slot| {
            let _old = slot.borrow_mut().take();
            let handle = mount_to(body, move || view! { <ToastHost toasts=toasts /> });
            *slot.borrow_mut() = Some(Box::new(handle));
        });

        Some(Self {
            toasts,
            next_id: Cell::new(0),
        })
    }

    pub fn show(&self, message: &str) {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.toasts.update(|toasts| {
            toasts.push(Toast {
                id,
                message: message.to_owned(),
                leaving: false,
            });
        });

        let toasts = self.toasts;
        Timeout::new(timer_millis(NOTIFICATION_VISIBLE), move || {
            toasts.update(|toasts| {
                if let Some(toast) = toasts.iter_mut().find(|toast| toast.id == id) {
                    toast.leaving = true;
                }
            });
            Timeout::new(timer_millis(NOTIFICATION_EXIT), move || {
                toasts.update(|toasts| toasts.retain(|toast| toast.id != id));
            })
            .forget();
        })
        .forget();
    }
}

#[component]
fn ToastHost(toasts: RwSignal<Vec<Toast>>) -> impl IntoView {
    view! {
        <For
            each=move || toasts.get()
            key=|toast| (toast.id, toast.leaving)
            children=move |toast: Toast| {
                view! {
                    <div class="notification" style=toast_style(toast.leaving)>
                        {toast.message}
                    </div>
                }
            }
        />
    }
}

#[cfg(test)]
mod tests {
    use super::toast_style;

    #[test]
    fn toast_style_switches_animation_on_exit() {
        assert!(toast_style(false).ends_with("animation: slideIn 0.3s ease;"));
        assert!(toast_style(true).ends_with("animation: slideOut 0.3s ease forwards;"));
        assert!(toast_style(false).contains("top: 100px; right: 20px;"));
    }
}
