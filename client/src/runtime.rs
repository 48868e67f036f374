use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use verde_shared::intent::{ButtonId, Intent, UiAction};
use verde_shared::ui::timer_millis;
use verde_shared::DashboardState;
use wasm_bindgen::JsCast;

use crate::controls;
use crate::leaflet::LeafletSurface;
use crate::notify::Notifier;

/// Owns the page state and executes the intents it produces.
pub struct Runtime {
    state: RefCell<DashboardState>,
    surface: RefCell<Option<LeafletSurface>>,
    buttons: RefCell<Vec<web_sys::Element>>,
    notifier: Option<Notifier>,
}

impl Runtime {
    pub fn new(
        state: DashboardState,
        surface: Option<LeafletSurface>,
        notifier: Option<Notifier>,
    ) -> Rc<Self> {
        Rc::new(Self {
            state: RefCell::new(state),
            surface: RefCell::new(surface),
            buttons: RefCell::new(Vec::new()),
            notifier,
        })
    }

    pub fn has_overview_map(&self) -> bool {
        self.state.borrow().registry().is_some()
    }

    pub fn register_button(&self, element: web_sys::Element) -> ButtonId {
        let mut buttons = self.buttons.borrow_mut();
        let id = ButtonId(u32::try_from(buttons.len()).unwrap_or(u32::MAX));
        buttons.push(element);
        id
    }

    pub fn dispatch(self: &Rc<Self>, action: UiAction) {
        let intents = self.state.borrow_mut().dispatch(action);
        for intent in intents {
            self.execute(intent);
        }
    }

    fn execute(self: &Rc<Self>, intent: Intent) {
        if let Some(surface) = self.surface.borrow_mut().as_mut()
            && intent.apply_to_map(surface)
        {
            return;
        }

        match intent {
            Intent::ToggleFullscreen => controls::toggle_fullscreen(),
            Intent::Notify(message) => {
                if let Some(notifier) = &self.notifier {
                    notifier.show(&message);
                }
            }
            Intent::SetButton {
                button,
                label,
                disabled,
            } => self.set_button(button, &label, disabled),
            Intent::Schedule(task) => {
                let runtime = Rc::clone(self);
                let id = task.id;
                Timeout::new(timer_millis(task.delay), move || {
                    runtime.dispatch(UiAction::TaskElapsed(id));
                })
                .forget();
            }
            Intent::Navigate(route) => {
                let Some(window) = web_sys::window() else {
                    return;
                };
                if let Err(e) = window.location().set_href(&route.href()) {
                    web_sys::console::warn_2(&"Navigation failed:".into(), &e);
                }
            }
            Intent::SetText { element_id, text } => {
                if let Some(element) = web_sys::window()
                    .and_then(|window| window.document())
                    .and_then(|document| document.get_element_by_id(element_id))
                {
                    element.set_text_content(Some(&text));
                }
            }
            Intent::ActivateNavItem(index) => controls::activate_nav_item(index),
            // Map intents without a live map.
            Intent::AttachLayer(_)
            | Intent::DetachLayer(_)
            | Intent::ZoomIn
            | Intent::ZoomOut
            | Intent::SetView(_) => {}
        }
    }

    fn set_button(&self, button: ButtonId, label: &str, disabled: bool) {
        let buttons = self.buttons.borrow();
        let Some(element) = usize::try_from(button.0)
            .ok()
            .and_then(|index| buttons.get(index))
        else {
            return;
        };
        element.set_text_content(Some(label));
        if let Some(button) = element.dyn_ref::<web_sys::HtmlButtonElement>() {
            button.set_disabled(disabled);
        } else if disabled {
            let _ = element.set_attribute("disabled", "");
        } else {
            let _ = element.remove_attribute("disabled");
        }
    }
}
