//! DOM bindings for the map controls and the ancillary widgets.
//!
//! Every anchor is optional: a selector that matches nothing binds nothing.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use verde_shared::intent::UiAction;
use verde_shared::ui::{
    SLIDERS, chart_bar_delay, chart_bars_start, metric_card_delay, timer_millis,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

use crate::runtime::Runtime;

thread_local! {
    static LISTENERS: RefCell<Vec<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(Vec::new()) };
}

fn document() -> Option<Document> {
    web_sys::window()?.document()
}

fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Attach `handler` for the lifetime of the page.
fn listen(target: &Element, event: &str, handler: impl FnMut(web_sys::Event) + 'static) {
    let callback = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
    if target
        .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        .is_ok()
    {
        LISTENERS.with(|slot| slot.borrow_mut().push(callback));
    }
}

fn on_click(runtime: &Rc<Runtime>, target: &Element, action: impl Fn() -> UiAction + 'static) {
    let runtime = Rc::clone(runtime);
    listen(target, "click", move |_| runtime.dispatch(action()));
}

pub fn bind_all(runtime: &Rc<Runtime>, document: &Document) {
    if runtime.has_overview_map() {
        bind_layer_toggles(runtime, document);
        bind_map_buttons(runtime, document);
    }
    bind_action_buttons(runtime, document);
    bind_secondary_buttons(runtime, document);
    bind_sliders(runtime, document);
    bind_config_nav(runtime, document);
    animate_metric_cards(document);
    animate_chart_bars(document);
}

fn bind_layer_toggles(runtime: &Rc<Runtime>, document: &Document) {
    for checkbox in query_all(document, ".toggle-checkbox") {
        let runtime = Rc::clone(runtime);
        listen(&checkbox, "change", move |event| {
            let Some(input) = event
                .target()
                .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            let control_id = input.id();
            let checked = input.checked();
            let verb = if checked { "activated" } else { "deactivated" };
            web_sys::console::log_1(&format!("Layer {control_id} {verb}").into());
            runtime.dispatch(UiAction::LayerControl {
                control_id,
                checked,
            });
        });
    }
}

fn bind_map_buttons(runtime: &Rc<Runtime>, document: &Document) {
    let buttons: [(&str, fn() -> UiAction); 4] = [
        ("zoom-in", || UiAction::ZoomIn),
        ("zoom-out", || UiAction::ZoomOut),
        ("locate", || UiAction::Locate),
        ("fullscreen", || UiAction::Fullscreen),
    ];
    for (id, action) in buttons {
        if let Some(button) = document.get_element_by_id(id) {
            on_click(runtime, &button, action);
        }
    }
}

fn bind_action_buttons(runtime: &Rc<Runtime>, document: &Document) {
    for element in query_all(document, ".action-button") {
        let button = runtime.register_button(element.clone());
        on_click(runtime, &element, move || UiAction::GenerateReport { button });
    }
}

fn bind_secondary_buttons(runtime: &Rc<Runtime>, document: &Document) {
    for element in query_all(document, ".secondary-btn") {
        let button = runtime.register_button(element.clone());
        let label_source = element.clone();
        on_click(runtime, &element, move || UiAction::SecondaryButton {
            button,
            label: label_source.text_content().unwrap_or_default(),
        });
    }
}

fn bind_sliders(runtime: &Rc<Runtime>, document: &Document) {
    for spec in &SLIDERS {
        let (Some(slider), Some(_)) = (
            document.get_element_by_id(spec.slider_id),
            document.get_element_by_id(spec.value_id),
        ) else {
            continue;
        };
        let runtime = Rc::clone(runtime);
        let slider_id = spec.slider_id;
        listen(&slider, "input", move |event| {
            let Some(input) = event
                .target()
                .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            runtime.dispatch(UiAction::Slider {
                slider_id: slider_id.to_owned(),
                value: input.value(),
            });
        });
    }
}

fn bind_config_nav(runtime: &Rc<Runtime>, document: &Document) {
    for (index, item) in query_all(document, ".config-nav-item").into_iter().enumerate() {
        on_click(runtime, &item, move || UiAction::ConfigNav { index });
    }
}

/// Make the `index`-th config navigation item the only active one.
pub fn activate_nav_item(index: usize) {
    let Some(document) = document() else {
        return;
    };
    for (position, item) in query_all(&document, ".config-nav-item").into_iter().enumerate() {
        let _ = item.class_list().toggle_with_force("active", position == index);
    }
}

/// Enter fullscreen on the map container, or leave it if already active.
pub fn toggle_fullscreen() {
    let Some(document) = document() else {
        return;
    };
    let Ok(Some(container)) = document.query_selector(".map-container") else {
        return;
    };
    if document.fullscreen_element().is_none() {
        if let Err(e) = container.request_fullscreen() {
            web_sys::console::error_2(&"Error entering fullscreen:".into(), &e);
        }
    } else {
        document.exit_fullscreen();
    }
}

fn html_elements(document: &Document, selector: &str) -> Vec<HtmlElement> {
    query_all(document, selector)
        .into_iter()
        .filter_map(|element| element.dyn_into::<HtmlElement>().ok())
        .collect()
}

fn set_styles(element: &HtmlElement, properties: &[(&str, &str)]) {
    let style = element.style();
    for (name, value) in properties {
        let _ = style.set_property(name, value);
    }
}

fn animate_metric_cards(document: &Document) {
    for (index, card) in html_elements(document, ".metric-card").into_iter().enumerate() {
        set_styles(&card, &[("opacity", "0"), ("transform", "translateY(20px)")]);
        Timeout::new(timer_millis(metric_card_delay(index)), move || {
            set_styles(
                &card,
                &[
                    ("transition", "all 0.5s ease"),
                    ("opacity", "1"),
                    ("transform", "translateY(0)"),
                ],
            );
        })
        .forget();
    }
}

fn animate_chart_bars(document: &Document) {
    let bars = html_elements(document, ".bar");
    if bars.is_empty() {
        return;
    }
    Timeout::new(timer_millis(chart_bars_start()), move || {
        for (index, bar) in bars.into_iter().enumerate() {
            let target_width = bar.style().get_property_value("width").unwrap_or_default();
            set_styles(&bar, &[("width", "0%")]);
            Timeout::new(timer_millis(chart_bar_delay(index)), move || {
                set_styles(&bar, &[("width", target_width.as_str())]);
            })
            .forget();
        }
    })
    .forget();
}
