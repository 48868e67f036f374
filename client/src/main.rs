mod controls;
mod detail;
mod leaflet;
mod notify;
mod overview;
mod runtime;

use verde_shared::{Dataset, DashboardState, PageKind};

use crate::notify::Notifier;
use crate::runtime::Runtime;

pub(crate) const TITLE_STYLE: &str = "color: #4CAF50; font-size: 18px; font-weight: bold;";
pub(crate) const SUBTITLE_STYLE: &str = "color: #2196F3; font-size: 12px;";
pub(crate) const STEP_STYLE: &str = "color: #4CAF50; font-size: 14px; font-weight: bold;";
pub(crate) const SUCCESS_STYLE: &str = "color: #4CAF50; font-size: 12px;";
pub(crate) const WARNING_STYLE: &str = "color: #FF9800; font-size: 12px;";

pub(crate) fn log_styled(message: &str, style: &str) {
    web_sys::console::log_2(&format!("%c{message}").into(), &style.into());
}

fn main() {
    console_error_panic_hook::set_once();
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    log_styled(
        "🌳 Rio Preto Verde - Geospatial Environmental Management System",
        TITLE_STYLE,
    );
    log_styled(
        "Prototype with Leaflet.js - Developed for São José do Rio Preto City Hall",
        SUBTITLE_STYLE,
    );

    let dataset = Dataset::sample();
    let page = PageKind::detect(
        document.get_element_by_id(overview::MAP_ELEMENT_ID).is_some(),
        document.get_element_by_id(detail::MAP_ELEMENT_ID).is_some(),
    );
    if page.is_some() && !leaflet::is_available() {
        log_styled(
            "⚠️ Leaflet.js is not loaded. Skipping map initialization.",
            WARNING_STYLE,
        );
    }

    let (state, surface) = match page {
        Some(_) if !leaflet::is_available() => (DashboardState::without_map(), None),
        Some(PageKind::Overview) => {
            let state = DashboardState::for_overview(dataset);
            let surface = overview::init(&state);
            (state, surface)
        }
        Some(PageKind::Detail) => (detail::init(dataset, &document), None),
        None => {
            log_styled(
                "⚠️ Map element not found. Skipping map initialization.",
                WARNING_STYLE,
            );
            (DashboardState::without_map(), None)
        }
    };

    let runtime = Runtime::new(state, surface, Notifier::mount());
    controls::bind_all(&runtime, &document);
}
