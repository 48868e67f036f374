use verde_shared::geo::OSM_TILES;
use verde_shared::routes::DISTRICT_PARAM;
use verde_shared::{Dataset, DashboardState, DetailView};
use web_sys::Document;

use crate::leaflet;
use crate::{STEP_STYLE, SUCCESS_STYLE, WARNING_STYLE, log_styled};

pub const MAP_ELEMENT_ID: &str = "district-map";

fn requested_district() -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    web_sys::UrlSearchParams::new_with_str(&search)
        .ok()?
        .get(DISTRICT_PARAM)
}

fn set_heading(document: &Document, selector: &str, text: &str) {
    if let Ok(Some(element)) = document.query_selector(selector) {
        element.set_text_content(Some(text));
    }
}

fn draw(view: &DetailView) -> Result<(), wasm_bindgen::JsValue> {
    let map = leaflet::create_map(MAP_ELEMENT_ID, view.view, &OSM_TILES, true)?;
    leaflet::add_overlays(&map, view.overlays())
}

/// Resolve the district from the query string and draw its detail map.
pub fn init(dataset: &Dataset, document: &Document) -> DashboardState {
    log_styled("🌳 Initializing neighborhood detail map...", STEP_STYLE);

    let requested = requested_district();
    let Some(state) = DashboardState::for_detail(dataset, requested.as_deref()) else {
        log_styled("⚠️ No districts available for the detail map.", WARNING_STYLE);
        return DashboardState::without_map();
    };
    let Some(view) = state.detail_view() else {
        return state;
    };
    if view.fallback {
        web_sys::console::warn_1(
            &format!(
                "District {:?} not found, showing {}",
                requested.unwrap_or_default(),
                view.district.name
            )
            .into(),
        );
    }

    if let Err(e) = draw(view) {
        web_sys::console::error_2(&"Failed to create detail map:".into(), &e);
    }
    set_heading(document, ".breadcrumb-current", &view.breadcrumb);
    set_heading(document, ".section-title", &view.section_title);

    log_styled("✅ Neighborhood detail map loaded!", SUCCESS_STYLE);
    state
}
