use verde_shared::DashboardState;
use verde_shared::geo::OSM_TILES;

use crate::leaflet::{self, LeafletSurface};
use crate::{STEP_STYLE, SUCCESS_STYLE, log_styled};

pub const MAP_ELEMENT_ID: &str = "map";

/// Build the overview map and its five layer groups from `state`.
pub fn init(state: &DashboardState) -> Option<LeafletSurface> {
    log_styled("🌳 Initializing Leaflet.js...", STEP_STYLE);

    let (registry, view) = (state.registry()?, state.view()?);
    let map = match leaflet::create_map(MAP_ELEMENT_ID, view, &OSM_TILES, false) {
        Ok(map) => map,
        Err(e) => {
            web_sys::console::error_2(&"Failed to create overview map:".into(), &e);
            return None;
        }
    };

    let mut surface = LeafletSurface::new(map);
    for group in registry.groups() {
        if let Err(e) = surface.add_group(group.id, &group.overlays, registry.is_visible(group.id)) {
            web_sys::console::warn_2(&format!("Skipping layer {}:", group.id).into(), &e);
        }
    }

    log_styled("✅ Leaflet.js loaded successfully!", SUCCESS_STYLE);
    Some(surface)
}
