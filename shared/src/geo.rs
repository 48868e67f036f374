use serde::{Deserialize, Serialize};

/// Map center for São José do Rio Preto.
pub const CITY_CENTER: LatLng = LatLng::new(-20.8197, -49.3789);

pub const OVERVIEW_ZOOM: u8 = 12;
pub const DETAIL_ZOOM: u8 = 14;
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 19;

pub const OSM_TILES: TileSource = TileSource {
    url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
    attribution: "© OpenStreetMap contributors",
    max_zoom: MAX_ZOOM,
};

/// WGS84 coordinate pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn offset(self, d_lat: f64, d_lng: f64) -> Self {
        Self::new(self.lat + d_lat, self.lng + d_lng)
    }

    /// `[lat, lng]`, the tuple form the mapping library accepts.
    pub const fn to_array(self) -> [f64; 2] {
        [self.lat, self.lng]
    }
}

/// Center and zoom of a map viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
}

impl MapView {
    pub const fn new(center: LatLng, zoom: u8) -> Self {
        Self { center, zoom }
    }

    pub const fn overview() -> Self {
        Self::new(CITY_CENTER, OVERVIEW_ZOOM)
    }

    pub fn zoomed_in(self) -> Self {
        Self {
            zoom: self.zoom.saturating_add(1).min(MAX_ZOOM),
            ..self
        }
    }

    pub fn zoomed_out(self) -> Self {
        Self {
            zoom: self.zoom.saturating_sub(1).max(MIN_ZOOM),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSource {
    pub url_template: &'static str,
    pub attribution: &'static str,
    pub max_zoom: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_is_clamped_to_tile_range() {
        let top = MapView::new(CITY_CENTER, MAX_ZOOM);
        assert_eq!(top.zoomed_in().zoom, MAX_ZOOM);

        let bottom = MapView::new(CITY_CENTER, MIN_ZOOM);
        assert_eq!(bottom.zoomed_out().zoom, MIN_ZOOM);
    }

    #[test]
    fn zoom_steps_keep_center() {
        let view = MapView::overview().zoomed_in().zoomed_in().zoomed_out();
        assert_eq!(view.zoom, OVERVIEW_ZOOM + 1);
        assert_eq!(view.center, CITY_CENTER);
    }

    #[test]
    fn offset_adds_degrees() {
        let moved = LatLng::new(-20.0, -49.0).offset(0.5, -0.25);
        assert!((moved.lat - -19.5).abs() < 1e-12);
        assert!((moved.lng - -49.25).abs() < 1e-12);
    }

    #[test]
    fn tile_options_use_leaflet_field_names() {
        let json = serde_json::to_value(OSM_TILES).expect("tile source should serialize");
        assert_eq!(json["attribution"], "© OpenStreetMap contributors");
        assert_eq!(json["maxZoom"], 19);
        assert_eq!(
            json["urlTemplate"],
            "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png"
        );
    }
}
