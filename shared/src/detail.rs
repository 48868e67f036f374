use serde::Serialize;

use crate::classify::Severity;
use crate::dataset::{Dataset, District};
use crate::geo::{DETAIL_ZOOM, LatLng, MapView};
use crate::overlay::{CircleOverlay, CircleStyle, MarkerIcon, MarkerOverlay, Overlay, Popup};

/// Name looked up when the page has no `district` parameter.
pub const DEFAULT_DISTRICT_NAME: &str = "Santa Fé";
pub const DETAIL_PIN_SIZE: u32 = 50;

const PRIORITY_RED: &str = "#f44336";
const NORMAL_BLUE: &str = "#2196F3";
const DISTRICT_AREA_RADIUS_M: f64 = 2000.0;
const PRIORITY_AREA_RADIUS_M: f64 = 400.0;

/// Illustrative hotspots drawn around priority districts: (Δlat, Δlng, local VCI).
const PRIORITY_AREA_OFFSETS: [(f64, f64, u8); 3] =
    [(0.005, -0.005, 8), (-0.003, 0.004, 12), (0.002, 0.006, 15)];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution<'a> {
    pub district: &'a District,
    /// True when the requested name matched nothing and the default record was used.
    pub fallback: bool,
}

/// Resolve the detail-page district from the raw query parameter.
///
/// A missing or empty parameter means [`DEFAULT_DISTRICT_NAME`]. A name with no
/// exact match falls back to the first record of the dataset. Returns `None`
/// only for an empty dataset.
pub fn resolve_district<'a>(dataset: &'a Dataset, requested: Option<&str>) -> Option<Resolution<'a>> {
    let name = requested
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_DISTRICT_NAME);

    if let Some(district) = dataset.district(name) {
        return Some(Resolution {
            district,
            fallback: false,
        });
    }

    dataset.districts.first().map(|district| Resolution {
        district,
        fallback: true,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriorityArea {
    pub position: LatLng,
    pub vci: u8,
}

/// Synthetic low-cover spots around a priority district. Empty otherwise.
pub fn priority_areas(district: &District) -> Vec<PriorityArea> {
    if !district.priority {
        return Vec::new();
    }
    PRIORITY_AREA_OFFSETS
        .iter()
        .map(|&(d_lat, d_lng, vci)| PriorityArea {
            position: district.position().offset(d_lat, d_lng),
            vci,
        })
        .collect()
}

fn priority_area_circle(index: usize, area: &PriorityArea) -> Overlay {
    let popup = Popup::new(format!("Priority Area {}", index + 1))
        .styled_row("Local VCI", format!("{}%", area.vci), Severity::Alert)
        .row("Action", "Urgent planting");

    Overlay::Circle(CircleOverlay {
        center: area.position,
        style: CircleStyle::filled(PRIORITY_RED, 0.4, PRIORITY_AREA_RADIUS_M, 2),
        popup: Some(popup),
    })
}

/// Everything the detail page draws for one district.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub district: District,
    pub fallback: bool,
    pub view: MapView,
    pub marker: Overlay,
    pub area: Overlay,
    pub priority_areas: Vec<Overlay>,
    pub breadcrumb: String,
    pub section_title: String,
}

impl DetailView {
    pub fn build(resolution: Resolution<'_>) -> Self {
        let district = resolution.district;
        let color = if district.priority {
            PRIORITY_RED
        } else {
            NORMAL_BLUE
        };

        let marker = Overlay::Marker(MarkerOverlay {
            position: district.position(),
            icon: MarkerIcon::district_pin(district.priority, DETAIL_PIN_SIZE),
            popup: None,
        });
        let area = Overlay::Circle(CircleOverlay {
            center: district.position(),
            style: CircleStyle::filled(color, 0.15, DISTRICT_AREA_RADIUS_M, 3),
            popup: None,
        });
        let priority_areas = priority_areas(district)
            .iter()
            .enumerate()
            .map(|(index, area)| priority_area_circle(index, area))
            .collect();

        Self {
            district: district.clone(),
            fallback: resolution.fallback,
            view: MapView::new(district.position(), DETAIL_ZOOM),
            marker,
            area,
            priority_areas,
            breadcrumb: format!("Neighborhood Analysis: {}", district.name),
            section_title: format!("📍 Detailed Map: {}", district.name),
        }
    }

    pub fn overlays(&self) -> impl Iterator<Item = &Overlay> {
        [&self.marker, &self.area]
            .into_iter()
            .chain(self.priority_areas.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(requested: Option<&str>) -> Resolution<'static> {
        resolve_district(Dataset::sample(), requested).expect("sample dataset is not empty")
    }

    #[test]
    fn every_dataset_name_resolves_to_its_record() {
        let data = Dataset::sample();
        for district in &data.districts {
            let resolution = resolve(Some(district.name.as_str()));
            assert_eq!(resolution.district, district);
            assert!(!resolution.fallback);
        }
    }

    #[test]
    fn missing_or_empty_parameter_uses_default_name() {
        for requested in [None, Some("")] {
            let resolution = resolve(requested);
            assert_eq!(resolution.district.name, "Santa Fé");
            assert!(!resolution.fallback);
        }
    }

    #[test]
    fn unknown_name_falls_back_to_fixed_default_record() {
        let resolution = resolve(Some("Atlantis"));
        assert_eq!(resolution.district.name, "Talhado");
        assert!(resolution.fallback);

        let near_miss = resolve(Some("santa fé"));
        assert_eq!(near_miss.district.name, "Talhado");
        assert!(near_miss.fallback);
    }

    #[test]
    fn empty_dataset_resolves_nothing() {
        let empty = Dataset {
            districts: Vec::new(),
            fire_alerts: Vec::new(),
            heat_islands: Vec::new(),
            traffic_zones: Vec::new(),
        };
        assert!(resolve_district(&empty, Some("HB")).is_none());
    }

    #[test]
    fn priority_district_gets_three_synthetic_areas() {
        let view = DetailView::build(resolve(Some("HB")));
        assert_eq!(view.priority_areas.len(), 3);

        let vcis: Vec<String> = view
            .priority_areas
            .iter()
            .filter_map(Overlay::popup)
            .filter_map(|popup| popup.find_row("Local VCI"))
            .map(|row| row.value.clone())
            .collect();
        assert_eq!(vcis, ["8%", "12%", "15%"]);

        let first = view.priority_areas[0].position();
        assert!((first.lat - (-20.8400 + 0.005)).abs() < 1e-9);
        assert!((first.lng - (-49.4100 - 0.005)).abs() < 1e-9);

        let titles: Vec<&str> = view
            .priority_areas
            .iter()
            .filter_map(Overlay::popup)
            .map(|popup| popup.title.as_str())
            .collect();
        assert_eq!(titles, ["Priority Area 1", "Priority Area 2", "Priority Area 3"]);
    }

    #[test]
    fn non_priority_district_gets_no_synthetic_areas() {
        let view = DetailView::build(resolve(Some("Bosque")));
        assert!(view.priority_areas.is_empty());
        assert_eq!(view.overlays().count(), 2);

        let area = view.area.as_circle().expect("district area is a circle");
        assert_eq!(area.style.color, "#2196F3");
        assert_eq!(area.style.radius, 2000.0);
    }

    #[test]
    fn detail_view_centers_on_district_and_titles_page() {
        let view = DetailView::build(resolve(Some("Vila Toninho")));
        assert_eq!(view.view.center, LatLng::new(-20.8500, -49.3789));
        assert_eq!(view.view.zoom, 14);
        assert_eq!(view.breadcrumb, "Neighborhood Analysis: Vila Toninho");
        assert_eq!(view.section_title, "📍 Detailed Map: Vila Toninho");
        assert_eq!(
            view.area.as_circle().map(|c| c.style.color),
            Some("#f44336")
        );
        let marker = view.marker.as_marker().expect("marker");
        assert_eq!(marker.icon.icon_size, [50, 50]);
        assert_eq!(marker.icon.icon_anchor, [25, 50]);
    }
}
