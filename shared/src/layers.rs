use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::classify::{Severity, priority_label, priority_severity, vci_severity};
use crate::dataset::{Dataset, District, FIRE_SOURCE_LABEL, FireAlert, HeatIsland, TrafficZone};
use crate::overlay::{
    CUSTOM_POPUP, CircleOverlay, CircleStyle, MarkerIcon, MarkerOverlay, Overlay, Popup,
};
use crate::routes::Route;

pub const DISTRICT_PIN_SIZE: u32 = 40;
pub const LOW_VCI_ZONE: CircleStyle = CircleStyle::filled("#f44336", 0.25, 1500.0, 2);
pub const HEAT_ISLAND_RADIUS_M: f64 = 1200.0;
pub const TRAFFIC_ZONE_RADIUS_M: f64 = 1000.0;

/// One of the five independently toggleable overlay groups on the overview map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerId {
    Fires,
    Districts,
    /// Low vegetation-cover zones.
    Icv,
    Heat,
    Co2,
}

impl LayerId {
    pub const ALL: [Self; 5] = [
        Self::Fires,
        Self::Districts,
        Self::Icv,
        Self::Heat,
        Self::Co2,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Fires => "fires",
            Self::Districts => "districts",
            Self::Icv => "icv",
            Self::Heat => "heat",
            Self::Co2 => "co2",
        }
    }

    /// DOM id of the checkbox bound to this group.
    pub const fn control_id(self) -> &'static str {
        match self {
            Self::Fires => "layer-fires",
            Self::Districts => "layer-districts",
            Self::Icv => "layer-icv",
            Self::Heat => "layer-heat",
            Self::Co2 => "layer-co2",
        }
    }

    pub fn from_control_id(control_id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|layer| layer.control_id() == control_id)
    }

    pub const fn visible_by_default(self) -> bool {
        matches!(self, Self::Fires | Self::Districts | Self::Icv)
    }

    const fn index(self) -> usize {
        match self {
            Self::Fires => 0,
            Self::Districts => 1,
            Self::Icv => 2,
            Self::Heat => 3,
            Self::Co2 => 4,
        }
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown layer `{0}`")]
pub struct ParseLayerIdError(pub String);

impl FromStr for LayerId {
    type Err = ParseLayerIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|layer| layer.key() == s)
            .ok_or_else(|| ParseLayerIdError(s.to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerGroup {
    pub id: LayerId,
    pub overlays: Vec<Overlay>,
}

pub fn district_marker(district: &District) -> Overlay {
    let popup = Popup::new(district.name.clone())
        .styled_row("VCI", format!("{}%", district.vci), vci_severity(district.vci))
        .styled_row(
            "Status",
            priority_label(district.priority),
            priority_severity(district.priority),
        )
        .link(
            Route::District(district.name.clone()).href(),
            "View Detailed Analysis",
        )
        .options(CUSTOM_POPUP);

    Overlay::Marker(MarkerOverlay {
        position: district.position(),
        icon: MarkerIcon::district_pin(district.priority, DISTRICT_PIN_SIZE)
            .with_popup_anchor([0, -40]),
        popup: Some(popup),
    })
}

pub fn fire_marker(alert: &FireAlert) -> Overlay {
    let popup = Popup::new("🔥 Active Heat Hotspot")
        .variant("fire-popup")
        .row("Location", alert.location.clone())
        .row("Detected", format!("Today, {}", alert.detected_hhmm()))
        .row("Source", FIRE_SOURCE_LABEL)
        .styled_row("Status", "Active", Severity::Alert)
        .options(CUSTOM_POPUP);

    Overlay::Marker(MarkerOverlay {
        position: alert.position(),
        icon: MarkerIcon::fire(),
        popup: Some(popup),
    })
}

/// Translucent red zone around a district, only below the low-VCI threshold.
pub fn low_vci_zone(district: &District) -> Option<Overlay> {
    district.is_low_vci().then(|| {
        Overlay::Circle(CircleOverlay {
            center: district.position(),
            style: LOW_VCI_ZONE,
            popup: None,
        })
    })
}

pub fn heat_island_circle(area: &HeatIsland) -> Overlay {
    let popup = Popup::new("🌡️ Heat Island")
        .styled_row(
            "LST Temperature",
            format!("{}°C", area.temperature_c),
            Severity::Alert,
        )
        .row("Intensity", area.intensity.label());

    Overlay::Circle(CircleOverlay {
        center: area.position(),
        style: CircleStyle::filled(area.intensity.color(), 0.3, HEAT_ISLAND_RADIUS_M, 2),
        popup: Some(popup),
    })
}

pub fn traffic_zone_circle(zone: &TrafficZone) -> Overlay {
    let popup = Popup::new("🚗 Traffic & Emissions")
        .row("Location", zone.name.clone())
        .styled_row("Traffic Level", zone.level.label(), zone.level.severity())
        .row("CO₂ Emission", format!("{} ton/year", zone.co2_tons_per_year));

    Overlay::Circle(CircleOverlay {
        center: zone.position(),
        style: CircleStyle::filled(zone.level.color(), 0.25, TRAFFIC_ZONE_RADIUS_M, 2)
            .dashed("5, 5"),
        popup: Some(popup),
    })
}

pub fn build_group(dataset: &Dataset, id: LayerId) -> LayerGroup {
    let overlays = match id {
        LayerId::Fires => dataset.fire_alerts.iter().map(fire_marker).collect(),
        LayerId::Districts => dataset.districts.iter().map(district_marker).collect(),
        LayerId::Icv => dataset.districts.iter().filter_map(low_vci_zone).collect(),
        LayerId::Heat => dataset.heat_islands.iter().map(heat_island_circle).collect(),
        LayerId::Co2 => dataset.traffic_zones.iter().map(traffic_zone_circle).collect(),
    };
    LayerGroup { id, overlays }
}

/// Overview layer groups and their visibility on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerRegistry {
    groups: Vec<LayerGroup>,
    visible: [bool; 5],
}

#[derive(Debug, Clone, Serialize)]
pub struct LayerGroupView<'a> {
    pub id: LayerId,
    pub control_id: &'static str,
    pub visible: bool,
    pub overlays: &'a [Overlay],
}

impl LayerRegistry {
    pub fn build(dataset: &Dataset) -> Self {
        Self {
            groups: LayerId::ALL
                .into_iter()
                .map(|id| build_group(dataset, id))
                .collect(),
            visible: LayerId::ALL.map(LayerId::visible_by_default),
        }
    }

    pub fn group(&self, id: LayerId) -> &LayerGroup {
        &self.groups[id.index()]
    }

    pub fn groups(&self) -> impl Iterator<Item = &LayerGroup> {
        self.groups.iter()
    }

    pub const fn is_visible(&self, id: LayerId) -> bool {
        self.visible[id.index()]
    }

    /// Returns whether the visibility actually changed.
    pub fn set_visible(&mut self, id: LayerId, visible: bool) -> bool {
        let slot = &mut self.visible[id.index()];
        let changed = *slot != visible;
        *slot = visible;
        changed
    }

    pub fn visible_layers(&self) -> impl Iterator<Item = LayerId> + '_ {
        LayerId::ALL
            .into_iter()
            .filter(|id| self.is_visible(*id))
    }

    pub fn views(&self) -> Vec<LayerGroupView<'_>> {
        self.groups
            .iter()
            .map(|group| LayerGroupView {
                id: group.id,
                control_id: group.id.control_id(),
                visible: self.is_visible(group.id),
                overlays: &group.overlays,
            })
            .collect()
    }

    pub fn overlay_count(&self) -> usize {
        self.groups.iter().map(|group| group.overlays.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Severity;

    fn hb() -> District {
        District {
            name: "HB".to_owned(),
            lat: -20.84,
            lng: -49.41,
            vci: 18,
            priority: true,
        }
    }

    #[test]
    fn priority_district_popup_reads_priority_with_alert_index() {
        let overlay = district_marker(&hb());
        let popup = overlay.popup().expect("district marker has a popup");

        let vci = popup.find_row("VCI").expect("VCI row");
        assert_eq!(vci.value, "18%");
        assert_eq!(vci.severity, Some(Severity::Alert));

        let status = popup.find_row("Status").expect("Status row");
        assert_eq!(status.value, "Priority");
        assert_eq!(status.severity, Some(Severity::Alert));

        let html = popup.to_html();
        assert!(html.contains(r#"<span class="popup-value alert">18%</span>"#));
        assert!(html.contains(r#"<span class="popup-value alert">Priority</span>"#));

        let marker = overlay.as_marker().expect("district overlay is a marker");
        assert!(marker.icon.is_priority());
        assert_eq!(marker.icon.popup_anchor, Some([0, -40]));
    }

    #[test]
    fn district_popup_links_to_detail_page_with_encoded_name() {
        let data = Dataset::sample();
        let santa_fe = data.district("Santa Fé").expect("sample district");
        let overlay = district_marker(santa_fe);
        let link = overlay
            .popup()
            .and_then(|popup| popup.link.as_ref())
            .expect("district popup has a link");
        assert_eq!(link.href, "bairro.html?district=Santa%20F%C3%A9");
    }

    #[test]
    fn adequate_district_uses_normal_pin_and_success_status() {
        let data = Dataset::sample();
        let central = data.district("Central").expect("sample district");
        let overlay = district_marker(central);
        let popup = overlay.popup().expect("popup");
        assert_eq!(popup.find_row("Status").map(|r| r.value.as_str()), Some("Adequate"));
        assert_eq!(
            popup.find_row("VCI").and_then(|r| r.severity),
            Some(Severity::Success)
        );
        assert!(!overlay.as_marker().expect("marker").icon.is_priority());
    }

    #[test]
    fn low_vci_zone_exists_iff_below_threshold() {
        for district in &Dataset::sample().districts {
            assert_eq!(low_vci_zone(district).is_some(), district.vci < 30);
        }
    }

    #[test]
    fn low_vci_group_has_one_circle_per_qualifying_district() {
        let data = Dataset::sample();
        let group = build_group(data, LayerId::Icv);
        assert_eq!(group.overlays.len(), data.low_vci_districts().count());
        assert_eq!(group.overlays.len(), 5);
        for overlay in &group.overlays {
            let circle = overlay.as_circle().expect("low-vci overlays are circles");
            assert_eq!(circle.style, LOW_VCI_ZONE);
            assert!(circle.popup.is_none());
        }
    }

    #[test]
    fn fire_popup_carries_fixed_source_and_active_status() {
        let alert = &Dataset::sample().fire_alerts[0];
        let overlay = fire_marker(alert);
        let popup = overlay.popup().expect("popup");
        assert_eq!(popup.variant, Some("fire-popup"));
        assert_eq!(
            popup.find_row("Detected").map(|r| r.value.as_str()),
            Some("Today, 12:30")
        );
        assert_eq!(
            popup.find_row("Source").map(|r| r.value.as_str()),
            Some("NASA FIRMS")
        );
        let status = popup.find_row("Status").expect("status row");
        assert_eq!(status.value, "Active");
        assert_eq!(status.severity, Some(Severity::Alert));
    }

    #[test]
    fn heat_and_traffic_circles_follow_level_colors() {
        let data = Dataset::sample();

        let heat = build_group(data, LayerId::Heat);
        let colors: Vec<&str> = heat
            .overlays
            .iter()
            .filter_map(Overlay::as_circle)
            .map(|c| c.style.color)
            .collect();
        assert_eq!(colors, ["#FF5722", "#FF5722", "#FF9800"]);

        let co2 = build_group(data, LayerId::Co2);
        let downtown = co2.overlays[0].as_circle().expect("circle");
        assert_eq!(downtown.style.color, "#9C27B0");
        assert_eq!(downtown.style.dash_array, Some("5, 5"));
        assert_eq!(downtown.style.radius, TRAFFIC_ZONE_RADIUS_M);
        let popup = downtown.popup.as_ref().expect("popup");
        assert_eq!(
            popup.find_row("CO₂ Emission").map(|r| r.value.as_str()),
            Some("850 ton/year")
        );
        assert_eq!(
            popup.find_row("Traffic Level").and_then(|r| r.severity),
            Some(Severity::Alert)
        );
    }

    #[test]
    fn registry_starts_with_three_visible_groups() {
        let registry = LayerRegistry::build(Dataset::sample());
        let visible: Vec<LayerId> = registry.visible_layers().collect();
        assert_eq!(visible, [LayerId::Fires, LayerId::Districts, LayerId::Icv]);
        assert_eq!(registry.overlay_count(), 5 + 11 + 5 + 3 + 3);
    }

    #[test]
    fn every_overlay_belongs_to_exactly_one_group() {
        let registry = LayerRegistry::build(Dataset::sample());
        let ids: Vec<LayerId> = registry.groups().map(|g| g.id).collect();
        assert_eq!(ids, LayerId::ALL);
    }

    #[test]
    fn control_ids_map_to_layers_and_unknown_ids_do_not() {
        for layer in LayerId::ALL {
            assert_eq!(LayerId::from_control_id(layer.control_id()), Some(layer));
            assert_eq!(layer.key().parse::<LayerId>(), Ok(layer));
        }
        assert_eq!(LayerId::from_control_id("layer-traffic"), None);
        assert_eq!(LayerId::from_control_id("fires"), None);
        assert!("smoke".parse::<LayerId>().is_err());
    }

    #[test]
    fn set_visible_reports_changes() {
        let mut registry = LayerRegistry::build(Dataset::sample());
        assert!(!registry.set_visible(LayerId::Fires, true));
        assert!(registry.set_visible(LayerId::Heat, true));
        assert!(registry.is_visible(LayerId::Heat));
        assert!(registry.set_visible(LayerId::Heat, false));
        assert!(!registry.is_visible(LayerId::Heat));
    }
}
