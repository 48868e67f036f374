use std::sync::LazyLock;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::classify::{HeatIntensity, TrafficLevel, is_low_vci};
use crate::geo::LatLng;

/// Label shown as the detection source of every fire alert.
pub const FIRE_SOURCE_LABEL: &str = "NASA FIRMS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct District {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    /// Vegetation-cover index, percent.
    pub vci: u8,
    pub priority: bool,
}

impl District {
    pub const fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    pub const fn is_low_vci(&self) -> bool {
        is_low_vci(self.vci)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireAlert {
    pub lat: f64,
    pub lng: f64,
    pub location: String,
    pub detected_at: NaiveTime,
}

impl FireAlert {
    pub const fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    /// `HH:MM` detection time.
    pub fn detected_hhmm(&self) -> String {
        self.detected_at.format("%H:%M").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatIsland {
    pub lat: f64,
    pub lng: f64,
    pub intensity: HeatIntensity,
    pub temperature_c: i32,
}

impl HeatIsland {
    pub const fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficZone {
    pub lat: f64,
    pub lng: f64,
    pub level: TrafficLevel,
    pub co2_tons_per_year: u32,
    pub name: String,
}

impl TrafficZone {
    pub const fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

/// Every record the dashboard renders. Immutable after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub districts: Vec<District>,
    pub fire_alerts: Vec<FireAlert>,
    pub heat_islands: Vec<HeatIsland>,
    pub traffic_zones: Vec<TrafficZone>,
}

static SAMPLE: LazyLock<Dataset> = LazyLock::new(build_sample);

impl Dataset {
    /// The built-in sample records for São José do Rio Preto.
    pub fn sample() -> &'static Dataset {
        &SAMPLE
    }

    pub fn district(&self, name: &str) -> Option<&District> {
        self.districts.iter().find(|district| district.name == name)
    }

    pub fn low_vci_districts(&self) -> impl Iterator<Item = &District> {
        self.districts.iter().filter(|district| district.is_low_vci())
    }

    /// Content hash of the serialized dataset, used as a cache validator.
    pub fn revision(&self) -> u32 {
        match serde_json::to_vec(self) {
            Ok(bytes) => crc32fast::hash(&bytes),
            Err(_) => 0,
        }
    }
}

fn district(name: &str, lat: f64, lng: f64, vci: u8, priority: bool) -> District {
    District {
        name: name.to_owned(),
        lat,
        lng,
        vci,
        priority,
    }
}

fn fire(lat: f64, lng: f64, location: &str, hour: u32, minute: u32) -> FireAlert {
    FireAlert {
        lat,
        lng,
        location: location.to_owned(),
        detected_at: NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN),
    }
}

fn heat(lat: f64, lng: f64, intensity: HeatIntensity, temperature_c: i32) -> HeatIsland {
    HeatIsland {
        lat,
        lng,
        intensity,
        temperature_c,
    }
}

fn traffic(lat: f64, lng: f64, level: TrafficLevel, co2: u32, name: &str) -> TrafficZone {
    TrafficZone {
        lat,
        lng,
        level,
        co2_tons_per_year: co2,
        name: name.to_owned(),
    }
}

fn build_sample() -> Dataset {
    Dataset {
        districts: vec![
            district("Talhado", -20.7650, -49.3500, 22, true),
            district("HB", -20.8400, -49.4100, 18, true),
            district("Schmitt", -20.8600, -49.3600, 25, true),
            district("Central", -20.8100, -49.3789, 52, false),
            district("Pinheirinho", -20.7800, -49.4000, 38, false),
            district("CEU", -20.7800, -49.3500, 42, false),
            district("Bosque", -20.7750, -49.3200, 48, false),
            district("Represa", -20.8200, -49.3400, 35, false),
            district("Vila Toninho", -20.8500, -49.3789, 28, true),
            district("Cidade da Criança", -20.8150, -49.4200, 33, false),
            district("Santa Fé", -20.7950, -49.3650, 18, true),
        ],
        // Simulated FIRMS detections.
        fire_alerts: vec![
            fire(-20.7900, -49.3700, "Talhado", 12, 30),
            fire(-20.8350, -49.4050, "HB", 10, 15),
            fire(-20.8150, -49.3500, "Represa", 14, 45),
            fire(-20.7850, -49.4000, "Pinheirinho", 9, 20),
            fire(-20.8550, -49.3650, "Schmitt", 13, 10),
        ],
        heat_islands: vec![
            heat(-20.8100, -49.3789, HeatIntensity::High, 38),
            heat(-20.8400, -49.4100, HeatIntensity::High, 37),
            heat(-20.7950, -49.3650, HeatIntensity::Medium, 35),
        ],
        traffic_zones: vec![
            traffic(-20.8100, -49.3789, TrafficLevel::High, 850, "Downtown"),
            traffic(-20.8200, -49.3400, TrafficLevel::Medium, 420, "Represa"),
            traffic(-20.7800, -49.3500, TrafficLevel::Medium, 380, "CEU"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_has_expected_record_counts() {
        let data = Dataset::sample();
        assert_eq!(data.districts.len(), 11);
        assert_eq!(data.fire_alerts.len(), 5);
        assert_eq!(data.heat_islands.len(), 3);
        assert_eq!(data.traffic_zones.len(), 3);
    }

    #[test]
    fn five_sample_districts_are_below_low_vci_threshold() {
        let names: Vec<&str> = Dataset::sample()
            .low_vci_districts()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(
            names,
            ["Talhado", "HB", "Schmitt", "Vila Toninho", "Santa Fé"]
        );
    }

    #[test]
    fn district_lookup_is_exact() {
        let data = Dataset::sample();
        assert_eq!(data.district("HB").map(|d| d.vci), Some(18));
        assert!(data.district("hb").is_none());
        assert!(data.district("Santa Fe").is_none());
    }

    #[test]
    fn fire_time_formats_as_hours_and_minutes() {
        let alert = &Dataset::sample().fire_alerts[3];
        assert_eq!(alert.location, "Pinheirinho");
        assert_eq!(alert.detected_hhmm(), "09:20");
    }

    #[test]
    fn revision_tracks_content() {
        let data = Dataset::sample();
        assert_eq!(data.revision(), data.clone().revision());

        let mut edited = data.clone();
        edited.districts[0].vci = 99;
        assert_ne!(data.revision(), edited.revision());
    }
}
