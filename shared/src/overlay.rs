//! Renderable overlay descriptions.
//!
//! These are plain data: the mapping library adapter turns them into markers,
//! circles and popups. Field names serialize to the option keys the library
//! expects (`fillColor`, `iconAnchor`, ...), so the same value feeds both the
//! JSON API and the browser bindings.

use std::fmt::Write as _;

use serde::Serialize;

use crate::classify::Severity;
use crate::geo::LatLng;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Overlay {
    Marker(MarkerOverlay),
    Circle(CircleOverlay),
}

impl Overlay {
    pub const fn position(&self) -> LatLng {
        match self {
            Self::Marker(marker) => marker.position,
            Self::Circle(circle) => circle.center,
        }
    }

    pub const fn popup(&self) -> Option<&Popup> {
        match self {
            Self::Marker(marker) => marker.popup.as_ref(),
            Self::Circle(circle) => circle.popup.as_ref(),
        }
    }

    pub const fn as_circle(&self) -> Option<&CircleOverlay> {
        match self {
            Self::Circle(circle) => Some(circle),
            Self::Marker(_) => None,
        }
    }

    pub const fn as_marker(&self) -> Option<&MarkerOverlay> {
        match self {
            Self::Marker(marker) => Some(marker),
            Self::Circle(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerOverlay {
    pub position: LatLng,
    pub icon: MarkerIcon,
    pub popup: Option<Popup>,
}

/// HTML marker icon (`divIcon` options).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerIcon {
    pub class_name: &'static str,
    pub html: String,
    pub icon_size: [u32; 2],
    pub icon_anchor: [i32; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popup_anchor: Option<[i32; 2]>,
}

impl MarkerIcon {
    /// Pin used for districts: warning sign when priority, map pin otherwise.
    pub fn district_pin(priority: bool, size: u32) -> Self {
        let (variant, glyph) = if priority {
            ("priority", "⚠️")
        } else {
            ("normal", "📍")
        };
        let half = i32::try_from(size / 2).unwrap_or(i32::MAX);
        let full = i32::try_from(size).unwrap_or(i32::MAX);
        Self {
            class_name: "custom-marker",
            html: format!(
                r#"<div class="marker-pin {variant}"><div class="marker-icon">{glyph}</div></div>"#
            ),
            icon_size: [size, size],
            icon_anchor: [half, full],
            popup_anchor: None,
        }
    }

    pub fn fire() -> Self {
        Self {
            class_name: "fire-marker",
            html: r#"<div class="fire-marker-container"><div class="fire-pulse"></div><div class="fire-icon">🔥</div></div>"#
                .to_owned(),
            icon_size: [40, 40],
            icon_anchor: [20, 20],
            popup_anchor: Some([0, -20]),
        }
    }

    pub fn with_popup_anchor(mut self, anchor: [i32; 2]) -> Self {
        self.popup_anchor = Some(anchor);
        self
    }

    pub fn is_priority(&self) -> bool {
        self.html.contains("marker-pin priority")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircleOverlay {
    pub center: LatLng,
    pub style: CircleStyle,
    pub popup: Option<Popup>,
}

/// Path options for a circle; `radius` is in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleStyle {
    pub color: &'static str,
    pub fill_color: &'static str,
    pub fill_opacity: f64,
    pub radius: f64,
    pub weight: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_array: Option<&'static str>,
}

impl CircleStyle {
    /// Solid circle with stroke and fill in the same color.
    pub const fn filled(color: &'static str, fill_opacity: f64, radius: f64, weight: u32) -> Self {
        Self {
            color,
            fill_color: color,
            fill_opacity,
            radius,
            weight,
            dash_array: None,
        }
    }

    pub const fn dashed(mut self, pattern: &'static str) -> Self {
        self.dash_array = Some(pattern);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupOptions {
    pub max_width: u32,
    pub class_name: &'static str,
}

pub const CUSTOM_POPUP: PopupOptions = PopupOptions {
    max_width: 300,
    class_name: "custom-popup",
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopupRow {
    pub label: &'static str,
    pub value: String,
    pub severity: Option<Severity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopupLink {
    pub href: String,
    pub text: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Popup {
    pub title: String,
    /// Extra class on the popup container, e.g. `fire-popup`.
    pub variant: Option<&'static str>,
    pub rows: Vec<PopupRow>,
    pub link: Option<PopupLink>,
    pub options: Option<PopupOptions>,
}

impl Popup {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            variant: None,
            rows: Vec::new(),
            link: None,
            options: None,
        }
    }

    pub fn variant(mut self, variant: &'static str) -> Self {
        self.variant = Some(variant);
        self
    }

    pub fn row(mut self, label: &'static str, value: impl Into<String>) -> Self {
        self.rows.push(PopupRow {
            label,
            value: value.into(),
            severity: None,
        });
        self
    }

    pub fn styled_row(
        mut self,
        label: &'static str,
        value: impl Into<String>,
        severity: Severity,
    ) -> Self {
        self.rows.push(PopupRow {
            label,
            value: value.into(),
            severity: Some(severity),
        });
        self
    }

    pub fn link(mut self, href: String, text: &'static str) -> Self {
        self.link = Some(PopupLink { href, text });
        self
    }

    pub fn options(mut self, options: PopupOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn find_row(&self, label: &str) -> Option<&PopupRow> {
        self.rows.iter().find(|row| row.label == label)
    }

    /// Popup body markup. Record text is escaped; labels and titles from this
    /// crate are trusted.
    pub fn to_html(&self) -> String {
        let mut html = String::with_capacity(256);
        let _ = write!(html, r#"<div class="leaflet-popup-custom"#);
        if let Some(variant) = self.variant {
            let _ = write!(html, " {variant}");
        }
        let _ = write!(
            html,
            r#""><div class="popup-title">{}</div><div class="popup-content">"#,
            escape_html(&self.title)
        );
        for row in &self.rows {
            let class = match row.severity {
                Some(severity) => format!("popup-value {}", severity.css_class()),
                None => "popup-value".to_owned(),
            };
            let _ = write!(
                html,
                r#"<div class="popup-metric"><span class="popup-label">{}:</span><span class="{class}">{}</span></div>"#,
                row.label,
                escape_html(&row.value)
            );
        }
        html.push_str("</div>");
        if let Some(link) = &self.link {
            let _ = write!(
                html,
                r#"<a href="{}" class="popup-button">{}</a>"#,
                escape_html(&link.href),
                link.text
            );
        }
        html.push_str("</div>");
        html
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Percent-encode with the same unreserved set as JavaScript's `encodeURIComponent`.
pub fn encode_uri_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric()
            || matches!(
                byte,
                b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')'
            )
        {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}
