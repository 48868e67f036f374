use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Districts below this vegetation-cover index are alerts and get a low-VCI zone circle.
pub const LOW_VCI_THRESHOLD: u8 = 30;
/// Districts below this index (and at or above [`LOW_VCI_THRESHOLD`]) are warnings.
pub const WARNING_VCI_THRESHOLD: u8 = 40;

pub const PRIORITY_LABEL: &str = "Priority";
pub const ADEQUATE_LABEL: &str = "Adequate";

/// Visual severity bucket. Doubles as the CSS class on popup values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Alert,
    Warning,
    Success,
}

impl Severity {
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Alert => "alert",
            Self::Warning => "warning",
            Self::Success => "success",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_class())
    }
}

pub const fn vci_severity(vci: u8) -> Severity {
    if vci < LOW_VCI_THRESHOLD {
        Severity::Alert
    } else if vci < WARNING_VCI_THRESHOLD {
        Severity::Warning
    } else {
        Severity::Success
    }
}

pub const fn is_low_vci(vci: u8) -> bool {
    vci < LOW_VCI_THRESHOLD
}

pub const fn priority_severity(priority: bool) -> Severity {
    if priority {
        Severity::Alert
    } else {
        Severity::Success
    }
}

pub const fn priority_label(priority: bool) -> &'static str {
    if priority {
        PRIORITY_LABEL
    } else {
        ADEQUATE_LABEL
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown level `{0}`, expected `medium` or `high`")]
pub struct ParseLevelError(pub String);

fn parse_level(raw: &str) -> Result<bool, ParseLevelError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "high" => Ok(true),
        "medium" => Ok(false),
        _ => Err(ParseLevelError(raw.to_owned())),
    }
}

/// Land-surface temperature intensity of a heat island.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatIntensity {
    Medium,
    High,
}

impl HeatIntensity {
    pub const fn color(self) -> &'static str {
        match self {
            Self::High => "#FF5722",
            Self::Medium => "#FF9800",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
        }
    }
}

impl FromStr for HeatIntensity {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_level(s).map(|high| if high { Self::High } else { Self::Medium })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLevel {
    Medium,
    High,
}

impl TrafficLevel {
    pub const fn color(self) -> &'static str {
        match self {
            Self::High => "#9C27B0",
            Self::Medium => "#673AB7",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
        }
    }

    pub const fn severity(self) -> Severity {
        match self {
            Self::High => Severity::Alert,
            Self::Medium => Severity::Warning,
        }
    }
}

impl FromStr for TrafficLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_level(s).map(|high| if high { Self::High } else { Self::Medium })
    }
}
