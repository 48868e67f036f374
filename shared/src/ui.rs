//! Cosmetic widgets: sliders, busy buttons, staggered animations and toast timing.

use std::time::Duration;

pub const NOTIFICATION_VISIBLE: Duration = Duration::from_millis(3000);
pub const NOTIFICATION_EXIT: Duration = Duration::from_millis(300);
pub const SYNC_DELAY: Duration = Duration::from_millis(2000);
pub const REPORT_DELAY: Duration = Duration::from_millis(1500);

pub const SYNC_BUSY_LABEL: &str = "🔄 Syncing...";
pub const REPORT_BUSY_LABEL: &str = "⏳ Generating...";

pub const SYNC_DONE_MESSAGE: &str = "Data synced successfully!";
pub const SAVE_DONE_MESSAGE: &str = "Settings saved successfully!";

const METRIC_CARD_BASE_MS: u64 = 100;
const METRIC_CARD_STEP_MS: u64 = 100;
const CHART_BAR_START_MS: u64 = 300;
const CHART_BAR_BASE_MS: u64 = 100;
const CHART_BAR_STEP_MS: u64 = 150;

pub const FIRE_RISK_LEVELS: &[&str] = &["Low", "Medium", "High"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderFormat {
    /// Raw value followed by a unit, e.g. `25%`.
    Suffix(&'static str),
    /// 1-based index into named levels.
    Levels(&'static [&'static str]),
}

/// A range input and the label that mirrors its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderSpec {
    pub slider_id: &'static str,
    pub value_id: &'static str,
    pub format: SliderFormat,
}

pub static SLIDERS: [SliderSpec; 4] = [
    SliderSpec {
        slider_id: "icv-slider",
        value_id: "icv-value",
        format: SliderFormat::Suffix("%"),
    },
    SliderSpec {
        slider_id: "temp-slider",
        value_id: "temp-value",
        format: SliderFormat::Suffix("°C"),
    },
    SliderSpec {
        slider_id: "target-slider",
        value_id: "target-value",
        format: SliderFormat::Suffix("%"),
    },
    SliderSpec {
        slider_id: "fire-slider",
        value_id: "fire-value",
        format: SliderFormat::Levels(FIRE_RISK_LEVELS),
    },
];

impl SliderSpec {
    pub fn find(slider_id: &str) -> Option<&'static SliderSpec> {
        SLIDERS.iter().find(|spec| spec.slider_id == slider_id)
    }

    /// Label text for a raw input value. Level indices outside the range clamp
    /// to the nearest level; a non-numeric level input yields `None`.
    pub fn display(&self, raw: &str) -> Option<String> {
        match self.format {
            SliderFormat::Suffix(suffix) => Some(format!("{}{suffix}", raw.trim())),
            SliderFormat::Levels(levels) => {
                let position = raw.trim().parse::<i64>().ok()?;
                let last = levels.len().checked_sub(1)?;
                let index = usize::try_from(position.saturating_sub(1))
                    .unwrap_or(0)
                    .min(last);
                levels.get(index).map(|level| (*level).to_owned())
            }
        }
    }
}

/// What a secondary button does, inferred from its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecondaryAction {
    Sync,
    Save,
}

impl SecondaryAction {
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.contains("Sync") {
            Some(Self::Sync)
        } else if label.contains("Save") {
            Some(Self::Save)
        } else {
            None
        }
    }
}

pub fn metric_card_delay(index: usize) -> Duration {
    Duration::from_millis(METRIC_CARD_BASE_MS + METRIC_CARD_STEP_MS * index as u64)
}

/// Delay before the whole bar animation starts.
pub const fn chart_bars_start() -> Duration {
    Duration::from_millis(CHART_BAR_START_MS)
}

/// Delay of one bar relative to [`chart_bars_start`].
pub fn chart_bar_delay(index: usize) -> Duration {
    Duration::from_millis(CHART_BAR_BASE_MS + CHART_BAR_STEP_MS * index as u64)
}

/// Whole milliseconds for browser timer APIs, saturating at `u32::MAX`.
pub fn timer_millis(delay: Duration) -> u32 {
    u32::try_from(delay.as_millis()).unwrap_or(u32::MAX)
}
