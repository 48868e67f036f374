//! UI actions in, rendering intents out.
//!
//! Browser callbacks translate DOM events into [`UiAction`]s, the dashboard
//! state turns them into [`Intent`]s, and an adapter executes those against the
//! mapping library and the page. Nothing here touches a live map.

use std::time::Duration;

use crate::geo::MapView;
use crate::layers::LayerId;
use crate::routes::Route;

/// Client-assigned handle for a button that can enter a busy state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ButtonId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

/// Simulated background work that completes after a fixed delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    Sync {
        button: ButtonId,
        restore_label: String,
    },
    Report {
        button: ButtonId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredTask {
    pub id: TaskId,
    pub delay: Duration,
    pub kind: TaskKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    LayerControl { control_id: String, checked: bool },
    ZoomIn,
    ZoomOut,
    Locate,
    Fullscreen,
    GenerateReport { button: ButtonId },
    SecondaryButton { button: ButtonId, label: String },
    Slider { slider_id: String, value: String },
    ConfigNav { index: usize },
    /// The timer for a previously scheduled task fired.
    TaskElapsed(TaskId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    AttachLayer(LayerId),
    DetachLayer(LayerId),
    ZoomIn,
    ZoomOut,
    SetView(MapView),
    ToggleFullscreen,
    Notify(String),
    SetButton {
        button: ButtonId,
        label: String,
        disabled: bool,
    },
    Schedule(DeferredTask),
    Navigate(Route),
    SetText {
        element_id: &'static str,
        text: String,
    },
    ActivateNavItem(usize),
}

/// The subset of a mapping library the dashboard drives.
pub trait MapSurface {
    fn attach_layer(&mut self, layer: LayerId);
    fn detach_layer(&mut self, layer: LayerId);
    fn zoom_in(&mut self);
    fn zoom_out(&mut self);
    fn set_view(&mut self, view: MapView);
}

impl Intent {
    /// Execute a map intent on `surface`. Returns false for page-level intents,
    /// which the caller handles itself.
    pub fn apply_to_map<S: MapSurface + ?Sized>(&self, surface: &mut S) -> bool {
        match self {
            Self::AttachLayer(layer) => surface.attach_layer(*layer),
            Self::DetachLayer(layer) => surface.detach_layer(*layer),
            Self::ZoomIn => surface.zoom_in(),
            Self::ZoomOut => surface.zoom_out(),
            Self::SetView(view) => surface.set_view(*view),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::BTreeSet;

    use super::*;

    /// Map stand-in that records attachment state.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSurface {
        pub attached: BTreeSet<LayerId>,
        pub zoom_steps: i32,
        pub last_view: Option<MapView>,
    }

    impl MapSurface for RecordingSurface {
        fn attach_layer(&mut self, layer: LayerId) {
            self.attached.insert(layer);
        }

        fn detach_layer(&mut self, layer: LayerId) {
            self.attached.remove(&layer);
        }

        fn zoom_in(&mut self) {
            self.zoom_steps += 1;
        }

        fn zoom_out(&mut self) {
            self.zoom_steps -= 1;
        }

        fn set_view(&mut self, view: MapView) {
            self.last_view = Some(view);
        }
    }

    #[test]
    fn map_intents_reach_the_surface() {
        let mut surface = RecordingSurface::default();
        assert!(Intent::AttachLayer(LayerId::Heat).apply_to_map(&mut surface));
        assert!(Intent::ZoomIn.apply_to_map(&mut surface));
        assert!(Intent::SetView(MapView::overview()).apply_to_map(&mut surface));

        assert!(surface.attached.contains(&LayerId::Heat));
        assert_eq!(surface.zoom_steps, 1);
        assert_eq!(surface.last_view, Some(MapView::overview()));
    }

    #[test]
    fn page_intents_are_left_to_the_caller() {
        let mut surface = RecordingSurface::default();
        assert!(!Intent::Notify("hi".to_owned()).apply_to_map(&mut surface));
        assert!(!Intent::ToggleFullscreen.apply_to_map(&mut surface));
        assert!(!Intent::Navigate(Route::Report).apply_to_map(&mut surface));
        assert!(surface.attached.is_empty());
    }
}
