use std::collections::{HashMap, HashSet};

use crate::dataset::Dataset;
use crate::detail::{DetailView, resolve_district};
use crate::geo::MapView;
use crate::intent::{ButtonId, DeferredTask, Intent, TaskId, TaskKind, UiAction};
use crate::layers::{LayerId, LayerRegistry};
use crate::routes::Route;
use crate::ui::{
    REPORT_BUSY_LABEL, REPORT_DELAY, SAVE_DONE_MESSAGE, SYNC_BUSY_LABEL, SYNC_DELAY,
    SYNC_DONE_MESSAGE, SecondaryAction, SliderSpec,
};

/// Which map a page hosts, decided by the anchors present in its DOM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Overview,
    Detail,
}

impl PageKind {
    /// The overview anchor wins when both exist.
    pub const fn detect(has_map: bool, has_district_map: bool) -> Option<Self> {
        if has_map {
            Some(Self::Overview)
        } else if has_district_map {
            Some(Self::Detail)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
enum Page {
    Overview(LayerRegistry),
    Detail(Box<DetailView>),
    Plain,
}

pub fn layer_notification(visible: bool) -> String {
    let verb = if visible { "activated" } else { "deactivated" };
    format!("Layer {verb} successfully")
}

/// Everything a page load owns. Built once and handed to each event handler.
#[derive(Debug, Clone)]
pub struct DashboardState {
    page: Page,
    view: Option<MapView>,
    busy: HashSet<ButtonId>,
    pending: HashMap<TaskId, TaskKind>,
    next_task: u64,
    active_nav: Option<usize>,
}

impl DashboardState {
    fn with_page(page: Page, view: Option<MapView>) -> Self {
        Self {
            page,
            view,
            busy: HashSet::new(),
            pending: HashMap::new(),
            next_task: 0,
            active_nav: None,
        }
    }

    pub fn for_overview(dataset: &Dataset) -> Self {
        Self::with_page(
            Page::Overview(LayerRegistry::build(dataset)),
            Some(MapView::overview()),
        )
    }

    /// `None` when the dataset has no district to show.
    pub fn for_detail(dataset: &Dataset, requested: Option<&str>) -> Option<Self> {
        let resolution = resolve_district(dataset, requested)?;
        let detail = DetailView::build(resolution);
        let view = detail.view;
        Some(Self::with_page(Page::Detail(Box::new(detail)), Some(view)))
    }

    /// A page without any map; only the ancillary widgets are live.
    pub fn without_map() -> Self {
        Self::with_page(Page::Plain, None)
    }

    pub fn registry(&self) -> Option<&LayerRegistry> {
        match &self.page {
            Page::Overview(registry) => Some(registry),
            _ => None,
        }
    }

    pub fn detail_view(&self) -> Option<&DetailView> {
        match &self.page {
            Page::Detail(detail) => Some(detail.as_ref()),
            _ => None,
        }
    }

    pub const fn view(&self) -> Option<MapView> {
        self.view
    }

    pub fn is_busy(&self, button: ButtonId) -> bool {
        self.busy.contains(&button)
    }

    pub fn pending_tasks(&self) -> usize {
        self.pending.len()
    }

    pub const fn active_nav(&self) -> Option<usize> {
        self.active_nav
    }

    pub fn dispatch(&mut self, action: UiAction) -> Vec<Intent> {
        match action {
            UiAction::LayerControl {
                control_id,
                checked,
            } => self.toggle_layer(&control_id, checked),
            UiAction::ZoomIn => self.step_zoom(true),
            UiAction::ZoomOut => self.step_zoom(false),
            UiAction::Locate => {
                if self.registry().is_none() {
                    return Vec::new();
                }
                let home = MapView::overview();
                self.view = Some(home);
                vec![Intent::SetView(home)]
            }
            UiAction::Fullscreen => {
                if self.registry().is_none() {
                    return Vec::new();
                }
                vec![Intent::ToggleFullscreen]
            }
            UiAction::GenerateReport { button } => {
                self.start_task(button, REPORT_BUSY_LABEL, REPORT_DELAY, TaskKind::Report { button })
            }
            UiAction::SecondaryButton { button, label } => match SecondaryAction::from_label(&label)
            {
                Some(SecondaryAction::Sync) => self.start_task(
                    button,
                    SYNC_BUSY_LABEL,
                    SYNC_DELAY,
                    TaskKind::Sync {
                        button,
                        restore_label: label,
                    },
                ),
                Some(SecondaryAction::Save) => vec![Intent::Notify(SAVE_DONE_MESSAGE.to_owned())],
                None => Vec::new(),
            },
            UiAction::Slider { slider_id, value } => SliderSpec::find(&slider_id)
                .and_then(|spec| {
                    spec.display(&value).map(|text| Intent::SetText {
                        element_id: spec.value_id,
                        text,
                    })
                })
                .into_iter()
                .collect(),
            UiAction::ConfigNav { index } => {
                self.active_nav = Some(index);
                vec![Intent::ActivateNavItem(index)]
            }
            UiAction::TaskElapsed(id) => self.complete_task(id),
        }
    }

    fn toggle_layer(&mut self, control_id: &str, checked: bool) -> Vec<Intent> {
        let Page::Overview(registry) = &mut self.page else {
            return Vec::new();
        };
        let Some(layer) = LayerId::from_control_id(control_id) else {
            return Vec::new();
        };
        registry.set_visible(layer, checked);
        let map_intent = if checked {
            Intent::AttachLayer(layer)
        } else {
            Intent::DetachLayer(layer)
        };
        vec![map_intent, Intent::Notify(layer_notification(checked))]
    }

    fn step_zoom(&mut self, zoom_in: bool) -> Vec<Intent> {
        if self.registry().is_none() {
            return Vec::new();
        }
        let Some(view) = self.view else {
            return Vec::new();
        };
        if zoom_in {
            self.view = Some(view.zoomed_in());
            vec![Intent::ZoomIn]
        } else {
            self.view = Some(view.zoomed_out());
            vec![Intent::ZoomOut]
        }
    }

    /// Disable `button` and schedule `kind`. A busy button ignores further presses.
    fn start_task(
        &mut self,
        button: ButtonId,
        busy_label: &str,
        delay: std::time::Duration,
        kind: TaskKind,
    ) -> Vec<Intent> {
        if !self.busy.insert(button) {
            return Vec::new();
        }
        let id = TaskId(self.next_task);
        self.next_task += 1;
        self.pending.insert(id, kind.clone());
        vec![
            Intent::SetButton {
                button,
                label: busy_label.to_owned(),
                disabled: true,
            },
            Intent::Schedule(DeferredTask { id, delay, kind }),
        ]
    }

    fn complete_task(&mut self, id: TaskId) -> Vec<Intent> {
        let Some(kind) = self.pending.remove(&id) else {
            return Vec::new();
        };
        match kind {
            TaskKind::Sync {
                button,
                restore_label,
            } => {
                self.busy.remove(&button);
                vec![
                    Intent::SetButton {
                        button,
                        label: restore_label,
                        disabled: false,
                    },
                    Intent::Notify(SYNC_DONE_MESSAGE.to_owned()),
                ]
            }
            // The page navigates away, so the button stays disabled.
            TaskKind::Report { .. } => vec![Intent::Navigate(Route::Report)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::tests::RecordingSurface;

    fn overview() -> DashboardState {
        DashboardState::for_overview(Dataset::sample())
    }

    fn apply_all(surface: &mut RecordingSurface, intents: &[Intent]) {
        for intent in intents {
            intent.apply_to_map(surface);
        }
    }

    fn attached_by_default() -> RecordingSurface {
        let mut surface = RecordingSurface::default();
        for layer in LayerId::ALL.into_iter().filter(|l| l.visible_by_default()) {
            surface.attach_layer(layer);
        }
        surface
    }

    fn toggle(control_id: &str, checked: bool) -> UiAction {
        UiAction::LayerControl {
            control_id: control_id.to_owned(),
            checked,
        }
    }

    use crate::intent::MapSurface;

    #[test]
    fn page_kind_prefers_overview_anchor() {
        assert_eq!(PageKind::detect(true, true), Some(PageKind::Overview));
        assert_eq!(PageKind::detect(false, true), Some(PageKind::Detail));
        assert_eq!(PageKind::detect(false, false), None);
    }

    #[test]
    fn toggling_each_layer_twice_restores_attachment() {
        let mut state = overview();
        let mut surface = attached_by_default();
        let initial = surface.attached.clone();

        for layer in LayerId::ALL {
            let original = state
                .registry()
                .map(|r| r.is_visible(layer))
                .expect("overview has a registry");

            let first = state.dispatch(toggle(layer.control_id(), !original));
            apply_all(&mut surface, &first);
            assert_eq!(surface.attached.contains(&layer), !original);

            let second = state.dispatch(toggle(layer.control_id(), original));
            apply_all(&mut surface, &second);
            assert_eq!(surface.attached.contains(&layer), original);
            assert_eq!(
                state.registry().map(|r| r.is_visible(layer)),
                Some(original)
            );
        }

        assert_eq!(surface.attached, initial);
    }

    #[test]
    fn toggle_emits_map_intent_then_notification() {
        let mut state = overview();
        let intents = state.dispatch(toggle("layer-heat", true));
        assert_eq!(
            intents,
            vec![
                Intent::AttachLayer(LayerId::Heat),
                Intent::Notify("Layer activated successfully".to_owned()),
            ]
        );

        let intents = state.dispatch(toggle("layer-fires", false));
        assert_eq!(
            intents,
            vec![
                Intent::DetachLayer(LayerId::Fires),
                Intent::Notify("Layer deactivated successfully".to_owned()),
            ]
        );
    }

    #[test]
    fn unrecognized_control_is_silently_ignored() {
        let mut state = overview();
        assert!(state.dispatch(toggle("layer-rain", true)).is_empty());
        assert!(state.dispatch(toggle("", false)).is_empty());
    }

    #[test]
    fn detail_page_has_no_layer_controls_or_map_buttons() {
        let mut state =
            DashboardState::for_detail(Dataset::sample(), Some("HB")).expect("detail state");
        assert!(state.registry().is_none());
        assert!(state.dispatch(toggle("layer-heat", true)).is_empty());
        assert!(state.dispatch(UiAction::ZoomIn).is_empty());
        assert!(state.dispatch(UiAction::Locate).is_empty());
        assert!(state.dispatch(UiAction::Fullscreen).is_empty());

        let detail = state.detail_view().expect("detail view");
        assert_eq!(detail.district.name, "HB");
        assert_eq!(state.view(), Some(detail.view));
    }

    #[test]
    fn zoom_and_locate_track_the_view() {
        let mut state = overview();
        assert_eq!(state.dispatch(UiAction::ZoomIn), vec![Intent::ZoomIn]);
        assert_eq!(state.dispatch(UiAction::ZoomIn), vec![Intent::ZoomIn]);
        assert_eq!(state.dispatch(UiAction::ZoomOut), vec![Intent::ZoomOut]);
        assert_eq!(state.view().map(|v| v.zoom), Some(13));

        assert_eq!(
            state.dispatch(UiAction::Locate),
            vec![Intent::SetView(MapView::overview())]
        );
        assert_eq!(state.view(), Some(MapView::overview()));
        assert_eq!(
            state.dispatch(UiAction::Fullscreen),
            vec![Intent::ToggleFullscreen]
        );
    }

    #[test]
    fn sync_button_is_busy_until_its_task_elapses() {
        let mut state = DashboardState::without_map();
        let button = ButtonId(2);
        let press = || UiAction::SecondaryButton {
            button,
            label: "🔄 Sync Data".to_owned(),
        };

        let intents = state.dispatch(press());
        assert_eq!(intents.len(), 2);
        assert_eq!(
            intents[0],
            Intent::SetButton {
                button,
                label: "🔄 Syncing...".to_owned(),
                disabled: true,
            }
        );
        let Intent::Schedule(task) = &intents[1] else {
            panic!("expected a scheduled task, got {:?}", intents[1]);
        };
        assert_eq!(task.delay, SYNC_DELAY);
        assert!(state.is_busy(button));

        // A second press while pending is ignored.
        assert!(state.dispatch(press()).is_empty());
        assert_eq!(state.pending_tasks(), 1);

        let done = state.dispatch(UiAction::TaskElapsed(task.id));
        assert_eq!(
            done,
            vec![
                Intent::SetButton {
                    button,
                    label: "🔄 Sync Data".to_owned(),
                    disabled: false,
                },
                Intent::Notify("Data synced successfully!".to_owned()),
            ]
        );
        assert!(!state.is_busy(button));
        assert_eq!(state.pending_tasks(), 0);

        // Completion is one-shot.
        assert!(state.dispatch(UiAction::TaskElapsed(task.id)).is_empty());
    }

    #[test]
    fn report_button_navigates_after_delay_and_stays_disabled() {
        let mut state = overview();
        let button = ButtonId(0);
        let intents = state.dispatch(UiAction::GenerateReport { button });
        let Some(Intent::Schedule(task)) = intents.get(1).cloned() else {
            panic!("expected a scheduled task, got {intents:?}");
        };
        assert_eq!(task.delay, REPORT_DELAY);
        assert_eq!(task.kind, TaskKind::Report { button });

        assert_eq!(
            state.dispatch(UiAction::TaskElapsed(task.id)),
            vec![Intent::Navigate(Route::Report)]
        );
        assert!(state.is_busy(button));
        assert!(state.dispatch(UiAction::GenerateReport { button }).is_empty());
    }

    #[test]
    fn save_button_only_notifies() {
        let mut state = DashboardState::without_map();
        let intents = state.dispatch(UiAction::SecondaryButton {
            button: ButtonId(1),
            label: "💾 Save".to_owned(),
        });
        assert_eq!(
            intents,
            vec![Intent::Notify("Settings saved successfully!".to_owned())]
        );
        assert!(!state.is_busy(ButtonId(1)));
    }

    #[test]
    fn sliders_and_config_nav() {
        let mut state = DashboardState::without_map();
        assert_eq!(
            state.dispatch(UiAction::Slider {
                slider_id: "fire-slider".to_owned(),
                value: "2".to_owned(),
            }),
            vec![Intent::SetText {
                element_id: "fire-value",
                text: "Medium".to_owned(),
            }]
        );
        assert!(
            state
                .dispatch(UiAction::Slider {
                    slider_id: "wind-slider".to_owned(),
                    value: "2".to_owned(),
                })
                .is_empty()
        );

        assert_eq!(
            state.dispatch(UiAction::ConfigNav { index: 3 }),
            vec![Intent::ActivateNavItem(3)]
        );
        assert_eq!(state.active_nav(), Some(3));
    }
}
