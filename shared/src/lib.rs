pub mod classify;
pub mod dataset;
pub mod detail;
pub mod geo;
pub mod intent;
pub mod layers;
pub mod overlay;
pub mod routes;
pub mod state;
pub mod ui;

pub use classify::{HeatIntensity, Severity, TrafficLevel};
pub use dataset::{Dataset, District, FireAlert, HeatIsland, TrafficZone};
pub use detail::DetailView;
pub use geo::{LatLng, MapView};
pub use intent::{ButtonId, Intent, MapSurface, UiAction};
pub use layers::{LayerId, LayerRegistry};
pub use overlay::Overlay;
pub use routes::Route;
pub use state::{DashboardState, PageKind};
