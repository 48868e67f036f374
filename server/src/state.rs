use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use verde_shared::geo::{OSM_TILES, TileSource};
use verde_shared::layers::LayerGroupView;
use verde_shared::{Dataset, LayerId, LayerRegistry, MapView};

/// Body of `/api/overview`: everything the overview map needs on first paint.
#[derive(Debug, Serialize)]
pub struct OverviewPayload<'a> {
    pub view: MapView,
    pub tiles: TileSource,
    pub layers: Vec<LayerGroupView<'a>>,
}

/// JSON serialized once at startup and shared by every request.
#[derive(Debug)]
pub struct Payloads {
    pub dataset_json: Arc<Bytes>,
    pub overview_json: Arc<Bytes>,
    layer_json: Vec<(LayerId, Arc<Bytes>)>,
    pub revision: u32,
}

impl Payloads {
    pub fn build(dataset: &Dataset) -> Result<Self, serde_json::Error> {
        let registry = LayerRegistry::build(dataset);
        let overview = OverviewPayload {
            view: MapView::overview(),
            tiles: OSM_TILES,
            layers: registry.views(),
        };

        let layer_json = registry
            .views()
            .iter()
            .map(|view| Ok((view.id, to_bytes(view)?)))
            .collect::<Result<Vec<_>, serde_json::Error>>()?;

        Ok(Self {
            dataset_json: to_bytes(dataset)?,
            overview_json: to_bytes(&overview)?,
            layer_json,
            revision: dataset.revision(),
        })
    }

    pub fn layer(&self, id: LayerId) -> Option<Arc<Bytes>> {
        self.layer_json
            .iter()
            .find(|(layer, _)| *layer == id)
            .map(|(_, json)| Arc::clone(json))
    }

    /// Strong validator shared by every dataset-derived payload.
    pub fn etag(&self, resource: &str) -> String {
        format!("\"{resource}-{:08x}\"", self.revision)
    }
}

fn to_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Arc<Bytes>, serde_json::Error> {
    serde_json::to_vec(value).map(|json| Arc::new(Bytes::from(json)))
}

#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub payloads: Arc<Payloads>,
    pub static_dir: PathBuf,
    pub started_at: DateTime<Utc>,
    pub observability: Arc<ObservabilityCounters>,
}

impl AppState {
    pub fn new(dataset: Dataset, static_dir: PathBuf) -> Result<Self, serde_json::Error> {
        let payloads = Payloads::build(&dataset)?;
        Ok(Self {
            dataset: Arc::new(dataset),
            payloads: Arc::new(payloads),
            static_dir,
            started_at: Utc::now(),
            observability: Arc::new(ObservabilityCounters::default()),
        })
    }
}

#[derive(Debug, Default)]
pub struct ObservabilityCounters {
    dataset_requests_total: AtomicU64,
    overview_requests_total: AtomicU64,
    layer_requests_total: AtomicU64,
    district_requests_total: AtomicU64,
    district_fallbacks_total: AtomicU64,
    not_modified_responses_total: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ObservabilitySnapshot {
    pub dataset_requests_total: u64,
    pub overview_requests_total: u64,
    pub layer_requests_total: u64,
    pub district_requests_total: u64,
    pub district_fallbacks_total: u64,
    pub not_modified_responses_total: u64,
}

impl ObservabilityCounters {
    pub fn snapshot(&self) -> ObservabilitySnapshot {
        ObservabilitySnapshot {
            dataset_requests_total: self.dataset_requests_total.load(Ordering::Relaxed),
            overview_requests_total: self.overview_requests_total.load(Ordering::Relaxed),
            layer_requests_total: self.layer_requests_total.load(Ordering::Relaxed),
            district_requests_total: self.district_requests_total.load(Ordering::Relaxed),
            district_fallbacks_total: self.district_fallbacks_total.load(Ordering::Relaxed),
            not_modified_responses_total: self
                .not_modified_responses_total
                .load(Ordering::Relaxed),
        }
    }

    pub fn record_dataset_request(&self) {
        self.dataset_requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_overview_request(&self) {
        self.overview_requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_layer_request(&self) {
        self.layer_requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_district_request(&self, fallback: bool) {
        self.district_requests_total.fetch_add(1, Ordering::Relaxed);
        if fallback {
            self.district_fallbacks_total
                .fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_not_modified(&self) {
        self.not_modified_responses_total
            .fetch_add(1, Ordering::Relaxed);
    }
}
