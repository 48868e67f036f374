use std::fmt::Write as _;
use std::sync::Arc;

use axum::Json;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use chrono::Utc;
use serde::Deserialize;
use verde_shared::detail::resolve_district;
use verde_shared::{DetailView, LayerId};

use crate::config::API_CACHE_CONTROL;
use crate::state::{AppState, ObservabilitySnapshot};

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let observability = state.observability.snapshot();
    let uptime_secs = (Utc::now() - state.started_at).num_seconds().max(0);
    Json(serde_json::json!({
        "status": "ok",
        "uptime_secs": uptime_secs,
        "dataset_revision": format!("{:08x}", state.payloads.revision),
        "districts": state.dataset.districts.len(),
        "fire_alerts": state.dataset.fire_alerts.len(),
        "heat_islands": state.dataset.heat_islands.len(),
        "traffic_zones": state.dataset.traffic_zones.len(),
        "observability": {
            "dataset_requests_total": observability.dataset_requests_total,
            "overview_requests_total": observability.overview_requests_total,
            "layer_requests_total": observability.layer_requests_total,
            "district_requests_total": observability.district_requests_total,
            "district_fallbacks_total": observability.district_fallbacks_total,
            "not_modified_responses_total": observability.not_modified_responses_total,
        }
    }))
}

pub async fn get_dataset(State(state): State<AppState>, headers: HeaderMap) -> Response {
    state.observability.record_dataset_request();
    cached_json(
        &state,
        &headers,
        "dataset",
        Arc::clone(&state.payloads.dataset_json),
    )
}

pub async fn get_overview(State(state): State<AppState>, headers: HeaderMap) -> Response {
    state.observability.record_overview_request();
    cached_json(
        &state,
        &headers,
        "overview",
        Arc::clone(&state.payloads.overview_json),
    )
}

pub async fn get_layer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    state.observability.record_layer_request();
    let Ok(layer) = id.parse::<LayerId>() else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let Some(json) = state.payloads.layer(layer) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    cached_json(&state, &headers, &format!("layer-{layer}"), json)
}

#[derive(Debug, Deserialize)]
pub struct DistrictQuery {
    district: Option<String>,
}

pub async fn get_district(
    State(state): State<AppState>,
    Query(query): Query<DistrictQuery>,
) -> Response {
    let requested = query.district.as_deref();
    let Some(resolution) = resolve_district(&state.dataset, requested) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    state
        .observability
        .record_district_request(resolution.fallback);
    if resolution.fallback {
        tracing::debug!(
            requested = requested.unwrap_or_default(),
            resolved = %resolution.district.name,
            "district not found, using default record"
        );
    }

    match serde_json::to_vec(&DetailView::build(resolution)) {
        Ok(json) => json_bytes_response(Bytes::from(json), API_CACHE_CONTROL, None),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize district view");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let uptime_secs = (Utc::now() - state.started_at).num_seconds().max(0);
    let body = render_prometheus_metrics(
        state.dataset.districts.len(),
        state.dataset.low_vci_districts().count(),
        state.dataset.fire_alerts.len(),
        uptime_secs,
        state.observability.snapshot(),
    );

    (
        [
            (header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-store"),
        ],
        body,
    )
}

fn render_prometheus_metrics(
    district_count: usize,
    low_vci_count: usize,
    fire_alert_count: usize,
    uptime_secs: i64,
    observability: ObservabilitySnapshot,
) -> String {
    let mut body = String::new();
    let gauges: [(&str, &str, i64); 4] = [
        (
            "verde_districts",
            "Number of districts in the dataset.",
            district_count as i64,
        ),
        (
            "verde_low_vci_districts",
            "Districts whose vegetation cover index is below 30.",
            low_vci_count as i64,
        ),
        (
            "verde_fire_alerts",
            "Active fire hotspots in the dataset.",
            fire_alert_count as i64,
        ),
        (
            "verde_uptime_seconds",
            "Seconds since the server started.",
            uptime_secs,
        ),
    ];
    for (name, help, value) in gauges {
        let _ = writeln!(body, "# HELP {name} {help}");
        let _ = writeln!(body, "# TYPE {name} gauge");
        let _ = writeln!(body, "{name} {value}");
    }

    let counters: [(&str, &str, u64); 6] = [
        (
            "verde_dataset_requests_total",
            "Total /api/dataset requests.",
            observability.dataset_requests_total,
        ),
        (
            "verde_overview_requests_total",
            "Total /api/overview requests.",
            observability.overview_requests_total,
        ),
        (
            "verde_layer_requests_total",
            "Total /api/layers requests, including unknown ids.",
            observability.layer_requests_total,
        ),
        (
            "verde_district_requests_total",
            "Total /api/district requests that resolved a district.",
            observability.district_requests_total,
        ),
        (
            "verde_district_fallbacks_total",
            "District requests answered with the default record.",
            observability.district_fallbacks_total,
        ),
        (
            "verde_not_modified_responses_total",
            "Conditional requests answered with 304.",
            observability.not_modified_responses_total,
        ),
    ];
    for (name, help, value) in counters {
        let _ = writeln!(body, "# HELP {name} {help}");
        let _ = writeln!(body, "# TYPE {name} counter");
        let _ = writeln!(body, "{name} {value}");
    }

    body
}

fn cached_json(state: &AppState, headers: &HeaderMap, resource: &str, json: Arc<Bytes>) -> Response {
    let etag = state.payloads.etag(resource);
    if if_none_match_matches(headers, &etag) {
        state.observability.record_not_modified();
        return not_modified_response(API_CACHE_CONTROL, Some(etag.as_str()));
    }
    json_bytes_response((*json).clone(), API_CACHE_CONTROL, Some(etag.as_str()))
}

fn json_bytes_response(body: Bytes, cache_control: &'static str, etag: Option<&str>) -> Response {
    let mut response = Response::new(Body::from(body));
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(cache_control),
    );
    if let Some(etag) = etag
        && let Ok(etag_header) = HeaderValue::from_str(etag)
    {
        headers.insert(header::ETAG, etag_header);
    }
    response
}

fn not_modified_response(cache_control: &'static str, etag: Option<&str>) -> Response {
    let mut response = StatusCode::NOT_MODIFIED.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(cache_control),
    );
    if let Some(etag) = etag
        && let Ok(etag_header) = HeaderValue::from_str(etag)
    {
        headers.insert(header::ETAG, etag_header);
    }
    response
}

fn normalize_etag(candidate: &str) -> &str {
    candidate.strip_prefix("W/").unwrap_or(candidate).trim()
}

fn if_none_match_matches(headers: &HeaderMap, etag: &str) -> bool {
    let Some(value) = headers.get(header::IF_NONE_MATCH) else {
        return false;
    };
    let Ok(raw) = value.to_str() else {
        return false;
    };

    raw.split(',').any(|candidate| {
        let candidate = candidate.trim();
        candidate == "*" || normalize_etag(candidate) == normalize_etag(etag)
    })
}
