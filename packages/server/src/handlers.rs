//! HTTP handler functions for the wildfire map API.

use actix_web::{HttpResponse, web};
use wildfire_map_fire_models::SeverityLevel;
use wildfire_map_geography::MapView;
use wildfire_map_index::{build_index, classify_incident, province_counts, summarize};
use wildfire_map_server_models::{
    ApiError, ApiHealth, ApiRegion, ApiSeverityLevel, ApiSummary, DisplayQueryParams,
};
use wildfire_map_source::fetch_or_empty;

use crate::AppState;

/// Container name for views rendered per request.
const API_MAP_CONTAINER: &str = "api";

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/severity-levels`
///
/// Returns the legend, highest stage first.
pub async fn severity_levels() -> HttpResponse {
    let levels: Vec<ApiSeverityLevel> = SeverityLevel::all()
        .iter()
        .copied()
        .map(ApiSeverityLevel::from)
        .collect();

    HttpResponse::Ok().json(levels)
}

/// `GET /api/incidents`
///
/// Every record in the current batch, classified, in the order the source
/// returns them (oldest first for feeds and snapshots, which sort by date
/// during normalization). Records whose address does not resolve to a
/// district are included with an empty region key.
pub async fn incidents(
    state: web::Data<AppState>,
    params: web::Query<DisplayQueryParams>,
) -> HttpResponse {
    let mode = params.mode.unwrap_or(state.display_mode);
    let records = fetch_or_empty(state.source.as_ref()).await;

    let incidents: Vec<ApiRegion> = records
        .iter()
        .map(|record| ApiRegion::new(&classify_incident(record), mode))
        .collect();

    HttpResponse::Ok().json(incidents)
}

/// `GET /api/regions`
///
/// All indexed regions, ordered by region key.
pub async fn regions(
    state: web::Data<AppState>,
    params: web::Query<DisplayQueryParams>,
) -> HttpResponse {
    let mode = params.mode.unwrap_or(state.display_mode);
    let index = build_index(&fetch_or_empty(state.source.as_ref()).await);

    let regions: Vec<ApiRegion> = index
        .records()
        .map(|record| ApiRegion::new(record, mode))
        .collect();

    HttpResponse::Ok().json(regions)
}

/// `GET /api/regions/{key}`
pub async fn region(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<DisplayQueryParams>,
) -> HttpResponse {
    let key = path.into_inner();
    let mode = params.mode.unwrap_or(state.display_mode);
    let index = build_index(&fetch_or_empty(state.source.as_ref()).await);

    match index.get(&key) {
        Some(record) => HttpResponse::Ok().json(ApiRegion::new(record, mode)),
        None => HttpResponse::NotFound().json(ApiError::new(format!(
            "No incident recorded for region {key}"
        ))),
    }
}

/// `GET /api/summary`
///
/// Aggregates over every record in the batch, including records that are
/// not indexed.
pub async fn summary(state: web::Data<AppState>) -> HttpResponse {
    let records = fetch_or_empty(state.source.as_ref()).await;

    HttpResponse::Ok().json(ApiSummary {
        stats: summarize(&records),
        provinces: province_counts(&records),
    })
}

/// `GET /api/map`
///
/// Returns the boundary `FeatureCollection` with fill colors and incident
/// properties attached.
pub async fn map(
    state: web::Data<AppState>,
    params: web::Query<DisplayQueryParams>,
) -> HttpResponse {
    let Some(boundaries) = state.boundaries.as_ref() else {
        return HttpResponse::NotFound().json(ApiError::new("No boundaries configured"));
    };

    let mode = params.mode.unwrap_or(state.display_mode);
    let index = build_index(&fetch_or_empty(state.source.as_ref()).await);

    let view = MapView::create(API_MAP_CONTAINER, boundaries.clone());
    let rendered = view.render(&index, mode);
    view.dispose();

    log::debug!(
        "Rendered {} of {} features ({} regions unmatched)",
        rendered.matched_features,
        rendered.features.features.len(),
        rendered.unmatched_regions.len(),
    );

    HttpResponse::Ok().json(rendered.features)
}
