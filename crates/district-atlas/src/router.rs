use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::catalog::{
    Catalog, DistrictQuery, DistrictSummary, FeatureCollection, GeoLayer, SpendingSummary,
};
use crate::error::AppError;
use crate::newsletter::NewsletterStore;

/// Shared handles passed to every catalog and newsletter handler.
#[derive(Debug, Clone)]
pub struct AtlasState {
    pub catalog: Arc<Catalog>,
    pub newsletter: Arc<NewsletterStore>,
}

impl AtlasState {
    pub fn new(catalog: Catalog, newsletter: NewsletterStore) -> Self {
        Self {
            catalog: Arc::new(catalog),
            newsletter: Arc::new(newsletter),
        }
    }
}

/// Signup payload for `POST /newsletter`.
#[derive(Debug, Deserialize)]
pub struct SubscriptionRequest {
    pub email: String,
}

/// Router builder exposing the district search, lookup, summary, GeoJSON, and newsletter
/// endpoints.
pub fn atlas_router(state: AtlasState) -> Router {
    Router::new()
        .route("/schools", get(search_handler))
        .route("/school/:id", get(school_handler))
        .route("/summary", get(summary_handler))
        .route("/geojson", get(geojson_districts_handler))
        .route("/geojson_districts", get(geojson_districts_handler))
        .route("/geojson_campuses", get(geojson_campuses_handler))
        .route("/newsletter", post(newsletter_handler))
        .with_state(state)
}

pub(crate) async fn search_handler(
    State(state): State<AtlasState>,
    Query(query): Query<DistrictQuery>,
) -> Json<Vec<DistrictSummary>> {
    let rows = state.catalog.search(&query);
    debug!(?query, matches = rows.len(), "district search");
    Json(rows)
}

/// A miss answers 200 with an `error` body; existing clients key off the field, not the status.
pub(crate) async fn school_handler(
    State(state): State<AtlasState>,
    Path(id): Path<String>,
) -> Response {
    match state.catalog.find(&id) {
        Some(record) => (StatusCode::OK, Json(record)).into_response(),
        None => {
            debug!(%id, "school lookup missed");
            (StatusCode::OK, Json(json!({ "error": "School not found" }))).into_response()
        }
    }
}

pub(crate) async fn summary_handler(State(state): State<AtlasState>) -> Json<SpendingSummary> {
    Json(state.catalog.summary())
}

pub(crate) async fn geojson_districts_handler(
    State(state): State<AtlasState>,
) -> Json<FeatureCollection> {
    Json(state.catalog.geojson(GeoLayer::Districts).clone())
}

pub(crate) async fn geojson_campuses_handler(
    State(state): State<AtlasState>,
) -> Json<FeatureCollection> {
    Json(state.catalog.geojson(GeoLayer::Campuses).clone())
}

pub(crate) async fn newsletter_handler(
    State(state): State<AtlasState>,
    Json(request): Json<SubscriptionRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let newsletter = Arc::clone(&state.newsletter);
    tokio::task::spawn_blocking(move || newsletter.subscribe(request.email)).await??;
    Ok(Json(json!({ "message": "Subscribed successfully" })))
}
