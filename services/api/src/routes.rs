use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use district_atlas::router::{atlas_router, AtlasState};
use serde_json::json;
use std::sync::atomic::Ordering;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub(crate) fn with_service_routes(atlas: AtlasState) -> Router {
    atlas_router(atlas)
        .route("/", get(welcome))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

/// Full application router with operational state, CORS, and request tracing attached.
pub(crate) fn build_app(atlas: AtlasState, state: AppState) -> Router {
    with_service_routes(atlas)
        .layer(Extension(state))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

/// Any origin, method, and header, with credentials. Origins are mirrored because browsers
/// reject a wildcard origin on credentialed requests.
pub(crate) fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub(crate) async fn welcome() -> Json<serde_json::Value> {
    Json(json!({ "message": "Welcome to the District Atlas school finance API" }))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(
    Extension(state): Extension<AppState>,
) -> axum::response::Response {
    match state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "metrics recorder not installed" })),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use district_atlas::catalog::{Catalog, District};
    use district_atlas::newsletter::NewsletterStore;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app(dir: &tempfile::TempDir, state: AppState) -> Router {
        let catalog = Catalog::new(vec![District::new("1", "District 1")]);
        let newsletter =
            NewsletterStore::open(dir.path().join("newsletter.json")).expect("store opens");
        build_app(AtlasState::new(catalog, newsletter), state)
    }

    async fn read_json_body(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn health_and_welcome_respond() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = app(&dir, AppState::default());

        let response = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json_body(response).await, json!({ "status": "healthy" }));

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert!(payload["message"]
            .as_str()
            .unwrap_or_default()
            .starts_with("Welcome"));
    }

    #[tokio::test]
    async fn readiness_follows_flag() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = AppState::default();
        let app = app(&dir, state.clone());

        let response = app
            .clone()
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        state.readiness.store(true, Ordering::Release);
        let response = app
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json_body(response).await, json!({ "status": "ready" }));
    }

    #[tokio::test]
    async fn metrics_without_recorder_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let response = app(&dir, AppState::default())
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn cors_mirrors_origin_and_allows_credentials() {
        let dir = tempfile::tempdir().expect("tempdir");
        let response = app(&dir, AppState::default())
            .oneshot(
                Request::get("/schools")
                    .header(header::ORIGIN, "https://maps.example.org")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://maps.example.org"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
    }

    #[tokio::test]
    async fn cors_preflight_allows_newsletter_post() {
        let dir = tempfile::tempdir().expect("tempdir");
        let response = app(&dir, AppState::default())
            .oneshot(
                Request::options("/newsletter")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
            "POST"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap(),
            "content-type"
        );
    }
}
