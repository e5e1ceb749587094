//! Router configuration and server setup.

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ApiConfig;
use crate::handlers;
use crate::state::AppState;

fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let origin = if config.allows_any_origin() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %o, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Creates the API router with all routes configured.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let timeout = TimeoutLayer::new(state.config.request_timeout);

    Router::new()
        // Health
        .route("/api/health", get(handlers::health))
        // Grids
        .route("/api/datatables", get(handlers::list_grids))
        .route(
            "/api/datatables/:grid",
            get(handlers::get_page).post(handlers::add_record),
        )
        .route(
            "/api/datatables/:grid/:id",
            get(handlers::get_record)
                .put(handlers::update_record)
                .delete(handlers::delete_record),
        )
        // Event workflows
        .route("/api/events", post(handlers::receive_event))
        .route("/api/events/reports", get(handlers::list_reports))
        // Field catalog
        .route("/api/catalog/:entity", get(handlers::get_catalog))
        // Apply middleware
        .layer(timeout)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the API server.
pub async fn serve(config: ApiConfig, state: AppState) -> Result<(), std::io::Error> {
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API server listening on {}", addr);
    axum::serve(listener, create_router(state)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::state::test_support::make_test_state;

    fn server() -> TestServer {
        TestServer::new(create_router(make_test_state())).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = server().get("/api/health").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
        assert!(!body["version"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_grid_page_with_legacy_params() {
        let response = server()
            .get("/api/datatables/candidates?iDisplayStart=0&iDisplayLength=2&iSortCol_0=0&sSortDir_0=desc&sSearch=&sEcho=4")
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["sEcho"], "4");
        assert_eq!(body["iTotalRecords"], 3);
        assert_eq!(body["iTotalDisplayRecords"], 3);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"][0]["name"], "John Smithers");
    }

    #[tokio::test]
    async fn test_grid_page_aliases_and_search() {
        let response = server()
            .get("/api/datatables/candidates?iSortColumnIndex=1&sSortDirection=asc&sSearch=SMITH")
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["iTotalDisplayRecords"], 2);
        assert_eq!(body["data"][0]["email"], "ada@example.com");
        assert!(body.get("sEcho").is_none());
    }

    #[tokio::test]
    async fn test_grid_invalid_sort_column() {
        let response = server().get("/api/datatables/candidates?iSortCol_0=12").await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert!(body["error"].as_str().unwrap().contains("sort column 12"));
    }

    #[tokio::test]
    async fn test_unknown_grid() {
        let response = server().get("/api/datatables/invoices").await;
        response.assert_status(StatusCode::NOT_FOUND);

        let body: Value = response.json();
        assert!(body["error"].as_str().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn test_record_crud() {
        let server = server();

        let response = server
            .post("/api/datatables/candidates")
            .json(&json!({"name": "Katherine Johnson", "email": "kj@example.com"}))
            .await;
        response.assert_status(StatusCode::CREATED);
        let created: Value = response.json();
        let id = created["id"].as_i64().unwrap();

        let response = server.get(&format!("/api/datatables/candidates/{id}")).await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["name"], "Katherine Johnson");

        let response = server
            .put(&format!("/api/datatables/candidates/{id}"))
            .json(&json!({"name": "Katherine Johnson", "email": "kj@example.com", "status": "Placed"}))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "Placed");

        let response = server.delete(&format!("/api/datatables/candidates/{id}")).await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["message"], "record deleted");

        let response = server.get(&format!("/api/datatables/candidates/{id}")).await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_ignores_body_id() {
        let server = server();

        let response = server
            .post("/api/datatables/candidates")
            .json(&json!({"id": 1, "name": "Mallory", "email": "mallory@example.com"}))
            .await;
        response.assert_status(StatusCode::CREATED);
        assert_ne!(response.json::<Value>()["id"], 1);

        let response = server.get("/api/datatables/candidates/1").await;
        assert_eq!(response.json::<Value>()["name"], "Ada Smith");

        let response = server.get("/api/datatables/candidates").await;
        assert_eq!(response.json::<Value>()["iTotalRecords"], 4);
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let response = server()
            .put("/api/datatables/candidates/999")
            .json(&json!({"name": "Nobody", "email": "nobody@example.com"}))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_validation_error_details() {
        let response = server()
            .post("/api/datatables/candidates")
            .json(&json!({"name": "", "email": "invalid"}))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = response.json();
        assert_eq!(body["details"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_subscription_webhook() {
        let server = server();
        let response = server
            .post("/api/events")
            .json(&json!({
                "eventId": "evt-1",
                "entityName": "Placement",
                "entityId": 7,
                "entityEventType": "UPDATED",
                "updatedProperties": ["status"]
            }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["eventId"], "evt-1");
        assert_eq!(body["eventType"], "updated");
        assert_eq!(body["tasks"][0]["name"], "load-entity");
        assert_eq!(body["tasks"][0]["status"], "completed");

        let response = server.get("/api/events/reports?limit=5").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["total"], 1);
    }

    #[tokio::test]
    async fn test_subscription_webhook_unknown_code() {
        let response = server()
            .post("/api/events")
            .json(&json!({
                "entityName": "Placement",
                "entityId": 7,
                "entityEventType": "MERGED"
            }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["eventType"], "unknown");
        assert_eq!(body["tasks"][0]["status"], "skipped");
        assert_eq!(body["tasks"][1]["status"], "completed");
    }

    #[tokio::test]
    async fn test_subscription_webhook_abort() {
        let response = server()
            .post("/api/events")
            .json(&json!({
                "entityName": "Placement",
                "entityId": 404,
                "entityEventType": "INSERTED"
            }))
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = response.json();
        assert_eq!(body["report"]["abortedBy"], "load-entity");
    }

    #[tokio::test]
    async fn test_catalog_endpoint() {
        let response = server().get("/api/catalog/PlacementCommission").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["entity"], "PlacementCommission");
        assert!(body["relatedFields"]["placement"].is_array());

        server()
            .get("/api/catalog/Invoice")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_router_as_service() {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;

        let response = create_router(make_test_state())
            .oneshot(
                Request::builder()
                    .uri("/api/unknown")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_headers() {
        let response = server()
            .get("/api/health")
            .add_header(
                axum::http::header::ORIGIN,
                HeaderValue::from_static("http://localhost:3000"),
            )
            .await;
        assert!(response.headers().contains_key("access-control-allow-origin"));
    }
}
