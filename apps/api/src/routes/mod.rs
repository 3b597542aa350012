pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::classification::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Classification API
        .route("/api/v1/classify", post(handlers::handle_classify))
        .route(
            "/api/v1/classify/batch",
            post(handlers::handle_classify_batch),
        )
        // Taxonomy API
        .route(
            "/api/v1/taxonomy/stats",
            get(handlers::handle_taxonomy_stats),
        )
        .route(
            "/api/v1/taxonomy/categories",
            get(handlers::handle_list_categories),
        )
        .route("/api/v1/taxonomy/lookup", get(handlers::handle_lookup))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::classification::fixtures::{sample_classifier, sample_taxonomy};
    use crate::config::Config;

    fn test_state(max_batch_size: usize) -> AppState {
        AppState {
            config: Config {
                taxonomy_path: "unused.json".to_string(),
                port: 0,
                rust_log: "debug".to_string(),
                max_batch_size,
                fuzzy_threshold: None,
                rematch_threshold: None,
            },
            classifier: Arc::new(sample_classifier()),
            categories: Arc::new(sample_taxonomy().summaries()),
        }
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let router = build_router(test_state(10));
        let (status, body) = send(router, Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "qualmap-api");
    }

    #[tokio::test]
    async fn test_classify_exact() {
        let router = build_router(test_state(10));
        let (status, body) = send(
            router,
            post_json("/api/v1/classify", json!({"title": "Senior Auto Mechanic"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["match_tier"], "exact");
        assert_eq!(body["mapped_title"], "Automotive Mechanic");
        assert_eq!(body["qualification_codes"], json!(["AUT-SVC-2"]));
        assert_eq!(body["original_title"], "Senior Auto Mechanic");
    }

    #[tokio::test]
    async fn test_classify_blank_title_is_unknown_not_error() {
        let router = build_router(test_state(10));
        let (status, body) =
            send(router, post_json("/api/v1/classify", json!({"title": ""}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "Unknown");
        assert_eq!(body["qualification_codes"], json!([]));
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let router = build_router(test_state(10));
        let (status, body) = send(
            router,
            post_json(
                "/api/v1/classify/batch",
                json!({"titles": ["Mechanic", "Zyxqplorp Nonexistent Role", "Cook"]}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0]["match_tier"], "generic_disambiguation");
        assert_eq!(results[1]["match_tier"], "unknown");
        assert_eq!(results[2]["mapped_title"], "Cook");
    }

    #[tokio::test]
    async fn test_batch_over_limit_is_rejected() {
        let router = build_router(test_state(2));
        let (status, body) = send(
            router,
            post_json(
                "/api/v1/classify/batch",
                json!({"titles": ["Cook", "Welder", "Plumber"]}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_taxonomy_stats() {
        let router = build_router(test_state(10));
        let (status, body) = send(
            router,
            Request::get("/api/v1/taxonomy/stats").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tuning"]["version"], "v1");
        assert_eq!(body["stats"]["categories"], 9);
    }

    #[tokio::test]
    async fn test_list_categories_sorted() {
        let router = build_router(test_state(10));
        let (status, body) = send(
            router,
            Request::get("/api/v1/taxonomy/categories")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["name"], "Agriculture");
        assert_eq!(body[0]["roles"], 3);
    }

    #[tokio::test]
    async fn test_lookup_hit_and_miss() {
        let router = build_router(test_state(10));
        let (status, body) = send(
            router.clone(),
            Request::get("/api/v1/taxonomy/lookup?title=Pipe%20Welder")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["key"], "pipe welder");
        assert_eq!(body["record"]["variant_kind"], "specialized");

        let (status, body) = send(
            router,
            Request::get("/api/v1/taxonomy/lookup?title=Astronaut")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_lookup_includes_role_description() {
        let (status, body) = send(
            build_router(test_state(10)),
            Request::get("/api/v1/taxonomy/lookup?title=Auto%20Mechanic")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["record"]["canonical_title"], "Automotive Mechanic");
        assert_eq!(
            body["record"]["description"],
            "Services and repairs light vehicles"
        );
    }
}
