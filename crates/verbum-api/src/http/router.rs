//! Axum router configuration with middleware.
//!
//! Middleware: CORS, tracing.
//!
//! When `server.web_dir` names an existing directory, the voice front end is
//! served from it. API routes take priority; unknown paths fall through to
//! its `index.html`.

use axum::Router;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/process", post(handlers::process::process_text))
        .route("/sessions", post(handlers::session::create_session))
        .route("/sessions/{id}", delete(handlers::session::delete_session))
        .route(
            "/sessions/{id}/messages",
            get(handlers::session::get_messages),
        )
        .route(
            "/sessions/{id}/reset",
            post(handlers::session::reset_session),
        );

    let web_dir = state.config.server.web_dir.clone();

    let mut router = Router::new()
        .nest("/api/v1", api_routes)
        .route("/api/process_audio", post(handlers::process::process_text))
        .route("/api/health", get(handlers::health::health_check))
        .route("/health", get(handlers::health::health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if let Some(web_dir) = web_dir.filter(|dir| std::path::Path::new(dir).exists()) {
        let index_path = format!("{web_dir}/index.html");
        let serve_dir = ServeDir::new(&web_dir).fallback(ServeFile::new(index_path));
        router = router.fallback_service(serve_dir);
        tracing::info!(path = %web_dir, "Static front end serving enabled");
    }

    router
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use verbum_core::llm::backend::DEGRADED_RESPONSE;
    use verbum_types::config::AssistantConfig;

    use crate::http::handlers::health::HealthResponse;
    use crate::http::handlers::process::ProcessResponse;

    fn offline_state(strict: bool) -> AppState {
        let mut config = AssistantConfig::default();
        config.backend.offline = true;
        config.server.strict_input = strict;
        AppState::from_config(config, None)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_degraded_when_offline() {
        let app = build_router(offline_state(true));
        let response = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let health: HealthResponse = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(health.status, "degraded");
        assert_eq!(health.service, "verbum");
        assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn process_answers_scripture_with_canned_text_offline() {
        let app = build_router(offline_state(true));
        let response = app
            .oneshot(post_json(
                "/api/process_audio",
                json!({"text": "Who built the ark?"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: ProcessResponse = serde_json::from_value(body_json(response).await).unwrap();
        assert!(body.success);
        assert_eq!(body.intent, "scripture");
        assert_eq!(body.response, DEGRADED_RESPONSE);
    }

    #[tokio::test]
    async fn process_routes_arithmetic_locally() {
        let app = build_router(offline_state(true));
        let response = app
            .oneshot(post_json(
                "/api/v1/process",
                json!({"text": "what is 2 plus 3 times 4"}),
            ))
            .await
            .unwrap();

        let body: ProcessResponse = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(body.intent, "arithmetic");
        assert!(body.response.ends_with("= 14"));
    }

    #[tokio::test]
    async fn strict_mode_rejects_non_string_text() {
        let app = build_router(offline_state(true));
        let response = app
            .oneshot(post_json("/api/process_audio", json!({"text": 123})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn strict_mode_rejects_blank_text() {
        let app = build_router(offline_state(true));
        let response = app
            .oneshot(post_json("/api/process_audio", json!({"text": "   "})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn lenient_mode_coerces_odd_payloads() {
        let app = build_router(offline_state(false));
        for text in [json!(123), Value::Null, json!([])] {
            let response = app
                .clone()
                .oneshot(post_json("/api/process_audio", json!({"text": text})))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let body: ProcessResponse =
                serde_json::from_value(body_json(response).await).unwrap();
            assert!(!body.response.is_empty());
        }
    }

    #[tokio::test]
    async fn sessionless_calls_share_the_default_session() {
        let state = offline_state(true);
        let app = build_router(state.clone());

        let mut ids = Vec::new();
        for text in ["Who was Moses?", "Who was his brother?", "Who led them after him?"] {
            let response = app
                .clone()
                .oneshot(post_json("/api/process_audio", json!({"text": text})))
                .await
                .unwrap();
            let body: ProcessResponse = serde_json::from_value(body_json(response).await).unwrap();
            ids.push(body.session_id);
        }

        assert_eq!(state.sessions.len(), 1);
        assert!(ids.iter().all(|id| *id == state.sessions.default_id()));
        let session = state.sessions.get(ids[0]).unwrap();
        assert_eq!(session.lock().await.history().len(), 7);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let app = build_router(offline_state(true));
        let response = app
            .oneshot(post_json(
                "/api/process_audio",
                json!({"text": "hello", "session_id": uuid::Uuid::now_v7()}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["errors"][0]["code"], "SESSION_NOT_FOUND");
    }

    #[tokio::test]
    async fn session_lifecycle() {
        let state = offline_state(true);
        let app = build_router(state.clone());

        let created = app
            .clone()
            .oneshot(post_json("/api/v1/sessions", json!({})))
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::OK);
        let created = body_json(created).await;
        assert_eq!(created["data"]["degraded"], true);
        let id = created["data"]["session_id"].as_str().unwrap().to_string();

        let asked = app
            .clone()
            .oneshot(post_json(
                "/api/process_audio",
                json!({"text": "Who was Moses?", "session_id": id}),
            ))
            .await
            .unwrap();
        let asked: ProcessResponse = serde_json::from_value(body_json(asked).await).unwrap();
        assert_eq!(asked.session_id.to_string(), id);

        let messages = app
            .clone()
            .oneshot(
                Request::get(format!("/api/v1/sessions/{id}/messages"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let messages = body_json(messages).await;
        let roles: Vec<&str> = messages["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["role"].as_str().unwrap())
            .collect();
        assert_eq!(roles, ["system", "user", "assistant"]);

        let reset = app
            .clone()
            .oneshot(post_json(&format!("/api/v1/sessions/{id}/reset"), json!({})))
            .await
            .unwrap();
        assert_eq!(reset.status(), StatusCode::OK);
        let uuid = id.parse().unwrap();
        let session = state.sessions.get(uuid).unwrap();
        assert_eq!(session.lock().await.history().len(), 1);

        let deleted = app
            .clone()
            .oneshot(
                Request::delete(format!("/api/v1/sessions/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(deleted.status(), StatusCode::OK);
        assert!(state.sessions.is_empty());

        let gone = app
            .oneshot(
                Request::delete(format!("/api/v1/sessions/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_session_id_is_a_validation_error() {
        let app = build_router(offline_state(true));
        let response = app
            .oneshot(
                Request::get("/api/v1/sessions/not-a-uuid/messages")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
