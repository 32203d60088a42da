//! HTTP invoke surface.
//!
//! `POST /call` runs one handler invocation on the request body and always
//! answers 200 with the formatted JSON outcome; the handler never lets an
//! error escape, so neither does this route. `GET /health` is a liveness
//! probe.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    routing::{get, post},
};
use color_eyre::eyre::Result;
use tokio::net::TcpListener;
use tracing::info;

use docrelay_shared::{HandlerConfig, HandlerResponse};

/// Build the invoke-surface router.
pub(crate) fn build_router(config: Arc<HandlerConfig>) -> Router {
    Router::new()
        .route("/call", post(invoke))
        .route("/health", get(health))
        .with_state(config)
}

/// Start the Axum server and serve invocations until shutdown.
pub(crate) async fn serve(addr: SocketAddr, config: Arc<HandlerConfig>) -> Result<()> {
    let app = build_router(config);

    info!("invoke surface listening on {addr}");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// One invocation per request; an empty request body counts as a missing
/// payload.
async fn invoke(State(config): State<Arc<HandlerConfig>>, body: Bytes) -> Json<HandlerResponse> {
    let payload = if body.is_empty() {
        None
    } else {
        Some(body.as_ref())
    };

    Json(docrelay_handler::handle(&config, payload).await)
}

/// Liveness probe.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use docrelay_shared::AppConfig;
    use tower::util::ServiceExt; // for `oneshot`

    fn test_router() -> Router {
        // The skip and decode-failure paths never dial out, so unresolvable
        // endpoints are fine here.
        let config = HandlerConfig::resolve_with(&AppConfig::default(), |_| None);
        build_router(Arc::new(config))
    }

    async fn body_json(body: Body) -> serde_json::Value {
        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_answers_ok() {
        let response = test_router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response.into_body()).await;
        assert_eq!(json["status"], "ok");
        assert!(json["version"].is_string());
    }

    #[tokio::test]
    async fn call_answers_200_json_for_skip() {
        let request = Request::post("/call")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"data": {"resourceName": "ns/bucket/notes.txt"}}"#,
            ))
            .unwrap();

        let response = test_router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "application/json"
        );
        let json = body_json(response.into_body()).await;
        assert_eq!(json, serde_json::json!({"status": "skipped"}));
    }

    #[tokio::test]
    async fn call_answers_200_failed_for_empty_body() {
        let request = Request::post("/call").body(Body::empty()).unwrap();
        let response = test_router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response.into_body()).await;
        assert_eq!(json["status"], "failed");
        assert!(
            json["error"]
                .as_str()
                .unwrap()
                .contains("no event data")
        );
    }

    #[tokio::test]
    async fn call_answers_200_failed_for_malformed_body() {
        let request = Request::post("/call")
            .body(Body::from("{not json"))
            .unwrap();
        let response = test_router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response.into_body()).await;
        assert_eq!(json["status"], "failed");
    }
}
