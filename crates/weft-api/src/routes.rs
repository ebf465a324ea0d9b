//! Route table, grounded on `orchestrator::api::routes::create_router`
//! trimmed to the spec's four endpoints (§6).

use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/chat", post(handlers::chat::chat))
        .route("/stream/:id", get(handlers::stream::stream))
        .route("/execute_workflow", post(handlers::execute_workflow::execute_workflow))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;
    use weft_llm::{ChatTransport, ChunkStream, Message};
    use weft_node::NodeRegistry;
    use weft_tooling::Settings;

    struct UnusedTransport;
    #[async_trait::async_trait]
    impl ChatTransport for UnusedTransport {
        async fn call(&self, _messages: Vec<Message>, _request_id: &str, _temperature: f64) -> weft_llm::Result<String> {
            unimplemented!("not exercised by the health check test")
        }
        async fn stream(&self, _messages: Vec<Message>, _request_id: &str) -> weft_llm::Result<ChunkStream> {
            unimplemented!("not exercised by the health check test")
        }
    }

    fn test_registry() -> Arc<NodeRegistry> {
        let mut registry = NodeRegistry::new();
        weft_nodes::register_builtin_nodes(&mut registry).unwrap();
        Arc::new(registry)
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let state = AppState::new(test_registry(), Arc::new(UnusedTransport), Settings::default());
        let app = create_router(state);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    /// One transport standing in for both the synthesizer's single `call`
    /// and the explanation stage's `stream`: the first always returns a
    /// fenced one-node graph, the second always yields one fixed chunk.
    struct SynthesizingTransport;

    #[async_trait::async_trait]
    impl ChatTransport for SynthesizingTransport {
        async fn call(&self, _messages: Vec<Message>, _request_id: &str, _temperature: f64) -> weft_llm::Result<String> {
            Ok("```json\n{\"nodes\":[{\"id\":\"a\",\"type\":\"double\",\"params\":{\"x\":3}}],\"edges\":[]}\n```".to_string())
        }
        async fn stream(&self, _messages: Vec<Message>, _request_id: &str) -> weft_llm::Result<ChunkStream> {
            Ok(Box::pin(futures::stream::iter(vec![Ok("all good".to_string())])))
        }
    }

    #[tokio::test]
    async fn chat_workflow_mode_synthesizes_executes_and_streams_to_completion() {
        use axum::body::to_bytes;

        let state = AppState::new(test_registry(), Arc::new(SynthesizingTransport), Settings::default());
        let app = create_router(state);

        let chat_response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"text":"double the number 3","model":"workflow"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(chat_response.status(), StatusCode::OK);
        let body = to_bytes(chat_response.into_body(), usize::MAX).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let chat_id = parsed["chat_id"].as_str().unwrap().to_string();

        let stream_response = app
            .oneshot(Request::builder().uri(format!("/stream/{chat_id}")).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(stream_response.status(), StatusCode::OK);

        let body = to_bytes(stream_response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&body);
        let tags: Vec<&str> = text.lines().filter(|l| l.starts_with("event:")).map(|l| l.trim_start_matches("event:").trim()).collect();

        assert!(tags.contains(&"workflow"));
        assert!(tags.contains(&"node_result"));
        assert!(tags.contains(&"complete"));
    }
}
