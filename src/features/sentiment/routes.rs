use axum::{routing::post, Router};
use std::sync::Arc;

use crate::features::sentiment::{handlers, services::SentimentService};

pub fn routes(service: Arc<SentimentService>) -> Router {
    Router::new()
        .route("/api/sentiment/analyze", post(handlers::analyze_sentiment))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::ScriptedChat;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_report_envelope() {
        let llm = Arc::new(ScriptedChat::replying(r#"{"sentiment": "mixed", "score": 0.1}"#));
        let server = TestServer::new(routes(Arc::new(SentimentService::new(llm)))).unwrap();

        let response = server
            .post("/api/sentiment/analyze")
            .json(&json!({ "queries": ["Starbucks"], "platforms": ["grok"] }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["items"][0]["status"], "ok");
        assert_eq!(body["data"]["items"][0]["analysis"]["sentiment"], "mixed");
        assert_eq!(body["data"]["summary"]["succeeded"], 1);
    }

    #[tokio::test]
    async fn test_unknown_platform_rejected() {
        let llm = Arc::new(ScriptedChat::replying("{}"));
        let server = TestServer::new(routes(Arc::new(SentimentService::new(llm)))).unwrap();

        let response = server
            .post("/api/sentiment/analyze")
            .json(&json!({ "queries": ["Starbucks"], "platforms": ["myspace"] }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
