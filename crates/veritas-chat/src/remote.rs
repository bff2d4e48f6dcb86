//! Remote reply generation over HTTP with local fallback.
//!
//! Sends the message and analysis context as a JSON POST to a configured
//! endpoint. Any transport failure, non-success status, or malformed body
//! is logged and answered by the wrapped local generator instead, so callers
//! only ever see a lower-fidelity reply, never an error.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use veritas_core::config::RemoteConfig;
use veritas_core::AnalysisRecord;

use crate::error::ChatError;
use crate::response::{LocalResponseGenerator, ResponseGenerator};
use crate::types::Reply;

// =============================================================================
// Wire types
// =============================================================================

/// Request body sent to the generation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub message: String,
    pub context: GenerationContext,
}

/// Analysis context embedded in a [`GenerationRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationContext {
    pub news_text: String,
    pub credibility_score: u8,
    pub explanations: Vec<String>,
}

impl GenerationRequest {
    pub fn new(message: &str, record: &AnalysisRecord) -> Self {
        Self {
            message: message.to_string(),
            context: GenerationContext {
                news_text: record.text().to_string(),
                credibility_score: record.score(),
                explanations: record.explanations().to_vec(),
            },
        }
    }
}

/// Success body returned by the generation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub response: String,
    pub confidence: f32,
}

impl TryFrom<GenerationResponse> for Reply {
    type Error = ChatError;

    fn try_from(body: GenerationResponse) -> Result<Self, Self::Error> {
        if !(0.0..=1.0).contains(&body.confidence) {
            return Err(ChatError::Protocol(format!(
                "confidence {} outside [0, 1]",
                body.confidence
            )));
        }
        Ok(Reply {
            text: body.response,
            confidence: body.confidence,
        })
    }
}

// =============================================================================
// RemoteResponseGenerator
// =============================================================================

/// Generator that asks a remote service first and falls back locally.
pub struct RemoteResponseGenerator {
    client: reqwest::Client,
    endpoint: String,
    fallback: LocalResponseGenerator,
}

impl RemoteResponseGenerator {
    /// Build a generator for `config.endpoint` with a per-request timeout.
    pub fn new(config: &RemoteConfig, fallback: LocalResponseGenerator) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            fallback,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Call the remote service without falling back.
    pub async fn request(
        &self,
        message: &str,
        context: &AnalysisRecord,
    ) -> Result<Reply, ChatError> {
        let body = GenerationRequest::new(message, context);
        let resp = self.client.post(&self.endpoint).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ChatError::Api {
                status: status.as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }

        let bytes = resp.bytes().await?;
        let parsed: GenerationResponse = serde_json::from_slice(&bytes)?;
        Reply::try_from(parsed)
    }
}

#[async_trait]
impl ResponseGenerator for RemoteResponseGenerator {
    async fn generate(
        &self,
        message: &str,
        context: &AnalysisRecord,
    ) -> Result<Reply, ChatError> {
        match self.request(message, context).await {
            Ok(reply) => {
                tracing::debug!(endpoint = %self.endpoint, "Remote reply received");
                Ok(reply)
            }
            Err(e) => {
                tracing::warn!(
                    endpoint = %self.endpoint,
                    error = %e,
                    "Remote generation failed, using local reply"
                );
                self.fallback.generate(message, context).await
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use veritas_core::{seed_records, StdRandom};

    fn local() -> LocalResponseGenerator {
        LocalResponseGenerator::new(Arc::new(StdRandom::seeded(1)), 0..=0)
    }

    fn remote_for(endpoint: String) -> RemoteResponseGenerator {
        let config = RemoteConfig {
            enabled: true,
            endpoint,
            timeout_ms: 2_000,
        };
        RemoteResponseGenerator::new(&config, local()).unwrap()
    }

    /// Serve `router` on an ephemeral port and return the chat endpoint URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/api/llm/chat", addr)
    }

    fn government() -> AnalysisRecord {
        seed_records().remove(0)
    }

    // ---- Wire format ----

    #[test]
    fn test_request_wire_format() {
        let req = GenerationRequest::new("why?", &government());
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["message"], "why?");
        assert_eq!(json["context"]["credibilityScore"], 23);
        assert!(json["context"]["newsText"]
            .as_str()
            .unwrap()
            .starts_with("Breaking: Government"));
        assert_eq!(json["context"]["explanations"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_response_confidence_out_of_range_is_protocol_error() {
        let body = GenerationResponse {
            response: "hi".to_string(),
            confidence: 1.5,
        };
        let err = Reply::try_from(body).unwrap_err();
        assert!(matches!(err, ChatError::Protocol(_)));
    }

    // ---- Success ----

    #[tokio::test]
    async fn test_remote_success() {
        let router = Router::new().route(
            "/api/llm/chat",
            post(|Json(req): Json<GenerationRequest>| async move {
                Json(GenerationResponse {
                    response: format!(
                        "remote says {} scored {}",
                        req.message, req.context.credibility_score
                    ),
                    confidence: 0.66,
                })
            }),
        );
        let remote = remote_for(serve(router).await);

        let reply = remote.generate("hello", &government()).await.unwrap();
        assert_eq!(reply.text, "remote says hello scored 23");
        assert_eq!(reply.confidence, 0.66);
    }

    // ---- Failures fall back ----

    #[tokio::test]
    async fn test_server_error_falls_back() {
        let router = Router::new().route(
            "/api/llm/chat",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let remote = remote_for(serve(router).await);

        let err = remote.request("score?", &government()).await.unwrap_err();
        assert!(matches!(err, ChatError::Api { status: 500, .. }));

        let reply = remote.generate("score?", &government()).await.unwrap();
        assert_eq!(reply.confidence, 0.90);
        assert!(reply.text.contains("23/100"));
    }

    #[tokio::test]
    async fn test_malformed_body_falls_back() {
        let router = Router::new().route(
            "/api/llm/chat",
            post(|| async { Json(serde_json::json!({ "answer": "wrong shape" })) }),
        );
        let remote = remote_for(serve(router).await);

        let err = remote.request("fake?", &government()).await.unwrap_err();
        assert!(matches!(err, ChatError::Protocol(_)));

        let reply = remote.generate("fake?", &government()).await.unwrap();
        assert_eq!(reply.confidence, 0.88);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_falls_back() {
        // Bind then drop to get a port with nothing listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let remote = remote_for(format!("http://{}/api/llm/chat", addr));

        let err = remote.request("why?", &government()).await.unwrap_err();
        assert!(matches!(err, ChatError::Transport(_)));

        let reply = remote.generate("why?", &government()).await.unwrap();
        assert_eq!(reply.confidence, 0.85);
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let router = Router::new().route(
            "/api/llm/chat",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(GenerationResponse {
                    response: "too late".to_string(),
                    confidence: 0.5,
                })
            }),
        );
        let config = RemoteConfig {
            enabled: true,
            endpoint: serve(router).await,
            timeout_ms: 100,
        };
        let remote = RemoteResponseGenerator::new(&config, local()).unwrap();

        let reply = remote.generate("social media", &government()).await.unwrap();
        assert_ne!(reply.text, "too late");
        assert_eq!(reply.confidence, 0.82);
    }
}
