mod types;

pub use types::{GenerateRequest, GenerationConfig, Content, Part};

use anyhow::Context;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::error::{Result, SageError};
use types::GenerateResponse;

const ERROR_BODY_PREVIEW: usize = 300;

/// 생성형 언어 API 호출 경계. 요청 한 번에 응답 텍스트 하나.
#[async_trait]
pub trait GenerativeTransport: Send + Sync {
    async fn generate(&self, api_key: &str, request: &GenerateRequest) -> Result<String>;
}

pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.model_preferences.timeout_secs))
            .build()
            .context("HTTP 클라이언트 생성 실패")?;

        Ok(Self {
            client,
            endpoint: config.model_preferences.endpoint.clone(),
        })
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GenerativeTransport for GeminiClient {
    async fn generate(&self, api_key: &str, request: &GenerateRequest) -> Result<String> {
        debug!(
            endpoint = %self.endpoint,
            temperature = request.generation_config.temperature,
            max_output_tokens = request.generation_config.max_output_tokens,
            "Gemini 요청 전송"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", api_key)])
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let parsed: GenerateResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(SageError::Transport(format!(
                    "Gemini API 요청 실패: HTTP {} {}",
                    status,
                    truncate(&body, ERROR_BODY_PREVIEW)
                )));
            }
            Err(e) => {
                return Err(SageError::Transport(format!("Gemini 응답 디코딩 실패: {e}")));
            }
        };

        if let Some(message) = parsed.error.as_ref().and_then(|e| e.message.as_deref()) {
            return Err(SageError::Transport(format!("Gemini API Error: {message}")));
        }

        if !status.is_success() {
            return Err(SageError::Transport(format!("Gemini API 요청 실패: HTTP {status}")));
        }

        parsed
            .first_text()
            .ok_or_else(|| SageError::Transport("응답에서 텍스트를 찾을 수 없음".to_string()))
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> GenerateRequest {
        GenerateRequest::new(
            "review this".to_string(),
            GenerationConfig {
                temperature: 0.3,
                top_k: 40,
                top_p: 0.95,
                max_output_tokens: 2048,
            },
        )
    }

    fn text_response(text: &str) -> serde_json::Value {
        json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        })
    }

    fn client_for(server: &MockServer) -> GeminiClient {
        GeminiClient::with_endpoint(format!(
            "{}/v1beta/models/gemini-1.5-flash:generateContent",
            server.uri()
        ))
    }

    #[tokio::test]
    async fn sends_key_as_query_and_returns_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .and(query_param("key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{ "parts": [{ "text": "review this" }] }],
                "generationConfig": { "topK": 40, "maxOutputTokens": 2048 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_response("looks good")))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let text = client.generate("test-key", &request()).await.unwrap();
        assert_eq!(text, "looks good");
    }

    #[tokio::test]
    async fn api_error_message_is_propagated() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": 400, "message": "API key not valid" }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.generate("bad-key", &request()).await.unwrap_err();
        match err {
            SageError::Transport(message) => {
                assert_eq!(message, "Gemini API Error: API key not valid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_failure_reports_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.generate("k", &request()).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("503"), "{message}");
        assert!(message.contains("upstream unavailable"), "{message}");
    }

    #[tokio::test]
    async fn missing_candidate_text_is_transport_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.generate("k", &request()).await.unwrap_err();
        assert!(matches!(err, SageError::Transport(_)));
    }

    #[test]
    fn request_serializes_to_wire_format() {
        let value = serde_json::to_value(request()).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "review this");
        assert_eq!(value["generationConfig"]["topK"], 40);
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 2048);
        assert!(value["generationConfig"]["temperature"].is_number());
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }
}
