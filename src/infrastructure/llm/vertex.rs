// Generative-AI-Platform Adapter
//
// Anti-Corruption Layer for Vertex generateContent. Resolves the
// project/region-scoped endpoint, authenticates with a Bearer token from the
// service-account token provider, and generates content from a
// summarization-prefixed variant of the latest message. The first
// candidate's first content part becomes the payload.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::domain::{ProviderAdapter, ProviderError, ProviderRequest};
use crate::infrastructure::config::GatewayConfig;
use crate::infrastructure::gcp_token::{
    ServiceAccountKey, ServiceAccountTokenProvider, TokenProvider,
};

const TEMPERATURE: f32 = 0.9;
const SUMMARY_PREFIX: &str = "Provide a summary for the following article: ";

pub struct VertexAdapter {
    client: reqwest::Client,
    project_id: Option<String>,
    region: Option<String>,
    token_provider: Option<Arc<dyn TokenProvider>>,
    base_url_override: Option<String>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: String,
}

impl VertexAdapter {
    pub fn new(config: &GatewayConfig) -> Self {
        let client = reqwest::Client::new();
        let token_provider: Option<Arc<dyn TokenProvider>> = config
            .gcp_credentials_json
            .as_deref()
            .and_then(|raw| ServiceAccountKey::from_json(raw).ok())
            .map(|key| {
                Arc::new(ServiceAccountTokenProvider::new(key, client.clone()))
                    as Arc<dyn TokenProvider>
            });

        Self {
            client,
            project_id: config.gcp_project_id.clone(),
            region: config.gcp_region.clone(),
            token_provider,
            base_url_override: None,
        }
    }

    /// Replace the token source. Test seam and escape hatch for non-standard
    /// credential flows.
    pub fn with_token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.token_provider = Some(provider);
        self
    }

    /// Point the adapter at a different publisher endpoint (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    fn base_url(&self) -> Result<String, ProviderError> {
        if let Some(base) = &self.base_url_override {
            return Ok(base.trim_end_matches('/').to_string());
        }

        let project = self.project_id.as_ref().ok_or_else(|| {
            ProviderError::Configuration("PROJECT_ID environment variable not set".into())
        })?;
        let region = self.region.as_ref().ok_or_else(|| {
            ProviderError::Configuration("REGION environment variable not set".into())
        })?;

        Ok(format!(
            "https://{region}-aiplatform.googleapis.com/v1/projects/{project}/locations/{region}/publishers/google"
        ))
    }
}

#[async_trait]
impl ProviderAdapter for VertexAdapter {
    async fn invoke(&self, request: ProviderRequest) -> Result<Value, ProviderError> {
        let token_provider = self.token_provider.as_ref().ok_or_else(|| {
            ProviderError::Configuration(
                "GOOGLE_APPLICATION_CREDENTIALS_JSON environment variable not set or invalid"
                    .into(),
            )
        })?;

        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url()?,
            request.model
        );
        let token = token_provider.token().await?;

        let prompt = format!("{SUMMARY_PREFIX}{}", request.latest_content());
        let body = json!({
            "contents": [{"role": "user", "parts": [{"text": prompt}]}],
            "generationConfig": {"temperature": TEMPERATURE},
        });

        debug!(model = %request.model, "generating content");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {token}"))
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        let raw_body = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ProviderError::Upstream {
                message: format!("generateContent returned HTTP {status}"),
                body: Some(raw_body),
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&raw_body).map_err(|e| ProviderError::Upstream {
                message: format!("failed to parse generateContent response: {e}"),
                body: Some(raw_body.clone()),
            })?;

        let text = parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or(ProviderError::EmptyResponse)?;

        Ok(json!({
            "google": {
                "content": text,
                "role": "assistant",
            },
            "model": request.model,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct StaticToken(&'static str);

    #[async_trait]
    impl TokenProvider for StaticToken {
        async fn token(&self) -> Result<String, ProviderError> {
            Ok(self.0.to_string())
        }
    }

    fn adapter_for(server: &mockito::ServerGuard) -> VertexAdapter {
        VertexAdapter::new(&GatewayConfig::default())
            .with_base_url(server.url())
            .with_token_provider(Arc::new(StaticToken("tok-123")))
    }

    fn request() -> ProviderRequest {
        ProviderRequest::from_raw(&json!({
            "model": "gemini-pro",
            "messages": [
                {"role": "user", "content": "older"},
                {"role": "user", "content": "the article text"},
            ],
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_latest_message_is_summarization_prefixed() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-pro:generateContent")
            .match_header("authorization", "Bearer tok-123")
            .match_body(mockito::Matcher::PartialJson(json!({
                "contents": [{
                    "role": "user",
                    "parts": [{
                        "text": "Provide a summary for the following article: the article text",
                    }],
                }],
            })))
            .with_status(200)
            .with_body(
                json!({
                    "candidates": [
                        {"content": {"role": "model", "parts": [{"text": "a summary"}]}},
                    ],
                })
                .to_string(),
            )
            .create_async()
            .await;

        let payload = adapter_for(&server).invoke(request()).await.unwrap();
        mock.assert_async().await;

        assert_eq!(payload["google"]["content"], json!("a summary"));
        assert_eq!(payload["google"]["role"], json!("assistant"));
        assert_eq!(payload["model"], json!("gemini-pro"));
    }

    #[tokio::test]
    async fn test_empty_candidates_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-pro:generateContent")
            .with_status(200)
            .with_body(json!({"candidates": []}).to_string())
            .create_async()
            .await;

        let err = adapter_for(&server).invoke(request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_empty_parts_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-pro:generateContent")
            .with_status(200)
            .with_body(json!({"candidates": [{"content": {"parts": []}}]}).to_string())
            .create_async()
            .await;

        let err = adapter_for(&server).invoke(request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_upstream_failure_keeps_raw_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-pro:generateContent")
            .with_status(429)
            .with_body("quota exceeded")
            .create_async()
            .await;

        let err = adapter_for(&server).invoke(request()).await.unwrap_err();
        match err {
            ProviderError::Upstream { body, .. } => assert_eq!(body.unwrap(), "quota exceeded"),
            other => panic!("expected Upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_credentials_is_a_configuration_error() {
        let adapter = VertexAdapter::new(&GatewayConfig::default());
        let err = adapter.invoke(request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
    }
}
