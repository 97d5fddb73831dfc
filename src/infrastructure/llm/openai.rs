// Chat-Completion Adapter
//
// Anti-Corruption Layer for the OpenAI chat-completions API. Builds a
// model + ordered-message request, calls the remote endpoint with a Bearer
// credential from process configuration, and returns the first choice's
// message as the payload.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::domain::{Message, ProviderAdapter, ProviderError, ProviderRequest};
use crate::infrastructure::config::GatewayConfig;

pub struct OpenAiAdapter {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    error: Option<UpstreamErrorBody>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Message,
}

#[derive(Deserialize)]
struct UpstreamErrorBody {
    message: String,
}

impl OpenAiAdapter {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.openai_endpoint.clone(),
            api_key: config.openai_api_key.clone(),
        }
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    async fn invoke(&self, request: ProviderRequest) -> Result<Value, ProviderError> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            ProviderError::Configuration("OPENAI_API_KEY environment variable not set".into())
        })?;

        let body = ChatCompletionRequest {
            model: request.model.clone(),
            messages: request.messages,
        };

        let url = format!(
            "{}/v1/chat/completions",
            self.endpoint.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        let raw_body = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let parsed: ChatCompletionResponse = serde_json::from_str(&raw_body).map_err(|e| {
            ProviderError::Upstream {
                message: format!("failed to parse chat-completion response: {e}"),
                body: Some(raw_body.clone()),
            }
        })?;

        // The API reports errors both through the status code and through an
        // `error` object in the body; surface whichever message is present.
        if let Some(error) = parsed.error {
            warn!(status = %status, "chat-completion API reported an error");
            return Err(ProviderError::Upstream {
                message: error.message,
                body: Some(raw_body),
            });
        }

        if !status.is_success() {
            return Err(ProviderError::Upstream {
                message: format!("chat-completion endpoint returned HTTP {status}"),
                body: Some(raw_body),
            });
        }

        let choice = parsed.choices.first().ok_or(ProviderError::EmptyResponse)?;

        Ok(json!({
            "openai": choice.message,
            "model": request.model,
        }))
    }
}
