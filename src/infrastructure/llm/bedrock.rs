// Managed-Model-Runtime Adapter
//
// Anti-Corruption Layer for the Bedrock runtime. Invokes the requested model
// with region + access-key credentials from process configuration. The
// runtime accepts two materially different payload shapes for the same
// models; exactly one is active per process, selected by
// `BedrockPayloadShape` at startup and never inferred from the payload.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_bedrockruntime::config::Credentials;
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::domain::{ProviderAdapter, ProviderError, ProviderRequest};
use crate::infrastructure::config::{BedrockPayloadShape, GatewayConfig};

const MAX_TOKENS: u32 = 2048;
const DEFAULT_ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

pub struct BedrockAdapter {
    region: Option<String>,
    access_key_id: Option<String>,
    secret_access_key: Option<String>,
    shape: BedrockPayloadShape,
    anthropic_version: String,
}

#[derive(Deserialize)]
struct PromptShapeResponse {
    completion: String,
}

#[derive(Deserialize)]
struct MessagesShapeResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

impl BedrockAdapter {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            region: config.aws_region.clone(),
            access_key_id: config.aws_access_key_id.clone(),
            secret_access_key: config.aws_secret_access_key.clone(),
            shape: config.bedrock_payload_shape,
            anthropic_version: config
                .anthropic_version
                .clone()
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_VERSION.to_string()),
        }
    }

    async fn client(&self) -> Result<Client, ProviderError> {
        let region = self.region.clone().ok_or_else(|| {
            ProviderError::Configuration("AWS_REGION environment variable not set".into())
        })?;
        let access_key_id = self.access_key_id.clone().ok_or_else(|| {
            ProviderError::Configuration("AWS_ACCESS_KEY_ID environment variable not set".into())
        })?;
        let secret_access_key = self.secret_access_key.clone().ok_or_else(|| {
            ProviderError::Configuration(
                "AWS_SECRET_ACCESS_KEY environment variable not set".into(),
            )
        })?;

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region))
            .credentials_provider(Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                "gateway-env",
            ))
            .load()
            .await;

        Ok(Client::new(&sdk_config))
    }
}

#[async_trait]
impl ProviderAdapter for BedrockAdapter {
    async fn invoke(&self, request: ProviderRequest) -> Result<Value, ProviderError> {
        let client = self.client().await?;

        let payload = build_payload(self.shape, &request, &self.anthropic_version);
        let body = serde_json::to_vec(&payload)
            .map_err(|e| ProviderError::ItemShape(format!("unserializable payload: {e}")))?;

        debug!(model = %request.model, shape = ?self.shape, "invoking model runtime");

        let output = client
            .invoke_model()
            .model_id(&request.model)
            .content_type("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|err| {
                let service_err = err.into_service_error();
                ProviderError::Upstream {
                    message: service_err.to_string(),
                    body: None,
                }
            })?;

        let content = parse_response(self.shape, output.body().as_ref())?;

        Ok(json!({
            "anthropic": {
                "content": content,
                "role": "assistant",
            },
            "model": request.model,
        }))
    }
}

/// Build the runtime payload for the configured shape.
fn build_payload(
    shape: BedrockPayloadShape,
    request: &ProviderRequest,
    anthropic_version: &str,
) -> Value {
    match shape {
        BedrockPayloadShape::Prompt => {
            // The legacy shape has no per-turn roles: every message becomes a
            // Human turn, and the trailing Assistant prefix invites the
            // completion.
            let mut prompt = String::new();
            for message in &request.messages {
                prompt.push_str("\nHuman: ");
                prompt.push_str(&message.content);
            }
            prompt.push_str("\nAssistant:");

            json!({
                "prompt": prompt,
                "max_tokens_to_sample": MAX_TOKENS,
            })
        }
        BedrockPayloadShape::Messages => json!({
            "anthropic_version": anthropic_version,
            "max_tokens": MAX_TOKENS,
            "messages": request.messages,
        }),
    }
}

/// Extract the completion text from the runtime's response body.
fn parse_response(shape: BedrockPayloadShape, body: &[u8]) -> Result<String, ProviderError> {
    match shape {
        BedrockPayloadShape::Prompt => {
            let parsed: PromptShapeResponse =
                serde_json::from_slice(body).map_err(|e| ProviderError::Upstream {
                    message: format!("failed to parse runtime response: {e}"),
                    body: Some(String::from_utf8_lossy(body).into_owned()),
                })?;
            Ok(parsed.completion)
        }
        BedrockPayloadShape::Messages => {
            let parsed: MessagesShapeResponse =
                serde_json::from_slice(body).map_err(|e| ProviderError::Upstream {
                    message: format!("failed to parse runtime response: {e}"),
                    body: Some(String::from_utf8_lossy(body).into_owned()),
                })?;
            let first = parsed.content.first().ok_or(ProviderError::EmptyResponse)?;
            Ok(first.text.clone())
        }
    }
}
