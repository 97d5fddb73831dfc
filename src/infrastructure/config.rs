// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Gateway Configuration
//
// Every credential and endpoint the adapters need, resolved from the
// environment exactly once at startup. The resulting value is immutable for
// the process lifetime and shared as `Arc<GatewayConfig>`; request handling
// never mutates it. A credential that is absent at startup surfaces later as
// a per-item configuration failure, not a process crash.

use std::env;
use std::str::FromStr;

/// Which request/response shape the managed-runtime adapter speaks.
///
/// The runtime accepts two materially different payloads for the same
/// models: the legacy free-text `prompt` shape and the structured `messages`
/// shape. Exactly one is active per process, chosen by configuration; the
/// adapter never sniffs the payload to guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BedrockPayloadShape {
    /// `{"prompt": "...", "max_tokens_to_sample": N}` with turn-prefixed
    /// free text; the response carries a `completion` field.
    #[default]
    Prompt,
    /// `{"messages": [...], "anthropic_version": "...", "max_tokens": N}`;
    /// the response carries `content[0].text`.
    Messages,
}

impl FromStr for BedrockPayloadShape {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prompt" => Ok(BedrockPayloadShape::Prompt),
            "messages" => Ok(BedrockPayloadShape::Messages),
            other => anyhow::bail!(
                "invalid BEDROCK_PAYLOAD_SHAPE '{other}' (expected 'prompt' or 'messages')"
            ),
        }
    }
}

/// Process-wide configuration, read-only during request handling.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    // Chat-completion API
    pub openai_api_key: Option<String>,
    pub openai_endpoint: String,

    // Managed model runtime
    pub aws_region: Option<String>,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub bedrock_payload_shape: BedrockPayloadShape,
    pub anthropic_version: Option<String>,

    // Generative-AI platform
    pub gcp_project_id: Option<String>,
    pub gcp_region: Option<String>,
    /// Service-account JSON, supplied inline. Parsed directly by the token
    /// provider instead of being staged to a temporary file.
    pub gcp_credentials_json: Option<String>,

    // Login / auth
    pub basic_auth_user: Option<String>,
    pub basic_auth_pass: Option<String>,
    pub jwt_secret: Option<String>,

    // HTTP surface
    pub allowed_origins: Vec<String>,
    pub port: u16,
}

impl GatewayConfig {
    /// Resolve configuration from the environment.
    ///
    /// Only structurally invalid values (an unknown payload shape, a
    /// non-numeric port) fail startup; missing credentials are tolerated and
    /// reported per item at invocation time.
    pub fn from_env() -> anyhow::Result<Self> {
        let bedrock_payload_shape = match env::var("BEDROCK_PAYLOAD_SHAPE") {
            Ok(raw) => raw.parse()?,
            Err(_) => BedrockPayloadShape::default(),
        };

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid PORT '{raw}'"))?,
            Err(_) => 8080,
        };

        let allowed_origins = env::var("AUTH_URL")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            openai_api_key: non_empty(env::var("OPENAI_API_KEY").ok()),
            openai_endpoint: env::var("OPENAI_ENDPOINT")
                .unwrap_or_else(|_| "https://api.openai.com".to_string()),
            aws_region: non_empty(env::var("AWS_REGION").ok()),
            aws_access_key_id: non_empty(env::var("AWS_ACCESS_KEY_ID").ok()),
            aws_secret_access_key: non_empty(env::var("AWS_SECRET_ACCESS_KEY").ok()),
            bedrock_payload_shape,
            anthropic_version: non_empty(env::var("ANTHROPIC_VERSION").ok()),
            gcp_project_id: non_empty(env::var("PROJECT_ID").ok()),
            gcp_region: non_empty(env::var("REGION").ok()),
            gcp_credentials_json: non_empty(
                env::var("GOOGLE_APPLICATION_CREDENTIALS_JSON").ok(),
            ),
            basic_auth_user: non_empty(env::var("BASIC_AUTH_USER").ok()),
            basic_auth_pass: non_empty(env::var("BASIC_AUTH_PASS").ok()),
            jwt_secret: non_empty(env::var("JWT_SECRET").ok()),
            allowed_origins,
            port,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_endpoint: "https://api.openai.com".to_string(),
            aws_region: None,
            aws_access_key_id: None,
            aws_secret_access_key: None,
            bedrock_payload_shape: BedrockPayloadShape::default(),
            anthropic_version: None,
            gcp_project_id: None,
            gcp_region: None,
            gcp_credentials_json: None,
            basic_auth_user: None,
            basic_auth_pass: None,
            jwt_secret: None,
            allowed_origins: vec![],
            port: 8080,
        }
    }
}
