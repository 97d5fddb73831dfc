// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Provider Adapter Domain Interface (Anti-Corruption Layer)
//
// Defines the common contract every provider adapter implements, the typed
// per-item request built from a raw sub-request object, and the per-item
// outcome type the dispatcher joins on. Implementations live under
// infrastructure/llm/.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::message::Message;

/// Domain interface for provider adapters.
///
/// An adapter translates the agnostic [`ProviderRequest`] into one provider's
/// wire format, performs the outbound call, and translates the reply back
/// into a JSON payload or a typed error. Adapters hold only immutable
/// configuration; they must not mutate shared state or retain references
/// across requests.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    async fn invoke(&self, request: ProviderRequest) -> Result<Value, ProviderError>;
}

/// Typed view of one raw sub-request item.
///
/// Built exactly once per item, before any adapter runs. A failed build is a
/// per-item failure and never aborts sibling items.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub model: String,
    pub messages: Vec<Message>,
    /// The original untyped item, kept for adapters that echo it verbatim.
    pub raw: Value,
}

impl ProviderRequest {
    /// Validate and decode a raw sub-request item.
    ///
    /// Required shape: a string `model` and a non-empty `messages` array of
    /// objects each carrying a string `content`. A missing `role` defaults to
    /// `user`; adapters that do not support per-turn roles ignore it anyway.
    pub fn from_raw(raw: &Value) -> Result<Self, ProviderError> {
        let item = raw
            .as_object()
            .ok_or_else(|| ProviderError::ItemShape("request item must be an object".into()))?;

        let model = item
            .get("model")
            .and_then(Value::as_str)
            .ok_or_else(|| ProviderError::ItemShape("missing or non-string 'model'".into()))?
            .to_string();

        let raw_messages = item
            .get("messages")
            .and_then(Value::as_array)
            .ok_or_else(|| ProviderError::ItemShape("missing or non-list 'messages'".into()))?;

        if raw_messages.is_empty() {
            return Err(ProviderError::ItemShape("'messages' must not be empty".into()));
        }

        let mut messages = Vec::with_capacity(raw_messages.len());
        for entry in raw_messages {
            let obj = entry
                .as_object()
                .ok_or_else(|| ProviderError::ItemShape("message must be an object".into()))?;

            let content = obj
                .get("content")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    ProviderError::ItemShape("message missing string 'content'".into())
                })?;

            let role = obj.get("role").and_then(Value::as_str).unwrap_or("user");

            messages.push(Message::new(role, content));
        }

        Ok(ProviderRequest {
            model,
            messages,
            raw: raw.clone(),
        })
    }

    /// The content of the most recent message.
    ///
    /// `from_raw` guarantees at least one message exists.
    pub fn latest_content(&self) -> &str {
        self.messages
            .last()
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

/// Errors that can occur handling one sub-request item.
///
/// Always contained at the item: surfaced as a `ProviderResult { ok: false }`
/// and never escalated to the batch or the request.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("invalid request item: {0}")]
    ItemShape(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("{message}")]
    Upstream {
        message: String,
        /// Raw upstream response body, kept for diagnostics.
        body: Option<String>,
    },

    #[error("empty response from provider")]
    EmptyResponse,

    #[error("provider call exceeded {0}s deadline")]
    Timeout(u64),

    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Outcome of one sub-request: a success payload or a contained error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

/// Human-readable failure description, with the raw upstream body when one
/// was available.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_body: Option<String>,
}

impl ProviderResult {
    pub fn success(payload: Value) -> Self {
        Self {
            ok: true,
            payload: Some(payload),
            error: None,
        }
    }

    pub fn failure(error: ProviderError) -> Self {
        let upstream_body = match &error {
            ProviderError::Upstream { body, .. } => body.clone(),
            _ => None,
        };
        Self {
            ok: false,
            payload: None,
            error: Some(ErrorDetail {
                message: error.to_string(),
                upstream_body,
            }),
        }
    }
}
