// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Request Envelope Parser
//
// Decodes the untyped inbound body into a validated mapping from provider
// key to an ordered list of raw sub-request items. Validation is fail-fast:
// one unrecognized provider key rejects the whole request before any adapter
// is invoked. Item order within a key is preserved exactly; key order is
// insignificant.

use serde_json::Value;
use std::fmt;

/// The closed set of upstream providers this gateway can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKey {
    /// Chat-completion HTTP API.
    OpenAi,
    /// Generative-AI platform (Vertex).
    Google,
    /// Placeholder provider, served by the echo stub.
    Azure,
    /// Managed model runtime (Bedrock).
    Anthropic,
}

impl ProviderKey {
    /// All recognized keys, in wire-name order.
    pub const ALL: [ProviderKey; 4] = [
        ProviderKey::OpenAi,
        ProviderKey::Google,
        ProviderKey::Azure,
        ProviderKey::Anthropic,
    ];

    /// Resolve a wire name to a provider key.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "openai" => Some(ProviderKey::OpenAi),
            "google" => Some(ProviderKey::Google),
            "azure" => Some(ProviderKey::Azure),
            "anthropic" => Some(ProviderKey::Anthropic),
            _ => None,
        }
    }

    /// The wire name used as a JSON field in requests and responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKey::OpenAi => "openai",
            ProviderKey::Google => "google",
            ProviderKey::Azure => "azure",
            ProviderKey::Anthropic => "anthropic",
        }
    }
}

impl fmt::Display for ProviderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while decoding the inbound envelope.
///
/// Every variant rejects the entire request; no adapter runs afterwards.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    #[error("malformed request body: {0}")]
    Malformed(String),

    #[error("Invalid API key")]
    UnknownProvider(String),
}

/// Validated inbound request: provider key -> ordered raw sub-request items.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub data: Vec<(ProviderKey, Vec<Value>)>,
}

impl Envelope {
    /// Decode a raw request body.
    pub fn parse(body: &str) -> Result<Self, EnvelopeError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| EnvelopeError::Malformed(format!("invalid JSON: {e}")))?;
        Self::from_value(&value)
    }

    /// Decode an already-parsed JSON body.
    pub fn from_value(value: &Value) -> Result<Self, EnvelopeError> {
        let data = value
            .get("data")
            .ok_or_else(|| EnvelopeError::Malformed("missing 'data' field".into()))?;

        let map = data
            .as_object()
            .ok_or_else(|| EnvelopeError::Malformed("'data' must be an object".into()))?;

        let mut entries = Vec::with_capacity(map.len());
        for (name, items) in map {
            let key = ProviderKey::parse(name)
                .ok_or_else(|| EnvelopeError::UnknownProvider(name.clone()))?;

            let items = items.as_array().ok_or_else(|| {
                EnvelopeError::Malformed(format!("'data.{name}' must be an array"))
            })?;

            entries.push((key, items.clone()));
        }

        Ok(Envelope { data: entries })
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
