// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Echo Stub Adapter
//
// Placeholder for providers whose real integration is not yet implemented
// (currently the `azure` key). Echoes the raw sub-request back verbatim as
// the payload. Its existence documents that an adapter may legitimately be
// partial without breaking the dispatcher contract: the dispatcher needs
// nothing beyond `invoke`.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::domain::{ProviderAdapter, ProviderError, ProviderRequest};

pub struct EchoAdapter;

impl EchoAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EchoAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderAdapter for EchoAdapter {
    async fn invoke(&self, request: ProviderRequest) -> Result<Value, ProviderError> {
        debug!(model = %request.model, "echoing request back verbatim");
        Ok(request.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_echo_returns_raw_item_verbatim() {
        let raw = json!({"model": "m", "messages": [{"role": "user", "content": "hi"}]});
        let request = ProviderRequest::from_raw(&raw).unwrap();

        let payload = EchoAdapter::new().invoke(request).await.unwrap();
        assert_eq!(payload, raw);
    }
}
