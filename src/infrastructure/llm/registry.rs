// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Provider Registry
//
// Maps each recognized provider key to its adapter instance. Built once at
// startup from the immutable gateway configuration; the dispatcher resolves
// adapters through it and needs no provider-specific knowledge beyond the
// common `invoke` contract.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::domain::{ProviderAdapter, ProviderKey};
use crate::infrastructure::config::GatewayConfig;

use super::bedrock::BedrockAdapter;
use super::echo::EchoAdapter;
use super::openai::OpenAiAdapter;
use super::vertex::VertexAdapter;

pub struct ProviderRegistry {
    adapters: HashMap<ProviderKey, Arc<dyn ProviderAdapter>>,
}

impl ProviderRegistry {
    /// Registry with no adapters. Tests insert their own stubs.
    pub fn empty() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Build the full adapter set from gateway configuration.
    ///
    /// Every recognized key gets an adapter even when its credentials are
    /// absent; a missing credential surfaces later as a per-item
    /// configuration failure rather than an unroutable key.
    pub fn from_config(config: &GatewayConfig) -> Self {
        info!("initializing provider registry");

        let mut registry = Self::empty();
        registry.insert(ProviderKey::OpenAi, Arc::new(OpenAiAdapter::new(config)));
        registry.insert(ProviderKey::Anthropic, Arc::new(BedrockAdapter::new(config)));
        registry.insert(ProviderKey::Google, Arc::new(VertexAdapter::new(config)));
        registry.insert(ProviderKey::Azure, Arc::new(EchoAdapter::new()));
        registry
    }

    pub fn insert(&mut self, key: ProviderKey, adapter: Arc<dyn ProviderAdapter>) {
        info!(provider = %key, "registering adapter");
        self.adapters.insert(key, adapter);
    }

    pub fn adapter(&self, key: ProviderKey) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters.get(&key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_covers_every_known_key() {
        let registry = ProviderRegistry::from_config(&GatewayConfig::default());
        for key in ProviderKey::ALL {
            assert!(registry.adapter(key).is_some(), "no adapter for {key}");
        }
    }

    #[test]
    fn test_empty_registry_resolves_nothing() {
        let registry = ProviderRegistry::empty();
        assert!(registry.adapter(ProviderKey::OpenAi).is_none());
    }
}
