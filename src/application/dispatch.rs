// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Dispatcher - Concurrent Fan-Out with Failure Isolation
//
// For each provider key in a validated envelope, runs that key's
// sub-requests as independent tokio tasks, bounds every adapter call with a
// fixed deadline, and joins on all of them. Results come back through the
// task return values only (never a shared buffer) and are index-aligned
// with the input regardless of completion order. An item failure of any
// kind (bad shape, upstream error, timeout, panic) is contained at that
// item's index; provider keys are likewise dispatched concurrently and
// isolated from each other.

use std::sync::Arc;
use std::time::Duration;

use futures::future;
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::{Envelope, ProviderError, ProviderKey, ProviderRequest, ProviderResult};
use crate::infrastructure::llm::ProviderRegistry;

pub struct Dispatcher {
    registry: Arc<ProviderRegistry>,
    call_timeout: Duration,
}

impl Dispatcher {
    /// Deadline applied to each individual adapter call.
    pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(60);

    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self {
            registry,
            call_timeout: Self::DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Override the per-call deadline. Used by tests; production keeps the
    /// default.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Fan out every provider key in the envelope and join on all of them.
    ///
    /// Keys run concurrently; one key's total failure never suppresses
    /// another key's results.
    pub async fn dispatch(&self, envelope: Envelope) -> Vec<(ProviderKey, Vec<ProviderResult>)> {
        let per_key = envelope.data.into_iter().map(|(key, items)| async move {
            let results = self.dispatch_provider(key, items).await;
            (key, results)
        });

        future::join_all(per_key).await
    }

    /// Run one provider key's sub-requests concurrently and join in input
    /// order.
    pub async fn dispatch_provider(
        &self,
        key: ProviderKey,
        items: Vec<Value>,
    ) -> Vec<ProviderResult> {
        info!(provider = %key, items = items.len(), "dispatching sub-requests");

        let handles: Vec<_> = items
            .into_iter()
            .map(|raw| {
                let adapter = self.registry.adapter(key);
                let timeout = self.call_timeout;

                tokio::spawn(async move {
                    let request = match ProviderRequest::from_raw(&raw) {
                        Ok(request) => request,
                        Err(err) => return ProviderResult::failure(err),
                    };

                    let Some(adapter) = adapter else {
                        return ProviderResult::failure(ProviderError::Configuration(
                            "no adapter registered for provider".into(),
                        ));
                    };

                    match tokio::time::timeout(timeout, adapter.invoke(request)).await {
                        Ok(Ok(payload)) => ProviderResult::success(payload),
                        Ok(Err(err)) => ProviderResult::failure(err),
                        Err(_) => {
                            ProviderResult::failure(ProviderError::Timeout(timeout.as_secs()))
                        }
                    }
                })
            })
            .collect();

        // Await handles in submission order: output index i always matches
        // input index i, whatever order the tasks finished in.
        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(err) => {
                    warn!(provider = %key, "sub-request task failed: {err}");
                    ProviderResult::failure(ProviderError::Upstream {
                        message: format!("sub-request task failed: {err}"),
                        body: None,
                    })
                }
            };
            results.push(result);
        }

        results
    }
}
