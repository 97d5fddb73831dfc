// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain layer: provider-agnostic types shared by every adapter.

pub mod envelope;
pub mod message;
pub mod provider;

pub use envelope::{Envelope, EnvelopeError, ProviderKey};
pub use message::Message;
pub use provider::{ErrorDetail, ProviderAdapter, ProviderError, ProviderRequest, ProviderResult};
