// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Provider Adapter Implementations - Anti-Corruption Layer
//
// One adapter per upstream provider. Each translates the agnostic
// ProviderRequest into the provider's wire format, performs the outbound
// call, and translates the reply back into a payload or a typed error.

pub mod bedrock;
pub mod echo;
pub mod openai;
pub mod registry;
pub mod vertex;

pub use registry::ProviderRegistry;
