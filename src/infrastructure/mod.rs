// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Infrastructure layer: configuration and concrete provider adapters.

pub mod config;
pub mod gcp_token;
pub mod llm;

pub use config::{BedrockPayloadShape, GatewayConfig};
