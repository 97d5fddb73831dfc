// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Multi-provider AI-completion gateway.
//!
//! Accepts one inbound JSON request describing calls against several distinct
//! completion providers, fans the sub-requests out concurrently through
//! provider-specific adapters, and folds the outcomes back into a single
//! aggregated response. Item-level failures never abort sibling items or
//! other providers.
//!
//! # Architecture
//!
//! - **Domain:** provider-agnostic request/result types and the adapter trait
//! - **Application:** the dispatcher (fan-out/join) and response aggregator
//! - **Infrastructure:** configuration and the concrete provider adapters
//! - **Presentation:** axum routing, auth middleware, login

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;
