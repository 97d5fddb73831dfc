// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Application layer: fan-out dispatch and response aggregation.

pub mod aggregate;
pub mod dispatch;

pub use aggregate::aggregate;
pub use dispatch::Dispatcher;
