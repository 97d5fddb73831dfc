// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Presentation layer: axum routing, bearer-JWT auth, and login.

pub mod api;
pub mod auth;
pub mod login;

pub use api::{app, AppState};
