// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// HTTP Surface
//
// Routes:
//   POST /api/login    unauthenticated, issues an 8-hour JWT
//   POST /api/summary  protected by the bearer-JWT middleware
//   POST /api          historical unauthenticated variant of /api/summary
//
// The summary handler owns the envelope-level error mapping: malformed body
// and unknown provider keys reject the whole request with 400 before any
// adapter runs. Item-level failures are embedded in the per-item results of
// a 200 response, never promoted to a 5xx.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{middleware, Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::application::{aggregate, Dispatcher};
use crate::domain::{Envelope, EnvelopeError};
use crate::infrastructure::config::GatewayConfig;

use super::auth;
use super::login;

pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub dispatcher: Dispatcher,
}

/// Build the gateway router.
pub fn app(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/api/summary", post(handle_summary))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer,
        ));

    Router::new()
        .route("/api/login", post(login::handle_login))
        .route("/api", post(handle_summary))
        .merge(protected)
        .layer(cors_layer(&state.config))
        .with_state(state)
}

fn cors_layer(config: &GatewayConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            axum::http::header::ORIGIN,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
            axum::http::header::AUTHORIZATION,
        ])
        .allow_credentials(true)
}

/// Parse the envelope, fan out, and aggregate.
async fn handle_summary(State(state): State<Arc<AppState>>, body: String) -> impl IntoResponse {
    let envelope = match Envelope::parse(&body) {
        Ok(envelope) => envelope,
        Err(err) => {
            if let EnvelopeError::UnknownProvider(key) = &err {
                warn!(key = %key, "rejecting request with unrecognized provider key");
            }
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": err.to_string()})),
            );
        }
    };

    info!(providers = envelope.data.len(), "handling summary request");

    let outcomes = state.dispatcher.dispatch(envelope).await;
    (StatusCode::OK, Json(aggregate(outcomes)))
}
