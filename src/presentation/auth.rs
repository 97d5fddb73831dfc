// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Bearer-JWT Middleware
//
// Guards the protected summary route. Expects `Authorization: Bearer <jwt>`
// where the token was issued by the login handler and signed with the
// process-wide secret. Rejections are 401 with an `error` body; a missing
// secret is a 500 so a deployment fault is never mistaken for a bad token.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jsonwebtoken::{DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::api::AppState;

/// Claims carried by login-issued tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub exp: i64,
}

pub async fn require_bearer(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(secret) = state.config.jwt_secret.as_deref() else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "JWT_SECRET is not configured"})),
        )
            .into_response();
    };

    let Some(header_value) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    else {
        return unauthorized("Authorization header is missing");
    };

    let Some(token) = header_value.strip_prefix("Bearer ") else {
        return unauthorized("Invalid authorization header format");
    };

    let validation = Validation::default();
    if let Err(err) = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    ) {
        warn!("rejecting invalid access token: {err}");
        return unauthorized("Invalid access token");
    }

    next.run(request).await
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"error": message}))).into_response()
}
