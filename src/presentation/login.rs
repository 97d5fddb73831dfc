// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Login Handler
//
// Checks the submitted username/password against the configured pair and
// issues an HS256 JWT with an 8-hour expiry. The token is what the
// bearer-JWT middleware on the summary route validates.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::api::AppState;
use super::auth::Claims;

const TOKEN_LIFETIME_SECS: i64 = 60 * 60 * 8;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub async fn handle_login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    let config = &state.config;

    let credentials_match = matches!(
        (&config.basic_auth_user, &config.basic_auth_pass),
        (Some(user), Some(pass)) if *user == request.username && *pass == request.password
    );

    if !credentials_match {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid username or password"})),
        );
    }

    let Some(secret) = config.jwt_secret.as_deref() else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "JWT_SECRET is not configured"})),
        );
    };

    let claims = Claims {
        username: request.username,
        exp: (Utc::now() + Duration::seconds(TOKEN_LIFETIME_SECS)).timestamp(),
    };

    let token = match jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    ) {
        Ok(token) => token,
        Err(err) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": format!("Failed to generate token: {err}")})),
            );
        }
    };

    info!(username = %claims.username, "issued login token");

    (
        StatusCode::OK,
        Json(json!({"token": token, "expiresIn": TOKEN_LIFETIME_SECS})),
    )
}
