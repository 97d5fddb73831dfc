// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Service-Account Bearer Token Provider
//
// Exchanges an inline service-account credential (JSON from configuration)
// for a short-lived OAuth2 access token: sign a JWT assertion with the
// account's RSA key, POST it to the account's token endpoint, cache the
// returned token until shortly before expiry. The credential JSON is parsed
// directly; nothing is staged to disk.

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::ProviderError;

const OAUTH_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
const OAUTH_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const EXPIRY_SAFETY_WINDOW_SECS: i64 = 300;

/// Source of Bearer tokens for the generative-AI platform adapter.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn token(&self) -> Result<String, ProviderError>;
}

/// The fields of a service-account credential this gateway needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_json(raw: &str) -> Result<Self, ProviderError> {
        serde_json::from_str(raw).map_err(|e| {
            ProviderError::Configuration(format!("invalid service-account credential JSON: {e}"))
        })
    }
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Clone)]
struct CachedToken {
    token: String,
    exp_unix: i64,
}

/// Token provider backed by a service-account credential, with in-memory
/// caching and refresh before expiry.
pub struct ServiceAccountTokenProvider {
    http: reqwest::Client,
    key: ServiceAccountKey,
    cache: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokenProvider {
    pub fn new(key: ServiceAccountKey, http: reqwest::Client) -> Self {
        Self {
            http,
            key,
            cache: Mutex::new(None),
        }
    }

    fn sign_assertion(&self) -> Result<String, ProviderError> {
        let now = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: OAUTH_SCOPE,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let encoding_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| {
                ProviderError::Configuration(format!("invalid service-account RSA key: {e}"))
            })?;

        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
            .map_err(|e| ProviderError::Configuration(format!("failed to sign assertion: {e}")))
    }

    async fn fetch_token(&self) -> Result<TokenResponse, ProviderError> {
        let assertion = self.sign_assertion()?;

        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", OAUTH_GRANT_TYPE), ("assertion", &assertion)])
            .send()
            .await
            .map_err(|e| ProviderError::Network(format!("token exchange failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ProviderError::Upstream {
                message: format!("token endpoint returned HTTP {status}"),
                body: Some(body),
            });
        }

        serde_json::from_str(&body).map_err(|e| ProviderError::Upstream {
            message: format!("failed to parse token response: {e}"),
            body: Some(body),
        })
    }
}

#[async_trait]
impl TokenProvider for ServiceAccountTokenProvider {
    async fn token(&self) -> Result<String, ProviderError> {
        // Holding the lock across the refresh doubles as single-flight: one
        // caller refreshes, the rest reuse its result.
        let mut cache = self.cache.lock().await;

        let now = Utc::now().timestamp();
        if let Some(cached) = cache.as_ref() {
            if cached.exp_unix - EXPIRY_SAFETY_WINDOW_SECS > now {
                return Ok(cached.token.clone());
            }
        }

        debug!("refreshing service-account access token");
        let fresh = self.fetch_token().await?;
        let token = fresh.access_token.clone();
        *cache = Some(CachedToken {
            token: fresh.access_token,
            exp_unix: now + fresh.expires_in,
        });

        Ok(token)
    }
}
