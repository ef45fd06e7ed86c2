//! JWT token validation and blocklist checking.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use uuid::Uuid;

use renthub_cache::CacheManager;
use renthub_cache::keys;
use renthub_core::config::auth::AuthConfig;
use renthub_core::error::AppError;
use renthub_core::traits::CacheProvider;

use super::claims::{Claims, TokenType};

/// Validates JWT tokens and checks blocklist status.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
    /// Cache manager for blocklist lookups.
    cache: Arc<CacheManager>,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig, cache: Arc<CacheManager>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // seconds of clock-skew tolerance

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            cache,
        }
    }

    /// Decodes and validates an access token string.
    ///
    /// Checks:
    /// 1. Signature validity
    /// 2. Expiration
    /// 3. Token type is Access
    /// 4. JTI and session not in blocklist
    pub async fn decode_access_token(&self, token: &str) -> Result<Claims, AppError> {
        let claims = self.decode_token(token)?;

        if claims.token_type != TokenType::Access {
            return Err(AppError::unauthorized(
                "Invalid token type: expected access token",
            ));
        }

        self.check_blocklist(&claims).await?;

        Ok(claims)
    }

    /// Decodes and validates a refresh token string.
    pub async fn decode_refresh_token(&self, token: &str) -> Result<Claims, AppError> {
        let claims = self.decode_token(token)?;

        if claims.token_type != TokenType::Refresh {
            return Err(AppError::unauthorized(
                "Invalid token type: expected refresh token",
            ));
        }

        self.check_blocklist(&claims).await?;

        Ok(claims)
    }

    /// Internal decode without type checking.
    fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::unauthorized("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::unauthorized("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::unauthorized("Invalid token signature")
                    }
                    _ => AppError::unauthorized(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }

    /// Checks whether the token's JTI or session has been blocklisted.
    async fn check_blocklist(&self, claims: &Claims) -> Result<(), AppError> {
        let jti_blocked = self
            .cache
            .get(&keys::jwt_blocklist(claims.jti))
            .await
            .ok()
            .flatten();
        if jti_blocked.is_some() {
            return Err(AppError::unauthorized("Token has been revoked"));
        }

        if self.is_session_blocked(claims.session_id()).await? {
            return Err(AppError::unauthorized("Session has been terminated"));
        }
        Ok(())
    }

    /// Adds a JWT ID to the blocklist for the remaining token lifetime.
    pub async fn blocklist_token(&self, jti: Uuid, ttl_seconds: u64) -> Result<(), AppError> {
        self.cache
            .set(
                &keys::jwt_blocklist(jti),
                "1",
                Duration::from_secs(ttl_seconds.max(1)),
            )
            .await
    }

    /// Blocks every token of a session (used at sign-out and termination).
    pub async fn blocklist_session(&self, session_id: Uuid) -> Result<(), AppError> {
        self.cache
            .set_default(&keys::session_blocklist(session_id), "1")
            .await
    }

    /// Whether a session has been blocked.
    pub async fn is_session_blocked(&self, session_id: Uuid) -> Result<bool, AppError> {
        self.cache.exists(&keys::session_blocklist(session_id)).await
    }
}
