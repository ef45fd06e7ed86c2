//! Pre-signed upload tickets.
//!
//! A ticket is a short-lived HS256 JWT binding a storage path and a
//! content type. The holder may perform exactly one kind of request:
//! `PUT` the binary payload to the upload endpoint before expiry. There
//! is no retry bookkeeping and no resumability; outcome is the HTTP
//! status of that single request.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use renthub_core::error::AppError;

/// Claims carried in an upload ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadTicket {
    /// Storage path the upload must land at.
    pub path: String,
    /// Content type the payload must declare.
    pub content_type: String,
    /// Issued-at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
    /// Unique ticket ID.
    pub jti: Uuid,
}

/// Issues and verifies upload tickets.
#[derive(Clone)]
pub struct Presigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_minutes: i64,
}

impl std::fmt::Debug for Presigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Presigner")
            .field("ttl_minutes", &self.ttl_minutes)
            .finish()
    }
}

impl Presigner {
    /// Creates a presigner signing with the given secret.
    pub fn new(secret: &str, ttl_minutes: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_minutes: ttl_minutes as i64,
        }
    }

    /// Issues a ticket for the given path and content type.
    pub fn issue(
        &self,
        path: &str,
        content_type: &str,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::minutes(self.ttl_minutes);

        let ticket = UploadTicket {
            path: path.to_string(),
            content_type: content_type.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4(),
        };

        let token = encode(&Header::default(), &ticket, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign upload ticket: {e}")))?;

        Ok((token, expires_at))
    }

    /// Verifies a ticket string, returning its claims.
    pub fn verify(&self, token: &str) -> Result<UploadTicket, AppError> {
        decode::<UploadTicket>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::unauthorized("Upload ticket has expired")
                }
                _ => AppError::unauthorized("Invalid upload ticket"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify() {
        let presigner = Presigner::new("test-secret", 15);
        let (token, expires_at) = presigner
            .issue("machines/abc/front.jpg", "image/jpeg")
            .unwrap();
        assert!(expires_at > Utc::now());

        let ticket = presigner.verify(&token).unwrap();
        assert_eq!(ticket.path, "machines/abc/front.jpg");
        assert_eq!(ticket.content_type, "image/jpeg");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let presigner = Presigner::new("test-secret", 15);
        let (token, _) = presigner.issue("a/b.png", "image/png").unwrap();

        let other = Presigner::new("other-secret", 15);
        assert!(other.verify(&token).is_err());
    }
}
