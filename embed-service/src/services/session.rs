use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Claims of a viewer session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    pub jti: String,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to sign session token: {0}")]
    Signing(jsonwebtoken::errors::Error),

    #[error("Invalid session token: {0}")]
    Invalid(jsonwebtoken::errors::Error),
}

/// Issues and validates HS256 session tokens shared with the web app that
/// logs viewers in.
#[derive(Clone)]
pub struct SessionService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_minutes: i64,
}

impl SessionService {
    pub fn new(secret: &Secret<String>, expiry_minutes: i64) -> Self {
        let secret = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiry_minutes,
        }
    }

    pub fn issue(&self, user_id: &str) -> Result<String, SessionError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            exp: (now + Duration::minutes(self.expiry_minutes)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(SessionError::Signing)
    }

    pub fn validate(&self, token: &str) -> Result<SessionClaims, SessionError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(SessionError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> SessionService {
        SessionService::new(&Secret::new(secret.to_string()), 60)
    }

    #[test]
    fn test_issue_then_validate() {
        let sessions = service("test-secret");
        let token = sessions.issue("user-1").unwrap();
        let claims = sessions.validate(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_rejects_foreign_signature() {
        let token = service("one-secret").issue("user-1").unwrap();
        assert!(service("other-secret").validate(&token).is_err());
    }

    #[test]
    fn test_rejects_expired_token() {
        let sessions = SessionService::new(&Secret::new("test-secret".to_string()), -10);
        let token = sessions.issue("user-1").unwrap();
        assert!(sessions.validate(&token).is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(service("test-secret").validate("not.a.jwt").is_err());
    }
}
