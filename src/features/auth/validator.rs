use super::model::{AdminRole, AuthenticatedUser, SessionClaims};
use crate::core::error::AppError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::time::Duration;
use uuid::Uuid;

/// Issuer embedded in every session token
pub const TOKEN_ISSUER: &str = "elevateai";

/// Issues and validates HS256 session tokens for the admin panels.
pub struct JwtValidator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl JwtValidator {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mint a token for `role`. Returns the token and its claims.
    pub fn issue_token(&self, role: AdminRole) -> Result<(String, SessionClaims), AppError> {
        let now = chrono::Utc::now().timestamp();
        let claims = SessionClaims {
            sub: role.as_str().to_string(),
            role,
            sid: Uuid::new_v4().to_string(),
            iss: TOKEN_ISSUER.to_string(),
            iat: now,
            exp: now + self.ttl.as_secs() as i64,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign session token: {}", e)))?;

        Ok((token, claims))
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?;

        Ok(token_data.claims.into())
    }
}
