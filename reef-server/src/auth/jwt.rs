//! Token service
//!
//! Signs and verifies the access/refresh token pair. The two token
//! families use separate secrets; a claims `token_type` field stops one
//! family from being presented as the other.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::config::JwtConfig;

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

/// Claims stored in both token families
///
/// Deliberately minimal: user data and permissions are loaded from the
/// database on every request, so a token never carries stale authority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id (subject)
    pub sub: String,
    /// Token family: "access" or "refresh"
    pub token_type: String,
    /// Unique token id. Makes two tokens issued in the same second distinct.
    pub jti: String,
    /// Issued-at (seconds)
    pub iat: i64,
    /// Expiry (seconds)
    pub exp: i64,
}

impl Claims {
    /// Subject parsed back to a user id
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

/// Token errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Wrong token type")]
    WrongTokenType,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),

    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),
}

impl From<JwtError> for shared::error::AppError {
    fn from(err: JwtError) -> Self {
        use shared::error::{AppError, ErrorCode};
        match err {
            JwtError::ExpiredToken => AppError::new(ErrorCode::TokenExpired),
            JwtError::GenerationFailed(msg) | JwtError::KeyGenerationFailed(msg) => {
                AppError::internal(msg)
            }
            other => AppError::with_message(ErrorCode::TokenInvalid, other.to_string()),
        }
    }
}

/// A signed token together with its absolute expiry (epoch milliseconds)
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: i64,
}

/// Generate a 64-hex-char secret from the system CSPRNG
pub fn generate_secure_secret() -> Result<String, JwtError> {
    let rng = SystemRandom::new();
    let mut key = [0u8; 32];
    rng.fill(&mut key)
        .map_err(|_| JwtError::KeyGenerationFailed("Failed to read system randomness".into()))?;
    Ok(hex::encode(key))
}

/// Token signing and verification service
pub struct TokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl_minutes: i64,
    refresh_ttl_days: i64,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(config.access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_ttl_minutes: config.access_ttl_minutes,
            refresh_ttl_days: config.refresh_ttl_days,
        }
    }

    /// Short-lived access token
    pub fn generate_access_token(&self, user_id: i64) -> Result<IssuedToken, JwtError> {
        self.generate(
            user_id,
            TOKEN_TYPE_ACCESS,
            Duration::minutes(self.access_ttl_minutes),
            &self.access_encoding,
        )
    }

    /// Long-lived refresh token. The caller is responsible for storing
    /// its digest; an unstored refresh token is dead on arrival.
    pub fn generate_refresh_token(&self, user_id: i64) -> Result<IssuedToken, JwtError> {
        self.generate(
            user_id,
            TOKEN_TYPE_REFRESH,
            Duration::days(self.refresh_ttl_days),
            &self.refresh_encoding,
        )
    }

    fn generate(
        &self,
        user_id: i64,
        token_type: &str,
        ttl: Duration,
        key: &EncodingKey,
    ) -> Result<IssuedToken, JwtError> {
        let now = Utc::now();
        let expiration = now + ttl;

        let claims = Claims {
            sub: user_id.to_string(),
            token_type: token_type.to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        let token = encode(&Header::default(), &claims, key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_at: expiration.timestamp_millis(),
        })
    }

    pub fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate(token, TOKEN_TYPE_ACCESS, &self.access_decoding)
    }

    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate(token, TOKEN_TYPE_REFRESH, &self.refresh_decoding)
    }

    fn validate(
        &self,
        token: &str,
        expected_type: &str,
        key: &DecodingKey,
    ) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["sub", "exp", "iat"]);

        let token_data =
            decode::<Claims>(token, key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {e}")),
            })?;

        if token_data.claims.token_type != expected_type {
            return Err(JwtError::WrongTokenType);
        }

        Ok(token_data.claims)
    }

    /// Extract the token from an `Authorization: Bearer <token>` header
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}
