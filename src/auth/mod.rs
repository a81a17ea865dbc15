pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::database::models::{Profile, Role};

pub use password::{hash_password, verify_password};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: Uuid,
    pub profile_id: Uuid,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, profile_id: Uuid, role: Role, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            user_id,
            profile_id,
            role,
            iat: now.timestamp(),
            exp,
        }
    }

    pub fn for_profile(profile: &Profile, expiry_hours: u64) -> Self {
        Self::new(profile.user_id, profile.id, profile.role, expiry_hours)
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("Password hashing error: {0}")]
    Hashing(String),
}

/// HS256 signing material, built once from config and shared through app state
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_hours: u64,
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys")
            .field("expiry_hours", &self.expiry_hours)
            .finish_non_exhaustive()
    }
}

impl JwtKeys {
    pub fn new(secret: &str, expiry_hours: u64) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::InvalidSecret);
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry_hours,
        })
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self, AuthError> {
        Self::new(&security.jwt_secret, security.jwt_expiry_hours)
    }

    pub fn issue(&self, profile: &Profile) -> Result<String, AuthError> {
        self.encode(&Claims::for_profile(profile, self.expiry_hours))
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::default(), claims, &self.encoding)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Signature and expiry are both checked
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_round_trips_identity() {
        let keys = JwtKeys::new("test-secret", 24).unwrap();
        let claims = Claims::new(Uuid::new_v4(), Uuid::new_v4(), Role::Manager, 24);
        let token = keys.encode(&claims).unwrap();

        let decoded = keys.verify(&token).unwrap();
        assert_eq!(decoded.profile_id, claims.profile_id);
        assert_eq!(decoded.role, Role::Manager);
        assert_eq!(decoded.exp - decoded.iat, 24 * 3600);
    }

    #[test]
    fn rejects_foreign_signature_and_expiry() {
        let keys = JwtKeys::new("test-secret", 24).unwrap();
        let other = JwtKeys::new("other-secret", 24).unwrap();
        let claims = Claims::new(Uuid::new_v4(), Uuid::new_v4(), Role::Employee, 24);
        let token = other.encode(&claims).unwrap();
        assert!(matches!(keys.verify(&token), Err(AuthError::InvalidToken(_))));

        let mut expired = Claims::new(Uuid::new_v4(), Uuid::new_v4(), Role::Employee, 24);
        expired.iat -= 7200;
        expired.exp = expired.iat + 600;
        let token = keys.encode(&expired).unwrap();
        assert!(matches!(keys.verify(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn empty_secret_is_refused() {
        assert!(matches!(JwtKeys::new("", 24), Err(AuthError::InvalidSecret)));
    }
}
