//! HS256 access tokens.
//!
//! Claims carry the user ID as a decimal string in `user_id` and the expiry
//! as a Unix timestamp in `exp`.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use ecom_core::UserId;

use super::AuthError;
use crate::config::JwtConfig;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    user_id: String,
    exp: i64,
    iat: i64,
}

/// Signing and verification keys derived from the configured secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys")
            .field("keys", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl JwtKeys {
    #[must_use]
    pub fn new(secret: &SecretString, ttl_seconds: i64) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            ttl: Duration::seconds(ttl_seconds),
        }
    }

    #[must_use]
    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(&config.secret, config.expiration_seconds)
    }

    /// Issue a token for `user_id` that expires after the configured TTL.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Token` if encoding fails.
    pub fn issue(&self, user_id: UserId) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            user_id: user_id.to_string(),
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Check the signature and expiry of `token` and return its user ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PermissionDenied` for any invalid token, including
    /// one whose `user_id` claim is not an integer.
    pub fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            tracing::debug!(error = %e, "rejected access token");
            AuthError::PermissionDenied
        })?;

        data.claims
            .user_id
            .parse::<UserId>()
            .map_err(|_| AuthError::PermissionDenied)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn keys(ttl_seconds: i64) -> JwtKeys {
        JwtKeys::new(
            &SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6q"),
            ttl_seconds,
        )
    }

    #[test]
    fn test_issue_then_verify() {
        let keys = keys(3600);
        let token = keys.issue(UserId::new(42)).unwrap();
        assert_eq!(keys.verify(&token).unwrap(), UserId::new(42));
    }

    #[test]
    fn test_expired_token_rejected() {
        // Beyond the default 60s leeway.
        let keys = keys(-300);
        let token = keys.issue(UserId::new(1)).unwrap();
        assert!(matches!(
            keys.verify(&token),
            Err(AuthError::PermissionDenied)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = keys(3600).issue(UserId::new(1)).unwrap();
        let other = JwtKeys::new(&SecretString::from("Zq8#Lm2!Vt6&Rw1^Kp4*Hs9@Nc3$Gf7x"), 3600);
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(keys(3600).verify("not.a.token").is_err());
    }

    #[test]
    fn test_non_numeric_user_id_rejected() {
        let keys = keys(3600);
        let claims = Claims {
            user_id: "abc".to_string(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
            iat: Utc::now().timestamp(),
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();
        assert!(matches!(
            keys.verify(&token),
            Err(AuthError::PermissionDenied)
        ));
    }
}
