/// JWT issuance and verification
use crate::{
    config::AuthConfig,
    error::{ApiError, ApiResult},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims embedded in an issued token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id
    pub sub: String,
    pub email: String,
    /// Issued-at, seconds since epoch
    pub iat: i64,
    /// Expiration, seconds since epoch
    pub exp: i64,
}

/// Signs and verifies compact, time-bounded identity assertions
///
/// Built once at startup from [`AuthConfig`]; the signing key never leaves
/// this struct. There is no revocation list: rotating the key invalidates
/// every outstanding token.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    /// Create a token issuer from authentication configuration
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl: Duration::hours(config.token_ttl_hours),
        }
    }

    /// Issue a signed token for a user
    pub fn issue(&self, subject_id: &str, email: &str) -> ApiResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("Token signing failed: {}", e)))
    }

    /// Verify a token and return its claims
    pub fn verify(&self, token: &str) -> ApiResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::warn!("JWT verification failed: {}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => ApiError::TokenExpired,
                    _ => ApiError::TokenInvalid(e.to_string()),
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer(ttl_hours: i64) -> TokenIssuer {
        TokenIssuer::new(&AuthConfig {
            jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
            token_ttl_hours: ttl_hours,
        })
    }

    #[test]
    fn issue_then_verify_returns_claims() {
        let issuer = issuer(48);
        let token = issuer.issue("user-1", "a@x.com").unwrap();
        assert!(!token.is_empty());

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.exp - claims.iat, 48 * 3600);
    }

    #[test]
    fn token_signed_with_other_key_is_invalid() {
        let issuer_a = issuer(48);
        let issuer_b = TokenIssuer::new(&AuthConfig {
            jwt_secret: "ffffffffffffffffffffffffffffffff".to_string(),
            token_ttl_hours: 48,
        });

        let token = issuer_a.issue("user-1", "a@x.com").unwrap();
        assert!(matches!(
            issuer_b.verify(&token),
            Err(ApiError::TokenInvalid(_))
        ));
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        // Negative TTL places exp an hour in the past, beyond validation leeway
        let expired = issuer(-1);
        let token = expired.issue("user-1", "a@x.com").unwrap();
        assert!(matches!(
            issuer(48).verify(&token),
            Err(ApiError::TokenExpired)
        ));
    }

    #[test]
    fn garbage_token_is_invalid() {
        let issuer = issuer(48);
        assert!(matches!(
            issuer.verify("not.a.jwt"),
            Err(ApiError::TokenInvalid(_))
        ));
    }
}
