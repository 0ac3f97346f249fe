use crate::config::Config;
use crate::error::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Purpose tag stamped into every token this service issues.
pub const TOKEN_TYPE_ACCESS: &str = "access";

/// Represents the claims encoded within an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the owner identity, as the user id's decimal string form.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
    /// Purpose tag; only `"access"` tokens authenticate requests.
    #[serde(rename = "type")]
    pub token_type: String,
}

/// Signing and verification keys, derived from the process-wide secret once
/// at startup and passed by handle to everything that needs them. The secret
/// length constraint is enforced by `Config` before this is ever built.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validity: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validity: Duration::days(ttl_days),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.jwt_secret, config.token_ttl_days)
    }

    /// Issues a signed access token for the given user, valid for the
    /// configured window (7 days by default).
    pub fn issue(&self, user_id: i32) -> Result<String, AppError> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(self.validity)
            .expect("valid timestamp");

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp() as usize,
            exp: expiration.timestamp() as usize,
            token_type: TOKEN_TYPE_ACCESS.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("failed to sign token: {}", e)))
    }

    /// Verifies a token's signature, structure, expiry, purpose tag, and
    /// subject. Every failure collapses into the same `Unauthorized`; the
    /// actual cause only reaches the logs, so callers (and clients) cannot
    /// tell rejection modes apart.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default()).map_err(
            |e| {
                log::debug!("token rejected: {}", e);
                AppError::Unauthorized
            },
        )?;

        let claims = data.claims;
        if claims.token_type != TOKEN_TYPE_ACCESS {
            log::debug!("token rejected: unexpected type tag {:?}", claims.token_type);
            return Err(AppError::Unauthorized);
        }
        if claims.sub.trim().is_empty() {
            log::debug!("token rejected: empty subject");
            return Err(AppError::Unauthorized);
        }
        Ok(claims)
    }
}
