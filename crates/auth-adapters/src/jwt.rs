use chrono::{Duration, Utc};
use domains::ports::{IssuedToken, TokenIssuer};
use domains::{DomainError, Result};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const INVALID_TOKEN: &str = "Invalid or expired token.";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id
    sub: String,
    exp: i64,
    iat: i64,
}

/// HS256 bearer tokens carrying the user id.
pub struct JwtIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtIssuer {
    pub fn new(secret: &[u8], ttl_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    fn sign(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| DomainError::Internal(format!("token signing failed: {e}")))
    }
}

impl TokenIssuer for JwtIssuer {
    fn issue(&self, user_id: Uuid) -> Result<IssuedToken> {
        let now = Utc::now();
        let expires_at = now + self.ttl;
        let token = self.sign(&Claims {
            sub: user_id.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        })?;
        Ok(IssuedToken { token, expires_at })
    }

    fn verify(&self, token: &str) -> Result<Uuid> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "rejected bearer token");
            DomainError::Unauthorized(INVALID_TOKEN.into())
        })?;
        data.claims
            .sub
            .parse()
            .map_err(|_| DomainError::Unauthorized(INVALID_TOKEN.into()))
    }
}
