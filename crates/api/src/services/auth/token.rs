//! Bearer token issuing and verification.
//!
//! Tokens are HS256 JWTs whose subject is the user ID. They are stateless:
//! there is no server-side revocation, so the lifetime is the only bound on
//! a leaked token.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use sweet_bliss_core::UserId;

use crate::config::TokenConfig;

/// Value of the `iss` claim on every token.
pub const TOKEN_ISSUER: &str = "sweet-bliss";

/// Errors that can occur while issuing or verifying tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token encoding failed: {0}")]
    Encoding(jsonwebtoken::errors::Error),

    #[error("token expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Invalid(e.to_string()),
        }
    }
}

/// JWT claims carried by a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
    /// Issuer.
    pub iss: String,
}

/// Issues and verifies bearer tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Create an issuer from the signing configuration.
    #[must_use]
    pub fn new(config: &TokenConfig) -> Self {
        let secret = config.secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl: Duration::hours(i64::from(config.ttl_hours)),
        }
    }

    /// Issue a token asserting `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Encoding` if signing fails.
    pub fn issue(&self, user_id: UserId) -> Result<String, TokenError> {
        self.issue_at(user_id, Utc::now())
    }

    fn issue_at(&self, user_id: UserId, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
            iss: TOKEN_ISSUER.to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Encoding)
    }

    /// Verify a token and return the user it asserts.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` for an expired token, and
    /// `TokenError::Invalid` for a bad signature, wrong issuer, or a subject
    /// that is not a user ID.
    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        data.claims
            .sub
            .parse()
            .map_err(|e: sweet_bliss_core::IdParseError| TokenError::Invalid(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn issuer(secret: &str) -> TokenIssuer {
        TokenIssuer::new(&TokenConfig::new(SecretString::from(secret)))
    }

    #[test]
    fn test_issue_and_verify() {
        let tokens = issuer("k9#Qw2!zX7@vB4$nM6%tR1^yL8&pE3*j");
        let token = tokens.issue(UserId::new(42)).unwrap();

        assert_eq!(tokens.verify(&token).unwrap(), UserId::new(42));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let a = issuer("k9#Qw2!zX7@vB4$nM6%tR1^yL8&pE3*j");
        let b = issuer("Zp4!rT8@mW2#xC6$vN0%bQ5^lK9&hJ3*");
        let token = a.issue(UserId::new(1)).unwrap();

        assert!(matches!(b.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = issuer("k9#Qw2!zX7@vB4$nM6%tR1^yL8&pE3*j");
        let long_ago = Utc::now() - Duration::days(30);
        let token = tokens.issue_at(UserId::new(1), long_ago).unwrap();

        assert!(matches!(tokens.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_garbage_rejected() {
        let tokens = issuer("k9#Qw2!zX7@vB4$nM6%tR1^yL8&pE3*j");
        assert!(tokens.verify("not-a-token").is_err());
        assert!(tokens.verify("").is_err());
    }

    #[test]
    fn test_non_numeric_subject_rejected() {
        let tokens = issuer("k9#Qw2!zX7@vB4$nM6%tR1^yL8&pE3*j");
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "admin".to_string(),
            iat: now,
            exp: now + 3600,
            iss: TOKEN_ISSUER.to_string(),
        };
        let token = encode(&Header::default(), &claims, &tokens.encoding_key).unwrap();

        assert!(matches!(tokens.verify(&token), Err(TokenError::Invalid(_))));
    }
}
