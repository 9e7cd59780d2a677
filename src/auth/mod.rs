pub mod credentials;
pub mod jwt;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use credentials::{CredentialSource, CredentialsError, IdentityCredentials};
pub use jwt::{issue_dev_token, JwtVerifier};

/// Claims carried by identity tokens. Only the fields the service relies on are
/// modelled; anything else the provider adds is ignored.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Claims issued now and expiring after `ttl`. Fails when the expiry
    /// falls outside the representable time range.
    pub fn new(
        user_id: impl Into<String>,
        email: Option<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        ttl: Duration,
    ) -> Result<Self, VerifyError> {
        let now = Utc::now();
        let expires = now.checked_add_signed(ttl).ok_or(VerifyError::TtlOutOfRange)?;
        Ok(Self {
            sub: user_id.into(),
            email,
            iss: issuer.into(),
            aud: audience.into(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        })
    }
}

/// The caller identity established by a successful token verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub user_id: String,
    pub email: Option<String>,
}

impl From<Claims> for VerifiedIdentity {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
        }
    }
}

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("token header has no key id")]
    MissingKeyId,

    #[error("no verification key for key id '{0}'")]
    UnknownKeyId(String),

    #[error("token subject is empty")]
    EmptySubject,

    #[error("signing secret not configured")]
    SecretNotConfigured,

    #[error("token lifetime out of range")]
    TtlOutOfRange,

    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Maps a bearer token to the identity of its holder.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, VerifyError>;
}
