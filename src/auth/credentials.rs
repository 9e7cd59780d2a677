use base64::{engine::general_purpose::STANDARD, Engine as _};
use jsonwebtoken::jwk::JwkSet;
use serde::Deserialize;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::{env, fs, io};
use thiserror::Error;

/// Public JWKS of the hosted identity provider's securetoken service.
pub const DEFAULT_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

const DEFAULT_ISSUER_PREFIX: &str = "https://securetoken.google.com/";

/// Verifier credentials as stored in the credentials document.
///
/// Key material precedence is `jwt_secret`, then inline `jwks`, then `jwks_url`
/// (falling back to [`DEFAULT_JWKS_URL`]).
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityCredentials {
    pub project_id: String,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default)]
    pub jwt_secret: Option<String>,
    #[serde(default)]
    pub jwks: Option<JwkSet>,
    #[serde(default)]
    pub jwks_url: Option<String>,
}

impl IdentityCredentials {
    pub fn issuer(&self) -> String {
        self.issuer
            .clone()
            .unwrap_or_else(|| format!("{}{}", DEFAULT_ISSUER_PREFIX, self.project_id))
    }

    pub fn audience(&self) -> String {
        self.audience.clone().unwrap_or_else(|| self.project_id.clone())
    }

    pub fn jwks_url(&self) -> &str {
        self.jwks_url.as_deref().unwrap_or(DEFAULT_JWKS_URL)
    }
}

#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("no identity credentials found (tried: {0})")]
    NoSource(String),

    #[error("{origin}: not valid base64: {reason}")]
    Decode { origin: String, reason: String },

    #[error("{origin}: {error}")]
    Io {
        origin: String,
        #[source]
        error: io::Error,
    },

    #[error("{origin}: invalid credentials document: {error}")]
    Parse {
        origin: String,
        #[source]
        error: serde_json::Error,
    },

    #[error("failed to fetch JWKS: {0}")]
    JwksFetch(#[from] reqwest::Error),

    #[error("JWKS contains no usable signing keys")]
    NoUsableKeys,
}

/// A place verifier credentials may be read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Environment variable holding the base64-encoded JSON document
    EnvBase64(String),
    /// JSON document on disk
    File(PathBuf),
}

impl CredentialSource {
    /// Load credentials from this source. `Ok(None)` means the source is not
    /// present; a present but unreadable source is an error.
    pub fn load(&self) -> Result<Option<IdentityCredentials>, CredentialsError> {
        let raw = match self {
            CredentialSource::EnvBase64(var) => {
                let encoded = match env::var(var) {
                    Ok(v) if !v.trim().is_empty() => v,
                    _ => return Ok(None),
                };
                STANDARD
                    .decode(encoded.trim())
                    .map_err(|e| CredentialsError::Decode {
                        origin: self.to_string(),
                        reason: e.to_string(),
                    })?
            }
            CredentialSource::File(path) => match fs::read(path) {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
                Err(error) => {
                    return Err(CredentialsError::Io {
                        origin: self.to_string(),
                        error,
                    })
                }
            },
        };

        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|error| CredentialsError::Parse {
                origin: self.to_string(),
                error,
            })
    }
}

impl Display for CredentialSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialSource::EnvBase64(var) => write!(f, "env {}", var),
            CredentialSource::File(path) => write!(f, "file {}", path.display()),
        }
    }
}

/// Resolve credentials from the first present source, in order.
pub fn resolve(
    sources: &[CredentialSource],
) -> Result<(IdentityCredentials, CredentialSource), CredentialsError> {
    for source in sources {
        if let Some(credentials) = source.load()? {
            tracing::info!("Loaded identity credentials from {}", source);
            return Ok((credentials, source.clone()));
        }
        tracing::debug!("Identity credential source not present: {}", source);
    }

    let tried = sources
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    Err(CredentialsError::NoSource(tried))
}
