use async_trait::async_trait;
use chrono::Duration;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::collections::HashMap;
use std::time::{Duration as StdDuration, Instant};
use tokio::sync::{Mutex, RwLock};

use super::credentials::{CredentialsError, IdentityCredentials};
use super::{Claims, IdentityVerifier, VerifiedIdentity, VerifyError};

/// Minimum spacing between key set refetches triggered by unknown key ids
pub const JWKS_REFRESH_INTERVAL: StdDuration = StdDuration::from_secs(60);

const JWKS_FETCH_TIMEOUT: StdDuration = StdDuration::from_secs(10);

enum KeyMaterial {
    /// HS256 shared secret
    Secret(DecodingKey),
    /// RS256 public keys by key id
    Jwks(JwksKeys),
}

/// Provider keys. When they came from a URL, a token naming an unknown key id
/// triggers a refetch so that key rotation does not lock users out.
struct JwksKeys {
    keys: RwLock<HashMap<String, DecodingKey>>,
    url: Option<String>,
    /// Last fetch time; holding the lock serialises refetches
    fetched_at: Mutex<Option<Instant>>,
    min_refresh_interval: StdDuration,
}

impl JwksKeys {
    async fn get(&self, kid: &str) -> Option<DecodingKey> {
        self.keys.read().await.get(kid).cloned()
    }

    async fn replace(&self, keys: HashMap<String, DecodingKey>) {
        *self.keys.write().await = keys;
    }

    async fn refresh_for(&self, kid: &str) {
        let Some(url) = self.url.as_deref() else {
            return;
        };

        let mut fetched_at = self.fetched_at.lock().await;
        // Someone else may have refreshed while we waited for the lock
        if self.keys.read().await.contains_key(kid) {
            return;
        }
        if let Some(at) = *fetched_at {
            if at.elapsed() < self.min_refresh_interval {
                tracing::debug!("Unknown key id '{}', key set refreshed too recently", kid);
                return;
            }
        }
        *fetched_at = Some(Instant::now());

        match fetch_jwks(url).await.and_then(|jwks| decoding_keys(&jwks)) {
            Ok(keys) => {
                tracing::info!("Refreshed identity provider keys from {} ({} key(s))", url, keys.len());
                self.replace(keys).await;
            }
            Err(e) => tracing::warn!("Failed to refresh identity provider keys from {}: {}", url, e),
        }
    }
}

/// Verifies signed identity tokens against an issuer/audience contract.
pub struct JwtVerifier {
    keys: KeyMaterial,
    validation: Validation,
}

impl JwtVerifier {
    /// Build a verifier from resolved credentials. Fetches the JWKS over HTTPS
    /// when the credentials carry neither a secret nor inline keys, and keeps
    /// refetching it from there when tokens name keys it has not seen.
    pub async fn from_credentials(credentials: &IdentityCredentials) -> Result<Self, CredentialsError> {
        if let Some(secret) = credentials.jwt_secret.as_deref().filter(|s| !s.is_empty()) {
            tracing::info!("Identity verifier using shared secret (HS256)");
            return Ok(Self::with_secret(secret, &credentials.issuer(), &credentials.audience()));
        }

        if let Some(jwks) = &credentials.jwks {
            return Self::with_jwks(jwks, &credentials.issuer(), &credentials.audience());
        }

        let url = credentials.jwks_url();
        tracing::info!("Fetching identity provider keys from {}", url);
        let jwks = fetch_jwks(url).await?;
        let mut verifier = Self::with_jwks(&jwks, &credentials.issuer(), &credentials.audience())?;
        if let KeyMaterial::Jwks(keys) = &mut verifier.keys {
            keys.url = Some(url.to_string());
            *keys.fetched_at.get_mut() = Some(Instant::now());
        }
        Ok(verifier)
    }

    pub fn with_secret(secret: &str, issuer: &str, audience: &str) -> Self {
        Self {
            keys: KeyMaterial::Secret(DecodingKey::from_secret(secret.as_bytes())),
            validation: validation(Algorithm::HS256, issuer, audience),
        }
    }

    pub fn with_jwks(jwks: &JwkSet, issuer: &str, audience: &str) -> Result<Self, CredentialsError> {
        let keys = decoding_keys(jwks)?;
        tracing::info!("Identity verifier loaded {} RS256 key(s)", keys.len());

        Ok(Self {
            keys: KeyMaterial::Jwks(JwksKeys {
                keys: RwLock::new(keys),
                url: None,
                fetched_at: Mutex::new(None),
                min_refresh_interval: JWKS_REFRESH_INTERVAL,
            }),
            validation: validation(Algorithm::RS256, issuer, audience),
        })
    }

    /// Override how often unknown key ids may trigger a refetch.
    pub fn with_min_refresh_interval(mut self, interval: StdDuration) -> Self {
        if let KeyMaterial::Jwks(keys) = &mut self.keys {
            keys.min_refresh_interval = interval;
        }
        self
    }

    async fn decode_claims(&self, token: &str) -> Result<Claims, VerifyError> {
        let claims = match &self.keys {
            KeyMaterial::Secret(key) => decode::<Claims>(token, key, &self.validation)?.claims,
            KeyMaterial::Jwks(jwks) => {
                let kid = decode_header(token)?.kid.ok_or(VerifyError::MissingKeyId)?;
                let key = match jwks.get(&kid).await {
                    Some(key) => key,
                    None => {
                        jwks.refresh_for(&kid).await;
                        jwks.get(&kid).await.ok_or(VerifyError::UnknownKeyId(kid))?
                    }
                };
                decode::<Claims>(token, &key, &self.validation)?.claims
            }
        };

        if claims.sub.trim().is_empty() {
            return Err(VerifyError::EmptySubject);
        }
        Ok(claims)
    }
}

#[async_trait]
impl IdentityVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, VerifyError> {
        self.decode_claims(token).await.map(VerifiedIdentity::from)
    }
}

fn validation(algorithm: Algorithm, issuer: &str, audience: &str) -> Validation {
    let mut validation = Validation::new(algorithm);
    validation.set_issuer(&[issuer]);
    validation.set_audience(&[audience]);
    validation
}

/// Usable RS256 keys by key id. Keys without an id, or that cannot be decoded, are skipped.
fn decoding_keys(jwks: &JwkSet) -> Result<HashMap<String, DecodingKey>, CredentialsError> {
    let mut keys = HashMap::new();
    for jwk in &jwks.keys {
        let Some(kid) = jwk.common.key_id.clone() else {
            tracing::warn!("Skipping JWK without key id");
            continue;
        };
        match DecodingKey::from_jwk(jwk) {
            Ok(key) => {
                keys.insert(kid, key);
            }
            Err(e) => tracing::warn!("Skipping unusable JWK '{}': {}", kid, e),
        }
    }

    if keys.is_empty() {
        return Err(CredentialsError::NoUsableKeys);
    }
    Ok(keys)
}

async fn fetch_jwks(url: &str) -> Result<JwkSet, CredentialsError> {
    let jwks = reqwest::Client::builder()
        .timeout(JWKS_FETCH_TIMEOUT)
        .build()?
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json::<JwkSet>()
        .await?;
    Ok(jwks)
}

/// Sign an HS256 token the way the configured provider would, for local
/// development against a shared-secret verifier.
pub fn issue_dev_token(
    credentials: &IdentityCredentials,
    user_id: &str,
    email: Option<&str>,
    ttl: Duration,
) -> Result<String, VerifyError> {
    let secret = credentials
        .jwt_secret
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(VerifyError::SecretNotConfigured)?;

    let claims = Claims::new(
        user_id,
        email.map(str::to_string),
        credentials.issuer(),
        credentials.audience(),
        ttl,
    )?;

    Ok(encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))?)
}
