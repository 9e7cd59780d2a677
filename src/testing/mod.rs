use async_trait::async_trait;
use axum::Router;
use chrono::Duration;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use crate::app::{app, AppState};
use crate::auth::{issue_dev_token, Claims, IdentityCredentials, JwtVerifier};
use crate::database::models::{NewNote, Note, NotePatch};
use crate::database::{DatabaseError, MemoryNoteStore, NoteStore};

pub const TEST_SECRET: &str = "notes-test-secret";
pub const TEST_PROJECT: &str = "notes-test";

pub fn test_credentials() -> IdentityCredentials {
    serde_json::from_value(serde_json::json!({
        "project_id": TEST_PROJECT,
        "jwt_secret": TEST_SECRET,
    }))
    .expect("static test credentials")
}

pub fn test_verifier() -> JwtVerifier {
    let creds = test_credentials();
    JwtVerifier::with_secret(TEST_SECRET, &creds.issuer(), &creds.audience())
}

/// A valid one-hour token for `user_id`
pub fn mint_token(user_id: &str) -> String {
    let email = format!("{}@example.com", user_id);
    issue_dev_token(&test_credentials(), user_id, Some(&email), Duration::hours(1))
        .expect("test token")
}

/// RS256 signing key whose public half is [`TEST_RSA_N`] / [`TEST_RSA_E`]
pub const TEST_RSA_PEM: &str = include_str!("rsa_test_key.pem");
pub const TEST_RSA_N: &str = "t2Z2B-J4nBYJzk4RCEkjipMKJKScAU-DbyGC4ZQwhsLO38LHwrNPc2FWbHK2AlASXilkMAwv6eSHpl-PP0wk7uK28Ji5_Q-QdqEMMAxoW3vIyMibZYcPcT1OEz6beCwqyKrPrg2XXksG7woTWJ9jz-VVI3y29IoWRCF-7cc_Z7OIr1zjqei_fCWWtaq2ZjHynLBXgMFNLjtbHR1EpkrXBRWT1F-dbjAm6AwoYVNTAAQ5sTwIRcvbw3uAOpOFHnofm6EEzs3Rt3alPyGwCYj-RqxDe-yy6Q9TtONVg_T0YQJ-YE2BWbxrIgrLxmPBHNriC4DwVrYiNmB4vodSwR1w6Q";
pub const TEST_RSA_E: &str = "AQAB";

/// Key set publishing the test RSA key under `kid`
pub fn rsa_jwks(kid: &str) -> JwkSet {
    serde_json::from_value(serde_json::json!({
        "keys": [{
            "kty": "RSA",
            "use": "sig",
            "alg": "RS256",
            "kid": kid,
            "n": TEST_RSA_N,
            "e": TEST_RSA_E,
        }]
    }))
    .expect("static test jwks")
}

/// A valid one-hour RS256 token for `user_id`, signed under key id `kid`
pub fn mint_rsa_token(kid: &str, user_id: &str) -> String {
    let creds = test_credentials();
    let claims = Claims::new(user_id, None, creds.issuer(), creds.audience(), Duration::hours(1))
        .expect("test claims");
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    let key = EncodingKey::from_rsa_pem(TEST_RSA_PEM.as_bytes()).expect("test rsa key");
    encode(&header, &claims, &key).expect("test rsa token")
}

/// Router over `store` with the shared-secret test verifier and no CORS origins
pub fn test_app(store: Arc<dyn NoteStore>) -> Router {
    app(AppState::new(store, Arc::new(test_verifier())), &[])
}

/// Memory store that counts every call made to it
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryNoteStore,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl NoteStore for CountingStore {
    async fn list(&self, user_id: &str, search: &str) -> Result<Vec<Note>, DatabaseError> {
        self.hit();
        self.inner.list(user_id, search).await
    }

    async fn insert(&self, note: NewNote) -> Result<Note, DatabaseError> {
        self.hit();
        self.inner.insert(note).await
    }

    async fn update(&self, id: Uuid, user_id: &str, patch: NotePatch) -> Result<(), DatabaseError> {
        self.hit();
        self.inner.update(id, user_id, patch).await
    }

    async fn delete(&self, id: Uuid, user_id: &str) -> Result<(), DatabaseError> {
        self.hit();
        self.inner.delete(id, user_id).await
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        self.hit();
        self.inner.ping().await
    }
}

/// Store whose every operation fails the way an unreachable database does
pub struct FailingStore;

#[async_trait]
impl NoteStore for FailingStore {
    async fn list(&self, _user_id: &str, _search: &str) -> Result<Vec<Note>, DatabaseError> {
        Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
    }

    async fn insert(&self, _note: NewNote) -> Result<Note, DatabaseError> {
        Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
    }

    async fn update(&self, _id: Uuid, _user_id: &str, _patch: NotePatch) -> Result<(), DatabaseError> {
        Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
    }

    async fn delete(&self, _id: Uuid, _user_id: &str) -> Result<(), DatabaseError> {
        Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
    }
}
