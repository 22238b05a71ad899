//! Access gate and input sanitization.
//!
//! The gate holds one shared password. A correct password buys a session
//! token with a fixed lifetime; protected routes check the token instead of
//! the password. Sessions live in memory only.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Maximum length kept from a client-supplied file name.
pub const MAX_FILE_NAME_LENGTH: usize = 128;

/// A freshly issued session.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Password gate issuing expiring session tokens.
pub struct AccessGate {
    key: [u8; 32],
    expected: Vec<u8>,
    sessions: RwLock<HashMap<String, DateTime<Utc>>>,
    ttl: chrono::Duration,
}

impl AccessGate {
    /// Create a gate for `password`. Returns `None` for an empty password.
    pub fn new(password: &str, ttl: Duration) -> Option<Self> {
        if password.is_empty() {
            return None;
        }

        // Per-process key; tags never leave memory
        let mut key = [0u8; 32];
        key[..16].copy_from_slice(Uuid::new_v4().as_bytes());
        key[16..].copy_from_slice(Uuid::new_v4().as_bytes());

        let expected = tag(&key, password.as_bytes());
        Some(Self {
            key,
            expected,
            sessions: RwLock::new(HashMap::new()),
            ttl: chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::hours(12)),
        })
    }

    /// Constant-time password check.
    pub fn verify_password(&self, candidate: &str) -> bool {
        mac(&self.key)
            .chain_update(candidate.as_bytes())
            .verify_slice(&self.expected)
            .is_ok()
    }

    /// Verify `candidate` and issue a session on success.
    pub async fn unlock(&self, candidate: &str) -> Option<Session> {
        if !self.verify_password(candidate) {
            return None;
        }
        Some(self.issue_session().await)
    }

    /// Issue a new session token, pruning expired ones first.
    pub async fn issue_session(&self) -> Session {
        let now = Utc::now();
        let token = Uuid::new_v4().to_string();
        let expires_at = now + self.ttl;

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, expiry| *expiry > now);
        if sessions.len() < before {
            debug!(pruned = before - sessions.len(), "Pruned expired sessions");
        }
        sessions.insert(token.clone(), expires_at);

        Session { token, expires_at }
    }

    /// Whether `token` names a live session.
    pub async fn validate(&self, token: &str) -> bool {
        self.validate_at(token, Utc::now()).await
    }

    async fn validate_at(&self, token: &str, now: DateTime<Utc>) -> bool {
        self.sessions
            .read()
            .await
            .get(token)
            .is_some_and(|expiry| *expiry > now)
    }

    /// End a session. Returns whether it existed.
    pub async fn revoke(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    /// Number of stored sessions, expired ones included until the next prune.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn mac(key: &[u8]) -> HmacSha256 {
    HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length")
}

fn tag(key: &[u8], message: &[u8]) -> Vec<u8> {
    mac(key).chain_update(message).finalize().into_bytes().to_vec()
}

/// Reduce a client-supplied file name to a safe base name.
///
/// Directory components are dropped, characters outside `[A-Za-z0-9._-]`
/// become `_`, and the result is truncated. The extension is preserved
/// so format detection still works.
pub fn sanitize_file_name(input: &str) -> String {
    let base = input
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.len() <= MAX_FILE_NAME_LENGTH {
        return cleaned.to_string();
    }

    match cleaned.rfind('.') {
        Some(dot) if cleaned.len() - dot <= 8 => {
            let ext = &cleaned[dot..];
            format!("{}{}", &cleaned[..MAX_FILE_NAME_LENGTH - ext.len()], ext)
        }
        _ => cleaned[..MAX_FILE_NAME_LENGTH].to_string(),
    }
}
