//! Bearer token holder for the SSO-issued access token.
//!
//! The SSO handshake happens elsewhere; this module only keeps the resulting
//! token in memory, exposes its (unverified) claims for UI decisions, and
//! forgets it when the backend answers 401/419. Claims are decoded without
//! signature checks and must never be used for authorization on their own.

use base64ct::{Base64UrlUnpadded, Encoding};
use parking_lot::RwLock;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Subset of the access-token payload the console cares about.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: Option<String>,
    pub exp: Option<u64>,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Shared, cloneable handle to the current access token.
#[derive(Clone, Default)]
pub struct Session {
    token: Arc<RwLock<Option<SecretString>>>,
}

impl Session {
    #[must_use]
    pub fn new(token: Option<SecretString>) -> Self {
        Self {
            token: Arc::new(RwLock::new(token)),
        }
    }

    pub fn set_token(&self, token: SecretString) {
        *self.token.write() = Some(token);
    }

    /// Drops the token, typically after a 401/419 or on logout.
    pub fn clear(&self) {
        if self.token.write().take().is_some() {
            debug!("access token cleared");
        }
    }

    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.token.read().clone()
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.read().is_some()
    }

    /// Decoded payload of the current token, if it is a readable JWT.
    #[must_use]
    pub fn claims(&self) -> Option<Claims> {
        let guard = self.token.read();
        let token = guard.as_ref()?;
        decode_claims(token.expose_secret())
    }

    /// A token without a readable `exp` counts as expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs());
        self.claims()
            .and_then(|claims| claims.exp)
            .map_or(true, |exp| exp < now)
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.has_token() && !self.is_expired()
    }

    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.claims()
            .is_some_and(|claims| claims.roles.iter().any(|r| r == role))
    }

    #[must_use]
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        self.claims()
            .is_some_and(|claims| claims.roles.iter().any(|r| roles.contains(&r.as_str())))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.has_token().then_some("***"))
            .finish()
    }
}

fn decode_claims(token: &str) -> Option<Claims> {
    let payload = token.split('.').nth(1)?;
    let bytes = Base64UrlUnpadded::decode_vec(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}
