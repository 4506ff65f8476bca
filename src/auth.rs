//! Credential checking and access-token issuance/verification.
//!
//! Tokens are `base64url(claims).hex(sha256(secret ∥ "." ∥ base64url(claims)))`:
//! a compact signed claim set with a `sub` and an `exp`. Verification
//! recomputes the tag and checks expiry. Passwords are stored as SHA-256
//! hex digests.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::store::Store;

/// Claims carried inside an access token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
}

/// Hash a plaintext password the way the user store expects it.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Issues and verifies access tokens against a fixed secret.
#[derive(Debug, Clone)]
pub struct Authenticator {
    secret: String,
    ttl_secs: i64,
}

impl Authenticator {
    pub fn new(secret: String, ttl_secs: i64) -> Self {
        Self { secret, ttl_secs }
    }

    /// Check a username/password pair against the user store.
    ///
    /// Fails with `InvalidCredentials` for unknown users, wrong passwords,
    /// and disabled accounts alike; callers cannot tell which.
    pub fn authenticate(&self, store: &Store, username: &str, password: &str) -> Result<()> {
        let Some((stored_hash, disabled)) = store.user_credentials(username)? else {
            debug!(username, "login attempt for unknown user");
            return Err(Error::InvalidCredentials);
        };
        if hash_password(password) != stored_hash {
            debug!(username, "login attempt with wrong password");
            return Err(Error::InvalidCredentials);
        }
        if disabled {
            warn!(username, "login attempt for disabled account");
            return Err(Error::InvalidCredentials);
        }
        Ok(())
    }

    /// Mint a token for `username`, valid for the configured lifetime.
    pub fn issue(&self, username: &str) -> String {
        let claims = Claims {
            sub: username.to_string(),
            exp: Utc::now().timestamp() + self.ttl_secs,
        };
        // Claims are a plain struct with string/int fields; serialization
        // cannot fail.
        let payload =
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap_or_default());
        let tag = self.tag(&payload);
        format!("{payload}.{tag}")
    }

    /// Verify a token and return its subject.
    pub fn verify(&self, token: &str) -> Result<String> {
        let Some((payload, tag)) = token.split_once('.') else {
            return Err(Error::InvalidToken);
        };
        if self.tag(payload) != tag {
            debug!("token with bad signature rejected");
            return Err(Error::InvalidToken);
        }
        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| Error::InvalidToken)?;
        let claims: Claims =
            serde_json::from_slice(&bytes).map_err(|_| Error::InvalidToken)?;
        if claims.exp <= Utc::now().timestamp() {
            debug!(sub = %claims.sub, "expired token rejected");
            return Err(Error::InvalidToken);
        }
        Ok(claims.sub)
    }

    fn tag(&self, payload: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(b".");
        hasher.update(payload.as_bytes());
        hex::encode(hasher.finalize())
    }
}
