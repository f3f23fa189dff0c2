//! Owned session context.
//!
//! The session key used for encrypted local storage lives here, owned by
//! an object with an explicit lifetime: created at login, dropped (and
//! zeroized) at logout. Components that need the key borrow it from the
//! context instead of reaching into a global.

use chrono::{DateTime, Utc};
use rand::RngCore;
use uuid::Uuid;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of the symmetric session key in bytes.
pub const SESSION_KEY_LEN: usize = 32;

/// Per-login session context.
///
/// Holds the symmetric key for the encrypted preference store and the
/// conversation thread id sent with chat requests.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SessionContext {
    key: [u8; SESSION_KEY_LEN],
    #[zeroize(skip)]
    thread_id: Uuid,
    #[zeroize(skip)]
    created_at: DateTime<Utc>,
}

impl SessionContext {
    /// Create a session with a freshly generated random key.
    pub fn generate() -> Self {
        let mut key = [0u8; SESSION_KEY_LEN];
        rand::thread_rng().fill_bytes(&mut key);
        Self::from_key(key)
    }

    /// Create a session from existing key material.
    pub fn from_key(key: [u8; SESSION_KEY_LEN]) -> Self {
        Self {
            key,
            thread_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    /// Borrow the raw session key.
    pub fn key_bytes(&self) -> &[u8; SESSION_KEY_LEN] {
        &self.key
    }

    /// Conversation thread id for chat requests.
    pub fn thread_id(&self) -> Uuid {
        self.thread_id
    }

    /// When this session started.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("key", &"[REDACTED]")
            .field("thread_id", &self.thread_id)
            .field("created_at", &self.created_at)
            .finish()
    }
}
