//! Credential store and credential verification
//!
//! The store is the authoritative identity -> secret registry. Inserts and
//! lookups are single-key atomic operations on a sharded concurrent map, so a
//! lookup racing a registration sees either the old or the new secret.
//!
//! Verification goes through [`CredentialVerifier`] so the token authority
//! never compares secrets itself.

use crate::error::CredentialError;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use dashmap::DashMap;
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;
use tracing::debug;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// Compared against when the presented identity is unknown
const DECOY_SECRET: &str = "decoy-secret-for-unknown-identities";

/// Capability answering "does this identity own this secret?"
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, identity: &str, presented: &str) -> bool;
}

/// How secrets are kept at rest in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecretFormat {
    /// Byte-for-byte copy of the registered secret
    #[default]
    Plaintext,
    /// Argon2id PHC string, salted per entry
    Argon2,
}

pub struct CredentialStore {
    entries: DashMap<String, Zeroizing<String>>,
    format: SecretFormat,
    /// Per-store key for the constant-time plaintext comparison
    compare_key: Zeroizing<[u8; 32]>,
    /// Stored-form secret used when the identity is unknown
    decoy: Zeroizing<String>,
}

impl CredentialStore {
    /// Plaintext store
    pub fn new() -> Self {
        Self::build(SecretFormat::Plaintext, DECOY_SECRET.to_string())
    }

    /// Create a store that keeps secrets in `format`.
    ///
    /// For [`SecretFormat::Argon2`] this hashes the decoy secret up front,
    /// so construction costs one Argon2 run and fails if hashing does.
    pub fn with_format(format: SecretFormat) -> Result<Self, CredentialError> {
        let decoy = match format {
            SecretFormat::Plaintext => DECOY_SECRET.to_string(),
            SecretFormat::Argon2 => hash_secret(DECOY_SECRET)?,
        };
        Ok(Self::build(format, decoy))
    }

    fn build(format: SecretFormat, decoy: String) -> Self {
        let mut compare_key = Zeroizing::new([0u8; 32]);
        OsRng.fill_bytes(&mut compare_key[..]);

        Self {
            entries: DashMap::new(),
            format,
            compare_key,
            decoy: Zeroizing::new(decoy),
        }
    }

    pub fn format(&self) -> SecretFormat {
        self.format
    }

    /// Insert or overwrite the entry for `identity` (last write wins).
    ///
    /// Empty identities are rejected; empty secrets are accepted.
    pub fn register(&self, identity: &str, secret: &str) -> Result<(), CredentialError> {
        if identity.is_empty() {
            return Err(CredentialError::EmptyIdentity);
        }

        let stored = match self.format {
            SecretFormat::Plaintext => secret.to_string(),
            SecretFormat::Argon2 => hash_secret(secret)?,
        };

        let replaced = self
            .entries
            .insert(identity.to_string(), Zeroizing::new(stored))
            .is_some();

        debug!(event = "credential_registered", identity = %identity, replaced);
        Ok(())
    }

    /// Stored secret for `identity` (the PHC hash in Argon2 mode)
    pub fn lookup(&self, identity: &str) -> Option<String> {
        self.entries
            .get(identity)
            .map(|entry| entry.value().as_str().to_string())
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.entries.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn matches(&self, stored: &str, presented: &str) -> bool {
        match self.format {
            SecretFormat::Plaintext => constant_time_eq(&self.compare_key[..], stored, presented),
            SecretFormat::Argon2 => verify_hashed(stored, presented),
        }
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialVerifier for CredentialStore {
    fn verify(&self, identity: &str, presented: &str) -> bool {
        // Clone out of the map so no shard lock is held while comparing.
        match self.lookup(identity) {
            Some(stored) => {
                let stored = Zeroizing::new(stored);
                self.matches(&stored, presented)
            }
            None => {
                // Same work as a real comparison, result discarded.
                std::hint::black_box(self.matches(&self.decoy, presented));
                false
            }
        }
    }
}

/// Compare two secrets without leaking content or length through timing.
///
/// Both sides are reduced to HMAC-SHA256 tags under `key`, and the tags are
/// compared with `verify_slice`, which is constant-time.
fn constant_time_eq(key: &[u8], stored: &str, presented: &str) -> bool {
    let Ok(mut presented_mac) = HmacSha256::new_from_slice(key) else {
        return false;
    };
    presented_mac.update(presented.as_bytes());
    let presented_tag = presented_mac.finalize().into_bytes();

    let Ok(mut stored_mac) = HmacSha256::new_from_slice(key) else {
        return false;
    };
    stored_mac.update(stored.as_bytes());
    stored_mac.verify_slice(&presented_tag).is_ok()
}

fn hash_secret(secret: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CredentialError::Hashing(e.to_string()))
}

fn verify_hashed(stored: &str, presented: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(presented.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
