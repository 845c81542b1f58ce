//! Signing secret ownership and strength assessment
//!
//! The HMAC key is held in zeroize-on-drop storage and never printed.
//! [`assess_secret`] explains what is wrong with a secret; whether a weak
//! secret is acceptable is the caller's call.

use crate::error::SecretError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{rngs::OsRng, RngCore};
use std::fmt;
use zeroize::Zeroizing;

/// HS256 keys shorter than the digest size weaken the MAC
pub const MIN_SECRET_BYTES: usize = 32;
const STRONG_SECRET_BYTES: usize = 64;
const MIN_DISTINCT_BYTES: usize = 10;
const MAX_RUN: usize = 4;

/// Shared symmetric key used to sign and verify tokens
#[derive(Clone)]
pub struct SigningSecret {
    bytes: Zeroizing<Vec<u8>>,
}

impl SigningSecret {
    /// Wrap raw key material. Only an empty secret is rejected here.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, SecretError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(SecretError::Empty);
        }
        Ok(Self {
            bytes: Zeroizing::new(bytes),
        })
    }

    pub fn expose(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret([REDACTED])")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretStrength {
    Weak,
    Acceptable,
    Strong,
}

/// One reason a signing secret is weak
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretWeakness {
    TooShort { len: usize },
    /// Few distinct byte values, e.g. `"abababab..."`
    LowVariety { distinct: usize },
    /// Four or more identical or ascending bytes in a row
    Run,
}

impl fmt::Display for SecretWeakness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretWeakness::TooShort { len } => {
                write!(f, "{len} bytes long, need at least {MIN_SECRET_BYTES}")
            }
            SecretWeakness::LowVariety { distinct } => {
                write!(f, "only {distinct} distinct byte values")
            }
            SecretWeakness::Run => f.write_str("contains a run like \"aaaa\" or \"1234\""),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretAssessment {
    pub strength: SecretStrength,
    pub weaknesses: Vec<SecretWeakness>,
}

impl SecretAssessment {
    pub fn is_weak(&self) -> bool {
        self.strength == SecretStrength::Weak
    }

    /// Comma separated weaknesses, for log fields and error messages
    pub fn reasons(&self) -> String {
        self.weaknesses
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Check a candidate signing secret.
///
/// Any weakness makes it [`SecretStrength::Weak`]; otherwise 64+ bytes is
/// strong and anything shorter acceptable.
pub fn assess_secret(secret: &[u8]) -> SecretAssessment {
    let mut weaknesses = Vec::new();

    if secret.len() < MIN_SECRET_BYTES {
        weaknesses.push(SecretWeakness::TooShort { len: secret.len() });
    }

    let distinct = distinct_bytes(secret);
    if distinct < MIN_DISTINCT_BYTES {
        weaknesses.push(SecretWeakness::LowVariety { distinct });
    }

    if has_run(secret) {
        weaknesses.push(SecretWeakness::Run);
    }

    let strength = if !weaknesses.is_empty() {
        SecretStrength::Weak
    } else if secret.len() >= STRONG_SECRET_BYTES {
        SecretStrength::Strong
    } else {
        SecretStrength::Acceptable
    };

    SecretAssessment {
        strength,
        weaknesses,
    }
}

fn distinct_bytes(secret: &[u8]) -> usize {
    let mut seen = [false; 256];
    secret.iter().for_each(|&b| seen[b as usize] = true);
    seen.iter().filter(|&&s| s).count()
}

fn has_run(secret: &[u8]) -> bool {
    let mut same = 1;
    let mut ascending = 1;
    for pair in secret.windows(2) {
        same = if pair[1] == pair[0] { same + 1 } else { 1 };
        ascending = if pair[0].checked_add(1) == Some(pair[1]) {
            ascending + 1
        } else {
            1
        };
        if same >= MAX_RUN || ascending >= MAX_RUN {
            return true;
        }
    }
    false
}

/// Fresh `secret_key` value: `bytes` of OS randomness, base64url encoded
/// so it can be pasted into an env var or TOML string as-is.
pub fn generate_signing_secret(bytes: usize) -> Result<String, SecretError> {
    if bytes < MIN_SECRET_BYTES {
        return Err(SecretError::TooShort {
            min: MIN_SECRET_BYTES,
        });
    }

    let mut raw = Zeroizing::new(vec![0u8; bytes]);
    OsRng
        .try_fill_bytes(raw.as_mut_slice())
        .map_err(|_| SecretError::Random)?;

    Ok(URL_SAFE_NO_PAD.encode(raw.as_slice()))
}
