//! Token wire format
//!
//! Compact JWS: `base64url(header).base64url(claims).base64url(hmac)`.
//! HS256 is the only algorithm issued or accepted.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use jsonwebtoken::Algorithm;
use serde::{Deserialize, Serialize};

/// The one algorithm this authority signs and verifies with
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Name of [`TOKEN_ALGORITHM`] as it appears in the `alg` header
pub const TOKEN_ALGORITHM_NAME: &str = "HS256";

/// Signed token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (registered identity)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Result of a successful authenticate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub subject: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Result of a successful validate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub subject: String,
    pub expires_at: DateTime<Utc>,
}

/// Read the `alg` field of a token header without trusting any library
/// parse of it.
///
/// Returns `None` when the header segment is not base64url JSON or has no
/// string `alg`.
pub(crate) fn raw_header_algorithm(token: &str) -> Option<String> {
    let header_segment = token.split('.').next()?;
    let decoded = URL_SAFE_NO_PAD.decode(header_segment).ok()?;
    let header: serde_json::Value = serde_json::from_slice(&decoded).ok()?;
    header.get("alg")?.as_str().map(str::to_string)
}
