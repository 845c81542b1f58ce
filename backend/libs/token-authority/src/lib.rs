//! Credential verification and token lifecycle engine
//!
//! **Components**:
//! - [`CredentialStore`]: concurrent identity -> secret registry
//! - [`CredentialVerifier`]: pluggable "does this secret match" capability
//! - [`TokenAuthority`]: authenticates, issues HS256 tokens, verifies them
//! - [`SigningSecret`]: the shared HMAC key, zeroized on drop
//! - [`Clock`]: time source for issuance and expiry
//!
//! Everything here is synchronous and in-memory. Transport, configuration
//! and process concerns live in the service crate.
//!
//! ```
//! use std::sync::Arc;
//! use token_authority::{CredentialStore, SigningSecret, TokenAuthority};
//!
//! let store = Arc::new(CredentialStore::new());
//! store.register("alice", "wonderland").unwrap();
//!
//! let secret = SigningSecret::new("a-long-random-signing-secret").unwrap();
//! let authority = TokenAuthority::new(store, &secret);
//!
//! let issued = authority.authenticate("alice", "wonderland").unwrap();
//! let identity = authority.validate(&issued.token).unwrap();
//! assert_eq!(identity.subject, "alice");
//! ```

pub mod authority;
pub mod clock;
pub mod credentials;
pub mod error;
pub mod secret;
pub mod token;

pub use authority::{TokenAuthority, DEFAULT_TOKEN_LIFETIME_HOURS};
pub use clock::{Clock, MockClock, SystemClock};
pub use credentials::{CredentialStore, CredentialVerifier, SecretFormat};
pub use error::{AuthenticateError, CredentialError, SecretError, ValidationError};
pub use secret::{
    assess_secret, generate_signing_secret, SecretAssessment, SecretStrength, SecretWeakness,
    SigningSecret, MIN_SECRET_BYTES,
};
pub use token::{Claims, IssuedToken, VerifiedIdentity, TOKEN_ALGORITHM};
