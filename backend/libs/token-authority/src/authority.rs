//! Token Authority: credential check, token issuance, token verification
//!
//! ## Security Design
//!
//! - **HS256 ONLY**: the header's `alg` is checked before any verification,
//!   anything else is `UnsupportedAlgorithm`
//! - **Signature before claims**: the HMAC is verified over the raw
//!   `header.claims` text, so any edit to either segment is `InvalidSignature`
//! - **Stateless verification**: no credential lookup, no issued-token ledger
//! - **Explicit dependencies**: verifier, secret and clock come in through the
//!   constructor, nothing is read from ambient configuration

use crate::clock::{Clock, SystemClock};
use crate::credentials::CredentialVerifier;
use crate::error::{AuthenticateError, ValidationError};
use crate::secret::SigningSecret;
use crate::token::{
    raw_header_algorithm, Claims, IssuedToken, VerifiedIdentity, TOKEN_ALGORITHM,
    TOKEN_ALGORITHM_NAME,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, decode_header, encode, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_TOKEN_LIFETIME_HOURS: i64 = 24;

pub struct TokenAuthority {
    verifier: Arc<dyn CredentialVerifier>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
    token_lifetime: Duration,
}

impl TokenAuthority {
    /// Build an authority around `verifier` and the shared signing `secret`.
    ///
    /// Uses the system clock and a 24 hour token lifetime.
    pub fn new(verifier: Arc<dyn CredentialVerifier>, secret: &SigningSecret) -> Self {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        // Expiry is checked against the injected clock, not the library's.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            verifier,
            encoding_key: EncodingKey::from_secret(secret.expose()),
            decoding_key: DecodingKey::from_secret(secret.expose()),
            validation,
            clock: Arc::new(SystemClock),
            token_lifetime: Duration::hours(DEFAULT_TOKEN_LIFETIME_HOURS),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_token_lifetime(mut self, lifetime: Duration) -> Self {
        self.token_lifetime = lifetime;
        self
    }

    pub fn token_lifetime(&self) -> Duration {
        self.token_lifetime
    }

    /// Check `identity`/`presented` and mint a token on success.
    ///
    /// Unknown identity and wrong secret both return
    /// [`AuthenticateError::InvalidCredentials`].
    pub fn authenticate(
        &self,
        identity: &str,
        presented: &str,
    ) -> Result<IssuedToken, AuthenticateError> {
        if !self.verifier.verify(identity, presented) {
            warn!(
                event = "authentication_failed",
                identity = %identity,
                "invalid username or password"
            );
            return Err(AuthenticateError::InvalidCredentials);
        }

        let issued = self.issue(identity)?;
        info!(
            event = "token_issued",
            identity = %identity,
            expires_at = %issued.expires_at
        );
        Ok(issued)
    }

    fn issue(&self, subject: &str) -> Result<IssuedToken, AuthenticateError> {
        let iat = self.clock.now().timestamp();
        let exp = iat + self.token_lifetime.num_seconds();

        let claims = Claims {
            sub: subject.to_string(),
            iat,
            exp,
        };

        let token = encode(&Header::new(TOKEN_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AuthenticateError::Issuance(e.to_string()))?;

        let issued_at = from_unix(iat)
            .ok_or_else(|| AuthenticateError::Issuance("issued-at out of range".to_string()))?;
        let expires_at = from_unix(exp)
            .ok_or_else(|| AuthenticateError::Issuance("expiry out of range".to_string()))?;

        Ok(IssuedToken {
            token,
            subject: claims.sub,
            issued_at,
            expires_at,
        })
    }

    /// Verify `token` and recover the identity it was issued to.
    ///
    /// The credential store is not consulted.
    pub fn validate(&self, token: &str) -> Result<VerifiedIdentity, ValidationError> {
        let result = self.verify_token(token);
        match &result {
            Ok(identity) => {
                debug!(event = "token_validated", identity = %identity.subject);
            }
            Err(err) => {
                warn!(event = "token_validation_failed", reason = err.kind());
            }
        }
        result
    }

    fn verify_token(&self, token: &str) -> Result<VerifiedIdentity, ValidationError> {
        // 1. Structure: exactly header.claims.signature
        if token.split('.').count() != 3 {
            return Err(ValidationError::MalformedToken);
        }

        // 2. Algorithm
        let header = match decode_header(token) {
            Ok(header) => header,
            Err(_) => {
                return Err(match raw_header_algorithm(token) {
                    Some(alg) if alg != TOKEN_ALGORITHM_NAME => {
                        ValidationError::UnsupportedAlgorithm(alg)
                    }
                    _ => ValidationError::MalformedToken,
                });
            }
        };

        if header.alg != TOKEN_ALGORITHM {
            return Err(ValidationError::UnsupportedAlgorithm(format!(
                "{:?}",
                header.alg
            )));
        }

        // 3. Signature, then claims structure
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        let claims = token_data.claims;

        // 4. Expiry: valid up to and including `exp`
        let now = self.clock.now().timestamp();
        if now > claims.exp {
            return Err(ValidationError::TokenExpired);
        }

        let expires_at = from_unix(claims.exp).ok_or(ValidationError::MalformedToken)?;

        Ok(VerifiedIdentity {
            subject: claims.sub,
            expires_at,
        })
    }
}

impl fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("algorithm", &TOKEN_ALGORITHM)
            .field("token_lifetime", &self.token_lifetime)
            .finish_non_exhaustive()
    }
}

fn from_unix(secs: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use crate::credentials::CredentialStore;

    fn authority_with(secret: &str) -> TokenAuthority {
        let store = Arc::new(CredentialStore::new());
        store.register("alice", "wonderland").unwrap();
        TokenAuthority::new(store, &SigningSecret::new(secret).unwrap())
    }

    #[test]
    fn test_issue_and_validate() {
        let authority = authority_with("test_secret");

        let issued = authority.authenticate("alice", "wonderland").unwrap();
        assert_eq!(issued.subject, "alice");
        assert_eq!(issued.token.matches('.').count(), 2); // JWT has 3 parts
        assert_eq!(
            issued.expires_at - issued.issued_at,
            Duration::hours(DEFAULT_TOKEN_LIFETIME_HOURS)
        );

        let verified = authority.validate(&issued.token).unwrap();
        assert_eq!(verified.subject, "alice");
        assert_eq!(verified.expires_at, issued.expires_at);
    }

    #[test]
    fn test_wrong_secret_and_unknown_identity_are_identical() {
        let authority = authority_with("test_secret");

        let wrong = authority.authenticate("alice", "wrong").unwrap_err();
        let unknown = authority.authenticate("mallory", "wonderland").unwrap_err();

        assert_eq!(wrong, AuthenticateError::InvalidCredentials);
        assert_eq!(wrong, unknown);
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[test]
    fn test_custom_lifetime_and_clock() {
        let clock = MockClock::default();
        let authority = authority_with("test_secret")
            .with_clock(Arc::new(clock.clone()))
            .with_token_lifetime(Duration::minutes(5));

        let issued = authority.authenticate("alice", "wonderland").unwrap();
        assert_eq!(issued.expires_at - issued.issued_at, Duration::minutes(5));

        clock.advance(Duration::minutes(5));
        assert!(authority.validate(&issued.token).is_ok());

        clock.advance(Duration::seconds(1));
        assert_eq!(
            authority.validate(&issued.token).unwrap_err(),
            ValidationError::TokenExpired
        );
    }

    #[test]
    fn test_garbage_is_malformed() {
        let authority = authority_with("test_secret");

        assert_eq!(
            authority.validate("not-a-token").unwrap_err(),
            ValidationError::MalformedToken
        );
        assert_eq!(
            authority.validate("").unwrap_err(),
            ValidationError::MalformedToken
        );
        assert_eq!(
            authority.validate("invalid.token.string").unwrap_err(),
            ValidationError::MalformedToken
        );
    }

    #[test]
    fn test_wrong_segment_count_is_malformed_before_algorithm() {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

        let authority = authority_with("test_secret");
        let foreign = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);

        for token in [
            foreign.clone(),
            format!("{foreign}.x"),
            format!("{foreign}.e30.sig.extra"),
        ] {
            assert_eq!(
                authority.validate(&token).unwrap_err(),
                ValidationError::MalformedToken,
                "{token}"
            );
        }

        // Same header in a well-formed shell reaches the algorithm check
        assert_eq!(
            authority.validate(&format!("{foreign}.e30.sig")).unwrap_err(),
            ValidationError::UnsupportedAlgorithm("RS256".to_string())
        );
    }

    #[test]
    fn test_debug_does_not_expose_keys() {
        let authority = authority_with("debug-secret-value");
        let printed = format!("{:?}", authority);
        assert!(printed.contains("HS256"));
        assert!(!printed.contains("debug-secret-value"));
    }
}
