use jsonwebtoken::errors::ErrorKind;
use thiserror::Error;

/// Credential store errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("identity must not be empty")]
    EmptyIdentity,

    #[error("failed to hash secret: {0}")]
    Hashing(String),
}

/// Signing secret errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SecretError {
    #[error("signing secret must not be empty")]
    Empty,

    #[error("secret length must be at least {min} bytes")]
    TooShort { min: usize },

    #[error("failed to generate random bytes")]
    Random,
}

/// Authenticate failures.
///
/// Unknown identity and wrong secret are deliberately the same variant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthenticateError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("failed to issue token: {0}")]
    Issuance(String),
}

/// Validate failures, one variant per cause.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("malformed token")]
    MalformedToken,

    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token expired")]
    TokenExpired,
}

impl ValidationError {
    /// Short stable label for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::MalformedToken => "malformed_token",
            ValidationError::UnsupportedAlgorithm(_) => "unsupported_algorithm",
            ValidationError::InvalidSignature => "invalid_signature",
            ValidationError::TokenExpired => "token_expired",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for ValidationError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => ValidationError::InvalidSignature,
            ErrorKind::ExpiredSignature => ValidationError::TokenExpired,
            ErrorKind::InvalidAlgorithm | ErrorKind::MissingAlgorithm => {
                ValidationError::UnsupportedAlgorithm("unknown".to_string())
            }
            ErrorKind::InvalidAlgorithmName => {
                ValidationError::UnsupportedAlgorithm("unrecognized".to_string())
            }
            _ => ValidationError::MalformedToken,
        }
    }
}
