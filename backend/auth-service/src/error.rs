use thiserror::Error;
use token_authority::AuthenticateError;
use tonic::{Code, Status};

/// Errors surfaced to gRPC callers
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("authentication failed")]
    InvalidCredentials,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Convert to gRPC Status. Internal detail never reaches the caller.
    pub fn to_status(&self) -> Status {
        match self {
            ServiceError::InvalidCredentials => {
                Status::new(Code::Unauthenticated, "authentication failed")
            }
            ServiceError::InvalidArgument(msg) => Status::new(Code::InvalidArgument, msg.clone()),
            ServiceError::Internal(_) => Status::new(Code::Internal, "internal server error"),
        }
    }
}

impl From<ServiceError> for Status {
    fn from(err: ServiceError) -> Self {
        err.to_status()
    }
}

impl From<AuthenticateError> for ServiceError {
    fn from(err: AuthenticateError) -> Self {
        match err {
            AuthenticateError::InvalidCredentials => ServiceError::InvalidCredentials,
            AuthenticateError::Issuance(msg) => ServiceError::Internal(msg),
        }
    }
}
