/// gRPC AuthService implementation
///
/// Thin mapping between the wire contract and [`TokenAuthority`]:
/// - Authenticate: issued token, or a generic UNAUTHENTICATED status
/// - Validate: always OK; an unusable token is `valid: false`
use std::sync::Arc;
use tonic::{Request, Response, Status};
use tracing::{error, warn};

use crate::error::ServiceError;
use crate::veil::auth::v1::{
    auth_service_server::AuthService, AuthenticateRequest, AuthenticateResponse, ValidateRequest,
    ValidateResponse,
};
use token_authority::{AuthenticateError, TokenAuthority};

pub use crate::veil::auth::v1::auth_service_server::AuthServiceServer;

pub struct AuthServiceImpl {
    authority: Arc<TokenAuthority>,
}

impl AuthServiceImpl {
    pub fn new(authority: Arc<TokenAuthority>) -> Self {
        Self { authority }
    }

    pub fn into_server(self) -> AuthServiceServer<Self> {
        AuthServiceServer::new(self)
    }
}

#[inline]
fn invalid() -> ValidateResponse {
    ValidateResponse {
        valid: false,
        user_id: String::new(),
    }
}

#[tonic::async_trait]
impl AuthService for AuthServiceImpl {
    async fn authenticate(
        &self,
        request: Request<AuthenticateRequest>,
    ) -> Result<Response<AuthenticateResponse>, Status> {
        let req = request.into_inner();

        if req.username.is_empty() {
            warn!(event = "invalid_request", reason = "empty_username");
            return Err(ServiceError::InvalidArgument("username is required".to_string()).into());
        }

        // Argon2 verification is CPU bound
        let authority = self.authority.clone();
        let result = tokio::task::spawn_blocking(move || {
            authority.authenticate(&req.username, &req.password)
        })
        .await
        .map_err(|e| {
            error!(event = "authenticate_task_failed", error = %e);
            ServiceError::Internal(e.to_string())
        })?;

        match result {
            Ok(issued) => Ok(Response::new(AuthenticateResponse {
                token: issued.token,
            })),
            Err(AuthenticateError::Issuance(msg)) => {
                error!(event = "token_issuance_failed", error = %msg);
                Err(ServiceError::Internal(msg).into())
            }
            Err(err) => Err(ServiceError::from(err).into()),
        }
    }

    async fn validate(
        &self,
        request: Request<ValidateRequest>,
    ) -> Result<Response<ValidateResponse>, Status> {
        let req = request.into_inner();

        if req.token.is_empty() {
            return Ok(Response::new(invalid()));
        }

        // Failure causes are logged by the authority, callers only see the flag
        match self.authority.validate(&req.token) {
            Ok(identity) => Ok(Response::new(ValidateResponse {
                valid: true,
                user_id: identity.subject,
            })),
            Err(_) => Ok(Response::new(invalid())),
        }
    }
}
