//! Auth Service
//!
//! gRPC front end for the `token-authority` engine: exchanges
//! username/password pairs for signed tokens and validates tokens.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod grpc;
pub mod telemetry;

pub use bootstrap::build_authority;
pub use config::Settings;
pub use error::ServiceError;

/// Generated protobuf types and service stubs
pub mod veil {
    pub mod auth {
        pub mod v1 {
            tonic::include_proto!("veil.auth.v1");
        }
    }
}
