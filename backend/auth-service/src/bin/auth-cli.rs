//! Command-line client for the auth service
//!
//! ```text
//! auth-cli authenticate <username> <password>
//! auth-cli validate <token>
//! auth-cli generate-secret [--bytes 64]
//! ```

use anyhow::{Context, Result};
use auth_service::veil::auth::v1::{
    auth_service_client::AuthServiceClient, AuthenticateRequest, ValidateRequest,
};
use clap::{Parser, Subcommand};
use tonic::transport::Channel;
use token_authority::{generate_signing_secret, MIN_SECRET_BYTES};

#[derive(Parser, Debug)]
#[command(author, version, about = "Auth service client", long_about = None)]
struct Cli {
    /// Server endpoint
    #[arg(long, env = "AUTH_ENDPOINT", default_value = "http://localhost:50051")]
    endpoint: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Exchange a username and password for a token
    Authenticate { username: String, password: String },
    /// Check a token and print the identity it belongs to
    Validate { token: String },
    /// Print a random value for `secret_key` (no server needed)
    GenerateSecret {
        /// Random bytes before encoding
        #[arg(long, default_value_t = 64, value_parser = clap::value_parser!(u16).range(MIN_SECRET_BYTES as i64..))]
        bytes: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Authenticate { username, password } => {
            let resp = connect(&cli.endpoint)
                .await?
                .authenticate(AuthenticateRequest { username, password })
                .await
                .context("could not authenticate")?
                .into_inner();
            println!("Token: {}", resp.token);
        }
        Command::Validate { token } => {
            let resp = connect(&cli.endpoint)
                .await?
                .validate(ValidateRequest { token })
                .await
                .context("could not validate")?
                .into_inner();
            println!("Valid: {}", resp.valid);
            println!("User ID: {}", resp.user_id);
        }
        Command::GenerateSecret { bytes } => {
            let secret = generate_signing_secret(usize::from(bytes))
                .context("could not generate secret")?;
            println!("{secret}");
        }
    }

    Ok(())
}

async fn connect(endpoint: &str) -> Result<AuthServiceClient<Channel>> {
    AuthServiceClient::connect(endpoint.to_string())
        .await
        .with_context(|| format!("could not connect to {endpoint}"))
}
