//! Build the token authority from settings

use crate::config::Settings;
use anyhow::{anyhow, Context, Result};
use secrecy::ExposeSecret;
use std::sync::Arc;
use token_authority::{CredentialStore, SecretFormat, SigningSecret, TokenAuthority};
use tracing::{info, warn};

/// Create the credential store, seed configured users and wrap both in a
/// [`TokenAuthority`].
///
/// No user exists unless configured.
pub fn build_authority(settings: &Settings) -> Result<Arc<TokenAuthority>> {
    let format = if settings.password_hashing {
        SecretFormat::Argon2
    } else {
        SecretFormat::Plaintext
    };
    let store = Arc::new(
        CredentialStore::with_format(format).context("Failed to create credential store")?,
    );

    for (username, password) in &settings.users {
        store
            .register(username, password.expose_secret())
            .with_context(|| format!("Failed to register user {username}"))?;
    }

    if store.is_empty() {
        warn!(
            event = "no_users_configured",
            "credential store is empty; every authentication will fail"
        );
    } else {
        info!(event = "users_seeded", count = store.len(), format = ?store.format());
    }

    let secret = SigningSecret::new(settings.secret_key.expose_secret().as_bytes())
        .context("Invalid secret_key")?;

    let lifetime_secs = i64::try_from(settings.token_ttl_secs)
        .map_err(|_| anyhow!("token_ttl_secs out of range"))?;
    let lifetime = chrono::Duration::try_seconds(lifetime_secs)
        .ok_or_else(|| anyhow!("token_ttl_secs out of range"))?;

    let authority = TokenAuthority::new(store, &secret).with_token_lifetime(lifetime);
    info!(
        event = "token_authority_ready",
        token_ttl_secs = authority.token_lifetime().num_seconds()
    );

    Ok(Arc::new(authority))
}
