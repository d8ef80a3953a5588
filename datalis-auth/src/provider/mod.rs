mod hosted;
mod session_store;

pub use hosted::HostedAuthProvider;
pub use session_store::SessionStore;

use crate::common::{AuthStateChange, Session, User};
use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;
use tokio::sync::broadcast;

/// Boundary to the identity service that owns users and sessions.
///
/// Every session change (sign-in, sign-out, token refresh) is published to
/// the receivers handed out by [`IdentityProvider::subscribe`].
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn subscribe(&self) -> broadcast::Receiver<AuthStateChange>;

    async fn get_session(&self) -> Result<Option<Session>, ProviderError>;

    async fn sign_up(&self, credentials: SignUpCredentials) -> Result<AuthResponse, ProviderError>;

    async fn sign_in_with_password(
        &self,
        credentials: PasswordCredentials,
    ) -> Result<AuthResponse, ProviderError>;

    async fn sign_out(&self) -> Result<(), ProviderError>;
}

pub struct SignUpCredentials {
    pub email: String,
    pub password: SecretString,
    pub username: String,
}

pub struct PasswordCredentials {
    pub email: String,
    pub password: SecretString,
}

/// What the provider handed back for a signup or sign-in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthResponse {
    pub user: Option<User>,
    pub session: Option<Session>,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    /// Rejection reported by the provider itself (bad credentials, weak
    /// password, rate limit, ...).
    #[error("{message}")]
    Auth { status: Option<u16>, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode provider response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ProviderError {
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            status: None,
            message: message.into(),
        }
    }
}
