// Types shared by the session manager and identity providers
pub mod common;

mod error;
pub mod provider;
mod session;
mod settings;

pub use common::{AuthChangeEvent, AuthStateChange, Session, User, REFRESH_MARGIN};
pub use error::AuthError;
pub use provider::{
    AuthResponse, HostedAuthProvider, IdentityProvider, PasswordCredentials, ProviderError,
    SessionStore, SignUpCredentials,
};
pub use session::{AuthPhase, AuthResult, AuthState, AuthStateReader, SessionManager};
pub use settings::Settings;
