mod result;

pub use result::AuthResult;

use chrono::Utc;
use secrecy::SecretString;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::common::{Session, User};
use crate::provider::{
    AuthResponse, IdentityProvider, PasswordCredentials, ProviderError, SignUpCredentials,
};

const SIGNUP_VERIFICATION_MESSAGE: &str =
    "Account created! Please check your email to verify your account before logging in.";
const SIGNUP_FAILED: &str = "Failed to create account";
const SIGNUP_UNEXPECTED: &str = "An unexpected error occurred during signup.";
const LOGIN_FAILED: &str = "Login failed";
const LOGIN_UNEXPECTED: &str = "An unexpected error occurred during login.";
const EMAIL_NOT_CONFIRMED: &str =
    "Email not confirmed. Please check your email for verification link.";
const INVALID_CREDENTIALS: &str = "Invalid email or password.";

/// Floor between refresh attempts, for sessions shorter than the margin.
const MIN_REFRESH_DELAY: Duration = Duration::from_secs(1);
const REFRESH_RETRY_DELAY: Duration = Duration::from_secs(10);

/// Snapshot of who is logged in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub session: Option<Session>,
    pub loading: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    Initializing,
    Authenticated,
    Anonymous,
}

impl AuthState {
    fn initializing() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn phase(&self) -> AuthPhase {
        match (&self.user, self.loading) {
            (Some(_), _) => AuthPhase::Authenticated,
            (None, true) => AuthPhase::Initializing,
            (None, false) => AuthPhase::Anonymous,
        }
    }

    fn apply_session(&mut self, session: Option<Session>) {
        self.user = session.as_ref().map(|s| s.user.clone());
        self.session = session;
        self.loading = false;
    }
}

/// Read-only view of the session state, handed to consumers.
#[derive(Clone)]
pub struct AuthStateReader {
    rx: watch::Receiver<AuthState>,
}

impl AuthStateReader {
    pub fn current(&self) -> AuthState {
        self.rx.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.rx.borrow().is_authenticated()
    }

    pub fn user(&self) -> Option<User> {
        self.rx.borrow().user.clone()
    }

    pub fn access_token(&self) -> Option<SecretString> {
        self.rx
            .borrow()
            .session
            .as_ref()
            .map(|s| SecretString::from(s.access_token.clone()))
    }

    /// Wait for the next change. Returns `None` once the manager is gone.
    pub async fn changed(&mut self) -> Option<AuthState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Wait until the state satisfies `predicate`.
    pub async fn wait_for<F>(&mut self, predicate: F) -> Option<AuthState>
    where
        F: FnMut(&AuthState) -> bool,
    {
        self.rx.wait_for(predicate).await.ok().map(|state| state.clone())
    }
}

/// Tasks fed by the provider's event stream plus the refresh timer; aborted
/// on drop.
struct Subscription {
    tasks: Vec<JoinHandle<()>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Sets `loading` for the lifetime of one signup/login call.
struct LoadingGuard<'a>(&'a watch::Sender<AuthState>);

impl<'a> LoadingGuard<'a> {
    fn new(state: &'a watch::Sender<AuthState>) -> Self {
        state.send_modify(|s| s.loading = true);
        Self(state)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.send_modify(|s| s.loading = false);
    }
}

/// Owns the process-wide session state.
///
/// State is written only by the provider's event stream, the initial
/// session check, and `sign_out`. Everyone else reads it through an
/// [`AuthStateReader`]. Must be started inside a Tokio runtime.
pub struct SessionManager {
    provider: Arc<dyn IdentityProvider>,
    state: Arc<watch::Sender<AuthState>>,
    _subscription: Subscription,
}

impl SessionManager {
    pub fn start(provider: Arc<dyn IdentityProvider>) -> Self {
        let (state, _) = watch::channel(AuthState::initializing());
        let state = Arc::new(state);
        let event_seen = Arc::new(AtomicBool::new(false));

        // Subscribe before the initial check so no change slips between them.
        let mut events = provider.subscribe();
        let listener = {
            let state = state.clone();
            let event_seen = event_seen.clone();
            tokio::spawn(async move {
                loop {
                    match events.recv().await {
                        Ok(change) => {
                            tracing::debug!(event = ?change.event, "Session changed");
                            event_seen.store(true, Ordering::SeqCst);
                            state.send_modify(|s| s.apply_session(change.session));
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Missed session change events");
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            })
        };

        let initial_check = {
            let state = state.clone();
            let provider = provider.clone();
            tokio::spawn(async move {
                let session = match provider.get_session().await {
                    Ok(session) => session,
                    Err(e) => {
                        tracing::warn!("Initial session check failed: {}", e);
                        None
                    }
                };

                // An event that arrived meanwhile is newer than this answer.
                state.send_if_modified(|s| {
                    if event_seen.load(Ordering::SeqCst) {
                        return false;
                    }
                    s.apply_session(session);
                    true
                });
            })
        };

        let refresher = tokio::spawn(keep_fresh(provider.clone(), state.subscribe()));

        Self {
            provider,
            state,
            _subscription: Subscription {
                tasks: vec![listener, initial_check, refresher],
            },
        }
    }

    pub fn reader(&self) -> AuthStateReader {
        AuthStateReader {
            rx: self.state.subscribe(),
        }
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Create an account. The user still has to verify their email before
    /// logging in, so this never signs anyone in by itself.
    pub async fn signup(&self, email: &str, password: &str, display_name: &str) -> AuthResult {
        let _loading = LoadingGuard::new(&self.state);

        let credentials = SignUpCredentials {
            email: email.to_string(),
            password: SecretString::from(password.to_string()),
            username: display_name.to_string(),
        };

        match self.provider.sign_up(credentials).await {
            Ok(AuthResponse { user: Some(_), .. }) => {
                AuthResult::verification_required(SIGNUP_VERIFICATION_MESSAGE)
            }
            Ok(_) => AuthResult::failure(SIGNUP_FAILED),
            Err(ProviderError::Auth { message, .. }) => {
                AuthResult::failure(non_empty(message, SIGNUP_FAILED))
            }
            Err(e) => {
                tracing::error!("Signup error: {}", e);
                AuthResult::failure(SIGNUP_UNEXPECTED)
            }
        }
    }

    /// Sign in with email and password. On success the user and session
    /// arrive through the provider's event stream.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult {
        let _loading = LoadingGuard::new(&self.state);

        let credentials = PasswordCredentials {
            email: email.to_string(),
            password: SecretString::from(password.to_string()),
        };

        match self.provider.sign_in_with_password(credentials).await {
            Ok(AuthResponse { user: Some(_), .. }) => AuthResult::success(),
            Ok(_) => AuthResult::failure(LOGIN_FAILED),
            Err(ProviderError::Auth { message, .. }) => AuthResult::failure(login_error(message)),
            Err(e) => {
                tracing::error!("Login error: {}", e);
                AuthResult::failure(LOGIN_UNEXPECTED)
            }
        }
    }

    /// Sign out. Local state is cleared even when the provider call fails.
    pub async fn sign_out(&self) {
        if let Err(e) = self.provider.sign_out().await {
            tracing::warn!("Provider sign-out failed, clearing local session: {}", e);
        }

        self.state.send_modify(|s| {
            s.user = None;
            s.session = None;
        });
    }
}

/// Ask the provider for the session whenever the current one enters its
/// refresh margin. The provider refreshes it and announces the new tokens
/// through its event stream, which the listener applies.
async fn keep_fresh(provider: Arc<dyn IdentityProvider>, mut state: watch::Receiver<AuthState>) {
    loop {
        let due = state
            .borrow_and_update()
            .session
            .as_ref()
            .map(Session::refresh_due_at);

        let Some(due) = due else {
            if state.changed().await.is_err() {
                return;
            }
            continue;
        };

        let delay = (due - Utc::now())
            .to_std()
            .unwrap_or_default()
            .max(MIN_REFRESH_DELAY);

        tokio::select! {
            changed = state.changed() => {
                if changed.is_err() {
                    return;
                }
            }
            _ = tokio::time::sleep(delay) => {
                tracing::debug!("Session is due for refresh");
                if let Err(e) = provider.get_session().await {
                    tracing::warn!("Session refresh failed, retrying: {}", e);
                    tokio::time::sleep(REFRESH_RETRY_DELAY).await;
                }
            }
        }
    }
}

fn login_error(message: String) -> String {
    if message.contains("Email not confirmed") {
        EMAIL_NOT_CONFIRMED.to_string()
    } else if message.contains("Invalid login credentials") {
        INVALID_CREDENTIALS.to_string()
    } else {
        non_empty(message, LOGIN_FAILED)
    }
}

fn non_empty(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
