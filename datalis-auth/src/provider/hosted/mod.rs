mod models;

use async_trait::async_trait;
use models::*;
use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::{broadcast, watch};

use super::{
    AuthResponse, IdentityProvider, PasswordCredentials, ProviderError, SessionStore,
    SignUpCredentials,
};
use crate::common::{AuthChangeEvent, AuthStateChange, Session};
use crate::error::AuthError;
use crate::settings::Settings;

const AUTH_PATH: &str = "/auth/v1";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const EVENT_CAPACITY: usize = 16;

/// Identity provider backed by the hosted auth service's REST API.
pub struct HostedAuthProvider {
    http_client: Client,
    auth_url: String,
    anon_key: SecretString,
    email_redirect_to: Option<String>,
    store: Option<SessionStore>,
    current: watch::Sender<Option<Session>>,
    events: broadcast::Sender<AuthStateChange>,
}

impl HostedAuthProvider {
    pub fn new(settings: &Settings) -> Result<Self, AuthError> {
        settings.validate_auth().map_err(AuthError::Configuration)?;

        let http_client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AuthError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        let (current, _) = watch::channel(None);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            http_client,
            auth_url: format!("{}{}", settings.auth_url.trim_end_matches('/'), AUTH_PATH),
            anon_key: SecretString::from(settings.auth_anon_key.clone()),
            email_redirect_to: settings.email_redirect_to.clone(),
            store: None,
            current,
            events,
        })
    }

    /// Persist sessions across restarts.
    pub fn with_session_store(mut self, store: SessionStore) -> Self {
        self.store = Some(store);
        self
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http_client
            .request(method, format!("{}{}", self.auth_url, path))
            .header("apikey", self.anon_key.expose_secret())
    }

    async fn token_grant<T>(&self, grant_type: &str, body: &T) -> Result<Session, ProviderError>
    where
        T: serde::Serialize + ?Sized,
    {
        let response = self
            .request(Method::POST, "/token")
            .query(&[("grant_type", grant_type)])
            .json(body)
            .send()
            .await?;

        let tokens: TokenResponse = decode(response).await?;
        Ok(tokens.into_session())
    }

    async fn refresh(&self, session: &Session) -> Result<Session, ProviderError> {
        tracing::debug!(user_id = %session.user.id, "Refreshing session");
        self.token_grant(
            "refresh_token",
            &RefreshGrant {
                refresh_token: &session.refresh_token,
            },
        )
        .await
    }

    async fn revoke(&self, session: &Session) -> Result<(), ProviderError> {
        let response = self
            .request(Method::POST, "/logout")
            .bearer_auth(&session.access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(rejection(status, &body));
        }
        Ok(())
    }

    fn load_stored(&self) -> Option<Session> {
        let store = self.store.as_ref()?;
        match store.load() {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Failed to load stored session: {}", e);
                None
            }
        }
    }

    /// Replace the current session, persist it and notify subscribers.
    fn set_session(&self, session: Option<Session>, event: AuthChangeEvent) {
        if let Some(store) = &self.store {
            let result = match &session {
                Some(session) => store.save(session),
                None => store.delete(),
            };
            if let Err(e) = result {
                tracing::warn!("Failed to persist session: {}", e);
            }
        }

        self.publish(session, event);
    }

    fn publish(&self, session: Option<Session>, event: AuthChangeEvent) {
        self.current.send_replace(session.clone());
        tracing::debug!(?event, "Auth state changed");
        // No receivers is fine; nobody is listening yet.
        let _ = self.events.send(AuthStateChange::new(event, session));
    }
}

#[async_trait]
impl IdentityProvider for HostedAuthProvider {
    fn subscribe(&self) -> broadcast::Receiver<AuthStateChange> {
        self.events.subscribe()
    }

    async fn get_session(&self) -> Result<Option<Session>, ProviderError> {
        let cached = self.current.borrow().clone();
        let restored = cached.is_none();
        let Some(session) = cached.or_else(|| self.load_stored()) else {
            return Ok(None);
        };

        if !session.needs_refresh() {
            // Already on disk; only announce it the first time it is read back.
            if restored {
                self.publish(Some(session.clone()), AuthChangeEvent::InitialSession);
            }
            return Ok(Some(session));
        }

        match self.refresh(&session).await {
            Ok(fresh) => {
                self.set_session(Some(fresh.clone()), AuthChangeEvent::TokenRefreshed);
                Ok(Some(fresh))
            }
            Err(ProviderError::Auth { message, .. }) => {
                tracing::warn!("Session refresh rejected: {}", message);
                self.set_session(None, AuthChangeEvent::SignedOut);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn sign_up(&self, credentials: SignUpCredentials) -> Result<AuthResponse, ProviderError> {
        let body = SignUpBody {
            email: &credentials.email,
            password: credentials.password.expose_secret(),
            data: SignUpMetadata {
                username: &credentials.username,
            },
        };

        let mut request = self.request(Method::POST, "/signup").json(&body);
        if let Some(redirect) = &self.email_redirect_to {
            request = request.query(&[("redirect_to", redirect)]);
        }

        let value: Value = decode(request.send().await?).await?;
        let (user, session) = parse_signup(value)?;

        if let Some(session) = &session {
            self.set_session(Some(session.clone()), AuthChangeEvent::SignedIn);
        }

        tracing::info!(
            email = %credentials.email,
            confirmed = session.is_some(),
            "Account created"
        );
        Ok(AuthResponse { user, session })
    }

    async fn sign_in_with_password(
        &self,
        credentials: PasswordCredentials,
    ) -> Result<AuthResponse, ProviderError> {
        let session = self
            .token_grant(
                "password",
                &PasswordGrant {
                    email: &credentials.email,
                    password: credentials.password.expose_secret(),
                },
            )
            .await?;

        self.set_session(Some(session.clone()), AuthChangeEvent::SignedIn);
        tracing::info!(user_id = %session.user.id, "Signed in");

        Ok(AuthResponse {
            user: Some(session.user.clone()),
            session: Some(session),
        })
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        let session = self.current.borrow().clone();
        let remote = match &session {
            Some(session) => self.revoke(session).await,
            None => Ok(()),
        };

        self.set_session(None, AuthChangeEvent::SignedOut);
        remote
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ProviderError> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        return Err(rejection(status, &body));
    }

    Ok(serde_json::from_slice(&body)?)
}

fn rejection(status: reqwest::StatusCode, body: &[u8]) -> ProviderError {
    let message = error_message(body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Authentication request failed")
            .to_string()
    });

    ProviderError::Auth {
        status: Some(status.as_u16()),
        message,
    }
}
