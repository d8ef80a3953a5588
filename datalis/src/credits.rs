use chrono::{SecondsFormat, Utc};
use datalis_auth::{AuthStateReader, Settings};
use reqwest::header::ACCEPT;
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

const REST_PATH: &str = "/rest/v1";
const WALLET_TABLE: &str = "/wallet";
/// Asks the data API for a single object instead of an array.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

#[derive(Debug, Error)]
pub enum CreditsError {
    #[error("Not signed in")]
    SignedOut,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Wallet request failed with status {0}")]
    Status(StatusCode),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditsState {
    pub credits: i64,
    pub loading: bool,
}

impl Default for CreditsState {
    fn default() -> Self {
        Self {
            credits: 0,
            loading: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WalletRow {
    credits_balance: Option<i64>,
}

#[derive(Debug, Serialize)]
struct WalletUpdate {
    credits_balance: i64,
    last_deducted_credit: String,
}

/// Credit balance of the signed-in user, kept in the `wallet` table of the
/// hosted data API.
pub struct CreditsWallet {
    http: reqwest::Client,
    rest_url: String,
    anon_key: SecretString,
    auth: AuthStateReader,
    state: watch::Sender<CreditsState>,
}

impl CreditsWallet {
    pub fn new(settings: &Settings, auth: AuthStateReader) -> Self {
        let (state, _) = watch::channel(CreditsState::default());
        Self {
            http: reqwest::Client::new(),
            rest_url: format!("{}{}", settings.auth_url.trim_end_matches('/'), REST_PATH),
            anon_key: SecretString::from(settings.auth_anon_key.clone()),
            auth,
            state,
        }
    }

    pub fn state(&self) -> CreditsState {
        self.state.borrow().clone()
    }

    pub fn credits(&self) -> i64 {
        self.state.borrow().credits
    }

    pub fn subscribe(&self) -> watch::Receiver<CreditsState> {
        self.state.subscribe()
    }

    fn request(&self, method: Method, user_id: &str) -> Result<RequestBuilder, CreditsError> {
        let token = self.auth.access_token().ok_or(CreditsError::SignedOut)?;
        Ok(self
            .http
            .request(method, format!("{}{}", self.rest_url, WALLET_TABLE))
            .query(&[("user_id", format!("eq.{}", user_id))])
            .header("apikey", self.anon_key.expose_secret())
            .bearer_auth(token.expose_secret()))
    }

    fn user_id(&self) -> Result<String, CreditsError> {
        self.auth
            .user()
            .map(|user| user.id)
            .ok_or(CreditsError::SignedOut)
    }

    /// Reload the balance. A missing balance counts as zero.
    pub async fn refetch(&self) -> Result<i64, CreditsError> {
        let result = self.fetch().await;
        self.state.send_modify(|s| {
            if let Ok(credits) = &result {
                s.credits = *credits;
            }
            s.loading = false;
        });

        if let Err(e) = &result {
            tracing::error!("Failed to fetch credit balance: {}", e);
        }
        result
    }

    async fn fetch(&self) -> Result<i64, CreditsError> {
        let user_id = self.user_id()?;
        let response = self
            .request(Method::GET, &user_id)?
            .query(&[("select", "credits_balance")])
            .header(ACCEPT, SINGLE_OBJECT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CreditsError::Status(response.status()));
        }

        let row: WalletRow = response.json().await?;
        Ok(row.credits_balance.unwrap_or(0))
    }

    /// Deduct `amount` credits. Returns `false` when the wallet could not be
    /// updated; the local balance is only changed on success.
    pub async fn deduct_credits(&self, amount: i64, description: &str) -> bool {
        match self.write_balance(self.credits() - amount).await {
            Ok(()) => {
                self.state.send_modify(|s| s.credits -= amount);
                tracing::info!(amount, description, "Credits deducted");
                true
            }
            Err(e) => {
                tracing::error!("Failed to deduct credits: {}", e);
                false
            }
        }
    }

    async fn write_balance(&self, balance: i64) -> Result<(), CreditsError> {
        let user_id = self.user_id()?;
        let update = WalletUpdate {
            credits_balance: balance,
            last_deducted_credit: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        let response = self
            .request(Method::PATCH, &user_id)?
            .json(&update)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CreditsError::Status(response.status()));
        }
        Ok(())
    }
}
