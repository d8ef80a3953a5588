pub mod endpoints;
mod error;
mod macros;
pub mod repositories;
mod request;

pub use crate::error::{ApiError, DatalisApiError};
pub use crate::request::{
    Body, FileUpload, Method, Request as ApiRequest, RequestData, RequestOptions,
};
use repositories::*;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::sync::Arc;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
const API_PREFIX: &str = "/api";

/// Supplies the access token attached to outgoing requests.
///
/// Consulted on every request, so a token refreshed or cleared between
/// calls is picked up immediately.
pub trait TokenSource: Send + Sync {
    fn access_token(&self) -> Option<SecretString>;
}

impl<F> TokenSource for F
where
    F: Fn() -> Option<SecretString> + Send + Sync,
{
    fn access_token(&self) -> Option<SecretString> {
        self()
    }
}

/// Token source for unauthenticated clients.
pub struct NoToken;

impl TokenSource for NoToken {
    fn access_token(&self) -> Option<SecretString> {
        None
    }
}

#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
}

impl Client {
    pub fn new(backend_url: &str, tokens: impl TokenSource + 'static) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: format!("{}{}", backend_url.trim_end_matches('/'), API_PREFIX),
            tokens: Arc::new(tokens),
        }
    }

    pub fn anonymous(backend_url: &str) -> Self {
        Self::new(backend_url, NoToken)
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a typed request and decode its response.
    ///
    /// Responses without a JSON body decode from `null`, so requests whose
    /// response type is `()` or `Option<_>` accept empty replies.
    pub async fn send<R>(&self, request: R) -> Result<R::Response, DatalisApiError>
    where
        R: ApiRequest,
    {
        let endpoint = request.endpoint();
        let extra = request.headers();

        let builder = match request.data() {
            RequestData::Empty => self.builder(R::METHOD, &endpoint, extra, true)?,
            RequestData::Query(query) => self
                .builder(R::METHOD, &endpoint, extra, true)?
                .query(query),
            RequestData::Json(body) => self
                .builder(R::METHOD, &endpoint, extra, true)?
                .body(serde_json::to_vec(body)?),
            RequestData::File(file) => self
                .builder(R::METHOD, &endpoint, extra, false)?
                .multipart(file_form(file)?),
        };

        let value = self.dispatch(builder, &R::METHOD, &endpoint).await?;
        Ok(serde_json::from_value(value.unwrap_or(Value::Null))?)
    }

    /// Untyped request primitive. Returns `None` when the response carries
    /// no JSON body.
    pub async fn request(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Option<Value>, DatalisApiError> {
        let RequestOptions {
            method,
            body,
            headers,
        } = options;

        let builder = match body {
            None => self.builder(method.clone(), endpoint, headers, true)?,
            Some(Body::Json(value)) => self
                .builder(method.clone(), endpoint, headers, true)?
                .body(serde_json::to_vec(&value)?),
            Some(Body::File(file)) => self
                .builder(method.clone(), endpoint, headers, false)?
                .multipart(file_form(&file)?),
        };

        self.dispatch(builder, &method, endpoint).await
    }

    fn builder(
        &self,
        method: Method,
        endpoint: &str,
        extra: HeaderMap,
        json_content: bool,
    ) -> Result<RequestBuilder, DatalisApiError> {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut headers = HeaderMap::new();
        // Multipart bodies need reqwest to set the boundary itself.
        if json_content {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        headers.extend(extra);

        if let Some(token) = self.tokens.access_token() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(self.http.request(method, url).headers(headers))
    }

    async fn dispatch(
        &self,
        builder: RequestBuilder,
        method: &Method,
        endpoint: &str,
    ) -> Result<Option<Value>, DatalisApiError> {
        tracing::debug!(%method, endpoint, "Sending backend request");

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let err = ApiError::from_body(status, &body);
            tracing::warn!(
                %method,
                endpoint,
                status = status.as_u16(),
                message = %err.message,
                "Backend request failed"
            );
            return Err(err.into());
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("application/json"));

        if !is_json {
            return Ok(None);
        }

        let body = response.bytes().await?;
        if body.is_empty() {
            return Ok(None);
        }

        Ok(Some(serde_json::from_slice(&body)?))
    }
}

fn file_form(file: &FileUpload) -> Result<Form, DatalisApiError> {
    let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
    if let Some(content_type) = &file.content_type {
        part = part.mime_str(content_type)?;
    }
    Ok(Form::new().part("file", part))
}

pub struct Request;

impl Request {
    pub fn agents() -> AgentRepository {
        AgentRepository::new()
    }

    pub fn chat() -> ChatRepository {
        ChatRepository::new()
    }

    pub fn companies() -> CompanyRepository {
        CompanyRepository::new()
    }

    pub fn reports() -> ReportRepository {
        ReportRepository::new()
    }

    pub fn workbenches() -> WorkbenchRepository {
        WorkbenchRepository::new()
    }
}
