use reqwest::header::HeaderMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::borrow::Cow;

pub use reqwest::Method;

/// A single backend call: method, path and payload.
///
/// `endpoint` is relative to the `/api` base, e.g. `/workbenches/{id}`.
pub trait Request {
    type Data: Serialize;
    type Response: DeserializeOwned;
    const METHOD: Method = Method::GET;

    fn endpoint(&self) -> Cow<'_, str>;

    fn data(&self) -> RequestData<'_, Self::Data> {
        RequestData::Empty
    }

    /// Extra headers, applied after the defaults so they win on conflict.
    fn headers(&self) -> HeaderMap {
        HeaderMap::new()
    }
}

pub enum RequestData<'a, T> {
    Empty,
    Query(&'a T),
    Json(&'a T),
    File(&'a FileUpload),
}

/// A file sent as the `file` field of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Body for the untyped request primitive.
#[derive(Debug, Clone)]
pub enum Body {
    Json(serde_json::Value),
    File(FileUpload),
}

/// Options for [`crate::Client::request`], the untyped request primitive.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Body>,
    pub headers: HeaderMap,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: HeaderMap::new(),
        }
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(Body::Json(body));
        self
    }

    pub fn file(mut self, file: FileUpload) -> Self {
        self.body = Some(Body::File(file));
        self
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}
