//! HTTP client for the user-management backend.
//!
//! Every outbound call goes through [`ApiClient::request`], which owns header
//! defaults, transport error mapping, content-type handling and error-message
//! derivation. The two public operations only destructure the response shape.

pub mod error;
pub mod message;
pub mod types;

use std::sync::Arc;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Response, StatusCode};
use serde_json::Value;

pub use error::ApiError;
pub use types::{LoadingState, RegisterData, RegisterPayload, User, UsersPayload};

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const API_URL_ENV: &str = "USERDESK_API_URL";
pub const REGISTER_ENDPOINT: &str = "/auth/register";
pub const USERS_ENDPOINT: &str = "/auth/users";
const JSON_PARSE_ERROR_MESSAGE: &str = "Failed to parse response as JSON";

/// Resolved client configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
    explicit: bool,
}

impl ApiConfig {
    /// Build from an optional configured URL, falling back to [`DEFAULT_API_URL`].
    pub fn new(configured: Option<&str>) -> Self {
        let configured = configured.map(str::trim).filter(|s| !s.is_empty());
        let raw = configured.unwrap_or(DEFAULT_API_URL);
        Self {
            base_url: raw.strip_suffix('/').unwrap_or(raw).to_string(),
            explicit: configured.is_some(),
        }
    }

    /// Read the URL from the `USERDESK_API_URL` environment variable.
    pub fn from_env() -> Self {
        Self::new(std::env::var(API_URL_ENV).ok().as_deref())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether the URL came from configuration rather than the built-in default.
    pub fn is_explicit(&self) -> bool {
        self.explicit
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Per-call request options. Headers here override the JSON defaults.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn json(body: Value) -> Self {
        Self {
            headers: Vec::new(),
            body: Some(body),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Stateless client bound to one base URL.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Build a client. `interactive` marks long-lived front ends, where a missing
    /// URL configuration is worth a warning.
    pub fn new(config: ApiConfig, interactive: bool) -> Result<Self, ApiError> {
        if interactive && !config.is_explicit() {
            tracing::warn!(
                "{API_URL_ENV} is not set. Using default: {}",
                config.base_url()
            );
        }
        let client = Client::builder()
            .build()
            .map_err(|e| ApiError::unknown(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    /// Register a new user.
    ///
    /// # Arguments
    ///
    /// * `data` - Email, name and password, sent as the JSON body of `POST /auth/register`.
    ///
    /// # Returns
    ///
    /// The user as stored by the backend, read from either the `{ "user": ... }`
    /// envelope or a bare user object. Any other 2xx body is a contract violation.
    pub async fn register(&self, data: &RegisterData) -> Result<User, ApiError> {
        let body = serde_json::to_value(data).map_err(|e| ApiError::unknown(e.to_string()))?;
        let response = self
            .request(Method::POST, REGISTER_ENDPOINT, RequestOptions::json(body))
            .await?;
        RegisterPayload::classify(response)
            .ok_or_else(|| ApiError::new("Invalid response format from registration endpoint"))?
            .into_user()
    }

    /// Fetch all users from `GET /auth/users`.
    ///
    /// # Returns
    ///
    /// The users in server order, from either a bare array or a
    /// `{ "users": [...] }` envelope.
    pub async fn get_users(&self) -> Result<Vec<User>, ApiError> {
        let response = self
            .request(Method::GET, USERS_ENDPOINT, RequestOptions::default())
            .await?;
        UsersPayload::classify(response)
            .ok_or_else(|| ApiError::new("Invalid response format from users endpoint"))?
            .into_users()
    }

    /// Issue one request and normalise the response into JSON or an [`ApiError`].
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP method.
    /// * `endpoint` - Path appended to the base URL, e.g. `/auth/users`.
    /// * `options` - Extra headers (overriding the JSON defaults) and an optional JSON body.
    ///
    /// # Returns
    ///
    /// The parsed JSON body of a 2xx response; an empty object for 204. Non-JSON
    /// responses always fail, even on 2xx.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.config.base_url(), endpoint);
        let headers = merge_headers(&options.headers)?;

        let mut builder = self.client.request(method.clone(), &url).headers(headers);
        if let Some(body) = &options.body {
            // keeps a caller-supplied Content-Type
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_send_error)?;
        let status = response.status();
        tracing::debug!(%method, %url, status = status.as_u16(), "api response");

        interpret_response(response).await
    }
}

fn merge_headers(overrides: &[(String, String)]) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    for (name, value) in overrides {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::unknown(format!("invalid header name {name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::unknown(format!("invalid header value: {e}")))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

fn map_send_error(error: reqwest::Error) -> ApiError {
    if error.is_builder() {
        ApiError::unknown(error.to_string())
    } else {
        tracing::debug!(%error, "transport failure");
        ApiError::network()
    }
}

fn status_text(status: StatusCode) -> Option<String> {
    status.canonical_reason().map(str::to_string)
}

async fn interpret_response(response: Response) -> Result<Value, ApiError> {
    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        return Ok(Value::Object(serde_json::Map::new()));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let text = match response.text().await {
        Ok(text) => text,
        Err(error) if is_json_content(content_type.as_deref()) => {
            tracing::debug!(%error, "failed reading JSON body");
            return Err(ApiError::with_status(
                JSON_PARSE_ERROR_MESSAGE,
                status.as_u16(),
                status_text(status),
            ));
        }
        Err(error) => return Err(ApiError::unknown(error.to_string())),
    };

    normalize(status.as_u16(), status_text(status), content_type.as_deref(), &text)
}

fn is_json_content(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.contains("application/json"))
}

/// Turn a received response into JSON or an [`ApiError`]; transport-free so it can be unit tested.
///
/// # Arguments
///
/// * `status` / `status_text` - Status line of the response.
/// * `content_type` - Value of the `Content-Type` header, if any.
/// * `body` - Full response body.
pub fn normalize(
    status: u16,
    status_text: Option<String>,
    content_type: Option<&str>,
    body: &str,
) -> Result<Value, ApiError> {
    if status == 204 {
        return Ok(Value::Object(serde_json::Map::new()));
    }

    if !is_json_content(content_type) {
        let message = if body.is_empty() {
            format!(
                "Unexpected content type: {}",
                content_type.unwrap_or("none")
            )
        } else {
            body.to_string()
        };
        return Err(ApiError::with_status(message, status, status_text));
    }

    let data: Value = serde_json::from_str(body).map_err(|_| {
        ApiError::with_status(JSON_PARSE_ERROR_MESSAGE, status, status_text.clone())
    })?;

    if !(200..300).contains(&status) {
        let message = message::derive_error_message(&data, status);
        return Err(ApiError::with_status(message, status, status_text));
    }

    Ok(data)
}

/// Hands out clients according to the host's lifetime policy.
///
/// Long-lived hosts share one instance; short-lived hosts get a fresh one per
/// call. Both kinds behave identically.
#[derive(Clone, Debug)]
pub enum ClientProvider {
    Shared(Arc<ApiClient>),
    PerRequest(ApiConfig),
}

impl ClientProvider {
    /// One client reused for every call (interactive, long-lived process).
    ///
    /// # Returns
    ///
    /// The provider, or an unknown [`ApiError`] when the HTTP client cannot be built.
    pub fn shared(config: ApiConfig) -> Result<Self, ApiError> {
        Ok(Self::Shared(Arc::new(ApiClient::new(config, true)?)))
    }

    /// A fresh client for every call (one-shot, short-lived process).
    pub fn per_request(config: ApiConfig) -> Self {
        Self::PerRequest(config)
    }

    pub fn client(&self) -> Result<Arc<ApiClient>, ApiError> {
        match self {
            Self::Shared(client) => Ok(Arc::clone(client)),
            Self::PerRequest(config) => Ok(Arc::new(ApiClient::new(config.clone(), false)?)),
        }
    }

    pub fn base_url(&self) -> &str {
        match self {
            Self::Shared(client) => client.base_url(),
            Self::PerRequest(config) => config.base_url(),
        }
    }

    pub async fn register(&self, data: &RegisterData) -> Result<User, ApiError> {
        self.client()?.register(data).await
    }

    pub async fn get_users(&self) -> Result<Vec<User>, ApiError> {
        self.client()?.get_users().await
    }
}
