//! Authenticated API client
//!
//! One shared client wraps `reqwest` and a configured base URL. Session
//! collaborators (token lookup, unauthorized handling) are injected through
//! [`SessionHooks`] rather than read from globals, so the client stays
//! testable; re-configuration is allowed and the last installed hooks win,
//! which matches how the session re-installs itself on every token change.

use std::sync::{Arc, RwLock};

use common::error::{ApiError, ApiResult};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Session collaborators injected into the client
pub trait SessionHooks: Send + Sync {
    /// Current bearer token, if the session holds one
    fn token(&self) -> Option<String>;

    /// Invoked synchronously when any response comes back with HTTP 401
    fn on_unauthorized(&self);
}

/// Request body variants
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// Serialized as JSON with `Content-Type: application/json`
    Json(Value),
    /// Sent verbatim
    Text(String),
}

/// Per-request options
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Body to send, if any
    pub body: Option<RequestBody>,
    /// When true, never attach an Authorization header
    pub skip_auth: bool,
    /// Explicit bearer token, overriding the session hook for this call
    pub bearer_override: Option<String>,
}

impl RequestOptions {
    /// Options carrying a JSON body
    pub fn json(body: impl serde::Serialize) -> Self {
        RequestOptions {
            body: Some(RequestBody::Json(
                serde_json::to_value(body).unwrap_or(Value::Null),
            )),
            ..Default::default()
        }
    }

    /// Skip the Authorization header for this call
    pub fn skip_auth(mut self) -> Self {
        self.skip_auth = true;
        self
    }

    /// Use an explicit bearer token for this call
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer_override = Some(token.into());
        self
    }
}

/// Parsed response body
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Body declared and parsed as JSON
    Json(Value),
    /// Any other body, kept as text
    Text(String),
    /// Missing or unparseable body
    Empty,
}

impl ResponseBody {
    fn into_value(self) -> Value {
        match self {
            ResponseBody::Json(value) => value,
            ResponseBody::Text(text) => Value::String(text),
            ResponseBody::Empty => Value::Null,
        }
    }

    fn as_diagnostics(&self) -> Option<Value> {
        match self {
            ResponseBody::Json(value) => Some(value.clone()),
            ResponseBody::Text(text) if !text.is_empty() => Some(Value::String(text.clone())),
            _ => None,
        }
    }
}

/// Binary response, used for attachment downloads
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status
    pub status: u16,
    /// `Content-Disposition` header value, when present
    pub content_disposition: Option<String>,
    /// Response bytes
    pub bytes: Vec<u8>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: String,
    hooks: RwLock<Option<Arc<dyn SessionHooks>>>,
}

/// API client shared by every repository and the session manager
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

impl ApiClient {
    /// Create a client against `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        ApiClient {
            inner: Arc::new(ClientInner {
                http: reqwest::Client::new(),
                base_url: base_url.into(),
                hooks: RwLock::new(None),
            }),
        }
    }

    /// Install session hooks; the latest installation wins
    pub fn configure(&self, hooks: Arc<dyn SessionHooks>) {
        if let Ok(mut slot) = self.inner.hooks.write() {
            *slot = Some(hooks);
        }
    }

    /// Base URL this client resolves paths against
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn bearer_for(&self, options: &RequestOptions) -> Option<String> {
        if options.skip_auth {
            return None;
        }
        if let Some(token) = &options.bearer_override {
            return Some(token.clone());
        }

        let hooks = self.inner.hooks.read().ok()?;
        hooks.as_ref()?.token()
    }

    fn notify_unauthorized(&self) {
        let hooks = match self.inner.hooks.read() {
            Ok(hooks) => hooks.clone(),
            Err(_) => None,
        };
        if let Some(hooks) = hooks {
            hooks.on_unauthorized();
        }
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        options: &RequestOptions,
    ) -> ApiResult<reqwest::Response> {
        let url = format!("{}{}", self.inner.base_url, path);
        debug!("{} {}", method, url);

        let mut request = self.inner.http.request(method, &url);

        if let Some(token) = self.bearer_for(options) {
            request = request.bearer_auth(token);
        }

        match &options.body {
            Some(RequestBody::Json(value)) => {
                request = request.json(value);
            }
            Some(RequestBody::Text(text)) => {
                request = request
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
                    .body(text.clone());
            }
            None => {}
        }

        request.send().await.map_err(ApiError::Transport)
    }

    async fn parse_body(response: reqwest::Response) -> ResponseBody {
        let is_json = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("application/json"));

        if is_json {
            match response.json::<Value>().await {
                Ok(value) => ResponseBody::Json(value),
                Err(_) => ResponseBody::Empty,
            }
        } else {
            match response.text().await {
                Ok(text) => ResponseBody::Text(text),
                Err(_) => ResponseBody::Empty,
            }
        }
    }

    /// Issue a request and parse the response body by content type
    ///
    /// On 401 the unauthorized hook runs before the error is built; any
    /// other non-2xx status becomes an [`ApiError::Status`] carrying the
    /// server's message when one is present.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> ApiResult<ResponseBody> {
        let response = self.execute(method, path, &options).await?;
        let status = response.status().as_u16();
        let body = Self::parse_body(response).await;

        if !(200..300).contains(&status) {
            if status == 401 {
                self.notify_unauthorized();
            }
            return Err(ApiError::from_status(status, body.as_diagnostics()));
        }

        Ok(body)
    }

    /// Issue a request and deserialize the JSON response into `T`
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> ApiResult<T> {
        let body = self.send(method, path, options).await?;
        serde_json::from_value(body.into_value()).map_err(ApiError::Decode)
    }

    /// GET a JSON resource
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request_json(Method::GET, path, RequestOptions::default())
            .await
    }

    /// POST a JSON body, expecting a JSON response
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: impl serde::Serialize,
    ) -> ApiResult<T> {
        self.request_json(Method::POST, path, RequestOptions::json(body))
            .await
    }

    /// PUT a JSON body, expecting a JSON response
    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: impl serde::Serialize,
    ) -> ApiResult<T> {
        self.request_json(Method::PUT, path, RequestOptions::json(body))
            .await
    }

    /// Issue a request whose successful response is a binary attachment
    pub async fn send_raw(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> ApiResult<RawResponse> {
        let response = self.execute(method, path, &options).await?;
        let status = response.status().as_u16();

        if !(200..300).contains(&status) {
            let body = Self::parse_body(response).await;
            if status == 401 {
                self.notify_unauthorized();
            }
            return Err(ApiError::from_status(status, body.as_diagnostics()));
        }

        let content_disposition = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let bytes = response
            .bytes()
            .await
            .map_err(ApiError::Transport)?
            .to_vec();

        Ok(RawResponse {
            status,
            content_disposition,
            bytes,
        })
    }
}
