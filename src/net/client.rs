//! Shared HTTP client: the single point of egress for every API call.
//!
//! ARCHITECTURE
//! ============
//! `ApiClient` owns the config and two interceptor chains. It shapes each
//! request (base address, JSON headers, timeout, credential policy), runs the
//! request chain, hands the request to a [`Transport`], then runs the response
//! chain on failures. The transport is the only browser-specific piece, which
//! keeps the client testable off-wasm.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become `ApiError::Status`. Response interceptors observe
//! every error but cannot swallow it: the caller always receives the rejection.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use serde::de::DeserializeOwned;

use super::config::{ApiConfig, AuthMode};
use super::types::{Method, error_message};

/// Outgoing request after the client has applied its defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub timeout: Duration,
    /// Ask the transport to send cookies cross-origin.
    pub include_credentials: bool,
    /// The caller handles 401 itself (login, session probe); the global
    /// redirect must not fire for this request.
    pub handles_unauthorized: bool,
    /// Send without the stored bearer token (login).
    pub anonymous: bool,
}

impl ApiRequest {
    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Set a header, replacing any existing value with the same name.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
        self.headers.push((name.to_owned(), value.into()));
    }
}

/// Raw response handed back by a transport, whatever its status.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl ApiResponse {
    #[must_use]
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the JSON body into a typed value.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_value(self.body.clone()).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("request failed with status {status}")]
    Status { status: u16, body: serde_json::Value },
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("network error: {0}")]
    Network(String),
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("failed to encode request: {0}")]
    Encode(String),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Server-supplied error text, when the payload carries one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => error_message(body),
            _ => None,
        }
    }
}

/// Moves a prepared request over the wire.
///
/// Implementations return `Ok` for every HTTP response regardless of status
/// and enforce `request.timeout`, reporting expiry as `ApiError::Timeout`.
pub trait Transport {
    fn execute(&self, request: ApiRequest) -> impl Future<Output = Result<ApiResponse, ApiError>>;
}

/// Hook run on every outgoing request. Must not fail.
pub trait RequestInterceptor {
    fn on_request(&self, request: &mut ApiRequest);
}

/// Hook run on every failed call before the error reaches the caller.
pub trait ResponseInterceptor {
    fn on_error(&self, request: &ApiRequest, error: &ApiError);
}

/// Per-call options for [`ApiClient::send`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestOptions {
    pub params: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub handles_unauthorized: bool,
    pub anonymous: bool,
}

impl RequestOptions {
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.params.extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    #[must_use]
    pub fn body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Opt this call out of the global 401 redirect.
    #[must_use]
    pub fn handles_unauthorized(mut self) -> Self {
        self.handles_unauthorized = true;
        self
    }

    /// Skip the stored bearer token for this call.
    #[must_use]
    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }
}

struct ClientInner<T> {
    config: ApiConfig,
    transport: T,
    request_interceptors: Vec<Box<dyn RequestInterceptor>>,
    response_interceptors: Vec<Box<dyn ResponseInterceptor>>,
}

/// Cheaply cloneable handle to the shared client.
pub struct ApiClient<T> {
    inner: Rc<ClientInner<T>>,
}

impl<T> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

/// Builder collecting interceptors before the client is shared.
pub struct ApiClientBuilder<T> {
    inner: ClientInner<T>,
}

impl<T: Transport> ApiClientBuilder<T> {
    #[must_use]
    pub fn request_interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.inner.request_interceptors.push(Box::new(interceptor));
        self
    }

    #[must_use]
    pub fn response_interceptor(mut self, interceptor: impl ResponseInterceptor + 'static) -> Self {
        self.inner.response_interceptors.push(Box::new(interceptor));
        self
    }

    #[must_use]
    pub fn build(self) -> ApiClient<T> {
        ApiClient { inner: Rc::new(self.inner) }
    }
}

impl<T: Transport> ApiClient<T> {
    #[must_use]
    pub fn builder(config: ApiConfig, transport: T) -> ApiClientBuilder<T> {
        ApiClientBuilder {
            inner: ClientInner {
                config,
                transport,
                request_interceptors: Vec::new(),
                response_interceptors: Vec::new(),
            },
        }
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Apply defaults and the request interceptor chain.
    #[must_use]
    pub fn prepare(&self, method: Method, path: &str, options: RequestOptions) -> ApiRequest {
        let config = &self.inner.config;
        let mut request = ApiRequest {
            method,
            url: config.endpoint(path),
            query: options.params,
            headers: vec![
                ("Content-Type".to_owned(), "application/json".to_owned()),
                ("Accept".to_owned(), "application/json".to_owned()),
            ],
            body: options.body,
            timeout: config.timeout,
            include_credentials: config.auth_mode == AuthMode::Cookie,
            handles_unauthorized: options.handles_unauthorized,
            anonymous: options.anonymous,
        };
        for interceptor in &self.inner.request_interceptors {
            interceptor.on_request(&mut request);
        }
        request
    }

    /// Perform one call. Non-2xx statuses come back as `ApiError::Status`.
    pub async fn send(&self, method: Method, path: &str, options: RequestOptions) -> Result<ApiResponse, ApiError> {
        let request = self.prepare(method, path, options);
        log::debug!("api: {} {}", method.as_str(), request.url);

        let result = match self.inner.transport.execute(request.clone()).await {
            Ok(response) if response.ok() => Ok(response),
            Ok(response) => Err(ApiError::Status { status: response.status, body: response.body }),
            Err(e) => Err(e),
        };

        if let Err(err) = &result {
            log::warn!("api: {} {} failed: {err}", method.as_str(), request.url);
            for interceptor in &self.inner.response_interceptors {
                interceptor.on_error(&request, err);
            }
        }
        result
    }

    pub async fn get(&self, path: &str, options: RequestOptions) -> Result<ApiResponse, ApiError> {
        self.send(Method::Get, path, options).await
    }

    pub async fn post(&self, path: &str, options: RequestOptions) -> Result<ApiResponse, ApiError> {
        self.send(Method::Post, path, options).await
    }

    pub async fn put(&self, path: &str, options: RequestOptions) -> Result<ApiResponse, ApiError> {
        self.send(Method::Put, path, options).await
    }

    pub async fn delete(&self, path: &str, options: RequestOptions) -> Result<ApiResponse, ApiError> {
        self.send(Method::Delete, path, options).await
    }
}
