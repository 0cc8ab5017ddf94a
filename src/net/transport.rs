//! Browser transport backed by `gloo-net` (`fetch`).
//!
//! Client-side (hydrate): real HTTP with a per-request deadline.
//! Server-side (SSR): every call fails fast since these endpoints are only
//! meaningful in the browser.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::future::Future;

use super::client::{ApiError, ApiRequest, ApiResponse, Transport};

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTransport;

impl Transport for BrowserTransport {
    fn execute(&self, request: ApiRequest) -> impl Future<Output = Result<ApiResponse, ApiError>> {
        send_with_deadline(request)
    }
}

/// Parse a response body. Empty bodies become `null`; non-JSON text is kept
/// as a string so error pages still reach the caller.
#[cfg(any(test, feature = "hydrate"))]
fn decode_body(text: &str) -> serde_json::Value {
    if text.trim().is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| serde_json::Value::String(text.to_owned()))
}

async fn send_with_deadline(request: ApiRequest) -> Result<ApiResponse, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        use futures::future::{Either, select};

        let timeout = request.timeout;
        let send = Box::pin(send_request(request));
        let deadline = Box::pin(gloo_timers::future::sleep(timeout));
        match select(send, deadline).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => Err(ApiError::Timeout(timeout)),
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = request;
        Err(ApiError::Network("not available on server".to_owned()))
    }
}

#[cfg(feature = "hydrate")]
async fn send_request(request: ApiRequest) -> Result<ApiResponse, ApiError> {
    use gloo_net::http::Request;
    use web_sys::RequestCredentials;

    use super::types::Method;

    let mut builder = match request.method {
        Method::Get => Request::get(&request.url),
        Method::Post => Request::post(&request.url),
        Method::Put => Request::put(&request.url),
        Method::Delete => Request::delete(&request.url),
    };
    if !request.query.is_empty() {
        builder = builder.query(request.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    for (name, value) in &request.headers {
        builder = builder.header(name, value);
    }
    if request.include_credentials {
        builder = builder.credentials(RequestCredentials::Include);
    }

    let outgoing = match &request.body {
        Some(body) => builder.json(body),
        None => builder.build(),
    }
    .map_err(|e| ApiError::Encode(e.to_string()))?;

    let resp = outgoing.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
    let status = resp.status();
    let text = resp.text().await.map_err(|e| ApiError::Decode(e.to_string()))?;
    Ok(ApiResponse { status, body: decode_body(&text) })
}
