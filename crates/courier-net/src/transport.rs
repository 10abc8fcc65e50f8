//! Request transports.
//!
//! A [`Transport`] executes one request and resolves exactly once, with either
//! the raw response body or the reason the request failed. Adapters are
//! generic over the transport so tests can script outcomes without a network.

use std::future::Future;

use courier_core::RequestScope;
use courier_core::logging::targets;

use crate::error::{NetworkError, Result};
use crate::http::{HttpClient, HttpMethod, HttpResponse, RequestParams};

/// Per-request flags handed to the transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransportOptions {
    /// Show a progress indicator on the scope while the request runs.
    pub show_progress: bool,
    /// Allow intermediaries and the platform to serve a cached response.
    pub use_cache: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            show_progress: true,
            use_cache: false,
        }
    }
}

/// A request as seen by a transport.
#[derive(Clone, Debug)]
pub struct TransportRequest {
    /// The HTTP method.
    pub method: HttpMethod,
    /// Target URL.
    pub url: String,
    /// Form fields, sent as the body for POST/PUT and as the query otherwise.
    pub params: RequestParams,
    /// Progress and cache flags.
    pub options: TransportOptions,
}

impl TransportRequest {
    /// A POST with default options.
    pub fn post(url: impl Into<String>, params: RequestParams) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            params,
            options: TransportOptions::default(),
        }
    }

    /// Replace the options.
    pub fn with_options(mut self, options: TransportOptions) -> Self {
        self.options = options;
        self
    }
}

/// A successful transport response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

/// Executes requests on behalf of an adapter.
///
/// The returned future resolves once. `Err` covers every failure the
/// transport knows about (connection, timeout, non-success status); the body
/// of a successful response is returned untouched.
pub trait Transport: Send + Sync {
    /// Execute `request` in `scope`.
    fn send(
        &self,
        request: TransportRequest,
        scope: &RequestScope,
    ) -> impl Future<Output = Result<TransportResponse>> + Send;
}

/// [`Transport`] backed by [`HttpClient`].
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: HttpClient,
}

impl HttpTransport {
    /// Transport over a default-configured client.
    pub fn new() -> Result<Self> {
        Ok(Self::with_client(HttpClient::new()?))
    }

    /// Transport over an existing client.
    pub fn with_client(client: HttpClient) -> Self {
        Self { client }
    }

    /// The underlying client.
    pub fn client(&self) -> &HttpClient {
        &self.client
    }
}

impl Transport for HttpTransport {
    async fn send(
        &self,
        request: TransportRequest,
        scope: &RequestScope,
    ) -> Result<TransportResponse> {
        let TransportRequest {
            method,
            url,
            params,
            options,
        } = request;

        let _activity = options
            .show_progress
            .then(|| scope.progress().begin(Some(scope.name())));

        let mut builder = self.client.request(method, &url).params(params);
        if !options.use_cache {
            builder = builder.no_cache();
        }

        let response = builder.send().await.and_then(HttpResponse::ensure_success);
        let response = match response {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(
                    target: targets::TRANSPORT,
                    scope = scope.name(),
                    %url,
                    error = %err,
                    "request failed"
                );
                return Err(err);
            }
        };

        let status = response.status();
        let body = response.into_body();
        tracing::debug!(
            target: targets::TRANSPORT,
            scope = scope.name(),
            %url,
            status,
            bytes = body.len(),
            "request completed"
        );
        Ok(TransportResponse { status, body })
    }
}

/// Transport that fails every request with the same error.
///
/// Useful as a stand-in when no network is configured.
#[derive(Clone, Debug)]
pub struct OfflineTransport {
    error: NetworkError,
}

impl OfflineTransport {
    /// Fail with a connection error.
    pub fn new() -> Self {
        Self::failing_with(NetworkError::Connection("offline".to_string()))
    }

    /// Fail with `error`.
    pub fn failing_with(error: NetworkError) -> Self {
        Self { error }
    }
}

impl Default for OfflineTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for OfflineTransport {
    async fn send(
        &self,
        request: TransportRequest,
        scope: &RequestScope,
    ) -> Result<TransportResponse> {
        tracing::debug!(
            target: targets::TRANSPORT,
            scope = scope.name(),
            url = %request.url,
            "offline transport rejecting request"
        );
        Err(self.error.clone())
    }
}
