//! Request adapters that publish their results as events.
//!
//! A [`RequestAdapter<T>`] posts form fields to an endpoint, maps the response
//! body into a `T` and publishes a [`ResponseEvent<T>`] on an [`EventBus`].
//! Consumers subscribe to `ResponseEvent<T>` and read
//! [`payload`](ResponseEvent::payload): a value on success, nothing on failure.
//!
//! # Outcomes
//!
//! Every call whose transport completes publishes exactly one event:
//!
//! | Transport | Mapper | Event published | Caller gets |
//! |-----------|--------|-----------------|-------------|
//! | success   | ok     | `Completed(value)` | `Ok(id)` |
//! | failure   | -      | `Failed(error)`    | `Ok(id)` |
//! | success   | error  | none               | `Err(NetworkError::Json)` |
//!
//! # Example
//!
//! ```ignore
//! use courier_core::{EventBus, RequestScope};
//! use courier_net::{FormRequestSender, RequestAdapter, RequestParams, ResponseEvent};
//!
//! let bus = EventBus::new();
//! let _sub = bus.subscribe(|event: &ResponseEvent<Detail>| match event.payload() {
//!     Some(detail) => render(detail),
//!     None => show_error(),
//! });
//!
//! let adapter = RequestAdapter::<Detail>::http(bus.clone())?;
//! let scope = RequestScope::new("detail-screen");
//! adapter
//!     .send_request(RequestParams::new().with("id", "7"), "https://api.example.com/detail", &scope)
//!     .await?;
//! ```

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use courier_core::logging::targets;
use courier_core::{Event, EventBus, RequestScope};
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::error::{NetworkError, Result};
use crate::http::RequestParams;
use crate::mapper::{JsonMapper, ResponseMapper};
use crate::runtime;
use crate::transport::{HttpTransport, Transport, TransportOptions, TransportRequest};

/// Unique identifier for a request made through an adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw id value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a request ended.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestOutcome<T> {
    /// The transport succeeded and the body mapped to a value.
    Completed(T),
    /// The transport failed; no value was produced.
    Failed(NetworkError),
}

impl<T> RequestOutcome<T> {
    /// The value, if the request completed.
    pub fn payload(&self) -> Option<&T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Failed(_) => None,
        }
    }

    /// The transport error, if the request failed.
    pub fn error(&self) -> Option<&NetworkError> {
        match self {
            Self::Completed(_) => None,
            Self::Failed(err) => Some(err),
        }
    }

    /// Convert into a `Result`.
    pub fn into_result(self) -> Result<T> {
        match self {
            Self::Completed(value) => Ok(value),
            Self::Failed(err) => Err(err),
        }
    }
}

/// Event published once per completed request.
#[derive(Clone, Debug)]
pub struct ResponseEvent<T> {
    id: RequestId,
    url: String,
    outcome: RequestOutcome<T>,
}

impl<T> ResponseEvent<T> {
    /// The request this event reports on.
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// The URL the request was sent to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The full outcome.
    pub fn outcome(&self) -> &RequestOutcome<T> {
        &self.outcome
    }

    /// The mapped value; `None` means the request failed.
    pub fn payload(&self) -> Option<&T> {
        self.outcome.payload()
    }

    /// Whether a value is present.
    pub fn is_success(&self) -> bool {
        self.payload().is_some()
    }

    /// Whether the request failed.
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// The transport error, if the request failed.
    pub fn error(&self) -> Option<&NetworkError> {
        self.outcome.error()
    }

    /// Take the value out of the event.
    pub fn into_payload(self) -> Option<T> {
        self.outcome.into_result().ok()
    }

    /// Take the outcome out of the event.
    pub fn into_outcome(self) -> RequestOutcome<T> {
        self.outcome
    }
}

/// Capability: send form fields to a URL and publish the result.
///
/// This is the only send operation adapters expose; there is no
/// list-parameter send.
pub trait FormRequestSender: Send + Sync {
    /// Send `params` to `url` on behalf of `scope`.
    ///
    /// Resolves to the id carried by the published event, or to the mapping
    /// error when the response body could not be read (no event is
    /// published in that case).
    fn send_request(
        &self,
        params: RequestParams,
        url: &str,
        scope: &RequestScope,
    ) -> impl Future<Output = Result<RequestId>> + Send;
}

/// Posts form requests and publishes [`ResponseEvent<T>`] on a bus.
///
/// Generic over the [`Transport`] and [`ResponseMapper`] so either can be
/// replaced. Cloning is cheap and clones share the transport, mapper and bus.
/// Calls are independent: each owns its outcome, so concurrent calls on one
/// adapter never see each other's results.
pub struct RequestAdapter<T, Tr = HttpTransport, M = JsonMapper> {
    bus: EventBus,
    transport: Arc<Tr>,
    mapper: Arc<M>,
    options: TransportOptions,
    _result: PhantomData<fn() -> T>,
}

impl<T, Tr, M> Clone for RequestAdapter<T, Tr, M> {
    fn clone(&self) -> Self {
        Self {
            bus: self.bus.clone(),
            transport: self.transport.clone(),
            mapper: self.mapper.clone(),
            options: self.options,
            _result: PhantomData,
        }
    }
}

impl<T> RequestAdapter<T, HttpTransport, JsonMapper> {
    /// Adapter over a default HTTP transport and the JSON mapper.
    pub fn http(bus: EventBus) -> Result<Self> {
        Ok(Self::new(bus, HttpTransport::new()?, JsonMapper))
    }
}

impl<T, Tr, M> RequestAdapter<T, Tr, M> {
    /// Adapter over the given transport and mapper.
    pub fn new(bus: EventBus, transport: Tr, mapper: M) -> Self {
        Self {
            bus,
            transport: Arc::new(transport),
            mapper: Arc::new(mapper),
            options: TransportOptions::default(),
            _result: PhantomData,
        }
    }

    /// Override the transport flags (progress shown, cache disabled by default).
    pub fn with_options(mut self, options: TransportOptions) -> Self {
        self.options = options;
        self
    }

    /// The transport flags used for every request.
    pub fn options(&self) -> TransportOptions {
        self.options
    }

    /// The bus results are published on.
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// The transport.
    pub fn transport(&self) -> &Tr {
        &self.transport
    }
}

impl<T, Tr, M> RequestAdapter<T, Tr, M>
where
    T: DeserializeOwned + Event,
    Tr: Transport,
    M: ResponseMapper,
{
    async fn dispatch(
        &self,
        params: RequestParams,
        url: &str,
        scope: &RequestScope,
    ) -> Result<RequestId> {
        let id = RequestId::next();
        let span = tracing::debug_span!(
            target: targets::ADAPTER,
            "request",
            id = id.as_u64(),
            scope = scope.name(),
            url
        );

        async move {
            tracing::debug!(
                target: targets::ADAPTER,
                fields = params.len(),
                "posting form"
            );
            let request = TransportRequest::post(url, params).with_options(self.options);

            let outcome = match self.transport.send(request, scope).await {
                Ok(response) => RequestOutcome::Completed(self.mapper.map::<T>(scope, &response.body)?),
                Err(err) => {
                    tracing::info!(
                        target: targets::ADAPTER,
                        error = %err,
                        "request failed, publishing empty result"
                    );
                    RequestOutcome::Failed(err)
                }
            };

            let delivered = self.bus.publish(ResponseEvent {
                id,
                url: url.to_string(),
                outcome,
            });
            tracing::debug!(target: targets::ADAPTER, delivered, "response event published");
            Ok::<_, NetworkError>(id)
        }
        .instrument(span)
        .await
    }
}

impl<T, Tr, M> RequestAdapter<T, Tr, M>
where
    T: DeserializeOwned + Event,
    Tr: Transport + 'static,
    M: ResponseMapper + 'static,
{
    /// Send without awaiting: the request runs on a spawned task.
    ///
    /// Uses the ambient tokio runtime if there is one, otherwise the shared
    /// runtime from [`runtime`](crate::runtime). The event is published from
    /// that task.
    pub fn spawn_request(
        &self,
        params: RequestParams,
        url: impl Into<String>,
        scope: RequestScope,
    ) -> JoinHandle<Result<RequestId>> {
        let adapter = self.clone();
        let url = url.into();
        runtime::spawn(async move { adapter.dispatch(params, &url, &scope).await })
    }
}

impl<T, Tr, M> FormRequestSender for RequestAdapter<T, Tr, M>
where
    T: DeserializeOwned + Event,
    Tr: Transport,
    M: ResponseMapper,
{
    fn send_request(
        &self,
        params: RequestParams,
        url: &str,
        scope: &RequestScope,
    ) -> impl Future<Output = Result<RequestId>> + Send {
        self.dispatch(params, url, scope)
    }
}

impl<T, Tr: std::fmt::Debug, M: std::fmt::Debug> std::fmt::Debug for RequestAdapter<T, Tr, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestAdapter")
            .field("result", &std::any::type_name::<T>())
            .field("transport", &self.transport)
            .field("mapper", &self.mapper)
            .field("options", &self.options)
            .finish()
    }
}
