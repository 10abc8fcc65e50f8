//! Networking module for Courier.
//!
//! This crate turns a form POST into a typed event:
//!
//! - **HTTP Client**: [`http::HttpClient`], a cloneable `reqwest` wrapper
//! - **Transport**: [`Transport`] executes one request and resolves once;
//!   [`HttpTransport`] drives the scope's progress indicator and cache headers
//! - **Mapper**: [`ResponseMapper`] turns a body into a typed value;
//!   [`JsonMapper`] uses `serde_json`
//! - **Adapter**: [`RequestAdapter`] posts, maps, and publishes a
//!   [`ResponseEvent`] on a [`courier_core::EventBus`]
//!
//! # Example
//!
//! ```ignore
//! use courier_core::{EventBus, RequestScope};
//! use courier_net::{FormRequestSender, RequestAdapter, RequestParams, ResponseEvent};
//!
//! #[derive(Clone, serde::Deserialize)]
//! struct Balance {
//!     #[serde(default)]
//!     amount: u64,
//! }
//!
//! let bus = EventBus::new();
//! let _sub = bus.subscribe(|event: &ResponseEvent<Balance>| {
//!     match event.payload() {
//!         Some(balance) => println!("balance: {}", balance.amount),
//!         None => println!("could not load balance"),
//!     }
//! });
//!
//! let adapter = RequestAdapter::<Balance>::http(bus.clone())?;
//! let scope = RequestScope::new("wallet");
//! adapter
//!     .send_request(RequestParams::new().with("uid", "42"), "https://api.example.com/balance", &scope)
//!     .await?;
//! ```

mod adapter;
mod error;
pub mod http;
mod mapper;
pub mod runtime;
pub mod transport;

pub use adapter::{FormRequestSender, RequestAdapter, RequestId, RequestOutcome, ResponseEvent};
pub use error::{NetworkError, Result};
pub use http::{HttpClient, HttpClientBuilder, HttpClientConfig, HttpMethod, RequestParams};
pub use mapper::{JsonMapper, ResponseMapper};
pub use transport::{
    HttpTransport, OfflineTransport, Transport, TransportOptions, TransportRequest,
    TransportResponse,
};
