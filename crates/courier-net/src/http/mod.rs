//! HTTP layer: a shared `reqwest` client that sends form requests and buffers
//! the response.
//!
//! Adapters reach it through [`HttpTransport`](crate::transport::HttpTransport).
//!
//! # Example
//!
//! ```ignore
//! use courier_net::http::HttpClient;
//! use courier_net::RequestParams;
//!
//! let client = HttpClient::builder()
//!     .timeout(Duration::from_secs(15))
//!     .user_agent("duobao-android/2.1")
//!     .build()?;
//!
//! let response = client
//!     .post("https://api.example.com/winner/detail")
//!     .params(RequestParams::new().with("period_id", "7"))
//!     .send()
//!     .await?
//!     .ensure_success()?;
//! let body = response.into_body();
//! ```

mod client;
mod request;
mod response;

pub use client::{HttpClient, HttpClientBuilder, HttpClientConfig};
pub use request::{FormRequest, FormRequestBuilder, HttpMethod, RequestParams};
pub use response::HttpResponse;
