//! Courier - form-POST request adapters that publish typed results.
//!
//! This is the umbrella crate: it re-exports [`courier_core`] at the root,
//! [`courier_net`] as [`net`], and hosts the concrete per-endpoint requests in
//! [`requests`].
//!
//! # Example
//!
//! ```no_run
//! use courier::requests::{WinItemDetailEvent, WinItemDetailRequest};
//! use courier::net::{FormRequestSender, RequestParams};
//! use courier::{EventBus, RequestScope};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let bus = EventBus::new();
//! let _subscription = bus.subscribe(|event: &WinItemDetailEvent| match event.payload() {
//!     Some(detail) => println!("winner: {:?}", detail.winner_name()),
//!     None => println!("could not load the draw"),
//! });
//!
//! let request = WinItemDetailRequest::new(bus.clone())?;
//! let scope = RequestScope::new("win-item-detail");
//! request
//!     .send_request(
//!         RequestParams::new().with("period_id", "20151126001"),
//!         "https://api.example.com/winner/detail",
//!         &scope,
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub use courier_core::*;

/// Networking module: HTTP client, transports, mappers and adapters.
pub mod net {
    pub use courier_net::*;
}

pub mod requests;
