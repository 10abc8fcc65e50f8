//! Core systems for Courier.
//!
//! This crate provides the in-process plumbing that request adapters publish
//! through:
//!
//! - **Signal/Slot System**: Type-safe multi-slot callbacks
//! - **Event Bus**: Type-routed publish/subscribe with RAII subscriptions
//! - **Request Scope**: The execution context a request runs on behalf of
//! - **Progress Indication**: Counting of in-flight activities shown to the user
//!
//! # Event Bus Example
//!
//! ```
//! use courier_core::EventBus;
//!
//! #[derive(Clone)]
//! struct DetailLoaded {
//!     title: Option<String>,
//! }
//!
//! let bus = EventBus::new();
//!
//! let _subscription = bus.subscribe(|event: &DetailLoaded| match &event.title {
//!     Some(title) => println!("loaded {title}"),
//!     None => println!("load failed"),
//! });
//!
//! bus.publish(DetailLoaded { title: Some("Phone".into()) });
//! ```

mod bus;
mod error;
pub mod logging;
pub mod progress;
mod scope;
pub mod signal;

pub use bus::{Event, EventBus, Subscription};
pub use error::{Result, SignalError};
pub use logging::PerfSpan;
pub use progress::{ActivityGuard, ActivityState, ProgressIndicator};
pub use scope::RequestScope;
pub use signal::{ConnectionGuard, ConnectionId, Signal, SignalEmitter};
