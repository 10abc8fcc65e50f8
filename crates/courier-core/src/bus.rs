//! Typed publish/subscribe event bus.
//!
//! An [`EventBus`] routes events by their Rust type. Each event type gets its
//! own [`Signal`], created on first subscription or publication. The bus is an
//! explicit value: clone it to share it, and every clone talks to the same set
//! of channels.
//!
//! Subscriptions are RAII guards. A consumer keeps its [`Subscription`] for as
//! long as it wants events and drops it (or calls
//! [`unsubscribe`](Subscription::unsubscribe)) when its scope ends.
//!
//! # Example
//!
//! ```
//! use courier_core::EventBus;
//!
//! #[derive(Clone, Debug)]
//! struct Refreshed(u32);
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(|event: &Refreshed| {
//!     println!("refreshed {} rows", event.0);
//! });
//!
//! assert_eq!(bus.publish(Refreshed(3)), 1);
//!
//! drop(subscription);
//! assert_eq!(bus.publish(Refreshed(4)), 0);
//! ```

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::logging::targets;
use crate::signal::{ConnectionGuard, Signal, SignalEmitter};

/// Marker for types that can travel over an [`EventBus`].
///
/// Implemented automatically for every `Clone + Send + Sync + 'static` type.
pub trait Event: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Event for T {}

/// Guard for a bus subscription. Dropping it unsubscribes.
pub type Subscription = ConnectionGuard;

type Channel = Arc<dyn Any + Send + Sync>;

/// A type-routed event bus.
#[derive(Clone, Default)]
pub struct EventBus {
    channels: Arc<RwLock<HashMap<TypeId, Channel>>>,
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a handler to events of type `E`.
    ///
    /// The handler runs on the thread that publishes the event.
    pub fn subscribe<E, F>(&self, handler: F) -> Subscription
    where
        E: Event,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let channel = self.channel::<E>();
        let id = channel.connect(handler);
        tracing::debug!(
            target: targets::BUS,
            event = type_name::<E>(),
            subscribers = channel.connection_count(),
            "subscribed"
        );
        let weak: Weak<Signal<E>> = Arc::downgrade(&channel);
        let emitter: Weak<dyn SignalEmitter> = weak;
        ConnectionGuard::new(emitter, id)
    }

    /// Subscribe through an unbounded channel, for consumers that await events.
    ///
    /// Events published after this call are queued on the receiver until the
    /// subscription is dropped.
    #[cfg(feature = "tokio")]
    pub fn subscribe_channel<E: Event>(
        &self,
    ) -> (Subscription, tokio::sync::mpsc::UnboundedReceiver<E>) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let subscription = self.subscribe(move |event: &E| {
            if tx.send(event.clone()).is_err() {
                tracing::trace!(
                    target: targets::BUS,
                    event = type_name::<E>(),
                    "receiver dropped, event discarded"
                );
            }
        });
        (subscription, rx)
    }

    /// Publish an event to every current subscriber of its type.
    ///
    /// Returns the number of subscribers the event was delivered to. An event
    /// with no subscribers is dropped.
    pub fn publish<E: Event>(&self, event: E) -> usize {
        let Some(channel) = self.existing::<E>() else {
            tracing::trace!(
                target: targets::BUS,
                event = type_name::<E>(),
                "no subscribers, event dropped"
            );
            return 0;
        };
        let delivered = channel.emit(event);
        tracing::debug!(
            target: targets::BUS,
            event = type_name::<E>(),
            delivered,
            "published"
        );
        delivered
    }

    /// Number of live subscriptions for events of type `E`.
    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.existing::<E>()
            .map_or(0, |channel| channel.connection_count())
    }

    /// Number of event types that have a channel on this bus.
    pub fn channel_count(&self) -> usize {
        self.channels.read().len()
    }

    fn existing<E: Event>(&self) -> Option<Arc<Signal<E>>> {
        let channel = self.channels.read().get(&TypeId::of::<E>())?.clone();
        channel.downcast::<Signal<E>>().ok()
    }

    fn channel<E: Event>(&self) -> Arc<Signal<E>> {
        if let Some(channel) = self.existing::<E>() {
            return channel;
        }
        let mut channels = self.channels.write();
        let channel = channels
            .entry(TypeId::of::<E>())
            .or_insert_with(|| Arc::new(Signal::<E>::new()) as Channel)
            .clone();
        // Keyed by TypeId::of::<E>, so the stored value is always a Signal<E>.
        match channel.downcast::<Signal<E>>() {
            Ok(signal) => signal,
            Err(_) => unreachable!("channel registered under a foreign type id"),
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("channels", &self.channel_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Clone, Debug, PartialEq)]
    struct Ping(u32);

    #[derive(Clone, Debug, PartialEq)]
    struct Pong(&'static str);

    #[test]
    fn test_publish_routes_by_type() {
        let bus = EventBus::new();
        let pings = Arc::new(Mutex::new(Vec::new()));
        let pongs = Arc::new(Mutex::new(Vec::new()));

        let pings_clone = pings.clone();
        let _ping_sub = bus.subscribe(move |event: &Ping| pings_clone.lock().push(event.clone()));
        let pongs_clone = pongs.clone();
        let _pong_sub = bus.subscribe(move |event: &Pong| pongs_clone.lock().push(event.clone()));

        assert_eq!(bus.publish(Ping(1)), 1);
        assert_eq!(bus.publish(Pong("a")), 1);
        assert_eq!(bus.publish(Ping(2)), 1);

        assert_eq!(*pings.lock(), vec![Ping(1), Ping(2)]);
        assert_eq!(*pongs.lock(), vec![Pong("a")]);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(Ping(1)), 0);
        assert_eq!(bus.channel_count(), 0);
    }

    #[test]
    fn test_subscription_drop_unsubscribes() {
        let bus = EventBus::new();
        let sub = bus.subscribe(|_: &Ping| {});
        assert_eq!(bus.subscriber_count::<Ping>(), 1);
        assert!(sub.is_connected());

        drop(sub);
        assert_eq!(bus.subscriber_count::<Ping>(), 0);
        assert_eq!(bus.publish(Ping(1)), 0);
    }

    #[test]
    fn test_explicit_unsubscribe() {
        let bus = EventBus::new();
        let sub = bus.subscribe(|_: &Ping| {});
        assert!(sub.unsubscribe().is_ok());
        assert_eq!(bus.subscriber_count::<Ping>(), 0);
    }

    #[test]
    fn test_clones_share_channels() {
        let bus = EventBus::new();
        let other = bus.clone();
        let _sub = bus.subscribe(|_: &Ping| {});
        assert_eq!(other.publish(Ping(7)), 1);
    }

    #[test]
    fn test_subscription_survives_bus_drop() {
        let bus = EventBus::new();
        let sub = bus.subscribe(|_: &Ping| {});
        drop(bus);
        assert!(!sub.is_connected());
    }
}
