//! Signals: typed callback lists.
//!
//! A [`Signal<Args>`] keeps its slots in a slot map keyed by [`ConnectionId`].
//! [`emit`](Signal::emit) calls each slot with `&Args` on the calling thread.
//! Each event type on the [`EventBus`](crate::EventBus) is one signal, and
//! [`ProgressIndicator`](crate::ProgressIndicator) reports through one.
//!
//! ```
//! use courier_core::Signal;
//!
//! let loaded = Signal::<u32>::new();
//! let id = loaded.connect(|count| println!("{count} items loaded"));
//! assert_eq!(loaded.emit(12), 1);
//! loaded.disconnect(id);
//! assert_eq!(loaded.emit(13), 0);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::error::{Result, SignalError};
use crate::logging::targets;

new_key_type! {
    /// Handle to one connected slot, valid until that slot is disconnected.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// Callback list for values of type `Args`.
///
/// Shareable across threads; slots run on whichever thread emits.
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
    blocked: AtomicBool,
}

impl<Args: Send + 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: Send + 'static> Signal<Args> {
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Add a slot. It stays connected until [`disconnect`](Self::disconnect)
    /// is called with the returned id.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Remove a slot; `false` if it was already gone.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    pub fn is_connected(&self, id: ConnectionId) -> bool {
        self.connections.lock().contains_key(id)
    }

    /// While blocked, [`emit`](Self::emit) reaches no slot.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Call every connected slot with `args`.
    ///
    /// The connection list is snapshotted before any slot runs, so slots may
    /// connect or disconnect on this signal without deadlocking. Slots
    /// connected during an emission are not invoked by that emission.
    ///
    /// Returns the number of slots invoked (0 when blocked).
    pub fn emit(&self, args: Args) -> usize {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return 0;
        }

        let slots: Vec<Slot<Args>> = self.connections.lock().values().cloned().collect();
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");

        for slot in &slots {
            slot(&args);
        }
        slots.len()
    }
}

impl<Args: Send + 'static> Signal<Args> {
    /// Add a slot that is removed when the returned guard drops.
    ///
    /// The guard holds the signal weakly and outliving it is fine.
    ///
    /// ```
    /// use courier_core::Signal;
    /// use std::sync::Arc;
    ///
    /// let finished = Arc::new(Signal::<&'static str>::new());
    /// {
    ///     let _guard = finished.connect_scoped(|url| println!("done: {url}"));
    ///     assert_eq!(finished.emit("/winner/detail"), 1);
    /// }
    /// assert_eq!(finished.emit("/winner/detail"), 0);
    /// ```
    pub fn connect_scoped<F>(self: &Arc<Self>, slot: F) -> ConnectionGuard
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.connect(slot);
        let weak: Weak<Self> = Arc::downgrade(self);
        ConnectionGuard::new(weak, id)
    }
}

/// Type-erased signal access.
///
/// Lets guards and registries manage connections without knowing the
/// signal's argument type.
pub trait SignalEmitter: Send + Sync {
    fn disconnect(&self, id: ConnectionId) -> bool;
    fn disconnect_all(&self);
    fn connection_count(&self) -> usize;
    fn is_connected(&self, id: ConnectionId) -> bool;
    fn is_blocked(&self) -> bool;
    fn set_blocked(&self, blocked: bool);
}

impl<Args: Send + 'static> SignalEmitter for Signal<Args> {
    fn disconnect(&self, id: ConnectionId) -> bool {
        Signal::disconnect(self, id)
    }

    fn disconnect_all(&self) {
        Signal::disconnect_all(self);
    }

    fn connection_count(&self) -> usize {
        Signal::connection_count(self)
    }

    fn is_connected(&self, id: ConnectionId) -> bool {
        Signal::is_connected(self, id)
    }

    fn is_blocked(&self) -> bool {
        Signal::is_blocked(self)
    }

    fn set_blocked(&self, blocked: bool) {
        Signal::set_blocked(self, blocked);
    }
}

/// Disconnects its slot on drop.
///
/// Returned by [`Signal::connect_scoped`] or
/// [`EventBus::subscribe`](crate::EventBus::subscribe).
#[must_use = "dropping the guard disconnects the slot immediately"]
pub struct ConnectionGuard {
    signal: Option<Weak<dyn SignalEmitter>>,
    id: ConnectionId,
}

impl ConnectionGuard {
    pub(crate) fn new(signal: Weak<dyn SignalEmitter>, id: ConnectionId) -> Self {
        Self {
            signal: Some(signal),
            id,
        }
    }

    /// The ID of the guarded connection.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Check whether the signal is still alive and the slot still connected.
    pub fn is_connected(&self) -> bool {
        self.signal
            .as_ref()
            .and_then(|weak| weak.upgrade())
            .is_some_and(|signal| signal.is_connected(self.id))
    }

    /// Disconnect now, reporting why if nothing was disconnected.
    pub fn disconnect(mut self) -> Result<()> {
        let signal = self
            .signal
            .take()
            .and_then(|weak| weak.upgrade())
            .ok_or(SignalError::SignalDropped)?;
        if signal.disconnect(self.id) {
            Ok(())
        } else {
            Err(SignalError::InvalidConnection)
        }
    }

    /// Same as [`disconnect`](Self::disconnect); reads better on bus subscriptions.
    pub fn unsubscribe(self) -> Result<()> {
        self.disconnect()
    }

    /// Keep the slot connected for the signal's whole lifetime.
    pub fn forget(mut self) -> ConnectionId {
        self.signal = None;
        self.id
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        if let Some(signal) = self.signal.take().and_then(|weak| weak.upgrade()) {
            signal.disconnect(self.id);
        }
    }
}

impl std::fmt::Debug for ConnectionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionGuard")
            .field("id", &self.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting(signal: &Signal<u32>) -> (ConnectionId, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let sink = hits.clone();
        let id = signal.connect(move |n| {
            sink.fetch_add(*n as usize, Ordering::SeqCst);
        });
        (id, hits)
    }

    #[test]
    fn test_emit_reaches_slots_in_order() {
        let signal = Signal::<u32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for tag in ["a", "b"] {
            let seen = seen.clone();
            signal.connect(move |n| seen.lock().push(format!("{tag}{n}")));
        }

        assert_eq!(signal.emit(1), 2);
        assert_eq!(signal.emit(2), 2);
        assert_eq!(*seen.lock(), ["a1", "b1", "a2", "b2"]);
    }

    #[test]
    fn test_disconnect_by_id() {
        let signal = Signal::<u32>::new();
        let (id, hits) = counting(&signal);

        signal.emit(3);
        assert!(signal.is_connected(id));
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
        assert_eq!(signal.emit(3), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_blocking() {
        let signal = Signal::<u32>::new();
        let (_, hits) = counting(&signal);

        signal.set_blocked(true);
        assert!(signal.is_blocked());
        assert_eq!(signal.emit(5), 0);
        signal.set_blocked(false);
        assert_eq!(signal.emit(5), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_slot_may_reenter_signal() {
        let signal = Arc::new(Signal::<u32>::new());
        let inner = signal.clone();
        signal.connect(move |_| {
            inner.connect(|_| {});
        });

        // The slot added during emission does not run in that emission.
        assert_eq!(signal.emit(1), 1);
        assert_eq!(signal.connection_count(), 2);
        signal.disconnect_all();
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_guard_disconnects_on_drop() {
        let signal = Arc::new(Signal::<u32>::new());
        let guard = signal.connect_scoped(|_| {});
        assert!(guard.is_connected());
        drop(guard);
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_guard_after_signal_dropped() {
        let signal = Arc::new(Signal::<u32>::new());
        let guard = signal.connect_scoped(|_| {});
        drop(signal);
        assert!(!guard.is_connected());
        assert_eq!(guard.disconnect(), Err(SignalError::SignalDropped));
    }

    #[test]
    fn test_guard_already_disconnected() {
        let signal = Arc::new(Signal::<u32>::new());
        let guard = signal.connect_scoped(|_| {});
        signal.disconnect(guard.id());
        assert_eq!(guard.unsubscribe(), Err(SignalError::InvalidConnection));
    }

    #[test]
    fn test_forget_keeps_slot() {
        let signal = Arc::new(Signal::<u32>::new());
        let id = signal.connect_scoped(|_| {}).forget();
        assert_eq!(signal.connection_count(), 1);
        assert!(signal.disconnect(id));
    }
}
