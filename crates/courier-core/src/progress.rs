//! Progress indication for in-flight work.
//!
//! A [`ProgressIndicator`] counts activities that asked to be shown to the
//! user (a spinner or a modal progress dialog, in UI terms). The UI connects
//! to [`ProgressIndicator::changed`] and shows its indicator while the state is
//! [`ActivityState::Busy`].
//!
//! # Example
//!
//! ```
//! use courier_core::progress::{ActivityState, ProgressIndicator};
//!
//! let indicator = ProgressIndicator::new();
//! indicator.changed().connect(|state| match state {
//!     ActivityState::Busy { active, .. } => println!("{active} request(s) running"),
//!     ActivityState::Idle => println!("idle"),
//! });
//!
//! let guard = indicator.begin(Some("Loading"));
//! assert!(indicator.is_busy());
//! drop(guard);
//! assert!(!indicator.is_busy());
//! ```

use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex};

use crate::signal::Signal;

/// State reported by a [`ProgressIndicator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityState {
    /// At least one activity is running.
    Busy {
        /// Number of running activities.
        active: usize,
        /// Message of the most recently started activity, if any.
        message: Option<String>,
    },
    /// Nothing is running.
    Idle,
}

#[derive(Default)]
struct IndicatorState {
    active: usize,
    message: Option<String>,
}

struct ProgressIndicatorInner {
    state: Mutex<IndicatorState>,
    /// Held from snapshot to emit so notifications leave in state order.
    /// Reentrant so a slot may begin or end activities itself.
    emitting: ReentrantMutex<()>,
    changed: Signal<ActivityState>,
}

/// Thread-safe counter of visible in-flight activities.
///
/// Cloning yields another handle to the same indicator.
#[derive(Clone)]
pub struct ProgressIndicator {
    inner: Arc<ProgressIndicatorInner>,
}

impl Default for ProgressIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressIndicator {
    /// Create an idle indicator.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ProgressIndicatorInner {
                state: Mutex::new(IndicatorState::default()),
                emitting: ReentrantMutex::new(()),
                changed: Signal::new(),
            }),
        }
    }

    /// Start an activity. It ends when the returned guard is dropped.
    pub fn begin(&self, message: Option<&str>) -> ActivityGuard {
        let _emitting = self.inner.emitting.lock();
        let snapshot = {
            let mut state = self.inner.state.lock();
            state.active += 1;
            if let Some(message) = message {
                state.message = Some(message.to_string());
            }
            crate::courier_trace!(active = state.active, label = message, "activity started");
            ActivityState::Busy {
                active: state.active,
                message: state.message.clone(),
            }
        };
        self.inner.changed.emit(snapshot);
        ActivityGuard {
            indicator: self.clone(),
        }
    }

    fn end(&self) {
        let _emitting = self.inner.emitting.lock();
        let snapshot = {
            let mut state = self.inner.state.lock();
            if state.active == 0 {
                crate::courier_warn!("activity ended on an idle indicator");
            }
            state.active = state.active.saturating_sub(1);
            crate::courier_trace!(active = state.active, "activity ended");
            if state.active == 0 {
                state.message = None;
                ActivityState::Idle
            } else {
                ActivityState::Busy {
                    active: state.active,
                    message: state.message.clone(),
                }
            }
        };
        self.inner.changed.emit(snapshot);
    }

    /// Whether any activity is running.
    pub fn is_busy(&self) -> bool {
        self.inner.state.lock().active > 0
    }

    /// Number of running activities.
    pub fn active_count(&self) -> usize {
        self.inner.state.lock().active
    }

    /// The current state.
    pub fn state(&self) -> ActivityState {
        let state = self.inner.state.lock();
        if state.active == 0 {
            ActivityState::Idle
        } else {
            ActivityState::Busy {
                active: state.active,
                message: state.message.clone(),
            }
        }
    }

    /// Signal emitted on every activity start and end.
    ///
    /// Notifications are delivered one at a time in the order the state
    /// changed, so the last one received always matches [`state`](Self::state)
    /// once activity settles.
    pub fn changed(&self) -> &Signal<ActivityState> {
        &self.inner.changed
    }
}

impl std::fmt::Debug for ProgressIndicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressIndicator")
            .field("state", &self.state())
            .finish()
    }
}

/// Ends its activity on drop.
#[must_use = "the activity ends as soon as the guard is dropped"]
pub struct ActivityGuard {
    indicator: ProgressIndicator,
}

impl Drop for ActivityGuard {
    fn drop(&mut self) {
        self.indicator.end();
    }
}

impl std::fmt::Debug for ActivityGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityGuard").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_activities() {
        let indicator = ProgressIndicator::new();
        let first = indicator.begin(Some("first"));
        let second = indicator.begin(None);

        assert_eq!(
            indicator.state(),
            ActivityState::Busy {
                active: 2,
                message: Some("first".to_string())
            }
        );

        drop(first);
        assert_eq!(indicator.active_count(), 1);
        drop(second);
        assert_eq!(indicator.state(), ActivityState::Idle);
    }

    #[test]
    fn test_changed_signal() {
        let indicator = ProgressIndicator::new();
        let states = Arc::new(Mutex::new(Vec::new()));

        let states_clone = states.clone();
        indicator.changed().connect(move |state| {
            states_clone.lock().push(state.clone());
        });

        drop(indicator.begin(Some("Loading")));

        assert_eq!(
            *states.lock(),
            vec![
                ActivityState::Busy {
                    active: 1,
                    message: Some("Loading".to_string())
                },
                ActivityState::Idle,
            ]
        );
    }

    #[test]
    fn test_last_notification_matches_state_across_threads() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::time::Duration;

        let indicator = ProgressIndicator::new();
        let states = Arc::new(Mutex::new(Vec::new()));
        let in_slot = Arc::new(AtomicBool::new(false));

        let first = indicator.begin(Some("a"));
        let second = indicator.begin(Some("b"));

        let sink = states.clone();
        let flag = in_slot.clone();
        indicator.changed().connect(move |state| {
            if matches!(state, ActivityState::Busy { active: 1, .. }) {
                flag.store(true, Ordering::SeqCst);
                // Hold this notification open while the other thread ends.
                std::thread::sleep(Duration::from_millis(50));
            }
            sink.lock().push(state.clone());
        });

        let ender = std::thread::spawn(move || drop(first));
        while !in_slot.load(Ordering::SeqCst) {
            std::thread::yield_now();
        }
        drop(second);
        ender.join().unwrap();

        assert_eq!(indicator.state(), ActivityState::Idle);
        assert_eq!(
            *states.lock(),
            vec![
                ActivityState::Busy {
                    active: 1,
                    message: Some("b".to_string())
                },
                ActivityState::Idle,
            ]
        );
    }

    #[test]
    fn test_slot_may_start_activity() {
        let indicator = ProgressIndicator::new();
        let handle = indicator.clone();
        let nested = Arc::new(Mutex::new(None));
        let slot_nested = nested.clone();
        indicator.changed().connect(move |state| {
            if matches!(state, ActivityState::Busy { active: 1, .. }) && slot_nested.lock().is_none() {
                *slot_nested.lock() = Some(handle.begin(Some("follow-up")));
            }
        });

        let guard = indicator.begin(Some("load"));
        assert_eq!(indicator.active_count(), 2);
        drop(guard);
        let follow_up = nested.lock().take();
        drop(follow_up);
        assert_eq!(indicator.state(), ActivityState::Idle);
    }

    #[test]
    fn test_clones_share_state() {
        let indicator = ProgressIndicator::new();
        let handle = indicator.clone();
        let _guard = handle.begin(None);
        assert!(indicator.is_busy());
    }
}
