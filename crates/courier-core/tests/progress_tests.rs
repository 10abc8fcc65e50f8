//! Progress indicator behaviour under concurrent activities.

use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use courier_core::{ActivityState, ProgressIndicator, RequestScope};
use parking_lot::Mutex;

#[test]
fn test_overlapping_activities_end_idle() {
    let scope = RequestScope::new("detail");
    let states = Arc::new(Mutex::new(Vec::new()));
    let sink = states.clone();
    let _watch = scope.progress().changed().connect(move |state| {
        // Slow slots widen the window between state change and delivery.
        thread::sleep(Duration::from_micros(200));
        sink.lock().push(state.clone());
    });

    for _ in 0..20 {
        let barrier = Arc::new(Barrier::new(6));
        let workers: Vec<_> = (0..6)
            .map(|n| {
                let progress = scope.progress().clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    let label = format!("worker {n}");
                    let guard = progress.begin(Some(label.as_str()));
                    barrier.wait();
                    drop(guard);
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(scope.progress().state(), ActivityState::Idle);
        assert_eq!(states.lock().last(), Some(&ActivityState::Idle));
    }
}

#[test]
fn test_notifications_follow_count_order() {
    let indicator = ProgressIndicator::new();
    let counts = Arc::new(Mutex::new(Vec::new()));
    let sink = counts.clone();
    indicator.changed().connect(move |state| {
        let active = match state {
            ActivityState::Busy { active, .. } => *active,
            ActivityState::Idle => 0,
        };
        sink.lock().push(active);
    });

    let workers: Vec<_> = (0..8)
        .map(|_| {
            let indicator = indicator.clone();
            thread::spawn(move || {
                for _ in 0..50 {
                    let _guard = indicator.begin(None);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let counts = counts.lock();
    assert_eq!(counts.len(), 8 * 50 * 2);
    // Each delivered count differs from the previous one by exactly one.
    let mut previous = 0usize;
    for &active in counts.iter() {
        assert_eq!(active.abs_diff(previous), 1);
        previous = active;
    }
    assert_eq!(previous, 0);
}
