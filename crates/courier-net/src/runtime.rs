//! Runtime management for fire-and-forget requests.
//!
//! [`spawn`] runs a future on the ambient tokio runtime when called from one,
//! and on a lazily created shared runtime otherwise, so UI threads without a
//! runtime can still dispatch requests.

use std::future::Future;
use std::sync::OnceLock;

use tokio::runtime::{Handle, Runtime};
use tokio::task::JoinHandle;

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Initialize the shared runtime.
///
/// Called implicitly by [`spawn`] when no runtime is active. Call it early to
/// control when the worker threads start.
pub fn init() -> &'static Runtime {
    RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("courier-net")
            .enable_all()
            .build()
            .expect("Failed to create tokio runtime")
    })
}

/// Spawn a future on the current runtime, or on the shared one.
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    match Handle::try_current() {
        Ok(handle) => handle.spawn(future),
        Err(_) => init().spawn(future),
    }
}

/// Block on a future using the shared runtime.
///
/// # Warning
///
/// Do not call this from within an async context or a UI event loop, as it
/// will block the current thread.
pub fn block_on<F: Future>(future: F) -> F::Output {
    init().block_on(future)
}
