//! Execution context passed alongside requests.

use std::sync::Arc;

use crate::progress::ProgressIndicator;

struct ScopeInner {
    name: String,
    progress: ProgressIndicator,
}

/// The execution context a request runs on behalf of.
///
/// A scope typically belongs to one screen or component. It names the caller
/// in logs and owns the [`ProgressIndicator`] that transports drive when a
/// request asks for progress to be shown. Request code only reads from it.
///
/// Cloning yields another handle to the same scope.
///
/// ```
/// use courier_core::RequestScope;
///
/// let scope = RequestScope::new("win-item-detail");
/// assert_eq!(scope.name(), "win-item-detail");
/// assert!(!scope.progress().is_busy());
/// ```
#[derive(Clone)]
pub struct RequestScope {
    inner: Arc<ScopeInner>,
}

impl RequestScope {
    /// Create a scope with its own progress indicator.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_progress(name, ProgressIndicator::new())
    }

    /// Create a scope that reports to an existing progress indicator.
    pub fn with_progress(name: impl Into<String>, progress: ProgressIndicator) -> Self {
        Self {
            inner: Arc::new(ScopeInner {
                name: name.into(),
                progress,
            }),
        }
    }

    /// The scope's name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The progress indicator for requests made in this scope.
    pub fn progress(&self) -> &ProgressIndicator {
        &self.inner.progress
    }
}

impl std::fmt::Debug for RequestScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestScope")
            .field("name", &self.inner.name)
            .field("progress", &self.inner.progress)
            .finish()
    }
}
