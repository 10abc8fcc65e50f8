//! Logging facilities for Courier.
//!
//! Courier uses the `tracing` crate for instrumentation. To see logs, install a
//! tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("courier_net=debug,courier_core::bus=debug")
//!         .init();
//!
//!     // Your application code...
//! }
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "courier_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "courier_core::signal";
    /// Event bus target.
    pub const BUS: &str = "courier_core::bus";
    /// HTTP client target.
    pub const HTTP: &str = "courier_net::http";
    /// Transport target.
    pub const TRANSPORT: &str = "courier_net::transport";
    /// Response mapping target.
    pub const MAPPER: &str = "courier_net::mapper";
    /// Request adapter target.
    pub const ADAPTER: &str = "courier_net::adapter";
    /// Timed operations (see [`PerfSpan`](super::PerfSpan)).
    pub const PERF: &str = "courier::perf";
}

/// Entered `info` span with target [`targets::PERF`], exited on drop.
///
/// Not `Send`: hold it around synchronous work only.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

#[macro_export]
macro_rules! courier_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: $crate::logging::targets::CORE, $($arg)*)
    };
}

#[macro_export]
macro_rules! courier_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: $crate::logging::targets::CORE, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span() {
        let span = PerfSpan::new("map_json");
        drop(span);
    }

    #[test]
    fn test_targets_follow_module_paths() {
        let core = module_path!().split("::").next().unwrap();
        assert_eq!(targets::CORE, core);
        assert_eq!(targets::SIGNAL, format!("{core}::signal"));
        assert_eq!(targets::BUS, format!("{core}::bus"));
        for target in [targets::HTTP, targets::TRANSPORT, targets::MAPPER, targets::ADAPTER] {
            assert!(target.starts_with("courier_net::"));
        }
    }

    #[test]
    fn test_macros_expand() {
        courier_trace!("trace {}", 1);
        courier_warn!("warn");
    }
}
