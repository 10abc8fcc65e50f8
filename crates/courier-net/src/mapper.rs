//! Mapping raw response bodies into typed values.

use courier_core::logging::targets;
use courier_core::{PerfSpan, RequestScope};
use serde::de::DeserializeOwned;

use crate::error::Result;

/// Turns a response body into a value of the caller's choosing.
///
/// Errors are returned to the caller untouched; mappers never substitute a
/// default value for a body they could not read.
pub trait ResponseMapper: Send + Sync {
    /// Map `body`, received in `scope`, into a `T`.
    fn map<T: DeserializeOwned>(&self, scope: &RequestScope, body: &str) -> Result<T>;
}

/// [`ResponseMapper`] for JSON bodies, backed by `serde_json`.
///
/// Missing fields follow the target type's serde attributes, so types that
/// mark fields `#[serde(default)]` accept partial bodies. Malformed JSON and
/// type mismatches are errors.
///
/// ```
/// use courier_core::RequestScope;
/// use courier_net::{JsonMapper, ResponseMapper};
///
/// #[derive(serde::Deserialize)]
/// struct Ack {
///     code: i32,
/// }
///
/// let scope = RequestScope::new("docs");
/// let ack: Ack = JsonMapper.map(&scope, r#"{"code": 1}"#).unwrap();
/// assert_eq!(ack.code, 1);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonMapper;

impl ResponseMapper for JsonMapper {
    fn map<T: DeserializeOwned>(&self, scope: &RequestScope, body: &str) -> Result<T> {
        let _span = PerfSpan::new("map_json");
        serde_json::from_str(body).map_err(|err| {
            tracing::warn!(
                target: targets::MAPPER,
                scope = scope.name(),
                target_type = std::any::type_name::<T>(),
                line = err.line(),
                column = err.column(),
                "failed to map response body: {err}"
            );
            err.into()
        })
    }
}
