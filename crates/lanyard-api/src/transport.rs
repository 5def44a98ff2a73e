//! Transport capability interface.

use crate::ApiRequest;
use lanyard_core::Result;
use serde_json::Value;

/// Executes a request/response exchange against the check-in service.
///
/// The query builder performs no I/O; implementations of this trait own the
/// HTTP (or in-memory, for tests) exchange. An implementation posts
/// [`ApiRequest::body`] to the service's GraphQL endpoint and returns the
/// raw JSON response envelope — decoding stays with the operation that
/// built the request.
///
/// # Design
///
/// - **No automatic retry**: the orchestrator forbids blind retry of
///   check-in mutations; a transport that retried internally would
///   reintroduce exactly the double-submission ambiguity the core exists
///   to prevent.
/// - **No timeout**: the orchestrator applies its configured timeout at the
///   call site, so implementations stay simple.
///
/// # Object Safety and Dynamic Dispatch
///
/// **NOTE**: This trait is NOT object-safe because `async fn` methods return
/// `impl Future` (Edition 2024 RPITIT). Use generic type parameters:
///
/// ```no_run
/// use lanyard_api::{ApiRequest, Transport};
/// use lanyard_core::Result;
/// use serde_json::Value;
///
/// async fn run<T: Transport>(transport: &T, request: &ApiRequest) -> Result<Value> {
///     transport.execute(request).await
/// }
/// ```
pub trait Transport: Send + Sync {
    /// Execute one request and return the raw JSON response envelope.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if:
    /// - The connection fails or is refused
    /// - The response is not JSON
    async fn execute(&self, request: &ApiRequest) -> Result<Value>;
}
