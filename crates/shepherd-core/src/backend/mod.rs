//! Backend abstraction for Shepherd.
//!
//! The [`Backend`] trait is the single seam between the search pipeline and
//! the record stores. One call is one attempt with one outcome: no retries,
//! no caching. Implementations convert every failure into a
//! [`BackendOutcome`] instead of returning an error.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use async_trait::async_trait;

use crate::models::{BackendOutcome, Filters};

/// A read-only record store reachable by endpoint path.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use shepherd_core::backend::Backend;
/// use shepherd_core::models::{BackendOutcome, Filters};
///
/// struct AlwaysDown;
///
/// #[async_trait]
/// impl Backend for AlwaysDown {
///     async fn call(&self, _endpoint: &str, _filters: &Filters) -> BackendOutcome {
///         BackendOutcome::TransportFailure("offline".to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait Backend: Send + Sync {
    /// Issue one read request against `endpoint` (e.g. `"/people/v2/people"`)
    /// with the given query-string filters.
    async fn call(&self, endpoint: &str, filters: &Filters) -> BackendOutcome;
}
