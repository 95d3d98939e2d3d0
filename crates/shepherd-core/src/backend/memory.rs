//! In-memory [`Backend`] implementation for tests and offline demos.
//!
//! Responses are scripted per endpoint and exact filter set, with an
//! optional per-endpoint fallback. Every call is logged so callers can
//! assert how many requests a search issued and in which order.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::Backend;
use crate::models::{BackendOutcome, Filters, Record};

/// One logged call against a [`ScriptedBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub endpoint: String,
    pub filters: Filters,
}

/// Scripted backend keyed by `(endpoint, filters)`.
///
/// Lookup order: exact `(endpoint, filters)` match, then the endpoint
/// fallback, then `UnexpectedStatus(404)`.
pub struct ScriptedBackend {
    exact: HashMap<(String, Filters), BackendOutcome>,
    fallback: HashMap<String, BackendOutcome>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            exact: HashMap::new(),
            fallback: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer `endpoint` called with exactly `filters` with `outcome`.
    pub fn respond(mut self, endpoint: &str, filters: Filters, outcome: BackendOutcome) -> Self {
        self.exact.insert((endpoint.to_string(), filters), outcome);
        self
    }

    /// Answer any otherwise unscripted call to `endpoint` with `outcome`.
    pub fn respond_any(mut self, endpoint: &str, outcome: BackendOutcome) -> Self {
        self.fallback.insert(endpoint.to_string(), outcome);
        self
    }

    /// Shorthand for `respond_any` with records built from `name` values.
    pub fn names(self, endpoint: &str, names: &[&str]) -> Self {
        let records = names
            .iter()
            .map(|n| Record::from_pairs([("name", *n)]))
            .collect();
        self.respond_any(endpoint, BackendOutcome::from_records(records))
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls received for `endpoint`.
    pub fn calls_to(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.endpoint == endpoint)
            .count()
    }
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    async fn call(&self, endpoint: &str, filters: &Filters) -> BackendOutcome {
        self.calls.lock().unwrap().push(RecordedCall {
            endpoint: endpoint.to_string(),
            filters: filters.clone(),
        });

        self.exact
            .get(&(endpoint.to_string(), filters.clone()))
            .or_else(|| self.fallback.get(endpoint))
            .cloned()
            .unwrap_or(BackendOutcome::UnexpectedStatus(404))
    }
}
