//! Core data types shared by the backend client, the source adapters, and
//! the orchestrator.
//!
//! - [`Record`]: one entry of a record-store response.
//! - [`Filters`]: ordered, key-unique query-string parameters.
//! - [`BackendOutcome`]: the typed result of a single backend call.
//!
//! # Payload shape
//!
//! Every record store answers with a JSON document whose top-level `data`
//! field is either an array of records or, for the root identity endpoint,
//! a single record object:
//!
//! ```json
//! { "data": [ { "type": "Person", "id": "1", "attributes": { "name": "Ann" } } ] }
//! ```

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;
use serde_json::{Map, Value};

/// Label substituted for any attribute a record does not carry.
pub const DEFAULT_LABEL: &str = "Unknown";

/// A single record returned by a record store.
///
/// Only the `attributes` mapping is retained; every attribute is optional
/// and lookups never fail. A missing, `null`, or non-object `attributes`
/// value reads as an empty mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, deserialize_with = "lenient_attributes")]
    pub attributes: Map<String, Value>,
}

fn lenient_attributes<'de, D>(deserializer: D) -> std::result::Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map,
        _ => Map::new(),
    })
}

impl Record {
    /// Build a record from `(field, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            attributes: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns the attribute as display text.
    ///
    /// Strings are returned verbatim, numbers and booleans are stringified.
    /// Null, missing, and nested values yield `None`.
    pub fn text(&self, field: &str) -> Option<String> {
        match self.attributes.get(field)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Returns the attribute as display text, or [`DEFAULT_LABEL`].
    pub fn label(&self, field: &str) -> String {
        self.text(field).unwrap_or_else(|| DEFAULT_LABEL.to_string())
    }
}

/// Ordered query-string parameters with unique keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Filters(Vec<(String, String)>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Adds a `where[<field>]=<value>` predicate.
    pub fn where_eq(mut self, field: &str, value: impl Into<String>) -> Self {
        self.insert(format!("where[{}]", field), value);
        self
    }

    /// Adds a `per_page=<n>` page size.
    pub fn per_page(mut self, n: usize) -> Self {
        self.insert("per_page", n.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// The outcome of one backend call.
///
/// Created per call and consumed immediately by the issuing adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendOutcome {
    /// HTTP 200 with at least one record.
    Records(Vec<Record>),
    /// HTTP 200 with zero records.
    Empty,
    /// HTTP 403.
    AuthDenied,
    /// Timeout, connection error, or an undecodable 200 body.
    TransportFailure(String),
    /// Any other HTTP status.
    UnexpectedStatus(u16),
}

impl BackendOutcome {
    pub fn from_records(records: Vec<Record>) -> Self {
        if records.is_empty() {
            BackendOutcome::Empty
        } else {
            BackendOutcome::Records(records)
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BackendOutcome::Records(_) | BackendOutcome::Empty)
    }

    /// Short human-readable reason for a failed outcome.
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            BackendOutcome::Records(_) | BackendOutcome::Empty => None,
            BackendOutcome::AuthDenied => Some("403 Forbidden".to_string()),
            BackendOutcome::TransportFailure(detail) => {
                Some(format!("connection failed: {}", detail))
            }
            BackendOutcome::UnexpectedStatus(code) => Some(format!("unexpected status {}", code)),
        }
    }
}

/// Decode a successful response body into records.
///
/// `data` may be an array (listing endpoints) or a single object (root
/// identity endpoint). A non-JSON body or a missing, `null`, or scalar
/// `data` field is an error. An array element that is not a record object
/// becomes an empty record, so the rest of the page is kept.
pub fn parse_payload(body: &[u8]) -> Result<Vec<Record>> {
    let json: Value =
        serde_json::from_slice(body).map_err(|e| anyhow!("invalid JSON body: {}", e))?;

    match json.get("data") {
        Some(Value::Array(items)) => Ok(items.iter().map(record_from).collect()),
        Some(item @ Value::Object(_)) => Ok(vec![record_from(item)]),
        Some(other) => bail!("unexpected `data` value of type {}", json_type(other)),
        None => bail!("response has no `data` field"),
    }
}

fn record_from(item: &Value) -> Record {
    Record::deserialize(item).unwrap_or_else(|e| {
        debug!(kind = json_type(item), error = %e, "unreadable record, using defaults");
        Record::default()
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
