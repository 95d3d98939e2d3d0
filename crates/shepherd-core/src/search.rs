//! Federated search orchestrator.
//!
//! Runs the source adapters for one query in a fixed order, strictly one
//! after another:
//!
//! 1. organization probe (diagnostic only)
//! 2. people directory, with at most one partial-name retry
//! 3. gathering types
//! 4. calendar events
//! 5. small groups (when enabled)
//!
//! That bounds a search to six backend calls. A failing store never stops
//! the others from being queried. Fragments are merged in adapter order
//! into the context string; every diagnostic line is kept, in execution
//! order, in a separate trace. The two never mix.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backend::Backend;
use crate::diagnostics::DiagnosticRecorder;
use crate::retry::RetryPolicy;
use crate::sources::{
    ExactNameSource, GatheringsSource, OrgProbe, PeopleSource, Source, SourceKind,
};

/// Context string returned when no adapter produced a fragment.
pub const NO_DATA_SENTINEL: &str = "No matching records found.";

/// Orchestration flags, deserialized from `[search]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPolicy {
    #[serde(default = "default_people_page_size")]
    pub people_page_size: usize,
    #[serde(default)]
    pub retry: RetryPolicy,
    /// Maximum number of gathering types listed in the context.
    #[serde(default = "default_gatherings_cap")]
    pub gatherings_cap: usize,
    /// Drop the gathering-types fragment when the people search found
    /// someone. The call itself always runs.
    #[serde(default)]
    pub gatherings_only_without_people: bool,
    #[serde(default = "default_small_page_size")]
    pub calendar_page_size: usize,
    #[serde(default = "default_query_groups")]
    pub query_groups: bool,
    #[serde(default = "default_small_page_size")]
    pub groups_page_size: usize,
}

fn default_people_page_size() -> usize {
    5
}
fn default_gatherings_cap() -> usize {
    5
}
fn default_small_page_size() -> usize {
    3
}
fn default_query_groups() -> bool {
    true
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            people_page_size: default_people_page_size(),
            retry: RetryPolicy::default(),
            gatherings_cap: default_gatherings_cap(),
            gatherings_only_without_people: false,
            calendar_page_size: default_small_page_size(),
            query_groups: default_query_groups(),
            groups_page_size: default_small_page_size(),
        }
    }
}

/// The result of one federated search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    /// Newline-joined fragments, or [`NO_DATA_SENTINEL`].
    pub context: String,
    /// Newline-joined diagnostic lines.
    pub diagnostics: String,
    /// Whether the people directory (primary or retry) matched anyone.
    pub people_found: bool,
}

impl SearchOutcome {
    /// `(context, diagnostics)`.
    pub fn into_pair(self) -> (String, String) {
        (self.context, self.diagnostics)
    }
}

/// The adapters `policy` enables, in invocation order.
pub fn build_sources(policy: &SearchPolicy) -> Vec<Box<dyn Source>> {
    let mut sources: Vec<Box<dyn Source>> = vec![
        Box::new(OrgProbe),
        Box::new(PeopleSource::new(
            policy.people_page_size,
            policy.retry.clone(),
        )),
        Box::new(GatheringsSource::new(policy.gatherings_cap)),
        Box::new(ExactNameSource::calendar(policy.calendar_page_size)),
    ];
    if policy.query_groups {
        sources.push(Box::new(ExactNameSource::groups(policy.groups_page_size)));
    }
    sources
}

/// Fans one query out to every configured record store.
///
/// Holds only immutable state; a single orchestrator can serve concurrent
/// searches.
#[derive(Clone)]
pub struct Orchestrator {
    backend: Arc<dyn Backend>,
    policy: SearchPolicy,
    sources: Arc<Vec<Box<dyn Source>>>,
}

impl Orchestrator {
    pub fn new(backend: Arc<dyn Backend>, policy: SearchPolicy) -> Self {
        let sources = build_sources(&policy);
        Self {
            backend,
            policy,
            sources: Arc::new(sources),
        }
    }

    pub fn policy(&self) -> &SearchPolicy {
        &self.policy
    }

    /// Adapters in invocation order.
    pub fn sources(&self) -> &[Box<dyn Source>] {
        &self.sources
    }

    /// Run the organization probe alone and return its diagnostic line.
    pub async fn probe(&self) -> String {
        let report = OrgProbe.query(self.backend.as_ref(), "").await;
        report.lines.join("\n")
    }

    /// Search every store for `query` and merge the results.
    ///
    /// Never fails: backend problems show up in the diagnostic trace (and,
    /// for a people-directory 403, as an `ERROR` fragment).
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let cleaned = query.trim();
        let mut fragments: Vec<String> = Vec::new();
        let mut trace = DiagnosticRecorder::new();
        let mut people_found = false;

        for source in self.sources.iter() {
            let report = source.query(self.backend.as_ref(), cleaned).await;
            debug!(
                source = source.name(),
                found = report.found,
                has_fragment = report.fragment.is_some(),
                "source finished"
            );
            trace.extend(report.lines);

            match source.kind() {
                SourceKind::People => people_found = report.found,
                SourceKind::Gatherings
                    if self.policy.gatherings_only_without_people && people_found =>
                {
                    continue;
                }
                _ => {}
            }

            if let Some(fragment) = report.fragment {
                fragments.push(fragment);
            }
        }

        let context = if fragments.is_empty() {
            NO_DATA_SENTINEL.to_string()
        } else {
            fragments.join("\n")
        };

        SearchOutcome {
            context,
            diagnostics: trace.render(),
            people_found,
        }
    }
}
