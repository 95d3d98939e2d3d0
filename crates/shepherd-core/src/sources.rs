//! Source adapters, one per record store.
//!
//! Each adapter knows its endpoint, the filters it sends, and how to render
//! its records into a one-line context fragment and its status into
//! diagnostic lines. Adapters never fail: every [`BackendOutcome`] maps to a
//! [`SourceReport`].
//!
//! | Adapter | Endpoint | Filter | Page size |
//! |---------|----------|--------|-----------|
//! | [`OrgProbe`] | `/` | none | — |
//! | [`PeopleSource`] | `/people/v2/people` | `where[search_name_or_email]` | 5 (retry 3) |
//! | [`GatheringsSource`] | `/services/v2/service_types` | none | — |
//! | [`ExactNameSource::calendar`] | `/calendar/v2/events` | `where[name]` | 3 |
//! | [`ExactNameSource::groups`] | `/groups/v2/groups` | `where[name]` | 3 |
//!
//! Only the people adapter can place a failure into the context string: a
//! 403 there becomes [`PERMISSION_DENIED_FRAGMENT`] so the answer can tell
//! staff to fix the API key scopes.

use async_trait::async_trait;
use serde::Serialize;

use crate::backend::Backend;
use crate::models::{BackendOutcome, Filters, Record};
use crate::retry::{RetryDecision, RetryPolicy};

pub const ORG_ENDPOINT: &str = "/";
pub const PEOPLE_ENDPOINT: &str = "/people/v2/people";
pub const GATHERINGS_ENDPOINT: &str = "/services/v2/service_types";
pub const CALENDAR_ENDPOINT: &str = "/calendar/v2/events";
pub const GROUPS_ENDPOINT: &str = "/groups/v2/groups";

/// Context fragment emitted when the people directory answers 403.
///
/// Starts with the `ERROR` marker the answer template looks for.
pub const PERMISSION_DENIED_FRAGMENT: &str = "ERROR: Permission Denied to People Database.";

const UNKNOWN_ORG: &str = "Unknown Org";

/// Which record store an adapter talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Organization,
    People,
    Gatherings,
    Calendar,
    Groups,
}

/// What one adapter contributed to a search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceReport {
    /// Context fragment, present only for usable findings (or the people 403).
    pub fragment: Option<String>,
    /// Diagnostic lines in the order the adapter produced them.
    pub lines: Vec<String>,
    /// Whether the adapter found at least one matching record.
    pub found: bool,
}

impl SourceReport {
    fn line(line: String) -> Self {
        Self {
            lines: vec![line],
            ..Default::default()
        }
    }
}

/// A record store queried as part of a federated search.
#[async_trait]
pub trait Source: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Display name used as the diagnostic prefix (e.g. `"People API"`).
    fn name(&self) -> &str;

    fn endpoint(&self) -> &str;

    /// Query the store for `cleaned` (the trimmed user query).
    async fn query(&self, backend: &dyn Backend, cleaned: &str) -> SourceReport;
}

/// Diagnostic line for a failed call.
fn failure_line(api: &str, outcome: &BackendOutcome) -> String {
    match outcome {
        BackendOutcome::AuthDenied => format!("❌ {}: 403 Forbidden (Check API Key Scopes)", api),
        BackendOutcome::TransportFailure(detail) => {
            format!("❌ {}: Connection failed ({})", api, detail)
        }
        BackendOutcome::UnexpectedStatus(code) => {
            format!("❌ {}: Unexpected status {}", api, code)
        }
        BackendOutcome::Records(_) | BackendOutcome::Empty => {
            format!("❌ {}: Request failed", api)
        }
    }
}

fn join_names<'a>(records: impl IntoIterator<Item = &'a Record>) -> String {
    records
        .into_iter()
        .map(|r| r.label("name"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_people(records: &[Record]) -> String {
    records
        .iter()
        .map(|r| format!("{} ({})", r.label("name"), r.label("status")))
        .collect::<Vec<_>>()
        .join(", ")
}

// ═══════════════════════════════════════════════════════════════════════
// Organization probe
// ═══════════════════════════════════════════════════════════════════════

/// Reports which organization the credentials belong to.
///
/// Contributes a diagnostic line only; identity is not search data.
pub struct OrgProbe;

#[async_trait]
impl Source for OrgProbe {
    fn kind(&self) -> SourceKind {
        SourceKind::Organization
    }

    fn name(&self) -> &str {
        "Org Check"
    }

    fn endpoint(&self) -> &str {
        ORG_ENDPOINT
    }

    async fn query(&self, backend: &dyn Backend, _cleaned: &str) -> SourceReport {
        let line = match backend.call(ORG_ENDPOINT, &Filters::new()).await {
            BackendOutcome::Records(records) => {
                let name = records
                    .first()
                    .and_then(|r| r.text("name"))
                    .unwrap_or_else(|| UNKNOWN_ORG.to_string());
                format!("🏢 Connected to Organization: **{}**", name)
            }
            BackendOutcome::Empty => {
                format!("🏢 Connected to Organization: **{}**", UNKNOWN_ORG)
            }
            failed => format!(
                "❌ Org Check: Failed to connect to the record store root ({}).",
                failed.failure_reason().unwrap_or_default()
            ),
        };
        SourceReport::line(line)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// People directory
// ═══════════════════════════════════════════════════════════════════════

/// Name-or-email search over the people directory, with one partial-name
/// retry when the full query finds nobody.
pub struct PeopleSource {
    page_size: usize,
    retry: RetryPolicy,
}

impl PeopleSource {
    pub fn new(page_size: usize, retry: RetryPolicy) -> Self {
        Self { page_size, retry }
    }

    fn filters(term: &str, page_size: usize) -> Filters {
        Filters::new()
            .where_eq("search_name_or_email", term)
            .per_page(page_size)
    }

    async fn retry_partial(&self, backend: &dyn Backend, cleaned: &str, report: &mut SourceReport) {
        let token = match self.retry.decide(cleaned) {
            RetryDecision::Retry(token) => token,
            RetryDecision::Skip { token, reason } => {
                report.lines.push(format!(
                    "⏭️ People API: Partial search skipped for '{}' ({}).",
                    token,
                    reason.describe()
                ));
                return;
            }
        };

        let filters = Self::filters(&token, self.retry.page_size);
        match backend.call(PEOPLE_ENDPOINT, &filters).await {
            BackendOutcome::Records(people) => {
                report.found = true;
                report.lines.push(format!(
                    "✅ People API: Retry found {} matches for '{}'",
                    people.len(),
                    token
                ));
                report.fragment = Some(format!(
                    "No exact match, but found similar names: {}",
                    join_people(&people)
                ));
            }
            BackendOutcome::Empty => {
                report.lines.push(format!(
                    "❌ People API: Retry also found 0 records for '{}'.",
                    token
                ));
            }
            failed => {
                report.lines.push(format!(
                    "❌ People API: Retry for '{}' failed ({}).",
                    token,
                    failed.failure_reason().unwrap_or_default()
                ));
            }
        }
    }
}

#[async_trait]
impl Source for PeopleSource {
    fn kind(&self) -> SourceKind {
        SourceKind::People
    }

    fn name(&self) -> &str {
        "People API"
    }

    fn endpoint(&self) -> &str {
        PEOPLE_ENDPOINT
    }

    async fn query(&self, backend: &dyn Backend, cleaned: &str) -> SourceReport {
        let filters = Self::filters(cleaned, self.page_size);
        match backend.call(PEOPLE_ENDPOINT, &filters).await {
            BackendOutcome::Records(people) => SourceReport {
                fragment: Some(format!("Found in People Directory: {}", join_people(&people))),
                lines: vec![format!(
                    "✅ People API: Found {} matches for '{}'",
                    people.len(),
                    cleaned
                )],
                found: true,
            },
            BackendOutcome::Empty => {
                let mut report = SourceReport::line(format!(
                    "⚠️ People API: 0 results for '{}'.",
                    cleaned
                ));
                self.retry_partial(backend, cleaned, &mut report).await;
                report
            }
            BackendOutcome::AuthDenied => SourceReport {
                fragment: Some(PERMISSION_DENIED_FRAGMENT.to_string()),
                lines: vec![failure_line(self.name(), &BackendOutcome::AuthDenied)],
                found: false,
            },
            failed => SourceReport::line(failure_line(self.name(), &failed)),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Gathering types
// ═══════════════════════════════════════════════════════════════════════

/// Lists gathering (service) types.
///
/// The endpoint enumerates types, not scheduled instances, so it cannot
/// answer "when is the next gathering" questions. The query text is not
/// sent.
pub struct GatheringsSource {
    cap: usize,
}

impl GatheringsSource {
    pub fn new(cap: usize) -> Self {
        Self { cap }
    }
}

#[async_trait]
impl Source for GatheringsSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Gatherings
    }

    fn name(&self) -> &str {
        "Services API"
    }

    fn endpoint(&self) -> &str {
        GATHERINGS_ENDPOINT
    }

    async fn query(&self, backend: &dyn Backend, _cleaned: &str) -> SourceReport {
        match backend.call(GATHERINGS_ENDPOINT, &Filters::new()).await {
            BackendOutcome::Records(types) => SourceReport {
                fragment: Some(format!(
                    "Gathering Types: {}",
                    join_names(types.iter().take(self.cap))
                )),
                lines: vec![format!(
                    "✅ Services API: Success. Found {} Gathering Types.",
                    types.len()
                )],
                found: true,
            },
            BackendOutcome::Empty => {
                SourceReport::line("✅ Services API: Success. Found 0 Gathering Types.".to_string())
            }
            failed => SourceReport::line(failure_line(self.name(), &failed)),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Exact-name stores (calendar events, groups)
// ═══════════════════════════════════════════════════════════════════════

/// Exact `where[name]` lookup with no retry.
///
/// Used for calendar events and small groups, which share one shape.
pub struct ExactNameSource {
    kind: SourceKind,
    name: &'static str,
    endpoint: &'static str,
    heading: &'static str,
    noun: &'static str,
    page_size: usize,
}

impl ExactNameSource {
    pub fn calendar(page_size: usize) -> Self {
        Self {
            kind: SourceKind::Calendar,
            name: "Calendar API",
            endpoint: CALENDAR_ENDPOINT,
            heading: "Calendar Events",
            noun: "events",
            page_size,
        }
    }

    pub fn groups(page_size: usize) -> Self {
        Self {
            kind: SourceKind::Groups,
            name: "Groups API",
            endpoint: GROUPS_ENDPOINT,
            heading: "Small Groups",
            noun: "groups",
            page_size,
        }
    }
}

#[async_trait]
impl Source for ExactNameSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn name(&self) -> &str {
        self.name
    }

    fn endpoint(&self) -> &str {
        self.endpoint
    }

    async fn query(&self, backend: &dyn Backend, cleaned: &str) -> SourceReport {
        let filters = Filters::new()
            .where_eq("name", cleaned)
            .per_page(self.page_size);

        match backend.call(self.endpoint, &filters).await {
            BackendOutcome::Records(records) => SourceReport {
                fragment: Some(format!("{}: {}", self.heading, join_names(&records))),
                lines: vec![format!(
                    "✅ {}: Found {} {}.",
                    self.name,
                    records.len(),
                    self.noun
                )],
                found: true,
            },
            BackendOutcome::Empty => {
                SourceReport::line(format!("✅ {}: 0 {} found.", self.name, self.noun))
            }
            failed => SourceReport::line(failure_line(self.name, &failed)),
        }
    }
}
