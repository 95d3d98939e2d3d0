//! Partial-name retry for people lookups.
//!
//! When a people search for the full query comes back empty, a second and
//! final search is issued for the query's first word ("Alex" for
//! "Alex Miller"). The retry only runs when that word is long enough to be
//! meaningful and actually differs from the query.

use serde::{Deserialize, Serialize};

/// Retry settings, deserialized from `[search.retry]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Minimum first-word length, in characters, for a retry to run.
    #[serde(default = "default_min_token_chars")]
    pub min_token_chars: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_enabled() -> bool {
    true
}
fn default_min_token_chars() -> usize {
    3
}
fn default_page_size() -> usize {
    3
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            min_token_chars: default_min_token_chars(),
            page_size: default_page_size(),
        }
    }
}

/// Why a retry did not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Disabled,
    TokenTooShort,
    SameAsQuery,
}

impl SkipReason {
    pub fn describe(&self) -> &'static str {
        match self {
            SkipReason::Disabled => "partial search disabled",
            SkipReason::TokenTooShort => "first word too short",
            SkipReason::SameAsQuery => "query is a single word",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    Retry(String),
    Skip { token: String, reason: SkipReason },
}

/// First segment of `cleaned` when split on a single space.
///
/// Consecutive spaces are not collapsed, so `"  x"` has an empty first token.
pub fn first_token(cleaned: &str) -> &str {
    cleaned.split(' ').next().unwrap_or("")
}

impl RetryPolicy {
    pub fn decide(&self, cleaned: &str) -> RetryDecision {
        let token = first_token(cleaned).to_string();
        let reason = if !self.enabled {
            Some(SkipReason::Disabled)
        } else if token.chars().count() < self.min_token_chars {
            Some(SkipReason::TokenTooShort)
        } else if token == cleaned {
            Some(SkipReason::SameAsQuery)
        } else {
            None
        };

        match reason {
            Some(reason) => RetryDecision::Skip { token, reason },
            None => RetryDecision::Retry(token),
        }
    }
}
