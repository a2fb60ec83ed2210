//! Module dedicated to retention policies.
//!
//! A retention policy is the age limit encoded in a label name like
//! `aa:3`: messages carrying the label and older than 3 days are
//! subject to archival.

use chrono::{DateTime, Duration, Utc};
use std::{num::ParseIntError, result};
use thiserror::Error;

use crate::timestamp::Timestamp;

/// The delimiter between a retention label's prefix and its age
/// limit suffix.
const AGE_LIMIT_DELIM: char = ':';

/// The global `Result` alias of the module.
pub type Result<T> = result::Result<T, Error>;

/// Errors related to retention policies.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot parse age limit from label {1}")]
    ParseAgeLimitError(#[source] ParseIntError, String),
}

/// The retention policy parsed from one label name.
///
/// Immutable once parsed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RetentionPolicy {
    /// The label name the policy was parsed from.
    pub label: String,

    /// The maximum age in days a message carrying the label may
    /// reach before becoming eligible for archival.
    pub age_limit_days: u32,
}

impl RetentionPolicy {
    /// Parse a retention policy from a label name.
    ///
    /// The age limit is the decimal suffix following the first
    /// delimiter, so `aa:3` yields 3. A label without delimiter or
    /// with a non-integer suffix is an error: proceeding would
    /// silently apply no policy or a wrong one.
    pub fn from_label(label: impl ToString) -> Result<Self> {
        let label = label.to_string();
        let suffix = label
            .split_once(AGE_LIMIT_DELIM)
            .map(|(_, suffix)| suffix)
            .unwrap_or(label.as_str());
        let age_limit_days = suffix
            .trim()
            .parse()
            .map_err(|err| Error::ParseAgeLimitError(err, label.clone()))?;

        Ok(Self {
            label,
            age_limit_days,
        })
    }

    /// The age limit as a duration.
    pub fn max_age(&self) -> Duration {
        Duration::days(self.age_limit_days.into())
    }

    /// Evaluate whether a message timestamp has expired relatively
    /// to the given reference instant.
    ///
    /// Strict comparison: a message exactly at the age boundary is
    /// retained, not archived. The reference instant is captured
    /// once per retention pass so that every message of the pass is
    /// judged against the same point in time.
    pub fn is_expired(&self, now: DateTime<Utc>, timestamp: &Timestamp) -> bool {
        now.signed_duration_since(timestamp.instant) > self.max_age()
    }
}

/// Parse retention policies from a sequence of matched label names.
///
/// An empty sequence yields no policies: the absence of retention
/// labels is a normal state, not an error.
pub fn from_labels(labels: impl IntoIterator<Item = String>) -> Result<Vec<RetentionPolicy>> {
    labels
        .into_iter()
        .map(RetentionPolicy::from_label)
        .collect()
}
