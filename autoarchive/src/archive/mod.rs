//! Module dedicated to the retention pass.
//!
//! The [`Archiver`] drives one full evaluation-and-archive cycle:
//! resolve policies from matched labels, collect the governed
//! message identifiers, fetch their envelopes in one batch, evaluate
//! each message's age, then archive the expired ones in one batch.

use chrono::{DateTime, Utc};
use log::{debug, info};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::{
    account::config::AccountConfig,
    backend::Backend,
    policy::{self, RetentionPolicy},
    timestamp::Timestamp,
    Result,
};

/// Errors related to the retention pass.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot find retention policy of message {0}")]
    FindPolicyError(String),
}

/// The summary of one retention pass.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ArchiveReport {
    /// The number of messages considered for archival, all governing
    /// labels merged.
    pub considered: usize,

    /// The identifiers of the messages that were archived.
    pub archived_ids: Vec<String>,
}

/// The retention pass runner.
pub struct Archiver {
    /// The account configuration, holding the retention label
    /// pattern.
    account_config: AccountConfig,
}

impl Archiver {
    pub fn new(account_config: AccountConfig) -> Self {
        Self { account_config }
    }

    /// Run one retention pass against the given backend.
    ///
    /// The reference instant is captured once by the caller: every
    /// message of the pass is judged against it, even if the pass
    /// takes measurable wall-clock time. All reads happen before the
    /// single batched archive mutation, so a failing pass aborts
    /// without having mutated anything.
    pub async fn archive(
        &self,
        backend: &mut dyn Backend,
        now: DateTime<Utc>,
    ) -> Result<ArchiveReport> {
        let pattern = &self.account_config.label_pattern;
        info!("archiving expired messages matching labels {pattern}");

        let labels = backend.list_labels(pattern).await?;
        debug!("matched labels: {labels:?}");

        let policies = policy::from_labels(labels)?;
        if policies.is_empty() {
            info!("no retention label found, nothing to archive");
            return Ok(ArchiveReport::default());
        }

        // Merge the per-label id sets into one policy mapping. A
        // message carried by several retention labels is governed by
        // the most restrictive one (smallest age limit; first label
        // listed wins ties).
        let mut policies_by_id: BTreeMap<String, RetentionPolicy> = BTreeMap::new();
        for policy in policies {
            let ids = backend.search_label_ids(&policy.label).await?;
            debug!("label {} matches {} message(s)", policy.label, ids.len());

            for id in ids {
                match policies_by_id.get(&id) {
                    Some(prev) if prev.age_limit_days <= policy.age_limit_days => (),
                    _ => {
                        policies_by_id.insert(id, policy.clone());
                    }
                }
            }
        }

        if policies_by_id.is_empty() {
            info!("no message carries a retention label, nothing to archive");
            return Ok(ArchiveReport::default());
        }

        let ids: Vec<String> = policies_by_id.keys().cloned().collect();
        let envelopes = backend.fetch_envelopes(&ids).await?;
        debug!("fetched {} envelope(s)", envelopes.len());

        let mut archived_ids = Vec::new();
        for envelope in envelopes.iter() {
            let policy = policies_by_id
                .get(&envelope.id)
                .ok_or_else(|| Error::FindPolicyError(envelope.id.clone()))?;
            let timestamp: Timestamp = envelope.date.parse()?;

            if policy.is_expired(now, &timestamp) {
                info!(
                    "archiving message {} expired by label {}: {}",
                    envelope.id, policy.label, envelope.subject,
                );
                archived_ids.push(envelope.id.clone());
            }
        }

        if archived_ids.is_empty() {
            info!("no expired message, nothing to archive");
        } else {
            backend.archive_messages(&archived_ids).await?;
            info!("archived {} message(s)", archived_ids.len());
        }

        Ok(ArchiveReport {
            considered: policies_by_id.len(),
            archived_ids,
        })
    }
}
