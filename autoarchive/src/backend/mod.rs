//! Module dedicated to mail store backends.
//!
//! This module exposes the backend trait, the narrow capability
//! surface a retention pass consumes from the mail store. Requests
//! are strictly sequential, one outstanding at a time, and the two
//! message-level operations are batched: one header fetch and at
//! most one archive mutation per pass, whatever the message count.

use async_trait::async_trait;
use std::collections::BTreeSet;

use crate::{envelope::Envelopes, Result};

#[async_trait]
pub trait Backend: Send {
    /// List the label names matching the given wildcard pattern.
    ///
    /// An empty list is a normal state, not an error.
    async fn list_labels(&mut self, pattern: &str) -> Result<Vec<String>>;

    /// Find the identifiers of the inbox messages carrying the given
    /// label.
    async fn search_label_ids(&mut self, label: &str) -> Result<BTreeSet<String>>;

    /// Fetch the envelopes of the given messages, in one single
    /// batched request.
    async fn fetch_envelopes(&mut self, ids: &[String]) -> Result<Envelopes>;

    /// Archive the given messages, in one single batched request.
    ///
    /// Archiving removes messages from the inbox view while keeping
    /// them in the backing store: a folder membership change, not a
    /// deletion. Archiving an already-archived message is a no-op.
    async fn archive_messages(&mut self, ids: &[String]) -> Result<()>;
}
