//! Module dedicated to IMAP email envelopes.
//!
//! This module provides envelope-related mapping functions from the
//! [imap] crate types.

use std::result;
use thiserror::Error;

use super::{Envelope, Envelopes};

/// Represents the raw envelope returned by the `imap` crate.
pub type ImapFetch = imap::types::Fetch;

/// Represents the list of raw envelopes returned by the `imap`
/// crate.
pub type ImapFetches = imap::types::ZeroCopy<Vec<ImapFetch>>;

/// The global `Result` alias of the module.
pub type Result<T> = result::Result<T, Error>;

/// Errors related to IMAP envelope mapping.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot get uid of message {0}: uid is missing")]
    GetUidError(u32),
    #[error("cannot get envelope of message {0}")]
    GetEnvelopeError(u32),
    #[error("cannot get date of message {0}: date header is missing")]
    GetDateError(String),
    #[error("cannot decode subject of message {0}")]
    DecodeSubjectError(#[source] rfc2047_decoder::Error, String),
}

pub fn from_imap_fetches(fetches: ImapFetches) -> Result<Envelopes> {
    fetches.iter().map(from_imap_fetch).collect()
}

pub fn from_imap_fetch(fetch: &ImapFetch) -> Result<Envelope> {
    let id = fetch
        .uid
        .ok_or(Error::GetUidError(fetch.message))?
        .to_string();

    let envelope = fetch
        .envelope()
        .ok_or(Error::GetEnvelopeError(fetch.message))?;

    // An undatable message cannot be safely judged old or new, so a
    // missing date header fails the whole pass.
    let date = envelope
        .date
        .as_ref()
        .map(|date| String::from_utf8_lossy(date).trim().to_owned())
        .filter(|date| !date.is_empty())
        .ok_or_else(|| Error::GetDateError(id.clone()))?;

    let subject = envelope
        .subject
        .as_ref()
        .map(|subject| {
            rfc2047_decoder::decode(subject)
                .map_err(|err| Error::DecodeSubjectError(err, id.clone()))
        })
        .unwrap_or_else(|| Ok(String::default()))?;

    Ok(Envelope { id, date, subject })
}
