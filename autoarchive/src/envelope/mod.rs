//! Module dedicated to email envelopes.
//!
//! An envelope is the minimal header subset a retention pass needs:
//! the store-assigned identifier, the raw date header and the
//! subject. It exists only transiently, between the batched header
//! fetch and the evaluation of the messages it describes.

#[cfg(feature = "imap")]
pub mod imap;

use std::ops::{Deref, DerefMut};

/// The email envelope.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Envelope {
    /// The store-assigned identifier of the message.
    ///
    /// Opaque, with no inherent ordering guarantee. Unique only
    /// within one mailbox session.
    pub id: String,

    /// The raw date header of the message, as transmitted by the
    /// store. Parsed lazily by
    /// [`Timestamp`](crate::timestamp::Timestamp).
    pub date: String,

    /// The decoded subject of the message.
    pub subject: String,
}

/// The list of email envelopes.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Envelopes(Vec<Envelope>);

impl Deref for Envelopes {
    type Target = Vec<Envelope>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Envelopes {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl FromIterator<Envelope> for Envelopes {
    fn from_iter<T: IntoIterator<Item = Envelope>>(iter: T) -> Self {
        Envelopes(iter.into_iter().collect())
    }
}
