//! Rust library to archive aging emails based on retention labels.
//!
//! The idea: tag emails with labels encoding a maximum age in days
//! (like `aa:3` for three days), then run a retention pass. Every
//! message carrying such a label whose date header is older than the
//! encoded limit is archived, which removes it from the inbox view
//! without deleting it from the backing store.
//!
//! The retention pass is driven by the [`Archiver`](crate::archive::Archiver)
//! and talks to the mail store through the
//! [`Backend`](crate::backend::Backend) trait, so any store exposing
//! label listing, label search, batched header fetch and batched
//! flagging can be plugged in. A ready-to-use IMAP backend is
//! available behind the `imap` cargo feature.
//!
//! ## Modules
//!
//! - [`policy`](crate::policy): retention labels parsed into age policies
//! - [`timestamp`](crate::timestamp): tolerant date header parsing
//! - [`envelope`](crate::envelope): the header subset fetched per message
//! - [`archive`](crate::archive): the retention pass itself
//! - [`imap`](crate::imap): the IMAP flavour of [`Backend`](crate::backend::Backend)

pub mod account;
pub mod archive;
pub mod backend;
pub mod envelope;
#[cfg(feature = "imap")]
pub mod imap;
pub mod policy;
pub mod timestamp;

/// The global `Error` alias of the library.
pub type Error = anyhow::Error;

/// The global `Result` alias of the library.
pub type Result<T> = anyhow::Result<T>;
