//! Module dedicated to account configuration.
//!
//! This module contains the representation of the user's current
//! account configuration named [`AccountConfig`].

/// The default wildcard pattern matching retention labels.
///
/// The pattern must conform to the mail store's label listing
/// semantics (for IMAP, RFC 3501 §6.3.8 LIST wildcards).
pub const DEFAULT_LABEL_PATTERN: &str = "aa:*";

/// The user's account configuration.
///
/// Passed to the [`Archiver`](crate::archive::Archiver) at
/// construction.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case", deny_unknown_fields)
)]
pub struct AccountConfig {
    /// The email address of the user account.
    pub email: String,

    /// The wildcard pattern matching the account's retention labels.
    ///
    /// Every label matched by this pattern is expected to carry an
    /// age limit suffix, like `aa:3`.
    pub label_pattern: String,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            email: Default::default(),
            label_pattern: DEFAULT_LABEL_PATTERN.to_owned(),
        }
    }
}
