//! Module dedicated to the IMAP backend configuration.

use std::{
    fs, io,
    path::{Path, PathBuf},
    result,
};
use thiserror::Error;

/// The global `Result` alias of the module.
pub type Result<T> = result::Result<T, Error>;

/// Errors related to the IMAP backend configuration.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot read oauth identity file at {1}")]
    ReadOAuthIdentityError(#[source] io::Error, PathBuf),
    #[error("cannot parse oauth identity file at {0}: missing key or secret line")]
    ParseOAuthIdentityError(PathBuf),
}

/// The IMAP backend configuration.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub struct ImapConfig {
    /// The IMAP server host name.
    pub host: String,

    /// The IMAP server host port.
    pub port: u16,

    /// Whether invalid certificates and host names should be
    /// accepted.
    #[cfg_attr(feature = "derive", serde(default))]
    pub insecure: bool,

    /// The IMAP server login, usually the account's email address.
    pub login: String,

    /// The IMAP server authentication configuration.
    ///
    /// Authentication can be done using password or OAuth 2.0. See
    /// [`ImapAuthConfig`].
    pub auth: ImapAuthConfig,
}

/// The IMAP authentication configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum ImapAuthConfig {
    /// The password authentication configuration.
    #[cfg_attr(feature = "derive", serde(alias = "password"))]
    Passwd(String),

    /// The OAuth 2.0 authentication configuration.
    XOAuth2(XOAuth2Config),
}

impl Default for ImapAuthConfig {
    fn default() -> Self {
        Self::Passwd(Default::default())
    }
}

/// The OAuth 2.0 XOAUTH2 authentication configuration.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub struct XOAuth2Config {
    /// The path to the persisted identity file.
    ///
    /// See [`OAuthIdentity`].
    pub identity_path: PathBuf,
}

/// The OAuth identity persisted on disk by the authentication flow.
///
/// The file is plain text with the opaque key on the first line and
/// the secret on the second one. Producing and refreshing the file
/// belongs to the authentication flow, not to this library: the
/// identity is only ever read here.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OAuthIdentity {
    pub key: String,
    pub secret: String,
}

impl OAuthIdentity {
    /// Read an OAuth identity from the file at the given path.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|err| Error::ReadOAuthIdentityError(err, path.to_owned()))?;

        let mut lines = content.lines();
        let key = lines
            .next()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::ParseOAuthIdentityError(path.to_owned()))?;
        let secret = lines
            .next()
            .map(str::trim)
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| Error::ParseOAuthIdentityError(path.to_owned()))?;

        Ok(Self {
            key: key.to_owned(),
            secret: secret.to_owned(),
        })
    }
}
