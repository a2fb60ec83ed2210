//! Module dedicated to the IMAP backend.
//!
//! This module contains the IMAP implementation of the
//! [`Backend`](crate::backend::Backend) trait, modeled after the
//! GMail flavour of IMAP: labels are folders, label membership is
//! searched with `X-GM-LABELS`, and setting the `\Deleted` flag on
//! the inbox view archives a message without removing it from the
//! backing store.

pub mod config;

use async_trait::async_trait;
use imap::Authenticator;
use log::{debug, log_enabled, trace, Level};
use native_tls::{TlsConnector, TlsStream};
use std::{collections::BTreeSet, net::TcpStream};
use thiserror::Error;

use crate::{
    backend::Backend,
    envelope::{imap::from_imap_fetches, Envelopes},
    Result,
};

#[doc(inline)]
pub use self::config::{ImapAuthConfig, ImapConfig, OAuthIdentity, XOAuth2Config};

/// The mailbox holding the active inbox view.
pub const INBOX: &str = "INBOX";

/// The IMAP query needed to retrieve everything we need to build an
/// envelope: UID, date and subject.
const FETCH_ENVELOPES_QUERY: &str = "(UID ENVELOPE)";

/// Alias for the lazily-connected IMAP session.
pub type ImapSession = imap::Session<TlsStream<TcpStream>>;

/// Errors related to the IMAP backend.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot create tls connector")]
    CreateTlsConnectorError(#[source] native_tls::Error),
    #[error("cannot connect to imap server {1}:{2}")]
    ConnectImapServerError(#[source] imap::Error, String, u16),
    #[error("cannot login to imap server")]
    LoginImapServerError(#[source] imap::Error),
    #[error("cannot authenticate to imap server")]
    AuthenticateImapServerError(#[source] imap::Error),
    #[error("cannot select mailbox {1}")]
    SelectMailboxError(#[source] imap::Error, String),
    #[error("cannot get imap session")]
    GetSessionError,
    #[error("cannot list labels matching {1}")]
    ListLabelsError(#[source] imap::Error, String),
    #[error("cannot search messages labeled {1}")]
    SearchLabelError(#[source] imap::Error, String),
    #[error("cannot fetch envelopes of messages {1}")]
    FetchEnvelopesError(#[source] imap::Error, String),
    #[error("cannot mark messages {1} as archived")]
    ArchiveMessagesError(#[source] imap::Error, String),
}

/// XOAUTH2 IMAP authenticator.
///
/// This struct is needed to implement the [imap::Authenticator]
/// trait.
struct XOAuth2 {
    user: String,
    access_token: String,
}

impl XOAuth2 {
    pub fn new(user: String, access_token: String) -> Self {
        Self { user, access_token }
    }
}

impl Authenticator for XOAuth2 {
    type Response = String;

    fn process(&self, _: &[u8]) -> Self::Response {
        format!(
            "user={}\x01auth=Bearer {}\x01\x01",
            self.user, self.access_token
        )
    }
}

/// The IMAP mail store backend.
///
/// The session is created lazily on first use, with `INBOX` selected
/// right after authentication so that searches and flag mutations
/// apply to the inbox view.
pub struct ImapBackend {
    imap_config: ImapConfig,
    sess: Option<ImapSession>,
}

impl ImapBackend {
    pub fn new(imap_config: ImapConfig) -> Self {
        Self {
            imap_config,
            sess: None,
        }
    }

    fn sess(&mut self) -> Result<&mut ImapSession> {
        if self.sess.is_none() {
            debug!("create tls connector");
            debug!("insecure: {}", self.imap_config.insecure);
            let connector = TlsConnector::builder()
                .danger_accept_invalid_certs(self.imap_config.insecure)
                .danger_accept_invalid_hostnames(self.imap_config.insecure)
                .build()
                .map_err(Error::CreateTlsConnectorError)?;

            debug!("create client");
            debug!("host: {}", self.imap_config.host);
            debug!("port: {}", self.imap_config.port);
            let client = imap::ClientBuilder::new(&self.imap_config.host, self.imap_config.port)
                .connect(|domain, tcp| Ok(TlsConnector::connect(&connector, domain, tcp)?))
                .map_err(|err| {
                    Error::ConnectImapServerError(
                        err,
                        self.imap_config.host.clone(),
                        self.imap_config.port,
                    )
                })?;

            debug!("create session");
            debug!("login: {}", self.imap_config.login);
            let mut sess = match &self.imap_config.auth {
                ImapAuthConfig::Passwd(passwd) => {
                    debug!("authenticate using login and password");
                    client
                        .login(&self.imap_config.login, passwd)
                        .map_err(|res| Error::LoginImapServerError(res.0))?
                }
                ImapAuthConfig::XOAuth2(oauth2_config) => {
                    debug!("authenticate using xoauth2");
                    let identity = OAuthIdentity::read(&oauth2_config.identity_path)?;
                    let xoauth2 = XOAuth2::new(self.imap_config.login.clone(), identity.key);
                    client
                        .authenticate("XOAUTH2", &xoauth2)
                        .map_err(|(err, _client)| Error::AuthenticateImapServerError(err))?
                }
            };
            sess.debug = log_enabled!(Level::Trace);

            sess.select(INBOX)
                .map_err(|err| Error::SelectMailboxError(err, INBOX.to_owned()))?;
            debug!("mailbox {INBOX} selected");

            self.sess = Some(sess);
        }

        let sess = match self.sess {
            Some(ref mut sess) => Ok(sess),
            None => Err(Error::GetSessionError),
        }?;

        Ok(sess)
    }
}

#[async_trait]
impl Backend for ImapBackend {
    async fn list_labels(&mut self, pattern: &str) -> Result<Vec<String>> {
        trace!(">> list imap labels");

        let names = self
            .sess()?
            .list(Some(""), Some(pattern))
            .map_err(|err| Error::ListLabelsError(err, pattern.to_owned()))?;

        let labels: Vec<String> = names
            .iter()
            .map(|name| name.name().to_owned())
            .collect();

        debug!("labels matching {pattern}: {labels:?}");
        trace!("<< list imap labels");
        Ok(labels)
    }

    async fn search_label_ids(&mut self, label: &str) -> Result<BTreeSet<String>> {
        trace!(">> search imap messages labeled {label}");

        let query = format!("X-GM-LABELS \"{label}\"");
        let uids = self
            .sess()?
            .uid_search(&query)
            .map_err(|err| Error::SearchLabelError(err, label.to_owned()))?;

        let ids: BTreeSet<String> = uids.iter().map(|uid| uid.to_string()).collect();

        debug!("found {} message(s) labeled {label}", ids.len());
        trace!("uids: {ids:?}");
        trace!("<< search imap messages labeled {label}");
        Ok(ids)
    }

    async fn fetch_envelopes(&mut self, ids: &[String]) -> Result<Envelopes> {
        trace!(">> fetch imap envelopes");

        if ids.is_empty() {
            return Ok(Envelopes::default());
        }

        let range = ids.join(",");
        let fetches = self
            .sess()?
            .uid_fetch(&range, FETCH_ENVELOPES_QUERY)
            .map_err(|err| Error::FetchEnvelopesError(err, range.clone()))?;

        let envelopes = from_imap_fetches(fetches)?;

        debug!("fetched {} imap envelope(s)", envelopes.len());
        trace!("<< fetch imap envelopes");
        Ok(envelopes)
    }

    async fn archive_messages(&mut self, ids: &[String]) -> Result<()> {
        trace!(">> archive imap messages");

        let range = ids.join(",");
        self.sess()?
            .uid_store(&range, "+FLAGS (\\Deleted)")
            .map_err(|err| Error::ArchiveMessagesError(err, range.clone()))?;

        debug!("archived message(s) {range}");
        trace!("<< archive imap messages");
        Ok(())
    }
}

impl Drop for ImapBackend {
    fn drop(&mut self) {
        if let Some(ref mut sess) = self.sess {
            debug!("close imap session");
            if let Err(err) = sess.close() {
                debug!("cannot close imap session: {err}");
            }

            if let Err(err) = sess.logout() {
                debug!("cannot logout from imap session: {err}");
            }
        }
    }
}
