//! IMAP-over-TLS implementation of [`MailStore`].

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_imap::{Client, Session};
use async_native_tls::{TlsConnector, TlsStream};
use async_trait::async_trait;
use chrono::NaiveDate;
use futures::TryStreamExt;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

use super::{Credentials, DailyMail, MailStore};
use crate::core::AppConfig;

const MAILBOX: &str = "INBOX";

// Same bytes as RFC822 but leaves `\Seen` untouched
const FETCH_QUERY: &str = "BODY.PEEK[]";

/// Format a date the way IMAP `SEARCH` expects it (RFC 3501 `date`).
pub fn imap_date(date: NaiveDate) -> String {
    date.format("%d-%b-%Y").to_string()
}

/// Search query for messages received on or after `date`.
pub fn daily_query(date: NaiveDate, seen: bool) -> String {
    let flag = if seen { "SEEN" } else { "UNSEEN" };
    format!("SINCE \"{}\" {}", imap_date(date), flag)
}

/// Lowest `limit` sequence numbers as an IMAP sequence set, or `None`
/// when nothing matched.
fn sequence_set(ids: impl IntoIterator<Item = u32>, limit: usize) -> Option<String> {
    let mut ids: Vec<u32> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.truncate(limit);
    if ids.is_empty() {
        return None;
    }
    Some(
        ids.iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(","),
    )
}

async fn search_ids<T>(session: &mut Session<T>, query: &str) -> Result<HashSet<u32>>
where
    T: AsyncRead + AsyncWrite + Unpin + fmt::Debug + Send,
{
    let ids = session
        .search(query)
        .await
        .with_context(|| format!("IMAP search `{}` failed", query))?;
    tracing::info!("Found {} messages for `{}`", ids.len(), query);
    Ok(ids)
}

async fn fetch_bodies<T>(session: &mut Session<T>, set: Option<String>) -> Result<Vec<Vec<u8>>>
where
    T: AsyncRead + AsyncWrite + Unpin + fmt::Debug + Send,
{
    let Some(set) = set else {
        return Ok(Vec::new());
    };

    let mut fetches: Vec<_> = session
        .fetch(&set, FETCH_QUERY)
        .await
        .context("IMAP fetch failed")?
        .try_collect()
        .await
        .context("IMAP fetch failed")?;
    fetches.sort_by_key(|f| f.message);

    Ok(fetches
        .iter()
        .filter_map(|f| f.body().map(|b| b.to_vec()))
        .collect())
}

/// Run the digest exchange over an already connected client: greeting,
/// LOGIN, SELECT, both searches, then the fetches and LOGOUT.
///
/// Both searches run before anything is fetched so the two groups are
/// a snapshot of the flags as the user left them.
async fn fetch_mailbox<T>(
    mut client: Client<T>,
    credentials: &Credentials,
    date: NaiveDate,
    max_messages: usize,
) -> Result<DailyMail>
where
    T: AsyncRead + AsyncWrite + Unpin + fmt::Debug + Send,
{
    let _greeting = client
        .read_response()
        .await
        .context("Connection closed before IMAP greeting")?
        .context("Failed to read IMAP greeting")?;

    let mut session = client
        .login(&credentials.username, &credentials.password)
        .await
        .map_err(|(err, _client)| anyhow!("IMAP authentication failed: {}", err))?;

    session
        .select(MAILBOX)
        .await
        .with_context(|| format!("Failed to select {}", MAILBOX))?;

    let unread_ids = search_ids(&mut session, &daily_query(date, false)).await?;
    let mut read_ids = search_ids(&mut session, &daily_query(date, true)).await?;
    read_ids.retain(|id| !unread_ids.contains(id));

    let unread = fetch_bodies(&mut session, sequence_set(unread_ids, max_messages)).await?;
    let read = fetch_bodies(&mut session, sequence_set(read_ids, max_messages)).await?;

    session.logout().await.context("IMAP logout failed")?;

    Ok(DailyMail { unread, read })
}

#[derive(Debug, Clone)]
pub struct ImapMailStore {
    host: String,
    port: u16,
    accept_invalid_certs: bool,
    timeout: Duration,
    max_messages: usize,
}

impl ImapMailStore {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            host: config.imap_host.clone(),
            port: config.imap_port,
            accept_invalid_certs: config.imap_accepts_invalid_certs(),
            timeout: config.imap_timeout,
            max_messages: config.max_messages_per_group,
        }
    }

    async fn connect(&self) -> Result<Client<TlsStream<TcpStream>>> {
        let tcp = TcpStream::connect((self.host.as_str(), self.port))
            .await
            .with_context(|| format!("Failed to connect to {}:{}", self.host, self.port))?;

        if self.accept_invalid_certs {
            tracing::warn!("Skipping TLS certificate verification for {}", self.host);
        }
        let tls = TlsConnector::new()
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .danger_accept_invalid_hostnames(self.accept_invalid_certs);
        let stream = tls
            .connect(self.host.as_str(), tcp)
            .await
            .with_context(|| format!("SSL handshake with {} failed", self.host))?;

        Ok(Client::new(stream))
    }
}

#[async_trait]
impl MailStore for ImapMailStore {
    async fn fetch_daily(&self, credentials: &Credentials, date: NaiveDate) -> Result<DailyMail> {
        tracing::info!("Logging in to {} as {}", self.host, credentials.username);
        let session = async {
            let client = self.connect().await?;
            fetch_mailbox(client, credentials, date, self.max_messages).await
        };
        tokio::time::timeout(self.timeout, session)
            .await
            .with_context(|| format!("IMAP session with {} timed out", self.host))?
    }
}
