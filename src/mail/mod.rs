//! Mail store access for the daily digest.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

pub mod imap;
pub mod message;

pub use imap::ImapMailStore;

/// Mailbox login taken from the request. Lives only for the request
/// it came in on.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Raw RFC822 messages received on a single day, split by `\Seen`.
#[derive(Debug, Default, Clone)]
pub struct DailyMail {
    pub unread: Vec<Vec<u8>>,
    pub read: Vec<Vec<u8>>,
}

#[async_trait]
pub trait MailStore: Send + Sync {
    /// Log in, collect the day's unread and read messages, and log out.
    async fn fetch_daily(&self, credentials: &Credentials, date: NaiveDate) -> Result<DailyMail>;
}

pub type BoxedMailStore = Arc<dyn MailStore + 'static>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials {
            username: String::from("student"),
            password: String::from("hunter2"),
        };
        let out = format!("{:?}", creds);
        assert!(out.contains("student"));
        assert!(!out.contains("hunter2"));
    }
}
