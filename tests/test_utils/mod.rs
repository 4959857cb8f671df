//! Test utilities for integration tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Result, bail};
use async_trait::async_trait;
use axum::{Router, body::Body};
use chrono::NaiveDate;

use daybrief::api::AppState;
use daybrief::api::app;
use daybrief::core::{AppConfig, GeminiConfig, GenerationBackend};
use daybrief::google::gemini::TextGenerator;
use daybrief::mail::{Credentials, DailyMail, MailStore};

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_MODEL: &str = "gemini-2.5-flash";

/// Config that never reaches a real server. Pass a mock server URL
/// to enable the Gemini backend.
pub fn test_config(gemini_url: Option<&str>) -> AppConfig {
    let generation = match gemini_url {
        Some(url) => GenerationBackend::Gemini(GeminiConfig {
            api_base_url: url.to_string(),
            api_key: String::from(TEST_API_KEY),
            model: String::from(TEST_MODEL),
            timeout: Duration::from_secs(5),
        }),
        None => GenerationBackend::Unavailable,
    };
    AppConfig {
        generation,
        imap_host: String::from("127.0.0.1"),
        imap_port: 9,
        insecure_tls_hosts: Vec::new(),
        imap_timeout: Duration::from_secs(5),
        max_messages_per_group: 5,
    }
}

/// Creates a test application router backed by a real Gemini client
/// pointed at `gemini_url` (if any) and a mail store that is not
/// reachable.
pub fn test_app(gemini_url: Option<&str>) -> Router {
    app(Arc::new(AppState::new(test_config(gemini_url))))
}

/// Creates a test application router with stubbed collaborators for
/// the daily summary.
pub fn test_digest_app(mail_store: Arc<StubMailStore>, generator: Arc<StubGenerator>) -> Router {
    let state = AppState::new(test_config(None))
        .with_mail_store(mail_store)
        .with_generator(generator);
    app(Arc::new(state))
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

pub async fn body_to_json(body: Body) -> serde_json::Value {
    serde_json::from_str(&body_to_string(body).await).expect("Body is not JSON")
}

/// A minimal single part plain text message.
pub fn plain_message(subject: &str, body: &str) -> Vec<u8> {
    format!(
        "From: office@example.com\r\nTo: student@example.com\r\nSubject: {}\r\nContent-Type: text/plain; charset=utf-8\r\n\r\n{}",
        subject, body
    )
    .into_bytes()
}

/// Mail store that hands back canned messages and counts calls.
#[derive(Default)]
pub struct StubMailStore {
    pub mail: DailyMail,
    pub fail_with: Option<String>,
    pub calls: AtomicUsize,
    pub last_username: Mutex<Option<String>>,
}

impl StubMailStore {
    pub fn with_mail(unread: Vec<Vec<u8>>, read: Vec<Vec<u8>>) -> Self {
        Self {
            mail: DailyMail { unread, read },
            ..Default::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MailStore for StubMailStore {
    async fn fetch_daily(&self, credentials: &Credentials, _date: NaiveDate) -> Result<DailyMail> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_username.lock().unwrap() = Some(credentials.username.clone());
        if let Some(message) = &self.fail_with {
            bail!("{}", message);
        }
        Ok(self.mail.clone())
    }
}

/// Generator that records prompts and answers with a fixed reply, or
/// fails when `reply` is `None`.
#[derive(Default)]
pub struct StubGenerator {
    pub reply: Option<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl StubGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => bail!("generation provider unavailable"),
        }
    }
}
