use std::sync::Arc;

use crate::core::{AppConfig, GenerationBackend};
use crate::google::gemini::{BoxedTextGenerator, GeminiClient, text_generator};
use crate::mail::{BoxedMailStore, ImapMailStore};

/// Read-only collaborators shared by every request.
pub struct AppState {
    pub config: AppConfig,
    // Raw client for the proxy, `None` when no API key is configured
    pub gemini: Option<GeminiClient>,
    pub generator: BoxedTextGenerator,
    pub mail_store: BoxedMailStore,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let gemini = match &config.generation {
            GenerationBackend::Gemini(gemini_config) => {
                Some(GeminiClient::new(gemini_config.clone()))
            }
            GenerationBackend::Unavailable => None,
        };
        let generator = text_generator(&config.generation);
        let mail_store = Arc::new(ImapMailStore::from_config(&config));

        Self {
            config,
            gemini,
            generator,
            mail_store,
        }
    }

    /// Replace the generator used for digests.
    pub fn with_generator(mut self, generator: BoxedTextGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Replace the mail store used for digests.
    pub fn with_mail_store(mut self, mail_store: BoxedMailStore) -> Self {
        self.mail_store = mail_store;
        self
    }
}
