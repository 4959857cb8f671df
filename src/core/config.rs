use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_IMAP_HOST: &str = "imap.iitb.ac.in";

/// Connection settings for the Gemini `generateContent` API.
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub api_base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

/// Which generation provider, if any, the process was started with.
#[derive(Clone, Debug)]
pub enum GenerationBackend {
    Unavailable,
    Gemini(GeminiConfig),
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub generation: GenerationBackend,
    pub imap_host: String,
    pub imap_port: u16,
    // Hosts whose certificate is accepted without verification
    pub insecure_tls_hosts: Vec<String>,
    pub imap_timeout: Duration,
    pub max_messages_per_group: usize,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Default for AppConfig {
    fn default() -> Self {
        let generation = match env::var("GEMINI_API_KEY") {
            Ok(api_key) if !api_key.trim().is_empty() => GenerationBackend::Gemini(GeminiConfig {
                api_base_url: env::var("DIGEST_GEMINI_API_URL")
                    .unwrap_or_else(|_| DEFAULT_GEMINI_API_URL.to_string()),
                api_key,
                model: env::var("DIGEST_GEMINI_MODEL")
                    .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
                timeout: Duration::from_secs(env_or("DIGEST_GENERATION_TIMEOUT_SECS", 60)),
            }),
            _ => GenerationBackend::Unavailable,
        };
        let imap_host =
            env::var("DIGEST_IMAP_HOST").unwrap_or_else(|_| DEFAULT_IMAP_HOST.to_string());
        let insecure_tls_hosts = env::var("DIGEST_IMAP_INSECURE_HOSTS")
            .unwrap_or_else(|_| DEFAULT_IMAP_HOST.to_string())
            .split(',')
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .collect();

        Self {
            generation,
            imap_host,
            imap_port: env_or("DIGEST_IMAP_PORT", 993),
            insecure_tls_hosts,
            imap_timeout: Duration::from_secs(env_or("DIGEST_IMAP_TIMEOUT_SECS", 30)),
            max_messages_per_group: env_or("DIGEST_MAX_MESSAGES", 5),
        }
    }
}

impl AppConfig {
    /// Whether certificate verification is skipped for the configured
    /// IMAP host. Only hosts explicitly listed are trusted this way.
    pub fn imap_accepts_invalid_certs(&self) -> bool {
        self.insecure_tls_hosts
            .iter()
            .any(|h| h.eq_ignore_ascii_case(&self.imap_host))
    }
}
