//! Per-group summaries for the daily digest.

use std::fmt;

use anyhow::Result;
use serde_json::json;

use super::prompt::{Prompt, templates};
use crate::google::gemini::TextGenerator;
use crate::mail::message::truncate_chars;

/// Maximum characters of joined email text sent for one group.
pub const GROUP_CHAR_LIMIT: usize = 15000;
pub const TRUNCATION_MARKER: &str = "\n\n[Content truncated due to length]";
const BODY_SEPARATOR: &str = "\n\n---\n\n";
const FALLBACK_PREVIEW_COUNT: usize = 3;
const FALLBACK_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestGroup {
    Unread,
    Read,
}

impl DigestGroup {
    pub fn label(&self) -> &'static str {
        match self {
            DigestGroup::Unread => "UNREAD",
            DigestGroup::Read => "READ",
        }
    }

    /// Summary used when the group has no messages.
    pub fn empty_summary(&self) -> String {
        format!("No {} emails today.", self.label())
    }
}

impl fmt::Display for DigestGroup {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Join message bodies and cap the result at [`GROUP_CHAR_LIMIT`].
pub fn combine_bodies(bodies: &[String]) -> String {
    let combined = bodies.join(BODY_SEPARATOR);
    if combined.chars().count() > GROUP_CHAR_LIMIT {
        format!(
            "{}{}",
            truncate_chars(&combined, GROUP_CHAR_LIMIT),
            TRUNCATION_MARKER
        )
    } else {
        combined
    }
}

/// Short preview of the first few bodies, used when the generation
/// provider can't be reached.
pub fn local_digest(bodies: &[String]) -> String {
    let mut summary = format!("Daily Email Summary ({} emails)\n\n", bodies.len());
    for (i, body) in bodies.iter().take(FALLBACK_PREVIEW_COUNT).enumerate() {
        summary.push_str(&format!(
            "Email {}: {}...\n\n",
            i + 1,
            truncate_chars(body, FALLBACK_PREVIEW_CHARS)
        ));
    }
    summary
}

async fn generate_digest(
    generator: &dyn TextGenerator,
    group: DigestGroup,
    bodies: &[String],
) -> Result<String> {
    let prompt = templates().render(
        &Prompt::DailyDigest.to_string(),
        &json!({
            "label": group.label(),
            "emails": combine_bodies(bodies),
        }),
    )?;
    generator.generate(&prompt).await
}

/// Summarize one group. Never fails: generation errors fall back to
/// [`local_digest`] so the fetched mail is not thrown away.
pub async fn summarize_group(
    generator: &dyn TextGenerator,
    group: DigestGroup,
    bodies: &[String],
) -> String {
    if bodies.is_empty() {
        return group.empty_summary();
    }

    match generate_digest(generator, group, bodies).await {
        Ok(summary) => {
            tracing::info!("Generated {} summary: {} chars", group, summary.len());
            summary
        }
        Err(e) => {
            tracing::warn!("Falling back to local {} summary: {:#}", group, e);
            local_digest(bodies)
        }
    }
}
