//! Reusable prompts using Handlebars for templating. Handlebars adds
//! additional security controls since it can't do much out of the box
//! without registering your own helpers. This is ideal since email
//! content should be considered untrusted and Handlebars forces you
//! to add only what you need.

use std::fmt;

use handlebars::Handlebars;

#[derive(Debug)]
pub enum Prompt {
    DailyDigest,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// Triple-stash for the email text, it is plain text and must not be
// HTML escaped.
const DAILY_DIGEST_PROMPT: &str = r"
You are summarizing {{label}} emails for a student.
Create a concise daily brief from these emails (max 250 words).

Group related items under short headings, for example:
- Important announcements
- Deadlines and due dates
- Meetings or events
- Action items requiring attention
- Academic or administrative updates

Use bullet points under each heading and skip headings with nothing to report.

{{label}} emails from today:
{{{emails}}}
";

pub fn templates<'a>() -> Handlebars<'a> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry
        .register_template_string(&Prompt::DailyDigest.to_string(), DAILY_DIGEST_PROMPT)
        .expect("Failed to register template");
    registry
}
