//! Turns raw RFC822 messages into the short plain-text records that
//! get summarized.

use mailparse::{ParsedMail, parse_mail};

/// Maximum characters kept from a single message body.
pub const MESSAGE_CHAR_LIMIT: usize = 3000;

/// Borrow at most `limit` characters of `s`.
pub fn truncate_chars(s: &str, limit: usize) -> &str {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Depth-first search for the first non-empty `text/plain` body.
fn first_plain_text(part: &ParsedMail) -> Option<Vec<u8>> {
    if part.ctype.mimetype.eq_ignore_ascii_case("text/plain")
        && let Ok(body) = part.get_body_raw()
        && !body.is_empty()
    {
        return Some(body);
    }
    part.subparts.iter().find_map(first_plain_text)
}

/// Decoded plain-text body of a message. Single-part messages use
/// their only payload whatever its content type. Bytes that are not
/// valid UTF-8 are dropped.
pub fn extract_plain_text(raw: &[u8]) -> Option<String> {
    let parsed = match parse_mail(raw) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!("Skipping unparseable message: {}", e);
            return None;
        }
    };

    let body = if parsed.subparts.is_empty() {
        parsed.get_body_raw().ok()?
    } else {
        first_plain_text(&parsed)?
    };
    if body.is_empty() {
        return None;
    }

    Some(decode_dropping_invalid(&body))
}

/// UTF-8 decode that skips invalid byte runs instead of replacing them.
fn decode_dropping_invalid(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Flatten a body onto one line and cap its length.
pub fn normalize_body(text: &str, limit: usize) -> String {
    let flattened = text.replace('\r', "").replace('\n', " ");
    truncate_chars(flattened.trim(), limit).to_string()
}

/// Message records for a group, in mailbox order. Messages without
/// any text are left out.
pub fn message_records(raws: &[Vec<u8>], limit: usize) -> Vec<String> {
    raws.iter()
        .filter_map(|raw| extract_plain_text(raw))
        .map(|text| normalize_body(&text, limit))
        .filter(|body| !body.is_empty())
        .collect()
}
