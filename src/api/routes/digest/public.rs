//! Public types for the daily summary API
use serde::{Deserialize, Serialize};

// Header names are case-insensitive on the wire
pub const USER_HEADER: &str = "x-ldap-user";
pub const PASS_HEADER: &str = "x-ldap-pass";

#[derive(Serialize, Deserialize)]
pub struct DailySummaryResponse {
    pub status: String,
    pub unread_summary: String,
    pub read_summary: String,
}
