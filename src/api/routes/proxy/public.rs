//! Public types for the generation proxy API
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Successful proxy response. `summary` repeats `text` for callers
/// that read either field.
#[derive(Serialize, Deserialize)]
pub struct ProxyResponse {
    pub ok: bool,
    pub text: String,
    pub summary: String,
    pub raw: Value,
}
