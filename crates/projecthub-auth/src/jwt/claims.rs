//! Subject extraction from verified token claims.
//!
//! Issuers disagree on where the user id lives, so several claim names are
//! tried in a fixed order.

use serde_json::{Map, Value};

/// Claim names consulted for the subject, highest priority first.
pub const SUBJECT_CLAIMS: [&str; 3] = ["userId", "id", "sub"];

/// Return the first usable subject claim.
///
/// Non-empty strings are taken as-is and integers are rendered in decimal.
/// Any other value is skipped in favour of the next claim name.
pub fn subject_from_claims(claims: &Map<String, Value>) -> Option<String> {
    SUBJECT_CLAIMS
        .iter()
        .filter_map(|name| claims.get(*name))
        .find_map(subject_value)
}

fn subject_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => n
            .as_i64()
            .map(|v| v.to_string())
            .or_else(|| n.as_u64().map(|v| v.to_string())),
        _ => None,
    }
}
