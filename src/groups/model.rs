// src/groups/model.rs

use crate::error::{AppError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A named collection of email recipients tied to an external group id.
///
/// Every field falls back to its default when missing, so a card saved
/// half-filled from the editor is still accepted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub emails: Vec<String>,
    #[serde(default, deserialize_with = "coerce_group_id")]
    pub group_id: i64,
    #[serde(default)]
    pub remote_only: bool,
    #[serde(default)]
    pub skip: bool,
}

/// The whole configuration file: an ordered list of groups.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroupsDocument {
    pub groups: Vec<Group>,
}

impl GroupsDocument {
    /// Builds a document from an untrusted request body.
    ///
    /// The body must be an object whose `groups` member is an array.
    pub fn from_payload(payload: Value) -> Result<Self> {
        let has_groups_array = payload
            .get("groups")
            .map_or(false, Value::is_array);
        if !has_groups_array {
            return Err(AppError::validation("Invalid data format."));
        }

        serde_json::from_value(payload)
            .map_err(|e| AppError::validation(format!("Invalid data format: {e}")))
    }

    pub fn total_emails(&self) -> usize {
        self.groups.iter().map(|g| g.emails.len()).sum()
    }
}

/// Accepts integers, floats (truncated) and numeric strings; anything else is 0.
fn coerce_group_id<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => parse_leading_int(&s),
        _ => 0,
    })
}

/// Parses the optional sign and leading digits of `input`, e.g. `" 12abc"` -> 12.
fn parse_leading_int(input: &str) -> i64 {
    let trimmed = input.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    rest[..digits_len]
        .parse::<i64>()
        .map(|n| sign * n)
        .unwrap_or(0)
}
