//! Response record and matching types.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A stored trigger → response pair, scoped to one guild.
///
/// Field names serialize in camelCase, which is also the MongoDB
/// document layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    pub guild_id: String,
    pub name: String,
    pub trigger: String,
    pub response: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
}

impl ResponseRecord {
    /// Create a record stamped with the current time.
    pub fn new(
        guild_id: impl Into<String>,
        name: impl Into<String>,
        trigger: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Self {
            guild_id: guild_id.into(),
            name: name.into(),
            trigger: trigger.into(),
            response: response.into(),
            created_at: Utc::now().timestamp_millis(),
        }
    }
}

/// How a trigger is compared against message text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Message text equals the trigger.
    #[default]
    Exact,
    /// Message text contains the trigger.
    Includes,
    /// Trigger is a case-insensitive regex found anywhere in the text.
    Regex,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Exact => "exact",
            MatchMode::Includes => "includes",
            MatchMode::Regex => "regex",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(MatchMode::Exact),
            "includes" => Ok(MatchMode::Includes),
            "regex" => Ok(MatchMode::Regex),
            other => Err(format!(
                "unknown match mode '{}' (expected exact, includes or regex)",
                other
            )),
        }
    }
}
