//! Core types for docchat
//!
//! This crate provides the domain types shared by the provider clients, the
//! dispatcher and the web layer.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Constants
// ============================================================================

/// Number of most recent conversation turns sent upstream with each request
pub const MAX_HISTORY_TURNS: usize = 10;

// ============================================================================
// Conversation Types
// ============================================================================

/// Author of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Speaker label used when a conversation is flattened into plain text
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

/// Helper function to deserialize string or null values
pub fn deserialize_string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        _ => Ok(String::new()),
    }
}

/// One message of the conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    #[serde(deserialize_with = "deserialize_string_or_null", default)]
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// The tail of `history` that is sent upstream, at most [`MAX_HISTORY_TURNS`] long
pub fn recent_turns(history: &[ChatTurn]) -> &[ChatTurn] {
    let start = history.len().saturating_sub(MAX_HISTORY_TURNS);
    &history[start..]
}

// ============================================================================
// Provider Types
// ============================================================================

/// Stable identifier of an upstream provider (e.g. `mistral`, `gemini`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(String);

impl ProviderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProviderId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// How many requests a provider may serve per calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DailyQuota {
    Limited(u64),
    Unlimited,
}

impl DailyQuota {
    /// Whether another request fits after `used` requests today
    pub fn allows(&self, used: u64) -> bool {
        match self {
            DailyQuota::Limited(limit) => used < *limit,
            DailyQuota::Unlimited => true,
        }
    }

    pub fn is_unlimited(&self) -> bool {
        matches!(self, DailyQuota::Unlimited)
    }

    pub fn limit(&self) -> Option<u64> {
        match self {
            DailyQuota::Limited(limit) => Some(*limit),
            DailyQuota::Unlimited => None,
        }
    }
}

impl fmt::Display for DailyQuota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DailyQuota::Limited(limit) => write!(f, "{}", limit),
            DailyQuota::Unlimited => f.write_str("unlimited"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid daily quota '{0}': expected a request count or 'unlimited'")]
pub struct ParseQuotaError(String);

impl FromStr for DailyQuota {
    type Err = ParseQuotaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unlimited" | "infinite" | "inf" | "none" => Ok(DailyQuota::Unlimited),
            other => other
                .parse::<u64>()
                .map(DailyQuota::Limited)
                .map_err(|_| ParseQuotaError(s.to_string())),
        }
    }
}

impl Serialize for DailyQuota {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DailyQuota::Limited(limit) => serializer.serialize_u64(*limit),
            DailyQuota::Unlimited => serializer.serialize_str("unlimited"),
        }
    }
}

impl<'de> Deserialize<'de> for DailyQuota {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Count(u64),
            Word(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Count(limit) => Ok(DailyQuota::Limited(limit)),
            Repr::Word(word) => word.parse().map_err(serde::de::Error::custom),
        }
    }
}

// ============================================================================
// Usage Types
// ============================================================================

/// Point-in-time view of today's per-provider request counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSnapshot {
    pub last_reset: NaiveDate,
    #[serde(flatten)]
    pub counts: BTreeMap<ProviderId, u64>,
}

impl UsageSnapshot {
    pub fn count(&self, provider: &ProviderId) -> u64 {
        self.counts.get(provider).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_recent_turns_keeps_last_ten() {
        let history: Vec<ChatTurn> = (0..14).map(|i| ChatTurn::user(format!("m{}", i))).collect();
        let recent = recent_turns(&history);

        assert_eq!(recent.len(), MAX_HISTORY_TURNS);
        assert_eq!(recent.first().map(|t| t.content.as_str()), Some("m4"));
        assert_eq!(recent.last().map(|t| t.content.as_str()), Some("m13"));
    }

    #[test]
    fn test_recent_turns_short_history_untouched() {
        let history = vec![ChatTurn::user("hi"), ChatTurn::assistant("hello")];
        assert_eq!(recent_turns(&history), history.as_slice());
        assert!(recent_turns(&[]).is_empty());
    }

    #[test]
    fn test_chat_turn_ignores_unknown_fields_and_null_content() {
        let turn: ChatTurn = serde_json::from_str(
            r#"{"role":"assistant","content":null,"timestamp":"2024-01-01T00:00:00Z","provider":"gemini"}"#,
        )
        .unwrap();
        assert_eq!(turn, ChatTurn::assistant(""));
    }

    #[test]
    fn test_chat_turn_rejects_unknown_role() {
        let result = serde_json::from_str::<ChatTurn>(r#"{"role":"system","content":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_quota_allows() {
        assert!(DailyQuota::Limited(2).allows(0));
        assert!(DailyQuota::Limited(2).allows(1));
        assert!(!DailyQuota::Limited(2).allows(2));
        assert!(!DailyQuota::Limited(0).allows(0));
        assert!(DailyQuota::Unlimited.allows(u64::MAX));
    }

    #[test]
    fn test_quota_parse() {
        assert_eq!("10000".parse::<DailyQuota>().unwrap(), DailyQuota::Limited(10000));
        assert_eq!("Unlimited".parse::<DailyQuota>().unwrap(), DailyQuota::Unlimited);
        assert!("-3".parse::<DailyQuota>().is_err());
        assert!("lots".parse::<DailyQuota>().is_err());
    }

    #[test]
    fn test_quota_from_toml() {
        #[derive(Deserialize)]
        struct Slot {
            daily_quota: DailyQuota,
        }

        let limited: Slot = toml::from_str("daily_quota = 25").unwrap();
        let unlimited: Slot = toml::from_str("daily_quota = \"unlimited\"").unwrap();
        assert_eq!(limited.daily_quota, DailyQuota::Limited(25));
        assert_eq!(unlimited.daily_quota, DailyQuota::Unlimited);
    }

    #[test]
    fn test_usage_snapshot_serializes_flat() {
        let mut counts = BTreeMap::new();
        counts.insert(ProviderId::from("mistral"), 3);
        counts.insert(ProviderId::from("gemini"), 1);
        let snapshot = UsageSnapshot {
            last_reset: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            counts,
        };

        assert_eq!(
            serde_json::to_value(&snapshot).unwrap(),
            serde_json::json!({"lastReset": "2024-05-01", "mistral": 3, "gemini": 1})
        );
        assert_eq!(snapshot.count(&ProviderId::from("other")), 0);
    }
}
