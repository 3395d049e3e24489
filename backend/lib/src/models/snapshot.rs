//! Chain-tip snapshot as reported by the BlockCypher chain endpoint

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payload of `GET /{coin}/{chain}`.
///
/// Every field is named explicitly. `name`, `height`, `hash` and `time` are
/// required; the remaining fields are not reported for every chain (ETH has
/// gas prices instead of per-kb fees) and default to zero or empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSnapshot {
    #[serde(rename = "name")]
    pub name: String,
    #[serde(rename = "height")]
    pub height: i64,
    #[serde(rename = "hash")]
    pub hash: String,
    #[serde(rename = "time")]
    pub time: DateTime<Utc>,
    #[serde(rename = "latest_url", default)]
    pub latest_url: String,
    #[serde(rename = "previous_hash", default)]
    pub previous_hash: String,
    #[serde(rename = "previous_url", default)]
    pub previous_url: String,
    #[serde(rename = "peer_count", default)]
    pub peer_count: i32,
    #[serde(rename = "unconfirmed_count", default)]
    pub unconfirmed_count: i32,
    #[serde(rename = "high_fee_per_kb", default)]
    pub high_fee_per_kb: i64,
    #[serde(rename = "medium_fee_per_kb", default)]
    pub medium_fee_per_kb: i64,
    #[serde(rename = "low_fee_per_kb", default)]
    pub low_fee_per_kb: i64,
    #[serde(rename = "last_fork_height", default)]
    pub last_fork_height: i64,
    #[serde(rename = "last_fork_hash", default)]
    pub last_fork_hash: String,
}

/// A parsed snapshot together with the exact body it was parsed from
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedSnapshot {
    pub snapshot: RawSnapshot,
    pub raw_body: String,
}

impl FetchedSnapshot {
    /// Parse a response body, keeping the body itself for auditing
    pub fn from_body(raw_body: String) -> Result<Self, serde_json::Error> {
        let snapshot = serde_json::from_str(&raw_body)?;
        Ok(Self { snapshot, raw_body })
    }
}
