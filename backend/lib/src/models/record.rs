//! Persisted sync records and the mapping that produces them

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;

use crate::data::db::schema::blockchain_data;
use crate::models::{network::NetworkId, snapshot::FetchedSnapshot};

/// One row of `blockchain_data`: the stored result of a successful sync.
///
/// Rows are append-only. There is no update or delete path.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize)]
#[diesel(table_name = blockchain_data)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct SyncedRecord {
    pub id: i64,
    pub blockchain_type: String,
    pub name: String,
    pub height: i64,
    pub hash: String,
    pub time: DateTime<Utc>,
    pub latest_url: String,
    pub previous_hash: String,
    pub previous_url: String,
    pub peer_count: i32,
    pub unconfirmed_count: i32,
    pub high_fee_per_kb: i64,
    pub medium_fee_per_kb: i64,
    pub low_fee_per_kb: i64,
    pub last_fork_height: i64,
    pub last_fork_hash: String,
    pub created_at: DateTime<Utc>,
    pub raw_json: String,
}

/// Insertable form of [`SyncedRecord`]; the id is assigned by storage
#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = blockchain_data)]
pub struct NewSyncedRecord {
    pub blockchain_type: String,
    pub name: String,
    pub height: i64,
    pub hash: String,
    pub time: DateTime<Utc>,
    pub latest_url: String,
    pub previous_hash: String,
    pub previous_url: String,
    pub peer_count: i32,
    pub unconfirmed_count: i32,
    pub high_fee_per_kb: i64,
    pub medium_fee_per_kb: i64,
    pub low_fee_per_kb: i64,
    pub last_fork_height: i64,
    pub last_fork_hash: String,
    pub created_at: DateTime<Utc>,
    pub raw_json: String,
}

impl NewSyncedRecord {
    /// Map a fetched snapshot into the row to persist.
    ///
    /// Pure: `now` becomes `created_at` and `raw_json` is the body exactly as
    /// received, not a re-serialization of the parsed fields.
    pub fn from_snapshot(network: NetworkId, fetched: &FetchedSnapshot, now: DateTime<Utc>) -> Self {
        let snapshot = &fetched.snapshot;

        Self {
            blockchain_type: network.as_str().to_string(),
            name: snapshot.name.clone(),
            height: snapshot.height,
            hash: snapshot.hash.clone(),
            time: snapshot.time,
            latest_url: snapshot.latest_url.clone(),
            previous_hash: snapshot.previous_hash.clone(),
            previous_url: snapshot.previous_url.clone(),
            peer_count: snapshot.peer_count,
            unconfirmed_count: snapshot.unconfirmed_count,
            high_fee_per_kb: snapshot.high_fee_per_kb,
            medium_fee_per_kb: snapshot.medium_fee_per_kb,
            low_fee_per_kb: snapshot.low_fee_per_kb,
            last_fork_height: snapshot.last_fork_height,
            last_fork_hash: snapshot.last_fork_hash.clone(),
            created_at: now,
            raw_json: fetched.raw_body.clone(),
        }
    }

    /// Attach the storage-assigned id
    pub fn into_record(self, id: i64) -> SyncedRecord {
        SyncedRecord {
            id,
            blockchain_type: self.blockchain_type,
            name: self.name,
            height: self.height,
            hash: self.hash,
            time: self.time,
            latest_url: self.latest_url,
            previous_hash: self.previous_hash,
            previous_url: self.previous_url,
            peer_count: self.peer_count,
            unconfirmed_count: self.unconfirmed_count,
            high_fee_per_kb: self.high_fee_per_kb,
            medium_fee_per_kb: self.medium_fee_per_kb,
            low_fee_per_kb: self.low_fee_per_kb,
            last_fork_height: self.last_fork_height,
            last_fork_hash: self.last_fork_hash,
            created_at: self.created_at,
            raw_json: self.raw_json,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::constants::test::btc;

    #[test]
    fn maps_every_snapshot_field() {
        let fetched = FetchedSnapshot::from_body(btc::BODY.to_string()).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

        let record = NewSyncedRecord::from_snapshot(NetworkId::Btc, &fetched, now);
        let snapshot = &fetched.snapshot;

        assert_eq!(record.blockchain_type, "BTC");
        assert_eq!(record.name, snapshot.name);
        assert_eq!(record.height, snapshot.height);
        assert_eq!(record.hash, snapshot.hash);
        assert_eq!(record.time, snapshot.time);
        assert_eq!(record.latest_url, snapshot.latest_url);
        assert_eq!(record.previous_hash, snapshot.previous_hash);
        assert_eq!(record.previous_url, snapshot.previous_url);
        assert_eq!(record.peer_count, snapshot.peer_count);
        assert_eq!(record.unconfirmed_count, snapshot.unconfirmed_count);
        assert_eq!(record.high_fee_per_kb, snapshot.high_fee_per_kb);
        assert_eq!(record.medium_fee_per_kb, snapshot.medium_fee_per_kb);
        assert_eq!(record.low_fee_per_kb, snapshot.low_fee_per_kb);
        assert_eq!(record.last_fork_height, snapshot.last_fork_height);
        assert_eq!(record.last_fork_hash, snapshot.last_fork_hash);
        assert_eq!(record.created_at, now);
    }

    #[test]
    fn keeps_the_original_body_verbatim() {
        let fetched = FetchedSnapshot::from_body(btc::BODY.to_string()).unwrap();
        let record = NewSyncedRecord::from_snapshot(NetworkId::Btc, &fetched, Utc::now());

        // unmapped fields and formatting survive
        assert_eq!(record.raw_json, btc::BODY);
        assert!(record.raw_json.contains("extra_field_not_mapped"));
        assert_ne!(
            record.raw_json,
            serde_json::to_string(&fetched.snapshot).unwrap()
        );
    }

    #[test]
    fn mapping_is_deterministic() {
        let fetched = FetchedSnapshot::from_body(btc::BODY.to_string()).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        assert_eq!(
            NewSyncedRecord::from_snapshot(NetworkId::Ltc, &fetched, now),
            NewSyncedRecord::from_snapshot(NetworkId::Ltc, &fetched, now)
        );
    }
}
