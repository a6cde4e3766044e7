use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// The sole sharding function: UTC year-month of the event timestamp.
/// Every reader and writer must derive shard addresses through this, so an
/// event is always found in exactly one shard.
pub fn shard_key_for(timestamp_millis: i64) -> String {
    Utc.timestamp_millis(timestamp_millis)
        .format("%Y-%m")
        .to_string()
}

/// One document per owner entity per calendar month, holding that month's
/// events keyed by event id. Mutations are field-level (`items.<eventId>`),
/// never whole-document rewrites, so concurrent writers of unrelated keys
/// cannot lose each other's updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthShard {
    #[serde(default)]
    pub items: HashMap<String, Value>,
    #[serde(default)]
    pub updated_at: i64,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn shard_key_is_the_utc_year_month() {
        // 2025-06-01T09:00:00Z
        assert_eq!(shard_key_for(1748768400000), "2025-06");
        // One millisecond before June in UTC.
        assert_eq!(shard_key_for(1748735999999), "2025-05");
        assert_eq!(shard_key_for(0), "1970-01");
    }

    #[test]
    fn shard_key_is_stable_within_a_month() {
        let first = shard_key_for(1748736000000);
        let mid = shard_key_for(1750000000000);
        assert_eq!(first, mid);
    }
}
