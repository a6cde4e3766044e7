use crate::shared::entity::ID;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A user-authored scheduling intent addressed to one or more household
/// members. Stored as one entry, keyed by `id`, inside the owner's reminder
/// map document. The documents are shared with non-Rust clients, hence the
/// camelCase wire names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandaloneReminder {
    pub id: ID,
    pub recipients: Vec<ID>,
    pub schedule: ReminderSchedule,
    pub title: String,
    pub message: String,
    pub data: RoutingData,
    pub is_active: bool,
    #[serde(default)]
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSchedule {
    /// UTC millis of the (first) delivery.
    pub scheduled_for: i64,
    pub is_recurring: bool,
    /// Carried verbatim; the engine never interprets the recurrence rule,
    /// it only copies it into notifications and clears it on demand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_config: Option<Value>,
}

/// Routing metadata passed through to the push layer untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingData {
    pub screen: String,
    pub app: String,
}
