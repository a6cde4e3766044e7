//! Storage layout of the engine's collections. Every caller addresses
//! documents through these helpers so the layout has exactly one source.

use hearth_domain::ID;

/// One document per notification, store-assigned ids.
pub const NOTIFICATIONS: &str = "notifications";
/// One document per reminder author, holding a `reminders` map keyed by
/// reminder id.
pub const REMINDER_MAPS: &str = "standaloneReminders";
/// One descriptor document per calendar.
pub const CALENDARS: &str = "calendars";
/// One document per owner entity per month; see `shard_doc_id`.
pub const MONTH_SHARDS: &str = "calendarMonths";

pub fn shard_doc_id(owner: &ID, month_key: &str) -> String {
    format!("{}_{}", owner, month_key)
}
