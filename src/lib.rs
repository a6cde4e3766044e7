//! Reminder & calendar synchronization engine for the Hearth household
//! scheduling suite. The facade types re-exported here are the whole caller
//! surface; everything behind them keeps the derived state (notification
//! projections, activity bindings, calendar mirrors, month shards)
//! consistent across a remote document store without transactions.

pub mod telemetry;

pub use hearth_core::{
    ActivityBindings, CalendarMirror, EngineError, MonthShards, ReminderProjector,
};
pub use hearth_domain::{
    shard_key_for, ActivityBinding, ActivityType, CalendarDescriptor, EventDraft, MirrorEvent,
    MirrorEventId, MonthShard, Notification, NotificationLink, ReminderSchedule, RoutingData,
    StandaloneReminder, ID,
};
pub use hearth_infra::{
    setup_context, CalendarProvider, Config, DocumentStore, FieldPath, FieldWrite,
    GoogleCalendarProvider, FirestoreRestStore, InMemoryCalendarProvider, InMemoryDocumentStore,
    StoreError, SyncContext,
};
