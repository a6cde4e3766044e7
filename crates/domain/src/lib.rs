mod binding;
mod calendar;
pub mod date;
mod event;
mod month_shard;
mod notification;
mod reminder;
mod shared;

pub use binding::ActivityBinding;
pub use calendar::{CalendarDescriptor, CalendarSource};
pub use event::{
    EventDraft, InvalidMirrorEventIdError, MirrorEvent, MirrorEventId, PROVIDER_EVENT_DOMAIN,
};
pub use month_shard::{shard_key_for, MonthShard};
pub use notification::{
    display_key, ActivityType, Notification, NotificationLink, STANDALONE_REMINDER_LINK_FIELD,
};
pub use reminder::{ReminderSchedule, RoutingData, StandaloneReminder};
pub use shared::entity::{InvalidIDError, ID};
