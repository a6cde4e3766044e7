use crate::date::normalize_timestamp;
use crate::reminder::{ReminderSchedule, RoutingData, StandaloneReminder};
use crate::shared::entity::ID;
use serde_json::{json, Map, Value};
use std::fmt::Display;

/// The bounded set of activity kinds that can carry a reminder binding.
/// The link field written into a notification's routing data is derived
/// from this enum, never from free-form strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityType {
    Checklist,
    Workout,
    Meal,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checklist => "checklist",
            Self::Workout => "workout",
            Self::Meal => "meal",
        }
    }

    /// Name of the routing data field that carries the activity id.
    pub fn link_field(&self) -> &'static str {
        match self {
            Self::Checklist => "checklistId",
            Self::Workout => "workoutId",
            Self::Meal => "mealId",
        }
    }

    pub fn all() -> [ActivityType; 3] {
        [Self::Checklist, Self::Workout, Self::Meal]
    }
}

impl Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Back-reference from a notification to whatever scheduled it.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationLink {
    StandaloneReminder(ID),
    Activity {
        activity_type: ActivityType,
        activity_id: ID,
    },
}

pub const STANDALONE_REMINDER_LINK_FIELD: &str = "standAloneReminderId";

impl NotificationLink {
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::StandaloneReminder(_) => STANDALONE_REMINDER_LINK_FIELD,
            Self::Activity { activity_type, .. } => activity_type.link_field(),
        }
    }

    pub fn linked_id(&self) -> &ID {
        match self {
            Self::StandaloneReminder(id) => id,
            Self::Activity { activity_id, .. } => activity_id,
        }
    }
}

/// A derived, store-persisted, single-recipient scheduled delivery record.
/// Never edited by users directly; the engine owns its full lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// Store-assigned. A freshly built notification carries a placeholder
    /// that is replaced by the id returned from the create call.
    pub id: ID,
    pub user_id: ID,
    pub scheduled_for: i64,
    pub is_recurring: bool,
    pub recurring_config: Option<Value>,
    pub link: NotificationLink,
    /// Caller-computed idempotency/display key.
    pub notification_id: String,
    pub title: String,
    pub body: String,
    pub data: RoutingData,
}

impl Notification {
    /// Projects one recipient's notification out of a standalone reminder.
    pub fn for_recipient(reminder: &StandaloneReminder, recipient: &ID) -> Self {
        Self {
            id: Default::default(),
            user_id: recipient.clone(),
            scheduled_for: reminder.schedule.scheduled_for,
            is_recurring: reminder.schedule.is_recurring,
            recurring_config: reminder.schedule.recurring_config.clone(),
            link: NotificationLink::StandaloneReminder(reminder.id.clone()),
            notification_id: reminder.id.to_string(),
            title: reminder.title.clone(),
            body: reminder.message.clone(),
            data: reminder.data.clone(),
        }
    }

    /// Builds the single bound notification for an activity.
    pub fn for_activity(
        activity_type: ActivityType,
        activity_id: ID,
        user_id: ID,
        activity_name: &str,
        schedule: &ReminderSchedule,
        event_id: Option<&str>,
        app: &str,
    ) -> Self {
        let notification_id = display_key(activity_type, &activity_id, event_id);
        Self {
            id: Default::default(),
            user_id,
            scheduled_for: schedule.scheduled_for,
            is_recurring: schedule.is_recurring,
            recurring_config: schedule.recurring_config.clone(),
            notification_id,
            title: format!("{} Reminder", activity_name),
            body: format!("It's time for your {}", activity_type),
            data: RoutingData {
                screen: activity_type.as_str().to_string(),
                app: app.to_string(),
            },
            link: NotificationLink::Activity {
                activity_type,
                activity_id,
            },
        }
    }

    /// Serializes to the store document shape. The link id is written into
    /// the routing data map under the link's dynamic field name; the
    /// document id itself is not part of the body.
    pub fn to_document(&self) -> Value {
        let mut data = match serde_json::to_value(&self.data) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        data.insert(
            self.link.field_name().to_string(),
            json!(self.link.linked_id()),
        );

        let mut doc = Map::new();
        doc.insert("userId".to_string(), json!(self.user_id));
        doc.insert("scheduledFor".to_string(), json!(self.scheduled_for));
        doc.insert("isRecurring".to_string(), json!(self.is_recurring));
        if let Some(config) = &self.recurring_config {
            doc.insert("recurringConfig".to_string(), config.clone());
        }
        doc.insert("notificationId".to_string(), json!(self.notification_id));
        doc.insert("title".to_string(), json!(self.title));
        doc.insert("body".to_string(), json!(self.body));
        doc.insert("data".to_string(), Value::Object(data));
        Value::Object(doc)
    }

    /// Reads a notification back from a store document, normalizing the
    /// scheduled timestamp to canonical millis. Returns `None` for documents
    /// without a recognizable link or schedule.
    pub fn from_document(id: ID, doc: &Value) -> Option<Self> {
        let data = doc.get("data")?;
        let link = read_link(data)?;
        let scheduled_for = normalize_timestamp(doc.get("scheduledFor")?)?;
        let user_id = doc.get("userId")?.as_str()?.parse().ok()?;
        let routing = RoutingData {
            screen: data
                .get("screen")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            app: data
                .get("app")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        };

        Some(Self {
            id,
            user_id,
            scheduled_for,
            is_recurring: doc
                .get("isRecurring")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            recurring_config: doc.get("recurringConfig").cloned(),
            link,
            notification_id: doc
                .get("notificationId")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            title: doc
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            body: doc
                .get("body")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            data: routing,
        })
    }
}

/// `eventId-activityType-activityId` when the binding hangs off a calendar
/// event, the raw activity id otherwise.
pub fn display_key(
    activity_type: ActivityType,
    activity_id: &ID,
    event_id: Option<&str>,
) -> String {
    match event_id {
        Some(event_id) => format!("{}-{}-{}", event_id, activity_type, activity_id),
        None => activity_id.to_string(),
    }
}

fn read_link(data: &Value) -> Option<NotificationLink> {
    if let Some(id) = data.get(STANDALONE_REMINDER_LINK_FIELD).and_then(Value::as_str) {
        return id
            .parse()
            .ok()
            .map(NotificationLink::StandaloneReminder);
    }
    for activity_type in &ActivityType::all() {
        if let Some(id) = data.get(activity_type.link_field()).and_then(Value::as_str) {
            return id.parse().ok().map(|activity_id| NotificationLink::Activity {
                activity_type: *activity_type,
                activity_id,
            });
        }
    }
    None
}

#[cfg(test)]
mod test {
    use super::*;

    fn reminder() -> StandaloneReminder {
        StandaloneReminder {
            id: "r1".parse().unwrap(),
            recipients: vec!["u1".parse().unwrap(), "u2".parse().unwrap()],
            schedule: ReminderSchedule {
                scheduled_for: 1748768400000,
                is_recurring: false,
                recurring_config: None,
            },
            title: "Water the plants".into(),
            message: "The basil is thirsty".into(),
            data: RoutingData {
                screen: "reminders".into(),
                app: "hearth".into(),
            },
            is_active: true,
            updated_at: 0,
        }
    }

    #[test]
    fn projection_links_back_to_the_reminder() {
        let n = Notification::for_recipient(&reminder(), &"u2".parse().unwrap());
        let doc = n.to_document();
        assert_eq!(doc["data"]["standAloneReminderId"], json!("r1"));
        assert_eq!(doc["userId"], json!("u2"));
        assert_eq!(doc["scheduledFor"], json!(1748768400000i64));
        assert!(doc.get("recurringConfig").is_none());
    }

    #[test]
    fn document_roundtrip_preserves_the_link() {
        let n = Notification::for_activity(
            ActivityType::Checklist,
            "c9".parse().unwrap(),
            "u1".parse().unwrap(),
            "Morning routine",
            &ReminderSchedule {
                scheduled_for: 1000,
                is_recurring: true,
                recurring_config: Some(json!({ "frequency": "daily" })),
            },
            Some("evt42"),
            "hearth",
        );
        let restored =
            Notification::from_document("n1".parse().unwrap(), &n.to_document()).unwrap();
        assert_eq!(
            restored.link,
            NotificationLink::Activity {
                activity_type: ActivityType::Checklist,
                activity_id: "c9".parse().unwrap(),
            }
        );
        assert_eq!(restored.notification_id, "evt42-checklist-c9");
        assert_eq!(restored.recurring_config, Some(json!({ "frequency": "daily" })));
    }

    #[test]
    fn display_key_falls_back_to_the_activity_id() {
        let id = "c9".parse().unwrap();
        assert_eq!(display_key(ActivityType::Workout, &id, None), "c9");
        assert_eq!(
            display_key(ActivityType::Workout, &id, Some("evt1")),
            "evt1-workout-c9"
        );
    }

    #[test]
    fn unlinked_documents_are_skipped() {
        let doc = json!({
            "userId": "u1",
            "scheduledFor": 100,
            "data": { "screen": "home", "app": "hearth" }
        });
        assert!(Notification::from_document("n1".parse().unwrap(), &doc).is_none());
    }
}
