use crate::error::EngineError;
use crate::shared::paths;
use crate::shared::usecase::UseCase;
use hearth_domain::{ActivityBinding, ActivityType, Notification, ID};
use hearth_infra::{FieldPath, SyncContext};
use serde_json::json;

/// Re-derives the binding between an activity and its notification for one
/// user. This is a one-shot read, not a live subscription; callers keep the
/// returned binding as their in-memory view.
#[derive(Debug)]
pub struct FetchBindingUseCase {
    pub activity_id: ID,
    pub activity_type: ActivityType,
    pub user_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for EngineError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => {
                Self::StoreFailure("Unable to fetch the activity binding".into())
            }
        }
    }
}

#[async_trait::async_trait]
impl UseCase for FetchBindingUseCase {
    type Response = ActivityBinding;

    type Error = UseCaseError;

    const NAME: &'static str = "FetchBinding";

    async fn execute(&mut self, ctx: &SyncContext) -> Result<Self::Response, Self::Error> {
        let matches = ctx
            .store
            .query_equals(
                paths::NOTIFICATIONS,
                &FieldPath::nested("data", self.activity_type.link_field()),
                &json!(self.activity_id),
            )
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        // By invariant at most one per user exists; take the first match.
        let notification = matches
            .into_iter()
            .filter_map(|(id, doc)| Notification::from_document(id, &doc))
            .find(|notification| notification.user_id == self.user_id);

        Ok(ActivityBinding {
            activity_id: self.activity_id.clone(),
            activity_type: self.activity_type,
            user_id: self.user_id.clone(),
            notification,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use hearth_domain::ReminderSchedule;
    use hearth_infra::{Config, DocumentStore, ISys, InMemoryCalendarProvider, InMemoryDocumentStore};
    use std::sync::Arc;

    struct FixedSys;
    impl ISys for FixedSys {
        fn get_timestamp_millis(&self) -> i64 {
            1748768400000
        }
    }

    struct TestContext {
        ctx: SyncContext,
        store: Arc<InMemoryDocumentStore>,
    }

    fn setup() -> TestContext {
        let store = Arc::new(InMemoryDocumentStore::new());
        let ctx = SyncContext {
            store: store.clone(),
            provider: Arc::new(InMemoryCalendarProvider::new()),
            config: Config::default(),
            sys: Arc::new(FixedSys),
        };
        TestContext { ctx, store }
    }

    async fn seed_notification(store: &InMemoryDocumentStore, user: &str) -> ID {
        let notification = Notification::for_activity(
            ActivityType::Checklist,
            "c1".parse().unwrap(),
            user.parse().unwrap(),
            "Morning routine",
            &ReminderSchedule {
                scheduled_for: 1748768400000,
                is_recurring: false,
                recurring_config: None,
            },
            None,
            "hearth",
        );
        store
            .create(paths::NOTIFICATIONS, notification.to_document())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn finds_the_binding_for_the_right_user() {
        let TestContext { ctx, store } = setup();
        seed_notification(&store, "u2").await;
        let expected = seed_notification(&store, "u1").await;

        let mut usecase = FetchBindingUseCase {
            activity_id: "c1".parse().unwrap(),
            activity_type: ActivityType::Checklist,
            user_id: "u1".parse().unwrap(),
        };
        let binding = usecase.execute(&ctx).await.unwrap();
        assert_eq!(binding.notification_ref(), Some(&expected));
    }

    #[tokio::test]
    async fn returns_unbound_when_nothing_matches() {
        let TestContext { ctx, .. } = setup();

        let mut usecase = FetchBindingUseCase {
            activity_id: "c1".parse().unwrap(),
            activity_type: ActivityType::Checklist,
            user_id: "u1".parse().unwrap(),
        };
        let binding = usecase.execute(&ctx).await.unwrap();
        assert!(binding.notification.is_none());
    }

    #[tokio::test]
    async fn normalizes_legacy_timestamp_shapes() {
        let TestContext { ctx, store } = setup();
        store
            .create(
                paths::NOTIFICATIONS,
                serde_json::json!({
                    "userId": "u1",
                    "scheduledFor": { "seconds": 1748768400, "nanoseconds": 0 },
                    "isRecurring": false,
                    "notificationId": "c1",
                    "title": "Workout Reminder",
                    "body": "It's time for your workout",
                    "data": { "screen": "workout", "app": "hearth", "workoutId": "w1" }
                }),
            )
            .await
            .unwrap();

        let mut usecase = FetchBindingUseCase {
            activity_id: "w1".parse().unwrap(),
            activity_type: ActivityType::Workout,
            user_id: "u1".parse().unwrap(),
        };
        let binding = usecase.execute(&ctx).await.unwrap();
        let notification = binding.notification.unwrap();
        assert_eq!(notification.scheduled_for, 1748768400000);
    }
}
