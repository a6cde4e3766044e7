use super::save_reminder::delete_linked_notifications;
use crate::error::EngineError;
use crate::shared::paths;
use crate::shared::usecase::UseCase;
use hearth_domain::{ID, STANDALONE_REMINDER_LINK_FIELD};
use hearth_infra::{FieldPath, FieldWrite, StoreError, SyncContext};

/// Tears a reminder down: notifications first, then the map entry, so a
/// concurrent reader can momentarily see a reminder with zero
/// notifications but never notifications outliving their reminder.
#[derive(Debug)]
pub struct DeleteReminderUseCase {
    pub owner_id: ID,
    pub reminder_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for EngineError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => {
                Self::NotFound(format!("The reminder with id: {}", reminder_id))
            }
            UseCaseError::StorageError => {
                Self::StoreFailure("Unable to delete the reminder".into())
            }
        }
    }
}

#[async_trait::async_trait]
impl UseCase for DeleteReminderUseCase {
    type Response = ();

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteReminder";

    async fn execute(&mut self, ctx: &SyncContext) -> Result<Self::Response, Self::Error> {
        delete_linked_notifications(STANDALONE_REMINDER_LINK_FIELD, &self.reminder_id, ctx)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let removal = ctx
            .store
            .update_fields(
                paths::REMINDER_MAPS,
                self.owner_id.as_str(),
                vec![(
                    FieldPath::nested("reminders", self.reminder_id.as_str()),
                    FieldWrite::Delete,
                )],
            )
            .await;
        match removal {
            Ok(()) => Ok(()),
            Err(StoreError::NotFound { .. }) => {
                Err(UseCaseError::NotFound(self.reminder_id.clone()))
            }
            Err(_) => Err(UseCaseError::StorageError),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::reminder::save_reminder::SaveReminderUseCase;
    use hearth_domain::{ReminderSchedule, RoutingData, StandaloneReminder};
    use hearth_infra::{
        Config, DocumentStore, ISys, InMemoryCalendarProvider, InMemoryDocumentStore,
    };
    use serde_json::json;
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

    async fn saved_reminder(ctx: &SyncContext) {
        let mut usecase = SaveReminderUseCase {
            owner_id: "u1".parse().unwrap(),
            reminder: StandaloneReminder {
                id: "r1".parse().unwrap(),
                recipients: vec!["u1".parse().unwrap(), "u2".parse().unwrap()],
                schedule: ReminderSchedule {
                    scheduled_for: 1748768400000,
                    is_recurring: false,
                    recurring_config: None,
                },
                title: "Take out the bins".into(),
                message: "Collection is tomorrow".into(),
                data: RoutingData {
                    screen: "reminders".into(),
                    app: "hearth".into(),
                },
                is_active: true,
                updated_at: 0,
            },
        };
        usecase.execute(ctx).await.unwrap();
    }

    #[tokio::test]
    async fn removes_notifications_and_the_map_entry() {
        let TestContext { ctx, store } = setup();
        saved_reminder(&ctx).await;

        let mut usecase = DeleteReminderUseCase {
            owner_id: "u1".parse().unwrap(),
            reminder_id: "r1".parse().unwrap(),
        };
        usecase.execute(&ctx).await.unwrap();

        let remaining = store
            .query_equals(
                paths::NOTIFICATIONS,
                &FieldPath::nested("data", "standAloneReminderId"),
                &json!("r1"),
            )
            .await
            .unwrap();
        assert_eq!(remaining.len(), 0);

        let map_doc = store
            .get(paths::REMINDER_MAPS, "u1")
            .await
            .unwrap()
            .unwrap();
        assert!(map_doc["reminders"].get("r1").is_none());
    }

    #[tokio::test]
    async fn missing_map_document_is_not_found() {
        let TestContext { ctx, .. } = setup();

        let mut usecase = DeleteReminderUseCase {
            owner_id: "u1".parse().unwrap(),
            reminder_id: "r1".parse().unwrap(),
        };
        let err = usecase.execute(&ctx).await.unwrap_err();
        assert_eq!(err, UseCaseError::NotFound("r1".parse().unwrap()));
    }
}
