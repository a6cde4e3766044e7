use crate::error::EngineError;
use crate::shared::paths;
use crate::shared::usecase::UseCase;
use futures::future;
use hearth_domain::{Notification, StandaloneReminder, ID, STANDALONE_REMINDER_LINK_FIELD};
use hearth_infra::{FieldPath, FieldWrite, StoreError, SyncContext};
use serde_json::{json, Map};

/// Rebuilds the notification projection of a standalone reminder.
///
/// The sequence is delete-old, write-reminder, create-new: clearing the
/// previous projection first makes a retry converge on the same final set
/// instead of stacking duplicates.
#[derive(Debug)]
pub struct SaveReminderUseCase {
    pub owner_id: ID,
    pub reminder: StandaloneReminder,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
    PartialWrite { requested: usize, created: usize },
}

impl From<UseCaseError> for EngineError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => {
                Self::StoreFailure("Unable to save the reminder and its notifications".into())
            }
            UseCaseError::PartialWrite { requested, created } => {
                Self::PartialWriteFailure { requested, created }
            }
        }
    }
}

#[async_trait::async_trait]
impl UseCase for SaveReminderUseCase {
    type Response = StandaloneReminder;

    type Error = UseCaseError;

    const NAME: &'static str = "SaveReminder";

    async fn execute(&mut self, ctx: &SyncContext) -> Result<Self::Response, Self::Error> {
        delete_linked_notifications(STANDALONE_REMINDER_LINK_FIELD, &self.reminder.id, ctx)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let mut entry = self.reminder.clone();
        entry.updated_at = ctx.sys.get_timestamp_millis();
        let entry_value = serde_json::to_value(&entry).map_err(|_| UseCaseError::StorageError)?;

        let write = ctx
            .store
            .update_fields(
                paths::REMINDER_MAPS,
                self.owner_id.as_str(),
                vec![(
                    FieldPath::nested("reminders", entry.id.as_str()),
                    FieldWrite::Set(entry_value.clone()),
                )],
            )
            .await;
        match write {
            Ok(()) => {}
            // First reminder this author ever saved: the map document does
            // not exist yet, so fall back to creating it outright.
            Err(StoreError::NotFound { .. }) => {
                let mut reminders = Map::new();
                reminders.insert(entry.id.to_string(), entry_value);
                ctx.store
                    .set(
                        paths::REMINDER_MAPS,
                        self.owner_id.as_str(),
                        json!({ "reminders": reminders }),
                        false,
                    )
                    .await
                    .map_err(|_| UseCaseError::StorageError)?;
            }
            Err(_) => return Err(UseCaseError::StorageError),
        }

        if entry.is_active {
            create_reminder_notifications(&entry, ctx).await?;
        }

        Ok(entry)
    }
}

/// Removes every notification whose routing data points at `linked_id`
/// through `link_field`: query by equality, then one batched delete.
pub(crate) async fn delete_linked_notifications(
    link_field: &str,
    linked_id: &ID,
    ctx: &SyncContext,
) -> Result<(), StoreError> {
    let matches = ctx
        .store
        .query_equals(
            paths::NOTIFICATIONS,
            &FieldPath::nested("data", link_field),
            &json!(linked_id),
        )
        .await?;
    let ids = matches.into_iter().map(|(id, _)| id).collect::<Vec<_>>();
    ctx.store.batch_delete(paths::NOTIFICATIONS, &ids).await
}

/// Fans the projection out, one independent create per recipient, awaited
/// jointly. A failed write does not cancel the ones already in flight; the
/// created subset stays in place and the shortfall is reported so the
/// caller can retry the whole save.
pub(crate) async fn create_reminder_notifications(
    reminder: &StandaloneReminder,
    ctx: &SyncContext,
) -> Result<(), UseCaseError> {
    let writes = reminder
        .recipients
        .iter()
        .map(|recipient| {
            let doc = Notification::for_recipient(reminder, recipient).to_document();
            ctx.store.create(paths::NOTIFICATIONS, doc)
        })
        .collect::<Vec<_>>();
    let results = future::join_all(writes).await;

    let created = results.iter().filter(|r| r.is_ok()).count();
    if created < results.len() {
        return Err(UseCaseError::PartialWrite {
            requested: results.len(),
            created,
        });
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use hearth_domain::{ReminderSchedule, RoutingData};
    use hearth_infra::{
        Config, DocumentStore, ISys, InMemoryCalendarProvider, InMemoryDocumentStore,
    };
    use serde_json::Value;
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

    fn reminder(recipients: &[&str], is_active: bool) -> StandaloneReminder {
        StandaloneReminder {
            id: "r1".parse().unwrap(),
            recipients: recipients.iter().map(|r| r.parse().unwrap()).collect(),
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
            is_active,
            updated_at: 0,
        }
    }

    async fn linked_notifications(store: &InMemoryDocumentStore) -> Vec<(ID, Value)> {
        store
            .query_equals(
                paths::NOTIFICATIONS,
                &FieldPath::nested("data", "standAloneReminderId"),
                &json!("r1"),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn projects_one_notification_per_recipient() {
        let TestContext { ctx, store } = setup();

        let mut usecase = SaveReminderUseCase {
            owner_id: "u1".parse().unwrap(),
            reminder: reminder(&["u1", "u2"], true),
        };
        usecase.execute(&ctx).await.unwrap();

        let notifications = linked_notifications(&store).await;
        assert_eq!(notifications.len(), 2);
        let mut users = notifications
            .iter()
            .map(|(_, doc)| doc["userId"].as_str().unwrap().to_string())
            .collect::<Vec<_>>();
        users.sort();
        assert_eq!(users, vec!["u1", "u2"]);
        for (_, doc) in &notifications {
            assert_eq!(doc["scheduledFor"], json!(1748768400000i64));
            assert_eq!(doc["isRecurring"], json!(false));
        }
    }

    #[tokio::test]
    async fn resave_is_idempotent() {
        let TestContext { ctx, store } = setup();
        let owner: ID = "u1".parse().unwrap();

        let mut usecase = SaveReminderUseCase {
            owner_id: owner.clone(),
            reminder: reminder(&["u1", "u2"], true),
        };
        usecase.execute(&ctx).await.unwrap();

        let mut again = SaveReminderUseCase {
            owner_id: owner,
            reminder: reminder(&["u1", "u2"], true),
        };
        again.execute(&ctx).await.unwrap();

        assert_eq!(linked_notifications(&store).await.len(), 2);
    }

    #[tokio::test]
    async fn inactive_reminders_have_no_notifications() {
        let TestContext { ctx, store } = setup();

        let mut usecase = SaveReminderUseCase {
            owner_id: "u1".parse().unwrap(),
            reminder: reminder(&["u1", "u2"], false),
        };
        usecase.execute(&ctx).await.unwrap();

        assert_eq!(linked_notifications(&store).await.len(), 0);
        let map_doc = store
            .get(paths::REMINDER_MAPS, "u1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(map_doc["reminders"]["r1"]["isActive"], json!(false));
    }

    #[tokio::test]
    async fn first_save_creates_the_map_document() {
        let TestContext { ctx, store } = setup();
        assert!(store.get(paths::REMINDER_MAPS, "u1").await.unwrap().is_none());

        let mut usecase = SaveReminderUseCase {
            owner_id: "u1".parse().unwrap(),
            reminder: reminder(&["u2"], true),
        };
        usecase.execute(&ctx).await.unwrap();

        let map_doc = store
            .get(paths::REMINDER_MAPS, "u1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(map_doc["reminders"]["r1"]["title"], json!("Water the plants"));
        assert_eq!(map_doc["reminders"]["r1"]["updatedAt"], json!(1748768400000i64));
    }

    #[tokio::test]
    async fn partial_write_keeps_the_created_subset_and_reports() {
        let TestContext { ctx, store } = setup();
        // Existing map document, so the save path is: batched delete,
        // field update, then two creates.
        store
            .set(paths::REMINDER_MAPS, "u1", json!({ "reminders": {} }), false)
            .await
            .unwrap();

        store.fail_writes_after(3);
        let mut usecase = SaveReminderUseCase {
            owner_id: "u1".parse().unwrap(),
            reminder: reminder(&["u1", "u2"], true),
        };
        let err = usecase.execute(&ctx).await.unwrap_err();
        assert_eq!(
            err,
            UseCaseError::PartialWrite {
                requested: 2,
                created: 1
            }
        );
        assert_eq!(linked_notifications(&store).await.len(), 1);

        // Retrying the same save converges back to one per recipient.
        store.clear_write_failures();
        let mut retry = SaveReminderUseCase {
            owner_id: "u1".parse().unwrap(),
            reminder: reminder(&["u1", "u2"], true),
        };
        retry.execute(&ctx).await.unwrap();
        assert_eq!(linked_notifications(&store).await.len(), 2);
    }
}
