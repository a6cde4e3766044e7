use super::save_reminder::{
    create_reminder_notifications, delete_linked_notifications, UseCaseError as ProjectionError,
};
use crate::error::EngineError;
use crate::shared::paths;
use crate::shared::usecase::UseCase;
use hearth_domain::{StandaloneReminder, ID, STANDALONE_REMINDER_LINK_FIELD};
use hearth_infra::{FieldPath, FieldWrite, SyncContext};

/// Flips a reminder's active flag and rebuilds its projection to match.
///
/// Read-modify-write without an optimistic lock: two concurrent togglers
/// race and the last writer wins on the reminder entry.
#[derive(Debug)]
pub struct ToggleReminderUseCase {
    pub owner_id: ID,
    pub reminder_id: ID,
    pub is_active: bool,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
    PartialWrite { requested: usize, created: usize },
}

impl From<ProjectionError> for UseCaseError {
    fn from(e: ProjectionError) -> Self {
        match e {
            ProjectionError::StorageError => Self::StorageError,
            ProjectionError::PartialWrite { requested, created } => {
                Self::PartialWrite { requested, created }
            }
        }
    }
}

impl From<UseCaseError> for EngineError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => {
                Self::NotFound(format!("The reminder with id: {}", reminder_id))
            }
            UseCaseError::StorageError => {
                Self::StoreFailure("Unable to toggle the reminder".into())
            }
            UseCaseError::PartialWrite { requested, created } => {
                Self::PartialWriteFailure { requested, created }
            }
        }
    }
}

#[async_trait::async_trait]
impl UseCase for ToggleReminderUseCase {
    type Response = StandaloneReminder;

    type Error = UseCaseError;

    const NAME: &'static str = "ToggleReminder";

    async fn execute(&mut self, ctx: &SyncContext) -> Result<Self::Response, Self::Error> {
        let map_doc = ctx
            .store
            .get(paths::REMINDER_MAPS, self.owner_id.as_str())
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or_else(|| UseCaseError::NotFound(self.reminder_id.clone()))?;
        let entry = map_doc
            .get("reminders")
            .and_then(|reminders| reminders.get(self.reminder_id.as_str()))
            .ok_or_else(|| UseCaseError::NotFound(self.reminder_id.clone()))?;
        let mut reminder: StandaloneReminder =
            serde_json::from_value(entry.clone()).map_err(|_| UseCaseError::StorageError)?;

        reminder.is_active = self.is_active;
        reminder.updated_at = ctx.sys.get_timestamp_millis();
        let entry_value =
            serde_json::to_value(&reminder).map_err(|_| UseCaseError::StorageError)?;
        ctx.store
            .update_fields(
                paths::REMINDER_MAPS,
                self.owner_id.as_str(),
                vec![(
                    FieldPath::nested("reminders", self.reminder_id.as_str()),
                    FieldWrite::Set(entry_value),
                )],
            )
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        delete_linked_notifications(STANDALONE_REMINDER_LINK_FIELD, &self.reminder_id, ctx)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        if reminder.is_active {
            create_reminder_notifications(&reminder, ctx).await?;
        }

        Ok(reminder)
    }
}
