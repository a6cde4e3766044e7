use super::delete_binding::DeleteBindingUseCase;
use crate::error::EngineError;
use crate::shared::paths;
use crate::shared::usecase::{execute, UseCase};
use hearth_domain::{ActivityBinding, Notification, ReminderSchedule};
use hearth_infra::{FieldPath, FieldWrite, StoreError, SyncContext};

/// Writes an activity's reminder through its binding: update the bound
/// notification in place when one is known, create-and-rebind when it is
/// not (or no longer exists), and tear down when the schedule is cleared.
/// The response is the caller's new in-memory binding; no re-fetch needed.
#[derive(Debug)]
pub struct UpdateBindingUseCase {
    pub binding: ActivityBinding,
    /// `None` clears the reminder entirely.
    pub schedule: Option<ReminderSchedule>,
    pub activity_name: String,
    pub event_id: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for EngineError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => {
                Self::StoreFailure("Unable to update the activity binding".into())
            }
        }
    }
}

#[async_trait::async_trait]
impl UseCase for UpdateBindingUseCase {
    type Response = ActivityBinding;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateBinding";

    async fn execute(&mut self, ctx: &SyncContext) -> Result<Self::Response, Self::Error> {
        let schedule = match self.schedule.take() {
            Some(schedule) => schedule,
            None => {
                let delete = DeleteBindingUseCase {
                    binding: self.binding.clone(),
                };
                return execute(delete, ctx)
                    .await
                    .map_err(|_| UseCaseError::StorageError);
            }
        };

        let mut notification = Notification::for_activity(
            self.binding.activity_type,
            self.binding.activity_id.clone(),
            self.binding.user_id.clone(),
            &self.activity_name,
            &schedule,
            self.event_id.as_deref(),
            &ctx.config.app_identifier,
        );
        let document = notification.to_document();

        let bound_id = match self.binding.notification_ref() {
            Some(bound_id) => {
                let mut fields = match document.as_object() {
                    Some(map) => map
                        .iter()
                        .map(|(key, value)| {
                            (FieldPath::top(key.clone()), FieldWrite::Set(value.clone()))
                        })
                        .collect::<Vec<_>>(),
                    None => Vec::new(),
                };
                // A partial update cannot drop a field by omission: when the
                // schedule stops recurring, the stale rule must be cleared
                // with an explicit delete instruction.
                if notification.recurring_config.is_none() {
                    fields.push((FieldPath::top("recurringConfig"), FieldWrite::Delete));
                }

                let update = ctx
                    .store
                    .update_fields(paths::NOTIFICATIONS, bound_id.as_str(), fields)
                    .await;
                match update {
                    Ok(()) => bound_id.clone(),
                    // The bound notification was deleted out-of-band;
                    // recreate it and rebind to the new id.
                    Err(StoreError::NotFound { .. }) => ctx
                        .store
                        .create(paths::NOTIFICATIONS, document)
                        .await
                        .map_err(|_| UseCaseError::StorageError)?,
                    Err(_) => return Err(UseCaseError::StorageError),
                }
            }
            None => ctx
                .store
                .create(paths::NOTIFICATIONS, document)
                .await
                .map_err(|_| UseCaseError::StorageError)?,
        };

        notification.id = bound_id;
        Ok(ActivityBinding {
            activity_id: self.binding.activity_id.clone(),
            activity_type: self.binding.activity_type,
            user_id: self.binding.user_id.clone(),
            notification: Some(notification),
        })
    }
}
