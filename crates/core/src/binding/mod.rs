mod delete_binding;
mod fetch_binding;
mod update_binding;

pub use delete_binding::DeleteBindingUseCase;
pub use fetch_binding::FetchBindingUseCase;
pub use update_binding::UpdateBindingUseCase;

use crate::error::EngineError;
use crate::shared::usecase::execute;
use hearth_domain::{ActivityBinding, ActivityType, ReminderSchedule, ID};
use hearth_infra::SyncContext;

/// Caller boundary for the single-notification activity binding.
#[derive(Clone)]
pub struct ActivityBindings {
    ctx: SyncContext,
}

impl ActivityBindings {
    pub fn new(ctx: SyncContext) -> Self {
        Self { ctx }
    }

    pub async fn fetch(
        &self,
        activity_id: ID,
        activity_type: ActivityType,
        user_id: ID,
    ) -> Result<ActivityBinding, EngineError> {
        execute(
            FetchBindingUseCase {
                activity_id,
                activity_type,
                user_id,
            },
            &self.ctx,
        )
        .await
        .map_err(EngineError::from)
    }

    pub async fn update(
        &self,
        binding: ActivityBinding,
        schedule: Option<ReminderSchedule>,
        activity_name: impl Into<String>,
        event_id: Option<String>,
    ) -> Result<ActivityBinding, EngineError> {
        execute(
            UpdateBindingUseCase {
                binding,
                schedule,
                activity_name: activity_name.into(),
                event_id,
            },
            &self.ctx,
        )
        .await
        .map_err(EngineError::from)
    }

    pub async fn delete(&self, binding: ActivityBinding) -> Result<ActivityBinding, EngineError> {
        execute(DeleteBindingUseCase { binding }, &self.ctx)
            .await
            .map_err(EngineError::from)
    }
}
