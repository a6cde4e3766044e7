mod delete_reminder;
mod save_reminder;
mod toggle_reminder;

pub use delete_reminder::DeleteReminderUseCase;
pub use save_reminder::SaveReminderUseCase;
pub use toggle_reminder::ToggleReminderUseCase;

use crate::error::EngineError;
use crate::shared::usecase::execute;
use hearth_domain::{StandaloneReminder, ID};
use hearth_infra::SyncContext;

/// Caller boundary for the multi-recipient reminder projection.
#[derive(Clone)]
pub struct ReminderProjector {
    ctx: SyncContext,
}

impl ReminderProjector {
    pub fn new(ctx: SyncContext) -> Self {
        Self { ctx }
    }

    pub async fn save(
        &self,
        owner_id: ID,
        reminder: StandaloneReminder,
    ) -> Result<StandaloneReminder, EngineError> {
        execute(SaveReminderUseCase { owner_id, reminder }, &self.ctx)
            .await
            .map_err(EngineError::from)
    }

    pub async fn delete(&self, owner_id: ID, reminder_id: ID) -> Result<(), EngineError> {
        execute(
            DeleteReminderUseCase {
                owner_id,
                reminder_id,
            },
            &self.ctx,
        )
        .await
        .map_err(EngineError::from)
    }

    pub async fn toggle_active(
        &self,
        owner_id: ID,
        reminder_id: ID,
        is_active: bool,
    ) -> Result<StandaloneReminder, EngineError> {
        execute(
            ToggleReminderUseCase {
                owner_id,
                reminder_id,
                is_active,
            },
            &self.ctx,
        )
        .await
        .map_err(EngineError::from)
    }
}
