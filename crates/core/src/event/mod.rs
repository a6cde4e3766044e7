mod delete_internal_event;

pub use delete_internal_event::DeleteInternalEventUseCase;

use crate::error::EngineError;
use crate::shared::usecase::execute;
use hearth_domain::ID;
use hearth_infra::SyncContext;

/// Caller boundary for the month shard helpers shared between the internal
/// event store and the mirror.
#[derive(Clone)]
pub struct MonthShards {
    ctx: SyncContext,
}

impl MonthShards {
    pub fn new(ctx: SyncContext) -> Self {
        Self { ctx }
    }

    pub async fn delete_internal_event(
        &self,
        owner_id: ID,
        event_key: impl Into<String>,
        start_ts: i64,
    ) -> Result<(), EngineError> {
        execute(
            DeleteInternalEventUseCase {
                owner_id,
                event_key: event_key.into(),
                start_ts,
            },
            &self.ctx,
        )
        .await
        .map_err(EngineError::from)
    }
}
