mod delete_mirror_event;
mod save_mirror_event;

pub use delete_mirror_event::DeleteMirrorEventUseCase;
pub use save_mirror_event::SaveMirrorEventUseCase;

use crate::error::EngineError;
use crate::shared::paths;
use crate::shared::usecase::execute;
use hearth_domain::{CalendarDescriptor, EventDraft, MirrorEventId, ID};
use hearth_infra::SyncContext;
use serde_json::Value;

/// Caller boundary for mirroring events into the external provider.
#[derive(Clone)]
pub struct CalendarMirror {
    ctx: SyncContext,
}

impl CalendarMirror {
    pub fn new(ctx: SyncContext) -> Self {
        Self { ctx }
    }

    pub async fn save(
        &self,
        calendar_id: ID,
        event: EventDraft,
        activities: Value,
    ) -> Result<MirrorEventId, EngineError> {
        execute(
            SaveMirrorEventUseCase {
                calendar_id,
                event,
                activities,
            },
            &self.ctx,
        )
        .await
        .map_err(EngineError::from)
    }

    pub async fn delete(
        &self,
        calendar_id: ID,
        event_id: MirrorEventId,
    ) -> Result<(), EngineError> {
        execute(
            DeleteMirrorEventUseCase {
                calendar_id,
                event_id,
            },
            &self.ctx,
        )
        .await
        .map_err(EngineError::from)
    }
}

#[derive(Debug, PartialEq)]
pub(crate) enum ResolveError {
    CalendarNotFound(ID),
    NotResolvable(ID),
    Storage,
}

/// Loads the calendar descriptor and resolves its provider calendar id.
/// Required before any provider call; both schema generations resolve
/// through the descriptor's own two-path logic.
pub(crate) async fn resolve_provider_calendar_id(
    calendar_id: &ID,
    ctx: &SyncContext,
) -> Result<String, ResolveError> {
    let doc = ctx
        .store
        .get(paths::CALENDARS, calendar_id.as_str())
        .await
        .map_err(|_| ResolveError::Storage)?
        .ok_or_else(|| ResolveError::CalendarNotFound(calendar_id.clone()))?;
    let descriptor: CalendarDescriptor =
        serde_json::from_value(doc).map_err(|_| ResolveError::NotResolvable(calendar_id.clone()))?;
    descriptor
        .provider_calendar_id()
        .ok_or_else(|| ResolveError::NotResolvable(calendar_id.clone()))
}
