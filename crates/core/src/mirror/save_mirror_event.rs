use super::{resolve_provider_calendar_id, ResolveError};
use crate::error::EngineError;
use crate::shared::paths;
use crate::shared::usecase::UseCase;
use hearth_domain::{shard_key_for, EventDraft, MirrorEvent, MirrorEventId, ID};
use hearth_infra::SyncContext;
use serde_json::{json, Map, Value};

/// Pushes an internally authored event to the external provider and merges
/// the mirror copy into the month shard derived from its start time.
///
/// The mirror is only durable once both writes succeed. A shard failure
/// after a successful provider write leaves the two stores inconsistent;
/// that state is reported, never hidden, and reconciliation is left to an
/// explicit pass.
#[derive(Debug)]
pub struct SaveMirrorEventUseCase {
    pub calendar_id: ID,
    pub event: EventDraft,
    pub activities: Value,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    CalendarNotFound(ID),
    CalendarNotResolvable(ID),
    ProviderFailure(String),
    MirrorDesync { event_id: MirrorEventId },
    StorageError,
}

impl From<ResolveError> for UseCaseError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::CalendarNotFound(id) => Self::CalendarNotFound(id),
            ResolveError::NotResolvable(id) => Self::CalendarNotResolvable(id),
            ResolveError::Storage => Self::StorageError,
        }
    }
}

impl From<UseCaseError> for EngineError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::CalendarNotFound(id) => {
                Self::NotFound(format!("The calendar with id: {}", id))
            }
            UseCaseError::CalendarNotResolvable(id) => Self::CalendarNotResolvable(id.to_string()),
            UseCaseError::ProviderFailure(message) => Self::ProviderFailure(message),
            UseCaseError::MirrorDesync { event_id } => Self::StoreFailure(format!(
                "Provider holds event {} but the month shard write failed; the mirror needs reconciliation",
                event_id
            )),
            UseCaseError::StorageError => {
                Self::StoreFailure("Unable to mirror the event".into())
            }
        }
    }
}

#[async_trait::async_trait]
impl UseCase for SaveMirrorEventUseCase {
    type Response = MirrorEventId;

    type Error = UseCaseError;

    const NAME: &'static str = "SaveMirrorEvent";

    async fn execute(&mut self, ctx: &SyncContext) -> Result<Self::Response, Self::Error> {
        let provider_calendar_id = resolve_provider_calendar_id(&self.calendar_id, ctx).await?;

        let provider_event_id = ctx
            .provider
            .create_event(&provider_calendar_id, &self.event)
            .await
            .map_err(|e| UseCaseError::ProviderFailure(e.to_string()))?;

        let event_id = MirrorEventId::new(provider_event_id, self.event.start_time);
        let mirror = MirrorEvent::from_draft(
            event_id.clone(),
            self.calendar_id.clone(),
            &self.event,
            self.activities.clone(),
        );
        let mirror_value =
            serde_json::to_value(&mirror).map_err(|_| UseCaseError::StorageError)?;

        let month = shard_key_for(self.event.start_time);
        let mut items = Map::new();
        items.insert(event_id.to_string(), mirror_value);
        ctx.store
            .set(
                paths::MONTH_SHARDS,
                &paths::shard_doc_id(&self.calendar_id, &month),
                json!({ "items": items, "updatedAt": ctx.sys.get_timestamp_millis() }),
                true,
            )
            .await
            .map_err(|_| UseCaseError::MirrorDesync {
                event_id: event_id.clone(),
            })?;

        Ok(event_id)
    }
}
