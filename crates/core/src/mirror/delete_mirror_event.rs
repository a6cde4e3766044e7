use super::{resolve_provider_calendar_id, ResolveError};
use crate::error::EngineError;
use crate::shared::paths;
use crate::shared::usecase::UseCase;
use hearth_domain::{shard_key_for, MirrorEventId, ID};
use hearth_infra::{FieldPath, FieldWrite, StoreError, SyncContext};
use serde_json::json;

/// Removes a mirrored event from the provider and from its month shard.
///
/// The provider event id and the shard address are both derived from the
/// composite event id. The shard entry is removed with a field-level
/// delete, so concurrent writers of other keys in the same shard are never
/// clobbered.
#[derive(Debug)]
pub struct DeleteMirrorEventUseCase {
    pub calendar_id: ID,
    pub event_id: MirrorEventId,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    CalendarNotFound(ID),
    CalendarNotResolvable(ID),
    ProviderFailure(String),
    ShardNotFound(String),
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
            UseCaseError::ShardNotFound(doc_id) => {
                Self::NotFound(format!("The month shard: {}", doc_id))
            }
            UseCaseError::StorageError => {
                Self::StoreFailure("Unable to delete the mirrored event".into())
            }
        }
    }
}

#[async_trait::async_trait]
impl UseCase for DeleteMirrorEventUseCase {
    type Response = ();

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteMirrorEvent";

    async fn execute(&mut self, ctx: &SyncContext) -> Result<Self::Response, Self::Error> {
        let provider_calendar_id = resolve_provider_calendar_id(&self.calendar_id, ctx).await?;

        ctx.provider
            .delete_event(&provider_calendar_id, self.event_id.provider_event_id())
            .await
            .map_err(|e| UseCaseError::ProviderFailure(e.to_string()))?;

        let month = shard_key_for(self.event_id.start_ts());
        let doc_id = paths::shard_doc_id(&self.calendar_id, &month);
        let removal = ctx
            .store
            .update_fields(
                paths::MONTH_SHARDS,
                &doc_id,
                vec![
                    (
                        FieldPath::nested("items", self.event_id.to_string()),
                        FieldWrite::Delete,
                    ),
                    (
                        FieldPath::top("updatedAt"),
                        FieldWrite::Set(json!(ctx.sys.get_timestamp_millis())),
                    ),
                ],
            )
            .await;
        match removal {
            Ok(()) => Ok(()),
            Err(StoreError::NotFound { .. }) => Err(UseCaseError::ShardNotFound(doc_id)),
            Err(_) => Err(UseCaseError::StorageError),
        }
    }
}
