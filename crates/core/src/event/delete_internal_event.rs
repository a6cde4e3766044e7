use crate::error::EngineError;
use crate::shared::paths;
use crate::shared::usecase::UseCase;
use hearth_domain::{shard_key_for, ID};
use hearth_infra::{FieldPath, FieldWrite, StoreError, SyncContext};
use serde_json::json;

/// Removes one internally authored event from its owner's month shard.
/// Field-level delete plus an `updatedAt` stamp; the shard is addressed
/// purely from the event's start timestamp.
#[derive(Debug)]
pub struct DeleteInternalEventUseCase {
    pub owner_id: ID,
    pub event_key: String,
    pub start_ts: i64,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    ShardNotFound(String),
    StorageError,
}

impl From<UseCaseError> for EngineError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::ShardNotFound(doc_id) => {
                Self::NotFound(format!("The month shard: {}", doc_id))
            }
            UseCaseError::StorageError => {
                Self::StoreFailure("Unable to delete the event from its month shard".into())
            }
        }
    }
}

#[async_trait::async_trait]
impl UseCase for DeleteInternalEventUseCase {
    type Response = ();

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteInternalEvent";

    async fn execute(&mut self, ctx: &SyncContext) -> Result<Self::Response, Self::Error> {
        let month = shard_key_for(self.start_ts);
        let doc_id = paths::shard_doc_id(&self.owner_id, &month);
        let removal = ctx
            .store
            .update_fields(
                paths::MONTH_SHARDS,
                &doc_id,
                vec![
                    (
                        FieldPath::nested("items", self.event_key.clone()),
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

#[cfg(test)]
mod test {
    use super::*;
    use hearth_infra::{Config, DocumentStore, ISys, InMemoryCalendarProvider, InMemoryDocumentStore};
    use std::sync::Arc;

    struct FixedSys;
    impl ISys for FixedSys {
        fn get_timestamp_millis(&self) -> i64 {
            1748854800000
        }
    }

    fn setup() -> (SyncContext, Arc<InMemoryDocumentStore>) {
        let store = Arc::new(InMemoryDocumentStore::new());
        let ctx = SyncContext {
            store: store.clone(),
            provider: Arc::new(InMemoryCalendarProvider::new()),
            config: Config::default(),
            sys: Arc::new(FixedSys),
        };
        (ctx, store)
    }

    #[tokio::test]
    async fn deletes_only_the_addressed_event() {
        let (ctx, store) = setup();
        store
            .set(
                paths::MONTH_SHARDS,
                "group1_2025-06",
                json!({
                    "items": { "e1": { "title": "Dinner" }, "e2": { "title": "Swim class" } },
                    "updatedAt": 1
                }),
                false,
            )
            .await
            .unwrap();

        let mut usecase = DeleteInternalEventUseCase {
            owner_id: "group1".parse().unwrap(),
            event_key: "e1".into(),
            start_ts: 1748768400000,
        };
        usecase.execute(&ctx).await.unwrap();

        let shard = store
            .get(paths::MONTH_SHARDS, "group1_2025-06")
            .await
            .unwrap()
            .unwrap();
        assert!(shard["items"].get("e1").is_none());
        assert_eq!(shard["items"]["e2"]["title"], json!("Swim class"));
        assert_eq!(shard["updatedAt"], json!(1748854800000i64));
    }

    #[tokio::test]
    async fn missing_shard_is_not_found() {
        let (ctx, _) = setup();

        let mut usecase = DeleteInternalEventUseCase {
            owner_id: "group1".parse().unwrap(),
            event_key: "e1".into(),
            start_ts: 1748768400000,
        };
        let err = usecase.execute(&ctx).await.unwrap_err();
        assert_eq!(err, UseCaseError::ShardNotFound("group1_2025-06".into()));
    }
}
