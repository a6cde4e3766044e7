use crate::error::EngineError;
use crate::shared::paths;
use crate::shared::usecase::UseCase;
use hearth_domain::ActivityBinding;
use hearth_infra::SyncContext;

/// Clears an activity's binding. Nothing bound is a successful no-op, so
/// callers can always issue the delete without checking first.
#[derive(Debug)]
pub struct DeleteBindingUseCase {
    pub binding: ActivityBinding,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for EngineError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => {
                Self::StoreFailure("Unable to delete the activity binding".into())
            }
        }
    }
}

#[async_trait::async_trait]
impl UseCase for DeleteBindingUseCase {
    type Response = ActivityBinding;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteBinding";

    async fn execute(&mut self, ctx: &SyncContext) -> Result<Self::Response, Self::Error> {
        let unbound = ActivityBinding::unbound(
            self.binding.activity_id.clone(),
            self.binding.activity_type,
            self.binding.user_id.clone(),
        );
        let bound_id = match self.binding.notification_ref() {
            Some(id) => id.clone(),
            None => return Ok(unbound),
        };

        ctx.store
            .delete(paths::NOTIFICATIONS, bound_id.as_str())
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        Ok(unbound)
    }
}
