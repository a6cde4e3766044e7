pub mod google_calendar;
mod inmemory;

pub use google_calendar::GoogleCalendarProvider;
pub use inmemory::{InMemoryCalendarProvider, ProviderEventRecord};

use hearth_domain::EventDraft;
use thiserror::Error;

/// Failure reported by the external calendar provider, carried verbatim to
/// the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    #[error("{0}")]
    Rejected(String),
}

/// The two provider calls the mirror needs. Everything else about the
/// provider's API surface stays outside the engine.
#[async_trait::async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Returns the provider-assigned event id.
    async fn create_event(
        &self,
        provider_calendar_id: &str,
        draft: &EventDraft,
    ) -> Result<String, ProviderError>;

    async fn delete_event(
        &self,
        provider_calendar_id: &str,
        provider_event_id: &str,
    ) -> Result<(), ProviderError>;
}
