mod calendar_api;

use super::{CalendarProvider, ProviderError};
use calendar_api::{GoogleCalendarEventAttributes, GoogleCalendarRestApi};
use hearth_domain::EventDraft;
use std::time::Duration;

// https://developers.google.com/calendar/v3/reference/events
pub struct GoogleCalendarProvider {
    api: GoogleCalendarRestApi,
}

impl GoogleCalendarProvider {
    pub fn new(access_token: String, timeout: Duration) -> Self {
        Self {
            api: GoogleCalendarRestApi::new(access_token, timeout),
        }
    }
}

#[async_trait::async_trait]
impl CalendarProvider for GoogleCalendarProvider {
    async fn create_event(
        &self,
        provider_calendar_id: &str,
        draft: &EventDraft,
    ) -> Result<String, ProviderError> {
        let attributes = GoogleCalendarEventAttributes::from(draft);
        self.api
            .insert(provider_calendar_id, &attributes)
            .await
            .map(|event| event.id)
            .map_err(|e| ProviderError::Rejected(e.to_string()))
    }

    async fn delete_event(
        &self,
        provider_calendar_id: &str,
        provider_event_id: &str,
    ) -> Result<(), ProviderError> {
        self.api
            .remove(provider_calendar_id, provider_event_id)
            .await
            .map_err(|e| ProviderError::Rejected(e.to_string()))
    }
}
