use super::{CalendarProvider, ProviderError};
use hearth_domain::EventDraft;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderEventRecord {
    pub calendar_id: String,
    pub event_id: String,
    pub draft: EventDraft,
}

/// In-memory provider used by the engine tests. Keeps every created event
/// so tests can assert on provider state, and can fail the next call to
/// exercise the desync paths.
pub struct InMemoryCalendarProvider {
    events: Mutex<Vec<ProviderEventRecord>>,
    next_failure: Mutex<Option<String>>,
    created: Mutex<u32>,
}

impl InMemoryCalendarProvider {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            next_failure: Mutex::new(None),
            created: Mutex::new(0),
        }
    }

    pub fn fail_next(&self, message: &str) {
        *self.next_failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn events(&self) -> Vec<ProviderEventRecord> {
        self.events.lock().unwrap().clone()
    }

    fn take_failure(&self) -> Option<ProviderError> {
        self.next_failure
            .lock()
            .unwrap()
            .take()
            .map(ProviderError::Rejected)
    }
}

impl Default for InMemoryCalendarProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CalendarProvider for InMemoryCalendarProvider {
    async fn create_event(
        &self,
        provider_calendar_id: &str,
        draft: &EventDraft,
    ) -> Result<String, ProviderError> {
        if let Some(failure) = self.take_failure() {
            return Err(failure);
        }
        let mut created = self.created.lock().unwrap();
        *created += 1;
        let event_id = format!("gev{}", created);
        self.events.lock().unwrap().push(ProviderEventRecord {
            calendar_id: provider_calendar_id.to_string(),
            event_id: event_id.clone(),
            draft: draft.clone(),
        });
        Ok(event_id)
    }

    async fn delete_event(
        &self,
        provider_calendar_id: &str,
        provider_event_id: &str,
    ) -> Result<(), ProviderError> {
        if let Some(failure) = self.take_failure() {
            return Err(failure);
        }
        let mut events = self.events.lock().unwrap();
        let before = events.len();
        events.retain(|event| {
            event.calendar_id != provider_calendar_id || event.event_id != provider_event_id
        });
        if events.len() == before {
            return Err(ProviderError::Rejected(format!(
                "No event {} in calendar {}",
                provider_event_id, provider_calendar_id
            )));
        }
        Ok(())
    }
}
