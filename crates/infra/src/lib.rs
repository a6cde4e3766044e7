mod config;
mod services;
mod store;
mod system;

pub use config::Config;
pub use services::{
    CalendarProvider, GoogleCalendarProvider, InMemoryCalendarProvider, ProviderError,
    ProviderEventRecord,
};
pub use store::{
    DocumentStore, FieldPath, FieldWrite, FirestoreRestStore, InMemoryDocumentStore, StoreError,
};
pub use system::{ISys, RealSys};

use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct SyncContext {
    pub store: Arc<dyn DocumentStore>,
    pub provider: Arc<dyn CalendarProvider>,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
}

impl SyncContext {
    pub fn new(store: Arc<dyn DocumentStore>, provider: Arc<dyn CalendarProvider>) -> Self {
        Self {
            store,
            provider,
            config: Config::new(),
            sys: Arc::new(RealSys {}),
        }
    }

    /// Context backed by in-process fakes. Used by the engine tests.
    pub fn create_inmemory() -> Self {
        Self::new(
            Arc::new(InMemoryDocumentStore::new()),
            Arc::new(InMemoryCalendarProvider::new()),
        )
    }
}

/// Will set up the infrastructure context given the environment
pub fn setup_context() -> SyncContext {
    let config = Config::new();
    let timeout = Duration::from_millis(config.http_timeout_millis);
    let project_id = require_env("FIRESTORE_PROJECT_ID");
    let store_token = require_env("STORE_ACCESS_TOKEN");
    let calendar_token = require_env("CALENDAR_ACCESS_TOKEN");

    SyncContext {
        store: Arc::new(FirestoreRestStore::new(&project_id, store_token, timeout)),
        provider: Arc::new(GoogleCalendarProvider::new(calendar_token, timeout)),
        config,
        sys: Arc::new(RealSys {}),
    }
}

fn require_env(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| panic!("{} env var to be present.", name))
}
