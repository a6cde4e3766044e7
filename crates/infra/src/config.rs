use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// App identifier stamped into notification routing data so the push
    /// layer can route taps back into the right client.
    pub app_identifier: String,
    /// Timeout in millis imposed on every document store and provider HTTP
    /// call. A timed-out call surfaces as a retryable failure, never as a
    /// success.
    pub http_timeout_millis: u64,
}

impl Config {
    pub fn new() -> Self {
        let app_identifier = match std::env::var("APP_IDENTIFIER") {
            Ok(app) => app,
            Err(_) => {
                info!("Did not find APP_IDENTIFIER environment variable. Falling back to: hearth.");
                "hearth".into()
            }
        };
        let default_timeout: u64 = 10_000;
        let http_timeout_millis = match std::env::var("SYNC_HTTP_TIMEOUT_MILLIS") {
            Ok(raw) => match raw.parse::<u64>() {
                Ok(timeout) => timeout,
                Err(_) => {
                    warn!(
                        "The given SYNC_HTTP_TIMEOUT_MILLIS: {} is not valid, falling back to the default timeout: {}.",
                        raw, default_timeout
                    );
                    default_timeout
                }
            },
            Err(_) => default_timeout,
        };
        Self {
            app_identifier,
            http_timeout_millis,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
