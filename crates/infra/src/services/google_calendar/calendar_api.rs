use chrono::{TimeZone, Utc};
use hearth_domain::EventDraft;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::error;

const GOOGLE_API_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleDateTime(String);

impl GoogleDateTime {
    pub fn from_timestamp_millis(timestamp: i64) -> Self {
        let datetime_str = Utc.timestamp_millis(timestamp).to_rfc3339();
        Self(datetime_str)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleCalendarEventDateTime {
    date_time: GoogleDateTime,
    time_zone: String,
}

impl GoogleCalendarEventDateTime {
    pub fn new(date_time_millis: i64) -> Self {
        Self {
            date_time: GoogleDateTime::from_timestamp_millis(date_time_millis),
            time_zone: String::from("UTC"),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleCalendarEventAttributes {
    pub summary: String,
    pub description: String,
    pub location: String,
    pub start: GoogleCalendarEventDateTime,
    pub end: GoogleCalendarEventDateTime,
}

impl From<&EventDraft> for GoogleCalendarEventAttributes {
    fn from(e: &EventDraft) -> Self {
        Self {
            summary: e.title.clone(),
            description: e.description.clone(),
            location: e.location.clone(),
            start: GoogleCalendarEventDateTime::new(e.start_time),
            end: GoogleCalendarEventDateTime::new(e.end_time),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleCalendarEvent {
    pub id: String,
}

pub struct GoogleCalendarRestApi {
    client: Client,
    access_token: String,
}

impl GoogleCalendarRestApi {
    pub fn new(access_token: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("HTTP client to be buildable");

        Self {
            client,
            access_token,
        }
    }

    async fn post<T: for<'de> Deserialize<'de>>(
        &self,
        body: &impl Serialize,
        path: String,
    ) -> anyhow::Result<T> {
        let res = self
            .client
            .post(&format!("{}/{}", GOOGLE_API_BASE_URL, path))
            .header("authorization", format!("Bearer {}", self.access_token))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(
                    "[Network Error] Google Calendar API POST error. Error message: {:?}",
                    e
                );
                anyhow::Error::new(e)
            })?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            error!(
                "[Unexpected Response] Google Calendar API POST error. Status: {}. Body: {}",
                status, body
            );
            return Err(anyhow::anyhow!("Google Calendar API rejected the request: {}", body));
        }
        res.json::<T>().await.map_err(|e| {
            error!(
                "[Unexpected Response] Google Calendar API POST error. Error message: {:?}",
                e
            );
            anyhow::Error::new(e)
        })
    }

    async fn delete(&self, path: String) -> anyhow::Result<()> {
        let res = self
            .client
            .delete(&format!("{}/{}", GOOGLE_API_BASE_URL, path))
            .header("authorization", format!("Bearer {}", self.access_token))
            .send()
            .await
            .map_err(|e| {
                error!(
                    "[Network Error] Google Calendar API DELETE error. Error message: {:?}",
                    e
                );
                anyhow::Error::new(e)
            })?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            error!(
                "[Unexpected Response] Google Calendar API DELETE error. Status: {}. Body: {}",
                status, body
            );
            return Err(anyhow::anyhow!("Google Calendar API rejected the request: {}", body));
        }
        Ok(())
    }

    pub async fn insert(
        &self,
        calendar_id: &str,
        body: &GoogleCalendarEventAttributes,
    ) -> anyhow::Result<GoogleCalendarEvent> {
        self.post(body, format!("calendars/{}/events", calendar_id))
            .await
    }

    pub async fn remove(&self, calendar_id: &str, event_id: &str) -> anyhow::Result<()> {
        self.delete(format!("calendars/{}/events/{}", calendar_id, event_id))
            .await
    }
}
