use crate::shared::entity::ID;
use serde::{de::Visitor, Deserialize, Serialize};
use serde_json::Value;
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// Suffix appended to provider event ids when composing the local mirror
/// event id.
pub const PROVIDER_EVENT_DOMAIN: &str = "@google.com";

/// Composite identifier of a mirrored event:
/// `<providerEventId>@google.com-<startMillis>`.
///
/// The provider id is everything before the `@`; the embedded start
/// timestamp after the last `-` is the sole input to month shard
/// addressing, so an event is always locatable from its id alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorEventId {
    provider_event_id: String,
    start_ts: i64,
}

impl MirrorEventId {
    pub fn new(provider_event_id: impl Into<String>, start_ts: i64) -> Self {
        Self {
            provider_event_id: provider_event_id.into(),
            start_ts,
        }
    }

    pub fn provider_event_id(&self) -> &str {
        &self.provider_event_id
    }

    /// UTC millis of the event start, as embedded in the id suffix.
    pub fn start_ts(&self) -> i64 {
        self.start_ts
    }
}

impl Display for MirrorEventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}-{}",
            self.provider_event_id, PROVIDER_EVENT_DOMAIN, self.start_ts
        )
    }
}

#[derive(Error, Debug)]
pub enum InvalidMirrorEventIdError {
    #[error("Mirror event id: {0} is malformed")]
    Malformed(String),
}

impl FromStr for MirrorEventId {
    type Err = InvalidMirrorEventIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || InvalidMirrorEventIdError::Malformed(s.to_string());

        let at = s.find('@').ok_or_else(malformed)?;
        let provider_event_id = &s[..at];
        let dash = s.rfind('-').ok_or_else(malformed)?;
        let start_ts = s[dash + 1..].parse::<i64>().map_err(|_| malformed())?;
        if provider_event_id.is_empty() || dash < at {
            return Err(malformed());
        }
        Ok(Self {
            provider_event_id: provider_event_id.to_string(),
            start_ts,
        })
    }
}

impl Serialize for MirrorEventId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MirrorEventId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct MirrorEventIdVisitor;

        impl<'de> Visitor<'de> for MirrorEventIdVisitor {
            type Value = MirrorEventId;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("A composite mirror event id")
            }

            fn visit_str<E>(self, value: &str) -> Result<MirrorEventId, E>
            where
                E: serde::de::Error,
            {
                value
                    .parse::<MirrorEventId>()
                    .map_err(|e| E::custom(e.to_string()))
            }
        }

        deserializer.deserialize_str(MirrorEventIdVisitor)
    }
}

/// The minimal field set pushed to the external calendar provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    /// UTC millis.
    pub start_time: i64,
    pub end_time: i64,
}

/// Locally cached copy of an event also held by the provider. Only durable
/// once both the provider call and the shard write have succeeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MirrorEvent {
    pub event_id: MirrorEventId,
    pub calendar_id: ID,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub start_time: i64,
    pub end_time: i64,
    /// Linked activity references, opaque to the engine.
    #[serde(default)]
    pub activities: Value,
}

impl MirrorEvent {
    pub fn from_draft(
        event_id: MirrorEventId,
        calendar_id: ID,
        draft: &EventDraft,
        activities: Value,
    ) -> Self {
        Self {
            event_id,
            calendar_id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            location: draft.location.clone(),
            start_time: draft.start_time,
            end_time: draft.end_time,
            activities,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn composes_and_parses_the_composite_id() {
        let id = MirrorEventId::new("abc123", 1748768400000);
        assert_eq!(id.to_string(), "abc123@google.com-1748768400000");

        let parsed: MirrorEventId = "abc123@google.com-1748768400000".parse().unwrap();
        assert_eq!(parsed.provider_event_id(), "abc123");
        assert_eq!(parsed.start_ts(), 1748768400000);
        assert_eq!(parsed, id);
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!("abc123".parse::<MirrorEventId>().is_err());
        assert!("@google.com-100".parse::<MirrorEventId>().is_err());
        assert!("abc@google.com-later".parse::<MirrorEventId>().is_err());
        assert!("abc-123@google.com".parse::<MirrorEventId>().is_err());
    }
}
