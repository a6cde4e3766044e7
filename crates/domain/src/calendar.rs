use serde::{Deserialize, Serialize};

/// Descriptor of a household calendar as stored in the calendars
/// collection. Two schema generations exist: current documents carry the
/// provider id in `source.calendarId`, older ones only an ICS-style
/// `calendarAddress` from which the id must be parsed. Both must resolve
/// identically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<CalendarSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_id: Option<String>,
}

impl CalendarDescriptor {
    /// Resolves the provider calendar id, trying the current schema field
    /// first and falling back to parsing the legacy address. `None` means
    /// the calendar cannot be used with the provider at all.
    pub fn provider_calendar_id(&self) -> Option<String> {
        if let Some(id) = self.source.as_ref().and_then(|s| s.calendar_id.clone()) {
            if !id.is_empty() {
                return Some(id);
            }
        }
        self.calendar_address.as_deref().and_then(parse_ical_address)
    }
}

/// Legacy addresses look like `https://../ical/<percent-encoded-id>/..`;
/// the id is the path segment right after `/ical/`, URL-decoded.
fn parse_ical_address(address: &str) -> Option<String> {
    const MARKER: &str = "/ical/";
    let start = address.find(MARKER)? + MARKER.len();
    let rest = &address[start..];
    let id = match rest.find('/') {
        Some(end) => &rest[..end],
        None => rest,
    };
    if id.is_empty() {
        return None;
    }
    urlencoding::decode(id).ok().map(|id| id.into_owned())
}
