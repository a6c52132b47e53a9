use chrono::{DateTime, Utc};

/// One parsed VEVENT from the feed.
///
/// Definitions are rebuilt from scratch on every poll and never diffed
/// against a previous fetch.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, Default)]
pub struct EventDefinition {
    /// Event title (SUMMARY)
    pub title: String,
    /// Start instant of the event, or of the first occurrence for a
    /// recurring event
    pub start: DateTime<Utc>,
    /// Raw RRULE string, present for recurring events
    pub rrule: Option<String>,
    /// Raw attendee identities, always a list (possibly empty)
    pub attendees: Vec<String>,
}

impl EventDefinition {
    pub fn is_recurring(&self) -> bool {
        self.rrule.is_some()
    }
}

/// One concrete, dated instance of an event's meeting time.
#[derive(Debug, Clone, Copy)]
pub struct Occurrence<'a> {
    pub definition: &'a EventDefinition,
    pub start: DateTime<Utc>,
}

impl Occurrence<'_> {
    /// Identity of this occurrence across polling cycles. The feed has no
    /// stable per-event identifier, so the pair (title, start) is the key.
    pub fn key(&self) -> DedupKey {
        DedupKey {
            title: self.definition.title.clone(),
            start: self.start,
        }
    }
}

/// Key recording that an occurrence has been announced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub title: String,
    pub start: DateTime<Utc>,
}
