use super::models::EventDefinition;
use super::time;
use crate::error::{parse_error, BotResult};
use chrono_tz::Tz;
use icalendar::{Calendar, Component};
use std::str::FromStr;
use tracing::debug;

/// Parse an ICS document into event definitions.
///
/// A document that is not a calendar at all is an error; individual VEVENT
/// blocks that lack a usable start time are skipped so one malformed block
/// never drops the rest of the feed.
pub fn parse_feed(content: &str, default_tz: Tz) -> BotResult<Vec<EventDefinition>> {
    let calendar = Calendar::from_str(content)
        .map_err(|e| parse_error(&format!("Failed to parse calendar document: {}", e)))?;

    let mut definitions = Vec::new();

    for event in calendar.components.iter().filter_map(|c| c.as_event()) {
        let start_raw = match event.get_start() {
            Some(start) => start,
            None => {
                debug!(
                    "Skipping event without DTSTART: {:?}",
                    event.get_summary().unwrap_or("(untitled)")
                );
                continue;
            }
        };

        let title = event.get_summary().unwrap_or("(untitled)").to_string();
        let start = time::normalize(&start_raw, default_tz);
        let rrule = event.property_value("RRULE").map(|s| s.to_string());

        // ATTENDEE may appear zero, one, or many times; always a list here
        let attendees: Vec<String> = event
            .multi_properties()
            .get("ATTENDEE")
            .map(|props| props.iter().map(|p| p.value().to_string()).collect())
            .unwrap_or_default();

        definitions.push(EventDefinition {
            title,
            start,
            rrule,
            attendees,
        });
    }

    Ok(definitions)
}
