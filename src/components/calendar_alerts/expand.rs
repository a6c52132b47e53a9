use super::models::{EventDefinition, Occurrence};
use crate::error::{parse_error, BotResult};
use chrono::{DateTime, Duration, Utc};
use rrule::RRuleSet;

/// Cap on instances materialized per rule per cycle. The window is narrow
/// (minutes), so hitting this means a degenerate rule, not a real feed.
const EXPANSION_LIMIT: u16 = 365;

/// Expand a definition into the concrete start instants that fall inside
/// `[window_start, window_end]`, inclusive at both ends.
///
/// Recurrence evaluation is bound to the window itself; occurrences outside
/// the band are never materialized no matter how long the series runs.
pub fn expand<'a>(
    definition: &'a EventDefinition,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> BotResult<Vec<Occurrence<'a>>> {
    let rule = match &definition.rrule {
        Some(rule) => rule,
        None => {
            if definition.start >= window_start && definition.start <= window_end {
                return Ok(vec![Occurrence {
                    definition,
                    start: definition.start,
                }]);
            }
            return Ok(Vec::new());
        }
    };

    // The rrule parser wants a DTSTART anchor in the same document
    let doc = format!(
        "DTSTART:{}\nRRULE:{}",
        definition.start.format("%Y%m%dT%H%M%SZ"),
        rule
    );

    let rrule_set: RRuleSet = doc.parse().map_err(|e| {
        parse_error(&format!(
            "Failed to parse RRULE for event '{}': {}",
            definition.title, e
        ))
    })?;

    // after/before are exclusive; widen by a second to keep the band inclusive
    let tz: rrule::Tz = Utc.into();
    let after = (window_start - Duration::seconds(1)).with_timezone(&tz);
    let before = (window_end + Duration::seconds(1)).with_timezone(&tz);

    let result = rrule_set.after(after).before(before).all(EXPANSION_LIMIT);

    let mut occurrences: Vec<Occurrence<'a>> = Vec::new();
    for date in &result.dates {
        let start = date.with_timezone(&Utc);
        // De-duplicate by exact instant equality before returning
        if occurrences.iter().any(|o| o.start == start) {
            continue;
        }
        occurrences.push(Occurrence { definition, start });
    }

    Ok(occurrences)
}
