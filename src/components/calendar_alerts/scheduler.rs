use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{sleep, Duration as TokioDuration};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::attendees;
use super::dedup::DedupStore;
use super::expand;
use super::handle::CalendarFeedHandle;
use super::models::{EventDefinition, Occurrence};
use super::notifications;
use super::time::zone_or_utc;
use crate::config::Config;
use crate::notifier::Notify;

/// An occurrence is due from the moment of the alert lead up to, but not
/// including, the moment the lead expires: `now <= start < now + lead`.
/// An occurrence already started is never due.
pub fn is_due(start: DateTime<Utc>, now: DateTime<Utc>, lead: Duration) -> bool {
    start >= now && start - now < lead
}

/// The band in which occurrences may be materialized this cycle. The far
/// edge always covers the lead time, otherwise a lead longer than the
/// configured lookahead could never fire.
pub fn expansion_window(now: DateTime<Utc>, config: &Config) -> (DateTime<Utc>, DateTime<Utc>) {
    let lookback = Duration::minutes(config.window_lookback_minutes);
    let lookahead = Duration::minutes(
        config
            .window_lookahead_minutes
            .max(config.notify_minutes),
    );
    (now - lookback, now + lookahead)
}

/// Expand every definition over the window and keep the occurrences that
/// are due now and not yet announced. A definition that fails to expand is
/// logged and skipped; the rest of the cycle continues.
pub fn collect_due<'a>(
    definitions: &'a [EventDefinition],
    now: DateTime<Utc>,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    lead: Duration,
    store: &DedupStore,
) -> Vec<Occurrence<'a>> {
    let mut due = Vec::new();

    for definition in definitions {
        let occurrences = match expand::expand(definition, window_start, window_end) {
            Ok(occurrences) => occurrences,
            Err(e) => {
                error!("Failed to expand event '{}': {}", definition.title, e);
                continue;
            }
        };

        for occurrence in occurrences {
            if is_due(occurrence.start, now, lead) && !store.already_notified(&occurrence.key()) {
                due.push(occurrence);
            }
        }
    }

    due
}

/// Run one filter-and-notify pass over freshly fetched definitions.
///
/// Returns the number of alerts actually delivered. A dedup key is
/// recorded only after its send was confirmed, so a failed send is
/// retried on the next cycle while the occurrence is still due.
pub async fn process_cycle(
    definitions: &[EventDefinition],
    notifier: &dyn Notify,
    config: &Config,
    store: &mut DedupStore,
    now: DateTime<Utc>,
) -> usize {
    store.prune(now);

    let lead = Duration::minutes(config.notify_minutes);
    let (window_start, window_end) = expansion_window(now, config);
    let tz = zone_or_utc(&config.timezone);

    let due = collect_due(definitions, now, window_start, window_end, lead, store);
    let mut sent = 0;

    for occurrence in due {
        let resolved = attendees::resolve(&occurrence.definition.attendees, &config.mentions);
        let text = notifications::render_alert(&occurrence, &resolved, tz);

        match notifications::send_meeting_alert(
            notifier,
            config.alert_chat_id,
            &text,
            &config.event_photo_path,
        )
        .await
        {
            Ok(()) => {
                store.record(occurrence.key());
                sent += 1;
                info!(
                    "Sent meeting alert for '{}' at {}",
                    occurrence.definition.title, occurrence.start
                );
            }
            Err(e) => {
                error!(
                    "Failed to send alert for '{}': {}",
                    occurrence.definition.title, e
                );
            }
        }
    }

    sent
}

/// Start the alert scheduler task.
///
/// The loop polls the feed at the configured interval until the
/// cancellation token fires; no error inside a cycle ever stops it.
pub async fn start_scheduler(
    notifier: Arc<dyn Notify>,
    config: Arc<RwLock<Config>>,
    feed: CalendarFeedHandle,
    cancel: CancellationToken,
) {
    let config_snapshot = config.read().await.clone();
    let interval = config_snapshot.check_interval_secs;

    tokio::spawn(async move {
        info!(
            "Calendar alert scheduler started (poll interval {}s, lead {}m)",
            interval, config_snapshot.notify_minutes
        );

        let mut store = DedupStore::new();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Calendar alert scheduler stopping");
                    break;
                }
                _ = sleep(TokioDuration::from_secs(interval)) => {}
            }

            let definitions = match feed.fetch_events().await {
                Ok(definitions) => definitions,
                Err(e) => {
                    error!("Skipping cycle, feed fetch failed: {}", e);
                    continue;
                }
            };

            let sent = process_cycle(
                &definitions,
                notifier.as_ref(),
                &config_snapshot,
                &mut store,
                Utc::now(),
            )
            .await;

            if sent > 0 {
                info!("Poll cycle complete, {} alert(s) sent", sent);
            } else {
                debug!(
                    "Poll cycle complete, nothing due ({} definition(s), {} key(s) recorded)",
                    definitions.len(),
                    store.len()
                );
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn test_config() -> Config {
        Config {
            ics_url: "https://calendar.example.com/feed.ics".to_string(),
            telegram_bot_token: String::new(),
            alert_chat_id: 0,
            check_interval_secs: 60,
            notify_minutes: 5,
            timezone: "UTC".to_string(),
            window_lookback_minutes: 10,
            window_lookahead_minutes: 10,
            event_photo_path: "event.jpg".to_string(),
            components: HashMap::new(),
            mentions: HashMap::new(),
        }
    }

    fn definition(title: &str, start: DateTime<Utc>, rrule: Option<&str>) -> EventDefinition {
        EventDefinition {
            title: title.to_string(),
            start,
            rrule: rrule.map(|r| r.to_string()),
            attendees: Vec::new(),
        }
    }

    #[test]
    fn test_due_boundaries() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 56, 0).unwrap();
        let lead = Duration::minutes(5);

        // Exactly at now + lead: not yet due
        assert!(!is_due(now + lead, now, lead));
        // One second inside the lead: due
        assert!(is_due(now + lead - Duration::seconds(1), now, lead));
        // Starting right now: due
        assert!(is_due(now, now, lead));
        // Already started: never due
        assert!(!is_due(now - Duration::seconds(1), now, lead));
    }

    #[test]
    fn test_expansion_window_covers_lead() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();

        let config = test_config();
        let (start, end) = expansion_window(now, &config);
        assert_eq!(start, now - Duration::minutes(10));
        assert_eq!(end, now + Duration::minutes(10));

        // A lead longer than the lookahead widens the far edge
        let mut long_lead = test_config();
        long_lead.notify_minutes = 40;
        let (_, end) = expansion_window(now, &long_lead);
        assert_eq!(end, now + Duration::minutes(40));
    }

    #[test]
    fn test_collect_due_filters_recorded_keys() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 56, 0).unwrap();
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let lead = Duration::minutes(5);
        let definitions = vec![definition("Standup", start, None)];
        let mut store = DedupStore::new();

        let due = collect_due(
            &definitions,
            now,
            now - Duration::minutes(10),
            now + Duration::minutes(10),
            lead,
            &store,
        );
        assert_eq!(due.len(), 1);

        // Record every surviving key; the same poll must now yield nothing
        for occurrence in &due {
            store.record(occurrence.key());
        }
        let again = collect_due(
            &definitions,
            now,
            now - Duration::minutes(10),
            now + Duration::minutes(10),
            lead,
            &store,
        );
        assert!(again.is_empty());
    }

    #[test]
    fn test_collect_due_ignores_not_yet_due() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 50, 0).unwrap();
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let definitions = vec![definition("Standup", start, None)];
        let store = DedupStore::new();

        // In the expansion window but outside the 5-minute lead
        let due = collect_due(
            &definitions,
            now,
            now - Duration::minutes(10),
            now + Duration::minutes(10),
            Duration::minutes(5),
            &store,
        );
        assert!(due.is_empty());
    }

    #[test]
    fn test_collect_due_survives_bad_rrule() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 56, 0).unwrap();
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let definitions = vec![
            definition("Broken", start, Some("FREQ=SOMETIMES")),
            definition("Fine", start, None),
        ];
        let store = DedupStore::new();

        let due = collect_due(
            &definitions,
            now,
            now - Duration::minutes(10),
            now + Duration::minutes(10),
            Duration::minutes(5),
            &store,
        );

        // The malformed definition is dropped, not the cycle
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].definition.title, "Fine");
    }

    #[test]
    fn test_recurring_standup_due_once_in_window() {
        // Daily standup at 09:00, anchored far in the past
        let anchor = Utc.with_ymd_and_hms(2020, 1, 1, 9, 0, 0).unwrap();
        let definitions = vec![definition("Standup", anchor, Some("FREQ=DAILY"))];
        let store = DedupStore::new();

        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 56, 0).unwrap();
        let due = collect_due(
            &definitions,
            now,
            now - Duration::minutes(10),
            now + Duration::minutes(10),
            Duration::minutes(5),
            &store,
        );

        assert_eq!(due.len(), 1);
        assert_eq!(
            due[0].start,
            Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
        );
    }
}
