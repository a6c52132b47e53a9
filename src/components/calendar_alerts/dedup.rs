use super::models::DedupKey;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

/// How long a recorded key is retained. A key whose start instant is this
/// far in the past can never become due again (due requires the meeting
/// not to have started yet), so eviction cannot cause a duplicate alert.
const RETENTION_HOURS: i64 = 12;

/// Records which (title, start instant) pairs have already been announced,
/// so re-fetching the same series every poll cycle alerts at most once per
/// occurrence. Owned by the scheduler task; nothing else writes to it.
#[derive(Debug, Default)]
pub struct DedupStore {
    seen: HashSet<DedupKey>,
}

impl DedupStore {
    pub fn new() -> Self {
        Self {
            seen: HashSet::new(),
        }
    }

    pub fn already_notified(&self, key: &DedupKey) -> bool {
        self.seen.contains(key)
    }

    pub fn record(&mut self, key: DedupKey) {
        self.seen.insert(key);
    }

    /// Evict keys too old to ever fire again, keeping the store bounded
    /// for the life of the process.
    pub fn prune(&mut self, now: DateTime<Utc>) {
        let cutoff = now - Duration::hours(RETENTION_HOURS);
        self.seen.retain(|key| key.start >= cutoff);
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
