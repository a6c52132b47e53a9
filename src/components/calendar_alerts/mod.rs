mod actor;
mod attendees;
pub mod dedup;
mod expand;
mod handle;
pub mod models;
mod notifications;
pub mod parser;
pub mod scheduler;
mod time;

pub use handle::CalendarFeedHandle;
pub use models::EventDefinition;

use crate::config::Config;
use crate::error::BotResult;
use crate::notifier::Notify;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use scheduler::start_scheduler;

/// Calendar alert component: watches the ICS feed and announces upcoming
/// meetings in the alert chat.
#[derive(Default)]
pub struct CalendarAlerts {
    handle: RwLock<Option<CalendarFeedHandle>>,
    cancel: CancellationToken,
}

impl CalendarAlerts {
    /// Create a new calendar alerts component
    pub fn new() -> Self {
        Self {
            handle: RwLock::new(None),
            cancel: CancellationToken::new(),
        }
    }
}

#[async_trait]
impl super::Component for CalendarAlerts {
    fn name(&self) -> &'static str {
        "calendar_alerts"
    }

    async fn init(&self, config: Arc<RwLock<Config>>, notifier: Arc<dyn Notify>) -> BotResult<()> {
        // Create a new handle if one doesn't exist
        let mut handle_lock = self.handle.write().await;
        if handle_lock.is_none() {
            *handle_lock = Some(CalendarFeedHandle::new(config.clone()));
        }

        let handle = handle_lock.as_ref().unwrap().clone();

        // Start the alert scheduler
        start_scheduler(notifier, config, handle, self.cancel.clone()).await;

        Ok(())
    }

    async fn shutdown(&self) -> BotResult<()> {
        // Stop the polling loop, then the feed actor
        self.cancel.cancel();

        let handle_lock = self.handle.read().await;
        if let Some(handle) = &*handle_lock {
            handle.shutdown().await?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
