use super::actor::{FeedActor, FeedActorHandle};
use super::models::EventDefinition;
use crate::config::Config;
use crate::error::BotResult;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Handle for interacting with the calendar feed actor
#[derive(Clone)]
pub struct CalendarFeedHandle {
    actor_handle: FeedActorHandle,
    _actor_task: Arc<JoinHandle<()>>,
}

impl CalendarFeedHandle {
    /// Create a new CalendarFeedHandle and spawn the actor
    pub fn new(config: Arc<RwLock<Config>>) -> Self {
        // Create the actor and get its handle
        let (mut actor, handle) = FeedActor::new(config);

        // Spawn a task to run the actor
        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Self {
            actor_handle: handle,
            _actor_task: Arc::new(actor_task),
        }
    }

    /// Fetch and parse the calendar feed
    pub async fn fetch_events(&self) -> BotResult<Vec<EventDefinition>> {
        self.actor_handle.fetch_events().await
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> BotResult<()> {
        self.actor_handle.shutdown().await
    }
}
