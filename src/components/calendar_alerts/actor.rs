use super::models::EventDefinition;
use super::parser;
use super::time::zone_or_utc;
use crate::config::Config;
use crate::error::{feed_error, BotResult};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tracing::info;

/// Timeout for one feed download
const FETCH_TIMEOUT_SECS: u64 = 15;

/// The calendar feed actor that processes messages
pub struct FeedActor {
    config: Arc<RwLock<Config>>,
    client: Client,
    command_rx: mpsc::Receiver<FeedCommand>,
}

/// Commands that can be sent to the feed actor
pub enum FeedCommand {
    FetchEvents(mpsc::Sender<BotResult<Vec<EventDefinition>>>),
    Shutdown,
}

/// Handle for communicating with the feed actor
#[derive(Clone)]
pub struct FeedActorHandle {
    command_tx: mpsc::Sender<FeedCommand>,
}

impl FeedActorHandle {
    /// Fetch and parse the calendar feed
    pub async fn fetch_events(&self) -> BotResult<Vec<EventDefinition>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(FeedCommand::FetchEvents(response_tx))
            .await
            .map_err(|e| feed_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| feed_error("Response channel closed"))?
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> BotResult<()> {
        let _ = self.command_tx.send(FeedCommand::Shutdown).await;
        Ok(())
    }
}

impl FeedActor {
    /// Create a new actor and return its handle
    pub fn new(config: Arc<RwLock<Config>>) -> (Self, FeedActorHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);

        let client = Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        let actor = Self {
            config,
            client,
            command_rx,
        };

        let handle = FeedActorHandle { command_tx };

        (actor, handle)
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Calendar feed actor started");

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                FeedCommand::FetchEvents(response_tx) => {
                    let result = self.fetch_events().await;
                    let _ = response_tx.send(result).await;
                }
                FeedCommand::Shutdown => {
                    info!("Calendar feed actor shutting down");
                    break;
                }
            }
        }

        info!("Calendar feed actor shut down");
    }

    /// Download the feed document and parse it into event definitions.
    /// Nothing is cached between fetches; every cycle sees the live feed.
    async fn fetch_events(&self) -> BotResult<Vec<EventDefinition>> {
        let (feed_url, timezone) = {
            let config_read = self.config.read().await;
            (config_read.ics_url.clone(), config_read.timezone.clone())
        };

        let response = self
            .client
            .get(&feed_url)
            .send()
            .await
            .map_err(|e| feed_error(&format!("Failed to fetch calendar feed: {}", e)))?;

        if !response.status().is_success() {
            return Err(feed_error(&format!(
                "Failed to fetch calendar feed: HTTP {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| feed_error(&format!("Failed to read feed body: {}", e)))?;

        parser::parse_feed(&body, zone_or_utc(&timezone))
    }
}
