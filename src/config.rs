use crate::error::{env_error, BotResult};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use url::Url;

/// Default poll interval for the calendar feed, in seconds
pub const DEFAULT_CHECK_INTERVAL: u64 = 60;

/// Default alert lead time, in minutes
pub const DEFAULT_NOTIFY_MINUTES: i64 = 40;

/// Default expansion window half-width, in minutes
pub const DEFAULT_WINDOW_MINUTES: i64 = 10;

/// Main configuration structure for the bot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// URL of the ICS calendar feed to watch
    pub ics_url: String,
    /// Telegram bot token
    pub telegram_bot_token: String,
    /// Telegram chat ID to send meeting alerts to
    pub alert_chat_id: i64,
    /// Seconds between feed polls
    pub check_interval_secs: u64,
    /// How many minutes before a meeting the alert fires
    pub notify_minutes: i64,
    /// Reference timezone (IANA identifier) for floating feed times and
    /// message formatting
    pub timezone: String,
    /// Minutes of lookback in the occurrence expansion window
    pub window_lookback_minutes: i64,
    /// Minutes of lookahead in the occurrence expansion window
    pub window_lookahead_minutes: i64,
    /// Path to an image attached to alerts when the file exists
    pub event_photo_path: String,
    /// Map of component names to their enabled status
    pub components: HashMap<String, bool>,
    /// Map of attendee identities (e-mail addresses) to chat mentions
    pub mentions: HashMap<String, String>,
}

impl Config {
    /// Load configuration from environment and config files
    pub fn load() -> BotResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Required environment variables
        let ics_url = env::var("ICS_URL").map_err(|_| env_error("ICS_URL"))?;
        Url::parse(&ics_url)
            .map_err(|e| crate::error::config_error(&format!("Invalid ICS_URL: {}", e)))?;

        let telegram_bot_token =
            env::var("TELEGRAM_BOT_TOKEN").map_err(|_| env_error("TELEGRAM_BOT_TOKEN"))?;

        let alert_chat_id = env::var("ALERT_CHAT_ID")
            .map_err(|_| env_error("ALERT_CHAT_ID"))?
            .parse::<i64>()
            .map_err(|_| env_error("Invalid ALERT_CHAT_ID format"))?;

        // Optional values with defaults
        let check_interval_secs = env::var("CHECK_INTERVAL")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_CHECK_INTERVAL);

        let notify_minutes = env::var("NOTIFY_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(DEFAULT_NOTIFY_MINUTES);

        let window_lookback_minutes = env::var("WINDOW_LOOKBACK_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(DEFAULT_WINDOW_MINUTES);

        let window_lookahead_minutes = env::var("WINDOW_LOOKAHEAD_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(DEFAULT_WINDOW_MINUTES);

        let timezone = env::var("TIMEZONE").unwrap_or_else(|_| String::from("UTC"));

        let event_photo_path =
            env::var("EVENT_PHOTO_PATH").unwrap_or_else(|_| String::from("event.jpg"));

        // Initialize default components
        let mut components = HashMap::new();
        components.insert("calendar_alerts".to_string(), true);

        // Load components configuration from file if it exists
        if let Ok(content) = fs::read_to_string("config/components.toml") {
            if let Ok(file_components) = toml::from_str::<HashMap<String, bool>>(&content) {
                // Merge with defaults
                for (key, value) in file_components {
                    components.insert(key, value);
                }
            }
        }

        // Load the attendee mention table if it exists
        let mut mentions = HashMap::new();
        if let Ok(content) = fs::read_to_string("config/mentions.toml") {
            if let Ok(file_mentions) = toml::from_str::<HashMap<String, String>>(&content) {
                mentions = file_mentions;
            }
        }

        Ok(Config {
            ics_url,
            telegram_bot_token,
            alert_chat_id,
            check_interval_secs,
            notify_minutes,
            timezone,
            window_lookback_minutes,
            window_lookahead_minutes,
            event_photo_path,
            components,
            mentions,
        })
    }

    /// Check if a component is enabled
    pub fn is_component_enabled(&self, name: &str) -> bool {
        *self.components.get(name).unwrap_or(&false)
    }
}
