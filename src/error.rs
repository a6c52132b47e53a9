use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(meetbot::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(meetbot::config))]
    Config(String),

    #[error("Calendar feed error: {0}")]
    #[diagnostic(code(meetbot::feed))]
    Feed(String),

    #[error("Calendar parse error: {0}")]
    #[diagnostic(code(meetbot::parse))]
    Parse(String),

    #[error("Notification error: {0}")]
    #[diagnostic(code(meetbot::notify))]
    Notify(String),

    #[error("Component error: {0}")]
    #[diagnostic(code(meetbot::component))]
    Component(String),

    #[error(transparent)]
    #[diagnostic(code(meetbot::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(meetbot::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(meetbot::other))]
    Other(String),
}

// Implement From for TOML serialization errors
impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type BotResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create feed errors
pub fn feed_error(message: &str) -> Error {
    Error::Feed(message.to_string())
}

/// Helper to create parse errors
pub fn parse_error(message: &str) -> Error {
    Error::Parse(message.to_string())
}

/// Helper to create notification errors
pub fn notify_error(message: &str) -> Error {
    Error::Notify(message.to_string())
}

/// Helper to create component errors
#[allow(dead_code)]
pub fn component_error(message: &str) -> Error {
    Error::Component(message.to_string())
}
