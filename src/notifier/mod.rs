mod telegram;

pub use telegram::TelegramNotifier;

use crate::error::BotResult;
use async_trait::async_trait;
use std::path::Path;

/// Chat transport abstraction.
///
/// The alert engine only ever needs to push a text message or a captioned
/// photo to a destination chat; everything else about the transport
/// (authentication, rate limits) lives behind this trait.
#[async_trait]
pub trait Notify: Send + Sync {
    async fn send_text(&self, chat_id: i64, text: &str) -> BotResult<()>;

    async fn send_photo(&self, chat_id: i64, photo: &Path, caption: &str) -> BotResult<()>;
}
