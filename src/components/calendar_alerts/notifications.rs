use super::models::Occurrence;
use crate::error::BotResult;
use crate::notifier::Notify;
use chrono_tz::Tz;
use std::path::Path;
use tracing::warn;

/// Render the alert message for a due occurrence.
///
/// The start time is formatted in the reference zone, which is what the
/// people reading the chat live in.
pub fn render_alert(occurrence: &Occurrence<'_>, attendees: &[String], tz: Tz) -> String {
    let start_local = occurrence.start.with_timezone(&tz);
    format!(
        "📅 Meeting starting soon!\n\
         📝 Title: <b>{}</b>\n\
         ⏰ Starts at: {}\n\
         👥 Attendees: {}",
        occurrence.definition.title,
        start_local.format("%H:%M"),
        attendees.join(", ")
    )
}

/// Deliver one alert, attaching the configured photo when the file exists
/// and falling back to a plain text message if the photo send fails.
pub async fn send_meeting_alert(
    notifier: &dyn Notify,
    chat_id: i64,
    text: &str,
    photo_path: &str,
) -> BotResult<()> {
    let path = Path::new(photo_path);
    if path.is_file() {
        match notifier.send_photo(chat_id, path, text).await {
            Ok(()) => return Ok(()),
            Err(e) => {
                warn!("Photo alert failed ({}), falling back to text", e);
            }
        }
    }
    notifier.send_text(chat_id, text).await
}
