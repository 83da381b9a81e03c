//! Sending helpers shared by flows and the dispatcher.

use teloxide::prelude::*;
use teloxide::types::ReplyMarkup;

/// Sends a text reply, retrying once without the keyboard.
///
/// A malformed keyboard must not silence the bot entirely; the retry
/// delivers at least the text. A second failure is logged and swallowed.
pub async fn safe_reply(bot: &Bot, chat_id: ChatId, text: &str, markup: Option<ReplyMarkup>) {
    let request = match markup.clone() {
        Some(kb) => bot.send_message(chat_id, text).reply_markup(kb),
        None => bot.send_message(chat_id, text),
    };

    let first = request.await;
    let Err(e) = first else { return };

    if markup.is_none() {
        log::error!("Failed to send message to chat {}: {}", chat_id, e);
        return;
    }

    log::warn!(
        "Failed to send message with keyboard to chat {}: {}, retrying without it",
        chat_id,
        e
    );
    if let Err(e) = bot.send_message(chat_id, text).await {
        log::error!("Retry without keyboard also failed for chat {}: {}", chat_id, e);
    }
}
