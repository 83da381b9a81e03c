//! Inline and reply keyboards used across the conversation.

use teloxide::types::{
    ButtonRequest, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup,
    KeyboardRemove, ReplyMarkup, WebAppInfo,
};
use url::Url;

use crate::core::config;

pub const CB_PROFESSION_QA: &str = "profession_QA";
pub const CB_PROFESSION_BA: &str = "profession_BA";
pub const CB_READY_TO_TRY: &str = "ready_to_try";
pub const CB_SUBMIT_TASK: &str = "submit_task";
pub const CB_RESTART: &str = "restart";
pub const CB_SHOW_FAQ: &str = "show_faq";

pub fn profession_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("QA інженер 🔍", CB_PROFESSION_QA),
        InlineKeyboardButton::callback("Бізнес-аналітик 📊", CB_PROFESSION_BA),
    ]])
}

pub fn ready_to_try_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "Готовий спробувати ✅",
        CB_READY_TO_TRY,
    )]])
}

/// Reply keyboard with the native contact-sharing button.
pub fn contact_keyboard() -> KeyboardMarkup {
    let share = KeyboardButton::new("Поділитися контактом 📱").request(ButtonRequest::Contact);
    KeyboardMarkup::new(vec![vec![share]]).resize_keyboard()
}

pub fn submit_task_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "Здати завдання 📤",
        CB_SUBMIT_TASK,
    )]])
}

pub fn main_menu_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("Почати спочатку 🔄", CB_RESTART),
        InlineKeyboardButton::callback("FAQ 📖", CB_SHOW_FAQ),
    ]])
}

pub fn remove_keyboard() -> ReplyMarkup {
    ReplyMarkup::KeyboardRemove(KeyboardRemove::new())
}

/// FAQ mini-app button. `None` when the configured URL does not parse;
/// the caller then falls back to sending the URL as text.
pub fn faq_keyboard() -> Option<InlineKeyboardMarkup> {
    match Url::parse(&config::WEBAPP_URL) {
        Ok(url) => Some(InlineKeyboardMarkup::new(vec![vec![
            InlineKeyboardButton::web_app("Відкрити FAQ 📖", WebAppInfo { url }),
        ]])),
        Err(e) => {
            log::warn!("Invalid WEBAPP_URL {:?}: {}", *config::WEBAPP_URL, e);
            None
        }
    }
}
