//! Uniform view over incoming updates.
//!
//! Flows and middleware only care about a handful of fields; wrapping the
//! two update kinds keeps their signatures down to one argument.

use teloxide::types::{CallbackQuery, Contact, Message, User};

#[derive(Clone)]
pub enum Inbound {
    Message(Message),
    Callback(CallbackQuery),
}

impl Inbound {
    pub fn chat_id(&self) -> Option<teloxide::types::ChatId> {
        match self {
            Inbound::Message(msg) => Some(msg.chat.id),
            Inbound::Callback(q) => q.message.as_ref().map(|m| m.chat().id),
        }
    }

    pub fn from_user(&self) -> Option<&User> {
        match self {
            Inbound::Message(msg) => msg.from.as_ref(),
            Inbound::Callback(q) => Some(&q.from),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Inbound::Message(msg) => msg.text(),
            Inbound::Callback(_) => None,
        }
    }

    pub fn contact(&self) -> Option<&Contact> {
        match self {
            Inbound::Message(msg) => msg.contact(),
            Inbound::Callback(_) => None,
        }
    }

    pub fn callback_data(&self) -> Option<&str> {
        match self {
            Inbound::Message(_) => None,
            Inbound::Callback(q) => q.data.as_deref(),
        }
    }
}
