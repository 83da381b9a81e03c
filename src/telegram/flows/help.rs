//! Help text and the FAQ mini-app link.

use async_trait::async_trait;
use teloxide::types::ReplyMarkup;

use crate::core::config;
use crate::core::error::FlowError;
use crate::core::types::{Step, UserState};
use crate::telegram::event::Inbound;
use crate::telegram::flows::{Flow, FlowCx};
use crate::telegram::keyboards::{self, CB_SHOW_FAQ};
use crate::telegram::messages;
use crate::telegram::reply::safe_reply;

pub struct HelpFlow;

#[async_trait]
impl Flow for HelpFlow {
    fn name(&self) -> &'static str {
        "help"
    }

    fn can_handle(&self, ev: &Inbound, _state: &UserState) -> bool {
        ev.text().is_some_and(|t| t.trim() == "/help")
    }

    async fn handle(&self, cx: &mut FlowCx<'_>) -> Result<Option<Step>, FlowError> {
        safe_reply(&cx.deps.bot, cx.chat_id, messages::HELP, None).await;
        Ok(None)
    }
}

pub struct FaqFlow;

#[async_trait]
impl Flow for FaqFlow {
    fn name(&self) -> &'static str {
        "faq"
    }

    fn can_handle_callback(&self, data: &str, _state: &UserState) -> bool {
        data == CB_SHOW_FAQ
    }

    async fn handle(&self, cx: &mut FlowCx<'_>) -> Result<Option<Step>, FlowError> {
        match keyboards::faq_keyboard() {
            Some(kb) => {
                safe_reply(
                    &cx.deps.bot,
                    cx.chat_id,
                    messages::FAQ_INTRO,
                    Some(ReplyMarkup::InlineKeyboard(kb)),
                )
                .await;
            }
            None => {
                let text = format!("{}\n{}", messages::FAQ_INTRO, *config::WEBAPP_URL);
                safe_reply(&cx.deps.bot, cx.chat_id, &text, None).await;
            }
        }
        Ok(None)
    }
}
