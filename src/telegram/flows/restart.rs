//! Hard restart of the conversation.

use async_trait::async_trait;
use teloxide::types::ReplyMarkup;

use crate::core::error::FlowError;
use crate::core::types::{Step, UserState};
use crate::telegram::event::Inbound;
use crate::telegram::flows::{Flow, FlowCx};
use crate::telegram::keyboards::{self, CB_RESTART};
use crate::telegram::messages;
use crate::telegram::reply::safe_reply;

/// `/restart` or the restart button: wipes progress (the contact record
/// stays on file) and reopens profession selection.
pub struct RestartFlow;

#[async_trait]
impl Flow for RestartFlow {
    fn name(&self) -> &'static str {
        "restart"
    }

    fn can_handle(&self, ev: &Inbound, _state: &UserState) -> bool {
        ev.text().is_some_and(|t| t.trim() == "/restart")
    }

    fn can_handle_callback(&self, data: &str, _state: &UserState) -> bool {
        data == CB_RESTART
    }

    async fn handle(&self, cx: &mut FlowCx<'_>) -> Result<Option<Step>, FlowError> {
        cx.state.reset();
        log::info!("User {} restarted the conversation", cx.user.telegram_id);

        safe_reply(
            &cx.deps.bot,
            cx.chat_id,
            messages::RESTART,
            Some(ReplyMarkup::InlineKeyboard(keyboards::profession_keyboard())),
        )
        .await;

        Ok(None)
    }
}
