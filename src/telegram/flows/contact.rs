//! Contact collection step.

use async_trait::async_trait;
use chrono::Utc;

use crate::core::error::FlowError;
use crate::core::types::{ContactRecord, Step, UserState};
use crate::core::validation::{normalize_phone, validate_contact};
use crate::telegram::event::Inbound;
use crate::telegram::flows::task::deliver_task;
use crate::telegram::flows::{Flow, FlowCx};
use crate::telegram::keyboards;
use crate::telegram::messages;
use crate::telegram::notifications::NotifyEvent;
use crate::telegram::reply::safe_reply;

/// A message carrying a shared contact while the bot is waiting for one.
pub struct ContactShareFlow;

#[async_trait]
impl Flow for ContactShareFlow {
    fn name(&self) -> &'static str {
        "contact_share"
    }

    fn can_handle(&self, ev: &Inbound, _state: &UserState) -> bool {
        ev.contact().is_some()
    }

    fn validate_state(&self, state: &UserState) -> bool {
        state.current_step == Step::ContactRequest && state.selected_profession.is_some()
    }

    async fn handle(&self, cx: &mut FlowCx<'_>) -> Result<Option<Step>, FlowError> {
        let Some(contact) = cx.ev.contact() else {
            return Err(FlowError::Other("contact flow ran without a contact payload".into()));
        };

        let first_name = contact.first_name.clone();
        if let Err(e) = validate_contact(&contact.phone_number, &first_name) {
            log::warn!(
                "Rejected contact from user {}: {}",
                cx.user.telegram_id,
                e
            );
            let text = format!("{}\n\n{}", e, messages::CONTACT_REPEAT);
            safe_reply(&cx.deps.bot, cx.chat_id, &text, None).await;
            return Ok(None);
        }

        let record = ContactRecord {
            phone_number: normalize_phone(&contact.phone_number),
            first_name: first_name.clone(),
            last_name: contact.last_name.clone(),
            created_at: Utc::now(),
        };

        cx.deps
            .store
            .save_contact(cx.user.telegram_id, &record)
            .await?;
        cx.state.set_contact(record.clone());

        cx.deps.notify.emit(NotifyEvent::ContactProvided {
            telegram_id: cx.user.telegram_id,
            username: cx.user.username.clone(),
            first_name: first_name.clone(),
            phone_number: record.phone_number.clone(),
        });

        safe_reply(
            &cx.deps.bot,
            cx.chat_id,
            &messages::contact_saved(&first_name),
            Some(keyboards::remove_keyboard()),
        )
        .await;

        deliver_task(cx).await?;
        Ok(None)
    }
}

/// Plain text while the bot is waiting for a contact: nudge towards the
/// share button instead of guessing at typed phone numbers.
pub struct ContactPromptFlow;

#[async_trait]
impl Flow for ContactPromptFlow {
    fn name(&self) -> &'static str {
        "contact_prompt"
    }

    fn can_handle(&self, ev: &Inbound, state: &UserState) -> bool {
        ev.text().is_some() && state.current_step == Step::ContactRequest
    }

    async fn handle(&self, cx: &mut FlowCx<'_>) -> Result<Option<Step>, FlowError> {
        safe_reply(
            &cx.deps.bot,
            cx.chat_id,
            messages::CONTACT_REPEAT,
            Some(teloxide::types::ReplyMarkup::Keyboard(keyboards::contact_keyboard())),
        )
        .await;
        Ok(None)
    }
}
