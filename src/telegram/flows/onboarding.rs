//! Entry of the onboarding funnel: /start, profession choice, readiness.

use async_trait::async_trait;
use teloxide::types::ReplyMarkup;

use crate::core::error::FlowError;
use crate::core::types::{ContactRecord, Profession, Step, UserState};
use crate::telegram::event::Inbound;
use crate::telegram::flows::task::deliver_task;
use crate::telegram::flows::{Flow, FlowCx};
use crate::telegram::keyboards::{self, CB_READY_TO_TRY};
use crate::telegram::messages;
use crate::telegram::notifications::NotifyEvent;
use crate::telegram::reply::safe_reply;

/// `/start`: greets the user and opens profession selection.
pub struct StartFlow;

#[async_trait]
impl Flow for StartFlow {
    fn name(&self) -> &'static str {
        "start"
    }

    fn can_handle(&self, ev: &Inbound, _state: &UserState) -> bool {
        ev.text().is_some_and(|t| t.trim() == "/start")
    }

    async fn handle(&self, cx: &mut FlowCx<'_>) -> Result<Option<Step>, FlowError> {
        cx.deps.notify.emit(NotifyEvent::UserStarted {
            telegram_id: cx.user.telegram_id,
            username: cx.user.username.clone(),
        });

        safe_reply(
            &cx.deps.bot,
            cx.chat_id,
            messages::WELCOME,
            Some(ReplyMarkup::InlineKeyboard(keyboards::profession_keyboard())),
        )
        .await;

        Ok(Some(Step::ProfessionSelection))
    }
}

/// `profession_QA` / `profession_BA` callbacks.
pub struct ProfessionFlow;

#[async_trait]
impl Flow for ProfessionFlow {
    fn name(&self) -> &'static str {
        "profession"
    }

    fn can_handle_callback(&self, data: &str, _state: &UserState) -> bool {
        Profession::from_callback(data).is_some()
    }

    // A finished conversation has to be restarted explicitly.
    fn validate_state(&self, state: &UserState) -> bool {
        state.current_step != Step::Completed
    }

    fn invalid_reply(&self) -> &'static str {
        messages::GENERIC_ERROR
    }

    async fn handle(&self, cx: &mut FlowCx<'_>) -> Result<Option<Step>, FlowError> {
        let Some(profession) = cx.ev.callback_data().and_then(Profession::from_callback) else {
            return Err(FlowError::Other("profession callback without a known tag".into()));
        };

        cx.state.select_profession(profession);
        log::info!(
            "User {} selected profession {}",
            cx.user.telegram_id,
            profession
        );

        safe_reply(
            &cx.deps.bot,
            cx.chat_id,
            &messages::profession_chosen(profession),
            Some(ReplyMarkup::InlineKeyboard(keyboards::ready_to_try_keyboard())),
        )
        .await;

        Ok(Some(Step::ProfessionSelection))
    }
}

/// `ready_to_try`: moves on to contact collection, or straight to task
/// delivery when a contact is already on file.
pub struct ReadyToTryFlow;

/// Step the ready-to-try flow transitions to, given the contact lookup.
/// A contact on file skips the contact-request step entirely; the task
/// is delivered in place and no step is returned.
pub fn step_after_ready(contact: Option<&ContactRecord>) -> Option<Step> {
    match contact {
        Some(_) => None,
        None => Some(Step::ContactRequest),
    }
}

#[async_trait]
impl Flow for ReadyToTryFlow {
    fn name(&self) -> &'static str {
        "ready_to_try"
    }

    fn can_handle_callback(&self, data: &str, _state: &UserState) -> bool {
        data == CB_READY_TO_TRY
    }

    fn validate_state(&self, state: &UserState) -> bool {
        state.selected_profession.is_some()
    }

    // Pressing "ready" before choosing a direction must not lose what the
    // user already did; they only get nudged back to the keyboard.
    fn resets_on_invalid(&self) -> bool {
        false
    }

    fn invalid_reply(&self) -> &'static str {
        messages::CHOOSE_PROFESSION
    }

    async fn handle(&self, cx: &mut FlowCx<'_>) -> Result<Option<Step>, FlowError> {
        let contact = cx.deps.store.get_contact(cx.user.telegram_id).await;
        let Some(next) = step_after_ready(contact.as_ref()) else {
            log::info!(
                "User {} already shared a contact, delivering task directly",
                cx.user.telegram_id
            );
            if let Some(contact) = contact {
                cx.state.set_contact(contact);
            }
            deliver_task(cx).await?;
            return Ok(None);
        };

        safe_reply(
            &cx.deps.bot,
            cx.chat_id,
            messages::CONTACT_REQUEST,
            Some(ReplyMarkup::Keyboard(keyboards::contact_keyboard())),
        )
        .await;

        Ok(Some(next))
    }
}
