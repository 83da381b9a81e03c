//! Test-task delivery and submission.

use async_trait::async_trait;
use chrono::Utc;
use teloxide::prelude::*;
use teloxide::types::{InputFile, ReplyMarkup};

use crate::core::config;
use crate::core::error::FlowError;
use crate::core::types::{Step, UserState};
use crate::core::workdays;
use crate::telegram::flows::{Flow, FlowCx};
use crate::telegram::keyboards::{self, CB_SUBMIT_TASK};
use crate::telegram::messages;
use crate::telegram::notifications::NotifyEvent;
use crate::telegram::reply::safe_reply;

/// Sends the PDF with its caption and closes the delivery step.
///
/// Shared by the ready-to-try and contact flows. A missing file keeps the
/// step where it is so the user can retry once the file is restored.
pub(super) async fn deliver_task(cx: &mut FlowCx<'_>) -> Result<(), FlowError> {
    let Some(profession) = cx.state.selected_profession else {
        log::error!(
            "Task delivery requested for user {} without a profession",
            cx.user.telegram_id
        );
        safe_reply(&cx.deps.bot, cx.chat_id, messages::GENERIC_ERROR, None).await;
        return Ok(());
    };

    let path = cx.deps.tasks.file_path_for(profession);
    if !cx.deps.tasks.file_exists(profession) {
        log::error!("Task file missing: {}", path.display());
        safe_reply(&cx.deps.bot, cx.chat_id, messages::TASK_FILE_MISSING, None).await;
        return Ok(());
    }

    cx.state.update_step(Step::TaskDelivery);

    let now = Utc::now();
    let deadline = workdays::deadline_after(now, config::tasks::DEADLINE_WORKING_DAYS);
    let caption = messages::task_caption(profession, deadline);

    cx.deps
        .bot
        .send_document(cx.chat_id, InputFile::file(path))
        .caption(caption)
        .await?;

    cx.state.mark_task_sent(now);
    log::info!(
        "Delivered {} task to user {}, deadline {}",
        profession,
        cx.user.telegram_id,
        messages::format_deadline(deadline)
    );

    cx.deps.notify.emit(NotifyEvent::TaskSent {
        telegram_id: cx.user.telegram_id,
        username: cx.user.username.clone(),
        profession,
        deadline: messages::format_deadline(deadline),
    });

    // Follow-up hint a moment later, outside the request lifetime. Not
    // durable: a restart in that window simply skips it.
    let bot = cx.deps.bot.clone();
    let chat_id = cx.chat_id;
    tokio::spawn(async move {
        tokio::time::sleep(config::tasks::submit_prompt_delay()).await;
        safe_reply(
            &bot,
            chat_id,
            messages::SUBMIT_PROMPT,
            Some(ReplyMarkup::InlineKeyboard(keyboards::submit_task_keyboard())),
        )
        .await;
    });

    Ok(())
}

/// `submit_task`: the user says the task is done; a manager takes over.
pub struct SubmitTaskFlow;

#[async_trait]
impl Flow for SubmitTaskFlow {
    fn name(&self) -> &'static str {
        "submit_task"
    }

    fn can_handle_callback(&self, data: &str, _state: &UserState) -> bool {
        data == CB_SUBMIT_TASK
    }

    fn validate_state(&self, state: &UserState) -> bool {
        state.task_sent
    }

    async fn handle(&self, cx: &mut FlowCx<'_>) -> Result<Option<Step>, FlowError> {
        cx.deps.notify.emit(NotifyEvent::TaskSubmitted {
            telegram_id: cx.user.telegram_id,
            username: cx.user.username.clone(),
            profession: cx.state.selected_profession,
        });
        log::info!("User {} submitted the test task", cx.user.telegram_id);

        safe_reply(
            &cx.deps.bot,
            cx.chat_id,
            &messages::submission_received(&cx.user.first_name),
            Some(ReplyMarkup::InlineKeyboard(keyboards::main_menu_keyboard())),
        )
        .await;

        Ok(Some(Step::Completed))
    }
}
