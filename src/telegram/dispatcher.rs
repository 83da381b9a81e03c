//! Update dispatch: middleware chain, then first-match-wins over flows.

use std::sync::Arc;

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::dptree;
use teloxide::prelude::*;
use teloxide::types::ReplyMarkup;

use crate::core::error::FlowError;
use crate::core::types::UserState;
use crate::telegram::deps::BotDeps;
use crate::telegram::event::Inbound;
use crate::telegram::flows::{default_flows, Flow, FlowCx};
use crate::telegram::keyboards;
use crate::telegram::messages;
use crate::telegram::middleware::{
    run_chain, EnsureUserMiddleware, LoggingMiddleware, Middleware, RequestCx, StateMiddleware,
    Verdict,
};
use crate::telegram::reply::safe_reply;

pub struct FlowBot {
    deps: BotDeps,
    middleware: Vec<Box<dyn Middleware>>,
    flows: Vec<Box<dyn Flow>>,
}

impl FlowBot {
    pub fn new(deps: BotDeps) -> Self {
        Self {
            deps,
            middleware: vec![
                Box::new(LoggingMiddleware),
                Box::new(EnsureUserMiddleware),
                Box::new(StateMiddleware),
            ],
            flows: default_flows(),
        }
    }

    /// Entry point for every update. Never returns an error: everything a
    /// flow can fail with is absorbed here so one bad update cannot take
    /// down the polling loop.
    pub async fn dispatch(&self, ev: Inbound) {
        let mut cx = RequestCx::default();
        if run_chain(&self.middleware, &self.deps, &ev, &mut cx).await == Verdict::Halt {
            return;
        }

        // Stop the button spinner before any slow work.
        if let Inbound::Callback(q) = &ev {
            if let Err(e) = self.deps.bot.answer_callback_query(q.id.clone()).await {
                log::warn!("Failed to answer callback query: {}", e);
            }
        }

        let Some(user) = cx.user else {
            return;
        };
        let Some(chat_id) = ev.chat_id() else {
            log::warn!("Update from user {} without a chat, dropping", user.telegram_id);
            return;
        };
        let mut state = cx
            .state
            .take()
            .unwrap_or_else(|| UserState::new(user.telegram_id));

        let matched = self.flows.iter().find(|flow| match ev.callback_data() {
            Some(data) => flow.can_handle_callback(data, &state),
            None => flow.can_handle(&ev, &state),
        });

        let Some(flow) = matched else {
            self.handle_unknown(&ev, chat_id).await;
            return;
        };
        log::debug!("Flow {:?} claimed update from user {}", flow.name(), user.telegram_id);

        if !flow.validate_state(&state) {
            log::warn!(
                "Flow {:?} rejected state {} for user {}",
                flow.name(),
                state.current_step,
                user.telegram_id
            );
            safe_reply(&self.deps.bot, chat_id, flow.invalid_reply(), None).await;
            if flow.resets_on_invalid() {
                let mut fresh = UserState::new(user.telegram_id);
                fresh.username = user.username.clone();
                self.deps.store.save(fresh).await;
            }
            return;
        }

        let mut flow_cx = FlowCx {
            deps: &self.deps,
            ev: &ev,
            user: &user,
            chat_id,
            state: &mut state,
        };

        match flow.handle(&mut flow_cx).await {
            Ok(next_step) => {
                if let Some(step) = next_step {
                    if state.current_step != step {
                        state.update_step(step);
                    }
                }
                state.touch();
                self.deps.store.save(state).await;
            }
            Err(e) => {
                // Step unchanged: the user can retry from where they were.
                log::error!(
                    "Flow {:?} failed for user {}: {}",
                    flow.name(),
                    user.telegram_id,
                    e
                );
                safe_reply(&self.deps.bot, chat_id, messages::GENERIC_ERROR, None).await;
            }
        }
    }

    /// No flow claimed the update. Greetings get a friendly pointer at
    /// /start, anything else the generic fallback. The step never moves.
    async fn handle_unknown(&self, ev: &Inbound, chat_id: ChatId) {
        let text = ev.text().unwrap_or_default().trim().to_lowercase();
        if is_greeting(&text) {
            safe_reply(&self.deps.bot, chat_id, messages::GREETING, None).await;
            return;
        }
        safe_reply(
            &self.deps.bot,
            chat_id,
            messages::UNKNOWN,
            Some(ReplyMarkup::InlineKeyboard(keyboards::main_menu_keyboard())),
        )
        .await;
    }
}

fn is_greeting(text: &str) -> bool {
    const GREETINGS: &[&str] = &[
        "привіт",
        "вітаю",
        "добрий день",
        "доброго дня",
        "hello",
        "hi",
        "hey",
    ];
    GREETINGS.contains(&text)
}

/// dptree schema routing messages and callbacks into the dispatcher.
///
/// The same schema serves production and integration tests.
pub fn schema(flow_bot: Arc<FlowBot>) -> UpdateHandler<FlowError> {
    let for_messages = Arc::clone(&flow_bot);
    let for_callbacks = flow_bot;

    dptree::entry()
        .branch(Update::filter_message().endpoint(move |msg: Message| {
            let flow_bot = Arc::clone(&for_messages);
            async move {
                flow_bot.dispatch(Inbound::Message(msg)).await;
                Ok(())
            }
        }))
        .branch(Update::filter_callback_query().endpoint(move |q: CallbackQuery| {
            let flow_bot = Arc::clone(&for_callbacks);
            async move {
                flow_bot.dispatch(Inbound::Callback(q)).await;
                Ok(())
            }
        }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greetings_match_case_insensitive_input() {
        assert!(is_greeting("привіт"));
        assert!(is_greeting("hello"));
        assert!(!is_greeting("прощавай"));
    }
}
