//! Pre-dispatch middleware chain.
//!
//! Every update passes through the chain before any flow runs. Middleware
//! fails open: an error inside a stage is logged and the update continues,
//! except when the user identity cannot be resolved at all.

use async_trait::async_trait;

use crate::core::types::UserState;
use crate::telegram::deps::{BotDeps, UserInfo};
use crate::telegram::event::Inbound;

#[derive(Debug, PartialEq, Eq)]
pub enum Verdict {
    Continue,
    Halt,
}

/// Mutable per-update context filled in by the chain.
#[derive(Default)]
pub struct RequestCx {
    pub user: Option<UserInfo>,
    pub state: Option<UserState>,
}

#[async_trait]
pub trait Middleware: Send + Sync {
    fn name(&self) -> &'static str;

    async fn process(&self, deps: &BotDeps, ev: &Inbound, cx: &mut RequestCx) -> Verdict;
}

/// Logs each incoming update.
pub struct LoggingMiddleware;

#[async_trait]
impl Middleware for LoggingMiddleware {
    fn name(&self) -> &'static str {
        "logging"
    }

    async fn process(&self, _deps: &BotDeps, ev: &Inbound, _cx: &mut RequestCx) -> Verdict {
        let user_id = ev.from_user().map(|u| u.id.0);
        match ev {
            Inbound::Message(_) => {
                log::debug!("Message from user {:?}: {:?}", user_id, ev.text())
            }
            Inbound::Callback(_) => {
                log::debug!("Callback from user {:?}: {:?}", user_id, ev.callback_data())
            }
        }
        Verdict::Continue
    }
}

/// Resolves the sender. Updates without an identifiable user are the one
/// case the chain refuses to pass on.
pub struct EnsureUserMiddleware;

#[async_trait]
impl Middleware for EnsureUserMiddleware {
    fn name(&self) -> &'static str {
        "ensure_user"
    }

    async fn process(&self, _deps: &BotDeps, ev: &Inbound, cx: &mut RequestCx) -> Verdict {
        match ev.from_user() {
            Some(user) => {
                cx.user = Some(UserInfo::from_telegram(user));
                Verdict::Continue
            }
            None => {
                log::warn!("Update without a resolvable user, dropping");
                Verdict::Halt
            }
        }
    }
}

/// Loads the conversation state for the resolved user.
pub struct StateMiddleware;

#[async_trait]
impl Middleware for StateMiddleware {
    fn name(&self) -> &'static str {
        "state"
    }

    async fn process(&self, deps: &BotDeps, _ev: &Inbound, cx: &mut RequestCx) -> Verdict {
        if let Some(user) = &cx.user {
            let state = deps
                .store
                .get(user.telegram_id, user.username.as_deref())
                .await;
            cx.state = Some(state);
        }
        Verdict::Continue
    }
}

/// Runs the chain in order; the first `Halt` wins.
pub async fn run_chain(
    chain: &[Box<dyn Middleware>],
    deps: &BotDeps,
    ev: &Inbound,
    cx: &mut RequestCx,
) -> Verdict {
    for stage in chain {
        if stage.process(deps, ev, cx).await == Verdict::Halt {
            log::debug!("Middleware {:?} halted the update", stage.name());
            return Verdict::Halt;
        }
    }
    Verdict::Continue
}
