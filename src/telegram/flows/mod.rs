//! Conversation flows.
//!
//! Each flow owns one trigger (a command, a callback tag, or a message
//! shape). The dispatcher walks an ordered list and hands the update to
//! the first flow that claims it, so earlier flows shadow later ones.

mod contact;
mod help;
mod onboarding;
mod restart;
mod task;

pub use contact::{ContactPromptFlow, ContactShareFlow};
pub use help::{FaqFlow, HelpFlow};
pub use onboarding::{step_after_ready, ProfessionFlow, ReadyToTryFlow, StartFlow};
pub use restart::RestartFlow;
pub use task::SubmitTaskFlow;

use async_trait::async_trait;
use teloxide::types::ChatId;

use crate::core::error::FlowError;
use crate::core::types::{Step, UserState};
use crate::telegram::deps::{BotDeps, UserInfo};
use crate::telegram::event::Inbound;
use crate::telegram::messages;

/// Per-update context a flow works in. The state is the flow's to mutate;
/// the dispatcher persists it after a successful `handle`.
pub struct FlowCx<'a> {
    pub deps: &'a BotDeps,
    pub ev: &'a Inbound,
    pub user: &'a UserInfo,
    pub chat_id: ChatId,
    pub state: &'a mut UserState,
}

#[async_trait]
pub trait Flow: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this flow claims a plain message.
    fn can_handle(&self, _ev: &Inbound, _state: &UserState) -> bool {
        false
    }

    /// Whether this flow claims a callback with the given data tag.
    fn can_handle_callback(&self, _data: &str, _state: &UserState) -> bool {
        false
    }

    /// Checked by the dispatcher before `handle` runs.
    fn validate_state(&self, _state: &UserState) -> bool {
        true
    }

    /// Whether a failed `validate_state` resets the conversation.
    fn resets_on_invalid(&self) -> bool {
        true
    }

    /// Reply sent when `validate_state` fails.
    fn invalid_reply(&self) -> &'static str {
        messages::GENERIC_ERROR
    }

    /// Runs the flow. A returned step is applied on top of whatever the
    /// flow already changed on `cx.state`.
    async fn handle(&self, cx: &mut FlowCx<'_>) -> Result<Option<Step>, FlowError>;
}

/// All flows in dispatch priority order.
pub fn default_flows() -> Vec<Box<dyn Flow>> {
    vec![
        Box::new(StartFlow),
        Box::new(RestartFlow),
        Box::new(HelpFlow),
        Box::new(FaqFlow),
        Box::new(ProfessionFlow),
        Box::new(ReadyToTryFlow),
        Box::new(ContactShareFlow),
        Box::new(ContactPromptFlow),
        Box::new(SubmitTaskFlow),
    ]
}
