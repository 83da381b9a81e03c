pub mod bot;
pub mod deps;
pub mod dispatcher;
pub mod event;
pub mod flows;
pub mod keyboards;
pub mod messages;
pub mod middleware;
pub mod notifications;
pub mod reply;

pub use bot::{create_bot, setup_bot_commands, Command};
pub use deps::{BotDeps, UserInfo};
pub use dispatcher::{schema, FlowBot};
pub use event::Inbound;
pub use notifications::{start_notifier, NotificationSink, NotifyEvent};
