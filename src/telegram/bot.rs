//! Bot construction and the command menu.

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::core::config;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "почати знайомство")]
    Start,
    #[command(description = "почати спочатку")]
    Restart,
    #[command(description = "показати підказку")]
    Help,
}

/// Builds the bot with an HTTP client that has explicit timeouts;
/// the default client hangs far too long on a flaky network.
pub fn create_bot() -> anyhow::Result<Bot> {
    let client = reqwest::Client::builder()
        .timeout(config::network::timeout())
        .connect_timeout(config::network::timeout())
        .build()?;
    Ok(Bot::with_client(config::BOT_TOKEN.clone(), client))
}

/// Registers the command menu shown in the Telegram UI.
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(Command::bot_commands()).await?;
    log::info!("Bot command menu registered");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_parse_from_slash_text() {
        assert_eq!(Command::parse("/start", "skillbot").unwrap(), Command::Start);
        assert_eq!(Command::parse("/restart", "skillbot").unwrap(), Command::Restart);
        assert!(Command::parse("/unknown", "skillbot").is_err());
    }
}
