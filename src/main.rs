use std::sync::Arc;

use anyhow::Context;
use teloxide::prelude::*;

use skillbot::core::{config, init_logger};
use skillbot::reminders::start_reminder_scheduler;
use skillbot::storage::{create_pool, StateCache, UserStateStore};
use skillbot::tasks::TaskCatalog;
use skillbot::telegram::{
    create_bot, schema, setup_bot_commands, start_notifier, BotDeps, FlowBot,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logger(&config::LOG_FILE_PATH)?;

    std::panic::set_hook(Box::new(|info| {
        log::error!("Panic: {}", info);
    }));

    log::info!("Starting skillbot v{}", env!("CARGO_PKG_VERSION"));

    let pool = create_pool(&config::DATABASE_PATH).context("failed to open database")?;
    let store = Arc::new(UserStateStore::new(
        pool,
        StateCache::new(config::state::cache_ttl()),
    ));
    let tasks = Arc::new(TaskCatalog::new(config::TASK_FILES_DIR.clone()));
    let notify = start_notifier();

    let bot = create_bot()?;
    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    start_reminder_scheduler(bot.clone(), Arc::clone(&store), notify.clone());

    let cleanup_store = Arc::clone(&store);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(config::state::cleanup_interval());
        loop {
            ticker.tick().await;
            cleanup_store.cleanup_stale().await;
        }
    });

    let deps = BotDeps {
        bot: bot.clone(),
        store,
        tasks,
        notify,
    };
    let flow_bot = Arc::new(FlowBot::new(deps));

    log::info!("Starting long polling");
    Dispatcher::builder(bot, schema(flow_bot))
        .dependencies(DependencyMap::new())
        .default_handler(|update| async move {
            log::debug!("Unhandled update kind: {:?}", update.kind);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("Dispatcher error"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    log::info!("Bot stopped");
    Ok(())
}
