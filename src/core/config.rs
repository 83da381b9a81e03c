use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Database file path
/// Read from DATABASE_PATH environment variable
/// Default: skillbot.sqlite
pub static DATABASE_PATH: Lazy<String> =
    Lazy::new(|| env::var("DATABASE_PATH").unwrap_or_else(|_| "skillbot.sqlite".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: skillbot.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "skillbot.log".to_string()));

/// Discord webhook URL for manager notifications
/// Read from DISCORD_WEBHOOK_URL environment variable
/// When unset, notifications are logged and dropped
pub static DISCORD_WEBHOOK_URL: Lazy<Option<String>> =
    Lazy::new(|| env::var("DISCORD_WEBHOOK_URL").ok().filter(|s| !s.is_empty()));

/// Mini-app FAQ URL opened from the "show FAQ" button
/// Read from WEBAPP_URL environment variable
pub static WEBAPP_URL: Lazy<String> = Lazy::new(|| {
    env::var("WEBAPP_URL").unwrap_or_else(|_| "https://skill-klan.github.io/new_onboarding/".to_string())
});

/// Directory with test-task files (one PDF per profession)
/// Read from TASK_FILES_DIR environment variable
/// Default: assets/tasks
pub static TASK_FILES_DIR: Lazy<String> =
    Lazy::new(|| env::var("TASK_FILES_DIR").unwrap_or_else(|_| "assets/tasks".to_string()));

/// Admin contact handle shown in reminder messages
/// Read from ADMIN_CONTACT environment variable
pub static ADMIN_CONTACT: Lazy<String> =
    Lazy::new(|| env::var("ADMIN_CONTACT").unwrap_or_else(|_| "@num1221".to_string()));

/// Network configuration
pub mod network {
    use super::Duration;

    /// Timeout for outgoing Telegram API requests
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Test-task delivery configuration
pub mod tasks {
    use super::Duration;

    /// Working days (Mon-Fri) a candidate has to complete the test task
    pub const DEADLINE_WORKING_DAYS: u32 = 9;

    /// Delay before the "ready to submit?" follow-up is sent after the task file
    pub const SUBMIT_PROMPT_DELAY_SECS: u64 = 10;

    pub fn submit_prompt_delay() -> Duration {
        Duration::from_secs(SUBMIT_PROMPT_DELAY_SECS)
    }
}

/// Reminder sweep configuration
pub mod reminders {
    use super::{env, Duration, Lazy};

    /// Interval between sweep runs, in seconds.
    /// Read from REMINDER_CHECK_INTERVAL_SECS; defaults to once a day.
    /// Weekend ticks are skipped inside the sweep itself.
    pub static CHECK_INTERVAL_SECS: Lazy<u64> = Lazy::new(|| {
        env::var("REMINDER_CHECK_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(24 * 60 * 60)
    });

    pub fn check_interval() -> Duration {
        Duration::from_secs(*CHECK_INTERVAL_SECS)
    }
}

/// User-state housekeeping configuration
pub mod state {
    use super::Duration;

    /// Stale non-completed conversations are purged after this many hours
    pub const RETENTION_HOURS: i64 = 24;

    /// In-process state cache TTL
    pub const CACHE_TTL_SECS: u64 = 5 * 60;

    /// Interval between cleanup sweeps
    pub const CLEANUP_INTERVAL_SECS: u64 = 60 * 60;

    pub fn cache_ttl() -> Duration {
        Duration::from_secs(CACHE_TTL_SECS)
    }

    pub fn cleanup_interval() -> Duration {
        Duration::from_secs(CLEANUP_INTERVAL_SECS)
    }
}
