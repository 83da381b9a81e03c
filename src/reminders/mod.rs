//! Deadline reminders for delivered test tasks.
//!
//! A daily sweep walks every user with a delivered task and sends the
//! day-3 / day-7 / day-9 nudges. Each kind goes out once: the state is
//! marked and saved right after a successful send, so rerunning the sweep
//! the same day is a no-op. The sweep itself only runs on working days.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use teloxide::prelude::*;

use crate::core::config;
use crate::core::types::{ReminderKind, UserState};
use crate::core::workdays;
use crate::storage::UserStateStore;
use crate::telegram::messages;
use crate::telegram::notifications::{NotificationSink, NotifyEvent};

/// Reminder kinds due for this state at `now` and not yet sent.
pub fn due_reminders(state: &UserState, now: DateTime<Utc>) -> Vec<ReminderKind> {
    let Some(sent_at) = state.task_sent_at else {
        return Vec::new();
    };
    if !state.task_sent {
        return Vec::new();
    }

    let elapsed = workdays::working_days_between(sent_at, now);
    ReminderKind::ALL
        .iter()
        .copied()
        .filter(|kind| elapsed >= kind.due_after_working_days())
        .filter(|kind| !state.reminders_sent.contains(kind))
        .collect()
}

fn display_name(state: &UserState) -> &str {
    state
        .contact
        .as_ref()
        .map(|c| c.first_name.as_str())
        .or(state.username.as_deref())
        .unwrap_or("друже")
}

fn reminder_text(kind: ReminderKind, name: &str) -> String {
    match kind {
        ReminderKind::Day3 => messages::reminder_day3(name),
        ReminderKind::Day7 => messages::reminder_day7(name),
        ReminderKind::Day9 => messages::reminder_day9(name),
    }
}

/// One pass over all users with a delivered task.
pub async fn run_sweep(
    bot: &Bot,
    store: &UserStateStore,
    notify: &NotificationSink,
    now: DateTime<Utc>,
) {
    if !workdays::is_working_day(now) {
        log::debug!("Skipping reminder sweep on a weekend");
        return;
    }

    let states = store.states_with_tasks().await;
    log::info!("Reminder sweep over {} user(s)", states.len());

    for mut state in states {
        for kind in due_reminders(&state, now) {
            let chat_id = ChatId(state.telegram_id);
            let text = reminder_text(kind, display_name(&state));

            if let Err(e) = bot.send_message(chat_id, text).await {
                log::warn!(
                    "Failed to send {} reminder to user {}: {}",
                    kind,
                    state.telegram_id,
                    e
                );
                continue;
            }

            // Mark before moving on so a rerun never double-sends.
            state.record_reminder(kind);
            store.save(state.clone()).await;
            log::info!("Sent {} reminder to user {}", kind, state.telegram_id);

            match kind {
                ReminderKind::Day7 => notify.emit(NotifyEvent::DeadlineWarning {
                    telegram_id: state.telegram_id,
                    username: state.username.clone(),
                    days_left: 2,
                }),
                ReminderKind::Day9 => notify.emit(NotifyEvent::DeadlineToday {
                    telegram_id: state.telegram_id,
                    username: state.username.clone(),
                }),
                ReminderKind::Day3 => {}
            }
        }
    }
}

/// Spawns the periodic sweep task.
pub fn start_reminder_scheduler(bot: Bot, store: Arc<UserStateStore>, notify: NotificationSink) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(config::reminders::check_interval());
        // The first tick fires immediately; catching up right after a
        // restart is exactly what we want.
        loop {
            ticker.tick().await;
            run_sweep(&bot, &store, &notify, Utc::now()).await;
        }
    });
    log::info!("Reminder scheduler started");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn delivered_state(sent_at: DateTime<Utc>) -> UserState {
        let mut state = UserState::new(1);
        state.mark_task_sent(sent_at);
        state
    }

    #[test]
    fn nothing_due_before_three_working_days() {
        let sent = Utc.with_ymd_and_hms(2024, 6, 3, 10, 0, 0).unwrap(); // Monday
        let state = delivered_state(sent);
        let now = Utc.with_ymd_and_hms(2024, 6, 5, 10, 0, 0).unwrap(); // Wednesday, 2 days
        assert!(due_reminders(&state, now).is_empty());
    }

    #[test]
    fn day3_due_after_three_working_days() {
        let sent = Utc.with_ymd_and_hms(2024, 6, 3, 10, 0, 0).unwrap(); // Monday
        let state = delivered_state(sent);
        let now = Utc.with_ymd_and_hms(2024, 6, 6, 10, 0, 0).unwrap(); // Thursday
        assert_eq!(due_reminders(&state, now), vec![ReminderKind::Day3]);
    }

    #[test]
    fn weekend_days_do_not_count_towards_elapsed() {
        let sent = Utc.with_ymd_and_hms(2024, 6, 6, 10, 0, 0).unwrap(); // Thursday
        let state = delivered_state(sent);
        // Monday: Fri + Mon = 2 working days, the weekend in between is free.
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 10, 0, 0).unwrap();
        assert!(due_reminders(&state, now).is_empty());
    }

    #[test]
    fn sent_kinds_are_never_due_again() {
        let sent = Utc.with_ymd_and_hms(2024, 6, 3, 10, 0, 0).unwrap();
        let mut state = delivered_state(sent);
        let now = Utc.with_ymd_and_hms(2024, 6, 6, 10, 0, 0).unwrap();

        assert_eq!(due_reminders(&state, now), vec![ReminderKind::Day3]);
        state.record_reminder(ReminderKind::Day3);
        assert!(due_reminders(&state, now).is_empty());
    }

    #[test]
    fn all_kinds_come_due_in_order() {
        let sent = Utc.with_ymd_and_hms(2024, 6, 3, 10, 0, 0).unwrap(); // Monday
        let state = delivered_state(sent);
        // 9 working days later (Friday next week): everything is due.
        let now = Utc.with_ymd_and_hms(2024, 6, 14, 10, 0, 0).unwrap();
        assert_eq!(
            due_reminders(&state, now),
            vec![ReminderKind::Day3, ReminderKind::Day7, ReminderKind::Day9]
        );
    }

    #[test]
    fn undelivered_tasks_are_ignored() {
        let state = UserState::new(1);
        assert!(due_reminders(&state, Utc::now()).is_empty());
    }
}
