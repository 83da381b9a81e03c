//! Reminder due-ness and idempotence across persistence.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

use skillbot::core::types::{ReminderKind, Step, UserState};
use skillbot::core::workdays;
use skillbot::reminders::due_reminders;
use skillbot::storage::{create_pool, StateCache, UserStateStore};

fn store() -> (UserStateStore, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let pool = create_pool(dir.path().join("bot.sqlite").to_str().unwrap()).unwrap();
    let store = UserStateStore::new(pool, StateCache::new(std::time::Duration::from_secs(60)));
    (store, dir)
}

#[tokio::test]
async fn recorded_reminders_survive_a_reload_and_stay_sent() {
    let (store, _dir) = store();

    let sent_at = Utc.with_ymd_and_hms(2024, 6, 3, 10, 0, 0).unwrap(); // Monday
    let now = Utc.with_ymd_and_hms(2024, 6, 6, 10, 0, 0).unwrap(); // Thursday, 3 working days

    let mut state = UserState::new(42);
    state.mark_task_sent(sent_at);
    state = store.save(state).await.unwrap();

    assert_eq!(due_reminders(&state, now), vec![ReminderKind::Day3]);

    // The sweep marks and saves right after sending.
    state.record_reminder(ReminderKind::Day3);
    store.save(state).await.unwrap();

    // A second sweep the same day, even after a cold reload, sends nothing.
    let reloaded = store.get(42, None).await;
    assert!(reloaded.reminders_sent.contains(&ReminderKind::Day3));
    assert!(due_reminders(&reloaded, now).is_empty());
}

#[tokio::test]
async fn sweep_input_excludes_users_without_tasks() {
    let (store, _dir) = store();

    let mut idle = store.get(1, None).await;
    idle.update_step(Step::ProfessionSelection);
    store.save(idle).await.unwrap();

    let mut delivered = store.get(2, None).await;
    delivered.mark_task_sent(Utc::now());
    store.save(delivered).await.unwrap();

    let candidates = store.states_with_tasks().await;
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].telegram_id, 2);
}

/// A task sent on Friday is due the Thursday 13 calendar days later:
/// 9 working days with both weekends skipped and Friday itself free.
#[test]
fn friday_delivery_deadline_lands_after_two_weekends() {
    let friday = Utc.with_ymd_and_hms(2024, 6, 7, 15, 0, 0).unwrap();
    let deadline = workdays::deadline_after(friday, 9);
    assert_eq!(deadline.date_naive(), Utc.with_ymd_and_hms(2024, 6, 20, 15, 0, 0).unwrap().date_naive());

    let mut state = UserState::new(1);
    state.mark_task_sent(friday);
    assert_eq!(state.task_deadline.map(|d| d.date_naive()), Some(deadline.date_naive()));

    // On the deadline day all three reminders have come due at some point.
    let all = due_reminders(&state, deadline);
    assert_eq!(all, vec![ReminderKind::Day3, ReminderKind::Day7, ReminderKind::Day9]);
}
