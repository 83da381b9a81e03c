//! Conversation state model: steps, professions, contact records and the
//! per-user state that everything else reads and mutates.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::core::config;
use crate::core::workdays;

/// Steps of the onboarding conversation.
///
/// Strictly forward-moving on the happy path; `restart` resets to
/// `ProfessionSelection` from anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum Step {
    Start,
    ProfessionSelection,
    ContactRequest,
    TaskDelivery,
    Completed,
}

/// Professions a candidate can onboard into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum Profession {
    #[strum(serialize = "QA")]
    #[serde(rename = "QA")]
    Qa,
    #[strum(serialize = "BA")]
    #[serde(rename = "BA")]
    Ba,
}

impl Profession {
    /// Parses the `profession_QA` / `profession_BA` callback payloads.
    pub fn from_callback(data: &str) -> Option<Self> {
        match data {
            "profession_QA" => Some(Self::Qa),
            "profession_BA" => Some(Self::Ba),
            _ => None,
        }
    }

    /// Human-readable profession title for notifications.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Qa => "QA Engineer",
            Self::Ba => "Business Analyst",
        }
    }
}

/// Reminder kinds, keyed by elapsed working days since task delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumString, Serialize, Deserialize)]
pub enum ReminderKind {
    #[strum(serialize = "day_3")]
    Day3,
    #[strum(serialize = "day_7")]
    Day7,
    #[strum(serialize = "day_9")]
    Day9,
}

impl ReminderKind {
    pub const ALL: [ReminderKind; 3] = [ReminderKind::Day3, ReminderKind::Day7, ReminderKind::Day9];

    /// Working days after task delivery at which this reminder becomes due.
    pub fn due_after_working_days(&self) -> u32 {
        match self {
            Self::Day3 => 3,
            Self::Day7 => 7,
            Self::Day9 => 9,
        }
    }
}

/// A candidate's shared contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub phone_number: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ContactRecord {
    pub fn new(phone_number: String, first_name: String, last_name: Option<String>) -> Self {
        Self {
            phone_number,
            first_name,
            last_name,
            created_at: Utc::now(),
        }
    }
}

/// Per-user conversation state.
///
/// Loaded before every handler invocation, mutated in place by the matched
/// flow and persisted after every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserState {
    /// Internal row id, None until first persisted
    pub id: Option<i64>,
    /// Telegram chat/user id, the unique key
    pub telegram_id: i64,
    pub username: Option<String>,
    pub current_step: Step,
    pub selected_profession: Option<Profession>,
    pub contact: Option<ContactRecord>,
    pub task_sent: bool,
    pub task_sent_at: Option<DateTime<Utc>>,
    pub task_deadline: Option<DateTime<Utc>>,
    pub reminders_sent: BTreeSet<ReminderKind>,
    pub last_activity: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl UserState {
    /// Fresh state for a previously unseen telegram id, at step `Start`.
    pub fn new(telegram_id: i64) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            telegram_id,
            username: None,
            current_step: Step::Start,
            selected_profession: None,
            contact: None,
            task_sent: false,
            task_sent_at: None,
            task_deadline: None,
            reminders_sent: BTreeSet::new(),
            last_activity: now,
            created_at: now,
        }
    }

    /// Bumps the activity timestamp; the cleanup sweep keys off it.
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    pub fn update_step(&mut self, step: Step) {
        self.current_step = step;
        self.touch();
    }

    pub fn select_profession(&mut self, profession: Profession) {
        self.selected_profession = Some(profession);
        self.touch();
    }

    pub fn set_contact(&mut self, contact: ContactRecord) {
        self.contact = Some(contact);
        self.touch();
    }

    /// Marks the test task as delivered at `now` and computes the deadline:
    /// exactly 9 working days after delivery, weekends skipped, the
    /// delivery day itself not counted.
    pub fn mark_task_sent(&mut self, now: DateTime<Utc>) {
        self.task_sent = true;
        self.task_sent_at = Some(now);
        self.task_deadline = Some(workdays::deadline_after(now, config::tasks::DEADLINE_WORKING_DAYS));
        self.current_step = Step::Completed;
        self.touch();
    }

    /// Records a reminder as sent. Returns false when it was already
    /// recorded, so a repeated sweep never double-sends.
    pub fn record_reminder(&mut self, kind: ReminderKind) -> bool {
        let inserted = self.reminders_sent.insert(kind);
        if inserted {
            self.touch();
        }
        inserted
    }

    /// Hard reset back to profession selection, clearing everything the
    /// conversation accumulated.
    pub fn reset(&mut self) {
        self.current_step = Step::ProfessionSelection;
        self.selected_profession = None;
        self.contact = None;
        self.task_sent = false;
        self.task_sent_at = None;
        self.task_deadline = None;
        self.reminders_sent.clear();
        self.touch();
    }
}
