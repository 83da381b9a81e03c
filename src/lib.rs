//! Onboarding bot for the SkillKlan school.
//!
//! Walks a candidate from /start to a submitted test task: profession
//! selection (QA or BA), contact collection, PDF delivery with a
//! 9-working-day deadline, and scheduled deadline reminders. State lives
//! in SQLite behind a small TTL cache; the team is notified about
//! milestones through a Discord webhook.

pub mod core;
pub mod reminders;
pub mod storage;
pub mod tasks;
pub mod telegram;
