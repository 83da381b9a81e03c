//! SQLite persistence for conversation states and contacts.
//!
//! All access goes through free functions over a pooled connection. Schema
//! migration is additive: missing columns are added with ALTER TABLE so an
//! existing database survives upgrades.

use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension, Result};

use crate::core::types::{ContactRecord, Profession, ReminderKind, Step, UserState};

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Create a new database connection pool
///
/// Initializes a connection pool with up to 10 connections and runs schema
/// migrations on the first connection.
///
/// # Arguments
///
/// * `database_path` - Path to SQLite database file
pub fn create_pool(database_path: &str) -> std::result::Result<DbPool, r2d2::Error> {
    let manager = SqliteConnectionManager::file(database_path);
    let pool = Pool::builder().max_size(10).build(manager)?;

    let conn = pool.get()?;
    if let Err(e) = migrate_schema(&conn) {
        log::warn!("Failed to migrate schema: {}", e);
    }

    Ok(pool)
}

/// Get a connection from the pool
///
/// The connection is automatically returned to the pool when dropped.
pub fn get_connection(pool: &DbPool) -> std::result::Result<DbConnection, r2d2::Error> {
    pool.get()
}

/// Migrate database schema to ensure all required tables and columns exist
fn migrate_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS user_states (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            telegram_id INTEGER NOT NULL UNIQUE,
            username TEXT,
            current_step TEXT NOT NULL DEFAULT 'start',
            selected_profession TEXT,
            task_sent INTEGER NOT NULL DEFAULT 0,
            task_sent_at TEXT,
            task_deadline TEXT,
            reminders_sent TEXT NOT NULL DEFAULT '',
            last_activity TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS contacts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            telegram_id INTEGER NOT NULL UNIQUE,
            phone_number TEXT NOT NULL,
            first_name TEXT NOT NULL,
            last_name TEXT,
            created_at TEXT NOT NULL
        );",
    )?;

    // Columns added after the first release; keep older databases working.
    let mut stmt = conn.prepare("PRAGMA table_info(user_states)")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;

    let mut columns = Vec::new();
    for row in rows {
        columns.push(row?);
    }

    if !columns.contains(&"task_deadline".to_string()) {
        log::info!("Adding missing column: task_deadline to user_states table");
        if let Err(e) = conn.execute("ALTER TABLE user_states ADD COLUMN task_deadline TEXT", []) {
            log::warn!("Failed to add task_deadline column: {}", e);
        }
    }

    if !columns.contains(&"reminders_sent".to_string()) {
        log::info!("Adding missing column: reminders_sent to user_states table");
        if let Err(e) = conn.execute(
            "ALTER TABLE user_states ADD COLUMN reminders_sent TEXT NOT NULL DEFAULT ''",
            [],
        ) {
            log::warn!("Failed to add reminders_sent column: {}", e);
        }
    }

    Ok(())
}

fn parse_timestamp(value: String) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e)))
}

fn parse_reminders(value: &str) -> std::collections::BTreeSet<ReminderKind> {
    value.split(',').filter_map(|tag| tag.trim().parse().ok()).collect()
}

fn reminders_to_string(state: &UserState) -> String {
    state
        .reminders_sent
        .iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn state_from_row(row: &rusqlite::Row<'_>) -> Result<UserState> {
    let step_text: String = row.get("current_step")?;
    let profession_text: Option<String> = row.get("selected_profession")?;
    let reminders_text: String = row.get("reminders_sent")?;
    let task_sent_at: Option<String> = row.get("task_sent_at")?;
    let task_deadline: Option<String> = row.get("task_deadline")?;

    Ok(UserState {
        id: Some(row.get("id")?),
        telegram_id: row.get("telegram_id")?,
        username: row.get("username")?,
        // Unknown step values fall back to the start of the conversation.
        current_step: step_text.parse::<Step>().unwrap_or(Step::Start),
        selected_profession: profession_text.and_then(|p| p.parse::<Profession>().ok()),
        contact: None,
        task_sent: row.get::<_, i64>("task_sent")? != 0,
        task_sent_at: task_sent_at.map(parse_timestamp).transpose()?,
        task_deadline: task_deadline.map(parse_timestamp).transpose()?,
        reminders_sent: parse_reminders(&reminders_text),
        last_activity: parse_timestamp(row.get("last_activity")?)?,
        created_at: parse_timestamp(row.get("created_at")?)?,
    })
}

/// Loads a user's conversation state with the contact (if any) attached.
pub fn get_user_state(conn: &Connection, telegram_id: i64) -> Result<Option<UserState>> {
    let state = conn
        .query_row(
            "SELECT id, telegram_id, username, current_step, selected_profession, task_sent,
                    task_sent_at, task_deadline, reminders_sent, last_activity, created_at
             FROM user_states WHERE telegram_id = ?1",
            params![telegram_id],
            state_from_row,
        )
        .optional()?;

    let Some(mut state) = state else {
        return Ok(None);
    };

    state.contact = get_contact(conn, telegram_id)?;
    Ok(Some(state))
}

/// Upserts a conversation state by telegram id and returns the persisted
/// row (with its internal id filled in). The contact record is persisted
/// separately via `save_contact`.
pub fn upsert_user_state(conn: &Connection, state: &UserState) -> Result<UserState> {
    conn.execute(
        "INSERT INTO user_states
             (telegram_id, username, current_step, selected_profession, task_sent,
              task_sent_at, task_deadline, reminders_sent, last_activity, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
         ON CONFLICT(telegram_id) DO UPDATE SET
             username = excluded.username,
             current_step = excluded.current_step,
             selected_profession = excluded.selected_profession,
             task_sent = excluded.task_sent,
             task_sent_at = excluded.task_sent_at,
             task_deadline = excluded.task_deadline,
             reminders_sent = excluded.reminders_sent,
             last_activity = excluded.last_activity",
        params![
            state.telegram_id,
            state.username,
            state.current_step.to_string(),
            state.selected_profession.map(|p| p.to_string()),
            state.task_sent as i64,
            state.task_sent_at.map(|t| t.to_rfc3339()),
            state.task_deadline.map(|t| t.to_rfc3339()),
            reminders_to_string(state),
            state.last_activity.to_rfc3339(),
            state.created_at.to_rfc3339(),
        ],
    )?;

    get_user_state(conn, state.telegram_id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
}

/// All users whose test task has been sent; input to the reminder sweep.
pub fn get_states_with_tasks(conn: &Connection) -> Result<Vec<UserState>> {
    let mut stmt = conn.prepare(
        "SELECT id, telegram_id, username, current_step, selected_profession, task_sent,
                task_sent_at, task_deadline, reminders_sent, last_activity, created_at
         FROM user_states WHERE task_sent = 1",
    )?;

    let rows = stmt.query_map([], state_from_row)?;
    let mut states = Vec::new();
    for row in rows {
        let mut state = row?;
        state.contact = get_contact(conn, state.telegram_id)?;
        states.push(state);
    }

    Ok(states)
}

/// Best-effort housekeeping: removes non-completed conversations whose
/// last activity is older than `cutoff`. Returns the number of rows purged.
pub fn delete_stale_states(conn: &Connection, cutoff: DateTime<Utc>) -> Result<usize> {
    conn.execute(
        "DELETE FROM user_states WHERE last_activity < ?1 AND current_step != 'completed'",
        params![cutoff.to_rfc3339()],
    )
}

/// Upserts a user's contact record.
pub fn save_contact(conn: &Connection, telegram_id: i64, contact: &ContactRecord) -> Result<()> {
    conn.execute(
        "INSERT INTO contacts (telegram_id, phone_number, first_name, last_name, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(telegram_id) DO UPDATE SET
             phone_number = excluded.phone_number,
             first_name = excluded.first_name,
             last_name = excluded.last_name",
        params![
            telegram_id,
            contact.phone_number,
            contact.first_name,
            contact.last_name,
            contact.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

/// Loads a user's contact record, if one was ever shared.
pub fn get_contact(conn: &Connection, telegram_id: i64) -> Result<Option<ContactRecord>> {
    conn.query_row(
        "SELECT phone_number, first_name, last_name, created_at FROM contacts WHERE telegram_id = ?1",
        params![telegram_id],
        |row| {
            Ok(ContactRecord {
                phone_number: row.get(0)?,
                first_name: row.get(1)?,
                last_name: row.get(2)?,
                created_at: parse_timestamp(row.get(3)?)?,
            })
        },
    )
    .optional()
}

/// Whether the user already has a contact on file.
pub fn has_contact(conn: &Connection, telegram_id: i64) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM contacts WHERE telegram_id = ?1",
        params![telegram_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrate_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn upsert_then_load_round_trips() {
        let conn = test_conn();
        let mut state = UserState::new(100);
        state.username = Some("ann".into());
        state.update_step(Step::ProfessionSelection);
        state.select_profession(Profession::Qa);
        state.record_reminder(ReminderKind::Day3);

        let saved = upsert_user_state(&conn, &state).unwrap();
        assert!(saved.id.is_some());
        assert_eq!(saved.current_step, Step::ProfessionSelection);
        assert_eq!(saved.selected_profession, Some(Profession::Qa));
        assert!(saved.reminders_sent.contains(&ReminderKind::Day3));

        let loaded = get_user_state(&conn, 100).unwrap().unwrap();
        assert_eq!(loaded.telegram_id, 100);
        assert_eq!(loaded.username.as_deref(), Some("ann"));
    }

    #[test]
    fn upsert_overwrites_existing_row() {
        let conn = test_conn();
        let mut state = UserState::new(100);
        upsert_user_state(&conn, &state).unwrap();

        state.update_step(Step::ContactRequest);
        let saved = upsert_user_state(&conn, &state).unwrap();
        assert_eq!(saved.current_step, Step::ContactRequest);

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM user_states", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn contacts_round_trip_and_attach_to_state() {
        let conn = test_conn();
        upsert_user_state(&conn, &UserState::new(7)).unwrap();

        assert!(!has_contact(&conn, 7).unwrap());

        let contact = ContactRecord::new("+380501234567".into(), "Ann".into(), Some("Lee".into()));
        save_contact(&conn, 7, &contact).unwrap();

        assert!(has_contact(&conn, 7).unwrap());
        let loaded = get_user_state(&conn, 7).unwrap().unwrap();
        let attached = loaded.contact.unwrap();
        assert_eq!(attached.phone_number, "+380501234567");
        assert_eq!(attached.first_name, "Ann");
        assert_eq!(attached.last_name.as_deref(), Some("Lee"));
    }

    #[test]
    fn states_with_tasks_only_returns_delivered() {
        let conn = test_conn();
        upsert_user_state(&conn, &UserState::new(1)).unwrap();

        let mut delivered = UserState::new(2);
        delivered.mark_task_sent(Utc.with_ymd_and_hms(2024, 6, 3, 10, 0, 0).unwrap());
        upsert_user_state(&conn, &delivered).unwrap();

        let states = get_states_with_tasks(&conn).unwrap();
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].telegram_id, 2);
        assert!(states[0].task_deadline.is_some());
    }

    #[test]
    fn cleanup_spares_completed_and_fresh_rows() {
        let conn = test_conn();

        let mut stale = UserState::new(1);
        stale.last_activity = Utc::now() - Duration::hours(48);
        upsert_user_state(&conn, &stale).unwrap();

        let mut completed = UserState::new(2);
        completed.mark_task_sent(Utc::now() - Duration::hours(72));
        completed.last_activity = Utc::now() - Duration::hours(48);
        upsert_user_state(&conn, &completed).unwrap();

        upsert_user_state(&conn, &UserState::new(3)).unwrap();

        let purged = delete_stale_states(&conn, Utc::now() - Duration::hours(24)).unwrap();
        assert_eq!(purged, 1);
        assert!(get_user_state(&conn, 1).unwrap().is_none());
        assert!(get_user_state(&conn, 2).unwrap().is_some());
        assert!(get_user_state(&conn, 3).unwrap().is_some());
    }
}
