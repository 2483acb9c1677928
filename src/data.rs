use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

pub type DBConnection = Arc<Mutex<Connection>>;

pub fn init_schema(connection: &Connection) -> rusqlite::Result<()> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS habits (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        params![],
    )?;
    connection.execute(
        "CREATE TABLE IF NOT EXISTS habit_week_days (
            habit_id INTEGER NOT NULL,
            week_day INTEGER NOT NULL,
            UNIQUE (habit_id, week_day)
        )",
        params![],
    )?;
    connection.execute(
        "CREATE TABLE IF NOT EXISTS days (
            id INTEGER PRIMARY KEY,
            date TEXT NOT NULL UNIQUE
        )",
        params![],
    )?;
    connection.execute(
        "CREATE TABLE IF NOT EXISTS day_habits (
            id INTEGER PRIMARY KEY,
            day_id INTEGER NOT NULL,
            habit_id INTEGER NOT NULL,
            UNIQUE (day_id, habit_id)
        )",
        params![],
    )?;

    Ok(())
}
