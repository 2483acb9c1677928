use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use std::collections::BTreeSet;

use crate::api_error::{ApiError, ApiResult};
use crate::calendar;

use super::data::*;

pub fn add_habit(
    title: &str,
    week_days: &[u8],
    created_on: NaiveDate,
    db_connection: &Connection,
) -> ApiResult<HabitID> {
    if title.trim().is_empty() {
        return Err(ApiError::InvalidInput("habit title is empty".to_string()));
    }

    // Duplicates collapse to the set.
    let week_days: BTreeSet<u8> = week_days.iter().copied().collect();
    if week_days.is_empty() {
        return Err(ApiError::InvalidInput("weekday set is empty".to_string()));
    }
    if let Some(week_day) = week_days.iter().find(|week_day| **week_day > 6) {
        return Err(ApiError::InvalidInput(format!(
            "weekday out of range: {}",
            week_day
        )));
    }

    db_connection.execute(
        "INSERT INTO habits (title, created_at) VALUES (?1, ?2)",
        params![title, created_on],
    )?;
    let habit_id = db_connection.last_insert_rowid();

    for week_day in week_days {
        db_connection.execute(
            "INSERT INTO habit_week_days (habit_id, week_day) VALUES (?1, ?2)",
            params![habit_id, week_day],
        )?;
    }

    Ok(habit_id)
}

/// Habits due on `day`: created on or before it and scheduled for its
/// weekday. Row order is whatever the store returns.
pub fn habits_due_on(day: NaiveDate, db_connection: &Connection) -> ApiResult<Vec<Habit>> {
    let week_day = calendar::weekday_index(day);

    let mut statement = db_connection.prepare(
        "SELECT H.id, H.title, H.created_at
         FROM habits H
         WHERE H.created_at <= ?1
           AND EXISTS (
               SELECT 1 FROM habit_week_days W
               WHERE W.habit_id = H.id AND W.week_day = ?2
           )",
    )?;

    let rows = statement.query_map(params![day, week_day], |row| {
        Ok(Habit {
            id: row.get(0)?,
            title: row.get(1)?,
            created_at: row.get(2)?,
        })
    })?;

    let mut habits = vec![];
    for row in rows {
        habits.push(row?);
    }

    Ok(habits)
}

fn find_day(day: NaiveDate, db_connection: &Connection) -> ApiResult<Option<DayID>> {
    let day_id = db_connection
        .query_row("SELECT id FROM days WHERE date = ?1", params![day], |row| {
            row.get(0)
        })
        .optional()?;

    Ok(day_id)
}

/// Strict XOR on the (day, habit) completion link, inside one transaction:
/// find-or-create the day record, then delete the link if present or create
/// it if absent. Returns the new completion state. The habit id is not
/// checked against the habits table; an unknown id still gets linked.
pub fn toggle_habit_on(
    habit_id: HabitID,
    day: NaiveDate,
    db_connection: &mut Connection,
) -> ApiResult<bool> {
    let transaction = db_connection.transaction()?;

    let day_id: DayID = match transaction
        .query_row("SELECT id FROM days WHERE date = ?1", params![day], |row| {
            row.get(0)
        })
        .optional()?
    {
        Some(day_id) => day_id,
        None => {
            transaction.execute("INSERT INTO days (date) VALUES (?1)", params![day])?;
            transaction.last_insert_rowid()
        }
    };

    let completion: Option<i64> = transaction
        .query_row(
            "SELECT id FROM day_habits WHERE day_id = ?1 AND habit_id = ?2",
            params![day_id, habit_id],
            |row| row.get(0),
        )
        .optional()?;

    let completed = match completion {
        Some(completion_id) => {
            transaction.execute(
                "DELETE FROM day_habits WHERE id = ?1",
                params![completion_id],
            )?;
            false
        }
        None => {
            transaction.execute(
                "INSERT INTO day_habits (day_id, habit_id) VALUES (?1, ?2)",
                params![day_id, habit_id],
            )?;
            true
        }
    };

    transaction.commit()?;

    Ok(completed)
}

pub fn day_view(day: NaiveDate, db_connection: &Connection) -> ApiResult<DayView> {
    let possible_habits = habits_due_on(day, db_connection)?;

    let completed_habits = match find_day(day, db_connection)? {
        Some(day_id) => {
            let mut statement =
                db_connection.prepare("SELECT habit_id FROM day_habits WHERE day_id = ?1")?;
            let rows = statement.query_map(params![day_id], |row| row.get(0))?;

            let mut habit_ids = vec![];
            for row in rows {
                habit_ids.push(row?);
            }
            habit_ids
        }
        None => vec![],
    };

    Ok(DayView {
        possible_habits,
        completed_habits,
    })
}

/// One aggregate query over every day record: `completed` counts the
/// day's completion links, `amount` re-derives the due-habit predicate
/// per row (weekday via strftime, creation-day comparison on the text
/// dates, both in %Y-%m-%d so lexicographic order is chronological).
pub fn day_summary(db_connection: &Connection) -> ApiResult<Vec<SummaryRow>> {
    let mut statement = db_connection.prepare(
        "SELECT
            D.id,
            D.date,
            (
                SELECT CAST(COUNT(*) AS REAL)
                FROM day_habits DH
                WHERE DH.day_id = D.id
            ) AS completed,
            (
                SELECT CAST(COUNT(*) AS REAL)
                FROM habit_week_days HWD
                JOIN habits H ON H.id = HWD.habit_id
                WHERE HWD.week_day = CAST(strftime('%w', D.date) AS INTEGER)
                  AND H.created_at <= D.date
            ) AS amount
         FROM days D",
    )?;

    let rows = statement.query_map(params![], |row| {
        Ok(SummaryRow {
            id: row.get(0)?,
            date: row.get(1)?,
            completed: row.get(2)?,
            amount: row.get(3)?,
        })
    })?;

    let mut summary = vec![];
    for row in rows {
        summary.push(row?);
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::init_schema;

    fn open_test_db() -> Connection {
        let connection = Connection::open_in_memory().expect("in-memory db");
        init_schema(&connection).expect("schema");
        connection
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn rejects_bad_habit_input() {
        let db = open_test_db();

        assert!(add_habit("", &[1], date(2023, 1, 2), &db).is_err());
        assert!(add_habit("   ", &[1], date(2023, 1, 2), &db).is_err());
        assert!(add_habit("Run", &[], date(2023, 1, 2), &db).is_err());
        assert!(add_habit("Run", &[1, 7], date(2023, 1, 2), &db).is_err());
    }

    #[test]
    fn duplicate_weekdays_collapse_to_the_set() {
        let db = open_test_db();
        let habit_id = add_habit("Run", &[1, 1, 3, 3, 5], date(2023, 1, 2), &db).expect("add");

        let schedule_rows: i64 = db
            .query_row(
                "SELECT COUNT(*) FROM habit_week_days WHERE habit_id = ?1",
                params![habit_id],
                |row| row.get(0),
            )
            .expect("count");
        assert_eq!(schedule_rows, 3);
    }

    #[test]
    fn due_on_scheduled_weekdays_from_creation_day() {
        let db = open_test_db();
        // 2023-01-02 is a Monday; "Run" is scheduled Mon/Wed/Fri.
        let habit_id = add_habit("Run", &[1, 3, 5], date(2023, 1, 2), &db).expect("add");

        let monday = habits_due_on(date(2023, 1, 2), &db).expect("due");
        assert_eq!(
            monday.iter().map(|habit| habit.id).collect::<Vec<_>>(),
            vec![habit_id]
        );

        // Tuesday is not in the schedule.
        assert!(habits_due_on(date(2023, 1, 3), &db).expect("due").is_empty());

        // The Friday before the creation day does not count.
        assert!(habits_due_on(date(2022, 12, 30), &db)
            .expect("due")
            .is_empty());

        // A Friday after it does.
        assert_eq!(habits_due_on(date(2023, 1, 6), &db).expect("due").len(), 1);
    }

    #[test]
    fn toggle_alternates_completion() {
        let mut db = open_test_db();
        let habit_id = add_habit("Run", &[1], date(2023, 1, 2), &db).expect("add");
        let monday = date(2023, 1, 2);

        assert!(toggle_habit_on(habit_id, monday, &mut db).expect("toggle"));
        assert_eq!(
            day_view(monday, &db).expect("view").completed_habits,
            vec![habit_id]
        );

        assert!(!toggle_habit_on(habit_id, monday, &mut db).expect("toggle"));
        assert!(day_view(monday, &db)
            .expect("view")
            .completed_habits
            .is_empty());

        // The lazily created day record survives the un-toggle.
        assert!(find_day(monday, &db).expect("find").is_some());
    }

    #[test]
    fn day_records_are_created_lazily() {
        let db = open_test_db();
        add_habit("Run", &[1], date(2023, 1, 2), &db).expect("add");

        assert!(find_day(date(2023, 1, 2), &db).expect("find").is_none());
        assert!(day_summary(&db).expect("summary").is_empty());
    }

    #[test]
    fn summary_counts_match_the_due_listing() {
        let mut db = open_test_db();
        let run = add_habit("Run", &[1, 3, 5], date(2023, 1, 2), &db).expect("add");
        let read = add_habit("Read", &[0, 1, 2, 3, 4, 5, 6], date(2023, 1, 2), &db).expect("add");

        let monday = date(2023, 1, 9);
        let tuesday = date(2023, 1, 10);
        toggle_habit_on(run, monday, &mut db).expect("toggle");
        toggle_habit_on(read, monday, &mut db).expect("toggle");
        toggle_habit_on(read, tuesday, &mut db).expect("toggle");

        let summary = day_summary(&db).expect("summary");
        assert_eq!(summary.len(), 2);

        for row in summary {
            let due = habits_due_on(row.date, &db).expect("due");
            assert_eq!(row.amount, due.len() as f64);

            if row.date == monday {
                assert_eq!(row.completed, 2.0);
                assert_eq!(row.amount, 2.0);
            } else {
                assert_eq!(row.date, tuesday);
                assert_eq!(row.completed, 1.0);
                assert_eq!(row.amount, 1.0);
            }
        }
    }

    #[test]
    fn toggling_before_creation_day_still_counts_as_completed() {
        let mut db = open_test_db();
        let habit_id =
            add_habit("Run", &[0, 1, 2, 3, 4, 5, 6], date(2023, 1, 9), &db).expect("add");

        // A week before the habit existed.
        let earlier = date(2023, 1, 2);
        assert!(toggle_habit_on(habit_id, earlier, &mut db).expect("toggle"));

        let summary = day_summary(&db).expect("summary");
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].completed, 1.0);
        assert_eq!(summary[0].amount, 0.0);
    }

    #[test]
    fn toggling_an_unknown_habit_links_it_anyway() {
        let mut db = open_test_db();
        let monday = date(2023, 1, 2);

        assert!(toggle_habit_on(999, monday, &mut db).expect("toggle"));
        assert_eq!(
            day_view(monday, &db).expect("view").completed_habits,
            vec![999]
        );
    }
}
