use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type HabitID = i64;
pub type DayID = i64;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Habit {
    pub id: HabitID,
    pub title: String,
    pub created_at: NaiveDate,
}

#[derive(Deserialize, Debug)]
pub struct CreateHabitRequest {
    pub title: String,
    pub week_days: Vec<u8>,
}

#[derive(Serialize, Debug)]
pub struct CreateHabitResult {
    pub habit_id: HabitID,
}

#[derive(Serialize, Debug)]
pub struct DayView {
    pub possible_habits: Vec<Habit>,
    pub completed_habits: Vec<HabitID>,
}

#[derive(Serialize, Debug)]
pub struct ToggleResult {
    pub completed: bool,
}

/// One row per historical day. `completed` and `amount` come out of the
/// store's aggregate cast to REAL, so they are numeric rather than
/// integer-typed.
#[derive(Serialize, Debug)]
pub struct SummaryRow {
    pub id: DayID,
    pub date: NaiveDate,
    pub completed: f64,
    pub amount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn habit_serializes_with_plain_date() {
        let habit = Habit {
            id: 1,
            title: "Run".to_string(),
            created_at: NaiveDate::from_ymd_opt(2023, 1, 2).expect("valid date"),
        };

        let json = serde_json::to_value(&habit).expect("serialize");
        assert_eq!(json["created_at"], "2023-01-02");
    }
}
