use rocket::serde::json::Json;
use rocket::{get, patch, post, State};

use crate::api_error::{ApiError, ApiResult};
use crate::calendar;
use crate::data::DBConnection;

use super::data::*;
use super::helpers::*;

#[get("/")]
pub fn index() -> &'static str {
    "rhabits"
}

#[post("/habits", format = "json", data = "<create_habit_request>")]
pub fn create_habit(
    create_habit_request: Json<CreateHabitRequest>,
    db_connection: &State<DBConnection>,
) -> ApiResult<Json<CreateHabitResult>> {
    let db_connection = db_connection.lock()?;

    let request = create_habit_request.into_inner();
    let habit_id = add_habit(
        &request.title,
        &request.week_days,
        calendar::today(),
        &db_connection,
    )?;

    Ok(Json(CreateHabitResult { habit_id }))
}

#[get("/day?<date>")]
pub fn get_day(
    date: Option<&str>,
    db_connection: &State<DBConnection>,
) -> ApiResult<Json<DayView>> {
    let date =
        date.ok_or_else(|| ApiError::InvalidInput("missing date parameter".to_string()))?;
    let day = calendar::parse_day(date)?;

    let db_connection = db_connection.lock()?;

    day_view(day, &db_connection).map(Json)
}

#[patch("/habits/<id>/toggle?<date>")]
pub fn toggle_habit(
    id: &str,
    date: Option<&str>,
    db_connection: &State<DBConnection>,
) -> ApiResult<Json<ToggleResult>> {
    let habit_id: HabitID = id
        .parse()
        .map_err(|_| ApiError::InvalidInput(format!("malformed habit id: {}", id)))?;

    let day = match date {
        Some(raw) => calendar::parse_day(raw)?,
        None => calendar::today(),
    };

    let mut db_connection = db_connection.lock()?;

    let completed = toggle_habit_on(habit_id, day, &mut db_connection)?;

    Ok(Json(ToggleResult { completed }))
}

#[get("/summary")]
pub fn get_summary(db_connection: &State<DBConnection>) -> ApiResult<Json<Vec<SummaryRow>>> {
    let db_connection = db_connection.lock()?;

    day_summary(&db_connection).map(Json)
}
