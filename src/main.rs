use rusqlite::Connection;

use std::error::Error;
use std::sync::{Arc, Mutex};

mod api_error;
mod calendar;
mod data;
mod habits;

use habits::endpoints;

#[macro_use]
extern crate rocket;

#[rocket::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let connection = Connection::open("rhabits.db")?;
    data::init_schema(&connection)?;

    let connection = Arc::new(Mutex::new(connection));

    rocket::build()
        .manage(connection)
        .mount(
            "/",
            routes![
                endpoints::index,
                endpoints::create_habit,
                endpoints::get_day,
                endpoints::toggle_habit,
                endpoints::get_summary,
            ],
        )
        .launch()
        .await?;

    Ok(())
}
