mod error;
mod models;
mod routes;
mod schema;
mod status;
mod store;

#[cfg(test)]
mod tests;

#[macro_use] extern crate rocket;

use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use rocket::figment::Figment;
use rocket::{fairing::{self, AdHoc}, Build, Rocket};
use rocket_dyn_templates::Template;
use rocket_sync_db_pools::database;
use serde::Deserialize;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(Deserialize, Debug)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub app_name: String,
}

fn default_app_name() -> String {
    "Todo List".to_string()
}

#[database("todo_db")]
pub struct Db(diesel::SqliteConnection);

async fn run_migrations(rocket: Rocket<Build>) -> fairing::Result {
    let Some(connection) = Db::get_one(&rocket).await else {
        log::error!("no connection available for database `todo_db`");
        return Err(rocket);
    };

    let applied = connection
        .run(|c| {
            c.run_pending_migrations(MIGRATIONS)
                .map(|versions| versions.len())
                .map_err(|e| e.to_string())
        })
        .await;

    match applied {
        Ok(n) => {
            log::info!("applied {} pending migration(s)", n);
            Ok(rocket)
        }
        Err(e) => {
            log::error!("failed to run database migrations: {}", e);
            Err(rocket)
        }
    }
}

pub fn build(figment: Figment) -> Rocket<Build> {
    rocket::custom(figment)
        .attach(Db::fairing())
        .attach(AdHoc::try_on_ignite("Database Migrations", run_migrations))
        .attach(AdHoc::config::<AppConfig>())
        .attach(Template::fairing())
        .mount(
            "/",
            routes![routes::index, routes::add, routes::complete, routes::delete],
        )
        .register("/", catchers![routes::not_found, routes::internal_error])
}

#[rocket::main]
async fn main() -> Result<(), rocket::Error> {
    // ROCKET_* settings, including the secret key, may come from a .env file.
    dotenvy::dotenv().ok();

    let _rocket = build(rocket::Config::figment()).launch().await?;

    Ok(())
}
