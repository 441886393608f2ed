#[macro_use]
extern crate rocket;

use rocket::data::{Limits, ToByteUnit};
use rocket::figment::Figment;
use rocket::response::content::RawHtml;
use rocket::{Build, Rocket};
use rocket_dyn_templates::Template;
use std::sync::Arc;

mod ai;
mod boot;
mod color;
mod config;
mod db;
mod ingest;
mod models;
mod render;
mod routes;
mod sanitize;
mod session;
mod tasks;

#[cfg(test)]
mod tests;

use ai::gemini::GeminiGenerator;
use ai::Generator;
use config::AppConfig;
use db::DbPool;
use session::SessionStore;

#[catch(404)]
fn not_found() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>404</h1><p>Không tìm thấy trang.</p><a href='/'>← Quay lại</a></body></html>".to_string())
}

#[catch(500)]
fn server_error() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>500</h1><p>Đã xảy ra lỗi máy chủ.</p><a href='/'>← Quay lại</a></body></html>".to_string())
}

/// Upload limits sized for one document per request.
fn upload_limits(figment: Figment) -> Figment {
    let limits = Limits::default()
        .limit("file", ingest::MAX_UPLOAD_BYTES.bytes())
        .limit("data-form", (ingest::MAX_UPLOAD_BYTES + 1024 * 1024).bytes());
    figment.merge(("limits", limits))
}

/// Assemble the server around an already-migrated pool and a generator.
pub fn build_rocket(
    figment: Figment,
    config: &AppConfig,
    pool: DbPool,
    generator: Arc<dyn Generator>,
) -> Rocket<Build> {
    let sessions = Arc::new(SessionStore::new(config.session_idle_minutes));

    rocket::custom(upload_limits(figment))
        .manage(pool)
        .manage(sessions)
        .manage(generator)
        .attach(Template::fairing())
        .attach(tasks::BackgroundTasks)
        .mount("/", routes::workspace::routes())
        .mount("/api", routes::api::routes())
        .register("/", catchers![not_found, server_error])
        .register("/api", routes::api::catchers())
}

#[launch]
fn rocket() -> _ {
    env_logger::init();

    let figment = rocket::Config::figment();
    let config = AppConfig::from_figment(&figment);

    // Create directories and check templates before binding
    boot::run(&config);

    let pool = db::init_pool(&config.db_path).expect("Failed to initialize database pool");
    db::run_migrations(&pool).expect("Failed to run database migrations");
    db::seed_defaults(&pool).expect("Failed to seed default state");

    let generator = GeminiGenerator::new(
        config.gemini_api_key.clone(),
        &config.gemini_model,
        config.request_timeout(),
    );
    if generator.is_configured() {
        log::info!("Using Gemini model {}", config.gemini_model);
    } else {
        log::warn!(
            "No Gemini API key configured (set {} or app.gemini_api_key); generation will fail",
            config::API_KEY_ENV
        );
    }

    build_rocket(figment, &config, pool, Arc::new(generator))
}
