use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::tokio::task;
use rocket::{Catcher, Route, State};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::ai::{strategist, Generator};
use crate::models::settings::Settings;

type ApiResponse = (Status, Json<Value>);

fn error(status: Status, message: &str) -> ApiResponse {
    (status, Json(json!({ "error": message })))
}

fn internal_error(details: impl Into<String>) -> ApiResponse {
    (
        Status::InternalServerError,
        Json(json!({ "error": "Internal Server Error", "details": details.into() })),
    )
}

/// Pull `settings` and a non-empty `blogContent` out of the request body.
fn read_body(body: &Value) -> Result<(Settings, String), ApiResponse> {
    let settings = body.get("settings").filter(|v| !v.is_null());
    let blog = body
        .get("blogContent")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty());

    let (Some(settings), Some(blog)) = (settings, blog) else {
        return Err(error(Status::BadRequest, "Missing settings or blogContent"));
    };

    let settings: Settings = serde_json::from_value(settings.clone()).map_err(|e| {
        (
            Status::BadRequest,
            Json(json!({ "error": "Invalid settings", "details": e.to_string() })),
        )
    })?;

    Ok((settings, blog.to_string()))
}

// ── Generate ──────────────────────────────────────────

#[post("/generate", data = "<body>")]
pub async fn generate(generator: &State<Arc<dyn Generator>>, body: Json<Value>) -> ApiResponse {
    if !generator.is_configured() {
        log::error!("Generation requested but no API key is configured");
        return error(Status::InternalServerError, "Server configuration error");
    }

    let (settings, blog) = match read_body(&body) {
        Ok(parsed) => parsed,
        Err(resp) => return resp,
    };

    let generator = Arc::clone(generator.inner());
    let outcome =
        task::spawn_blocking(move || strategist::generate_strategy(&*generator, &settings, &blog))
            .await;

    match outcome {
        Ok(Ok(strategy)) => match serde_json::to_value(&strategy) {
            Ok(v) => (Status::Ok, Json(v)),
            Err(e) => internal_error(e.to_string()),
        },
        Ok(Err(e)) => {
            log::error!("Error in /api/generate: {}", e);
            internal_error(e.0)
        }
        Err(e) => {
            log::error!("Generation task failed: {}", e);
            internal_error(e.to_string())
        }
    }
}

// ── Other methods ─────────────────────────────────────

fn method_not_allowed() -> ApiResponse {
    error(Status::MethodNotAllowed, "Method Not Allowed")
}

#[get("/generate")]
pub fn generate_get() -> ApiResponse {
    method_not_allowed()
}

#[put("/generate")]
pub fn generate_put() -> ApiResponse {
    method_not_allowed()
}

#[patch("/generate")]
pub fn generate_patch() -> ApiResponse {
    method_not_allowed()
}

#[delete("/generate")]
pub fn generate_delete() -> ApiResponse {
    method_not_allowed()
}

// ── Catchers ──────────────────────────────────────────

/// Body that is not JSON at all.
#[catch(400)]
pub fn bad_request() -> Json<Value> {
    Json(json!({ "error": "Missing settings or blogContent" }))
}

#[catch(404)]
pub fn not_found() -> Json<Value> {
    Json(json!({ "error": "Not Found" }))
}

#[catch(413)]
pub fn payload_too_large() -> Json<Value> {
    Json(json!({ "error": "Payload Too Large" }))
}

#[catch(422)]
pub fn unprocessable() -> Json<Value> {
    Json(json!({ "error": "Invalid request body" }))
}

#[catch(500)]
pub fn server_error() -> Json<Value> {
    Json(json!({ "error": "Internal Server Error" }))
}

pub fn routes() -> Vec<Route> {
    routes![
        generate,
        generate_get,
        generate_put,
        generate_patch,
        generate_delete,
    ]
}

pub fn catchers() -> Vec<Catcher> {
    catchers![bad_request, not_found, payload_too_large, unprocessable, server_error]
}
