#[macro_use]
extern crate rocket;

mod config;
mod db;
mod error;
mod guards;
mod models;
mod routes;
mod services;
mod utils;

use dotenvy::dotenv;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Header;
use rocket::{Build, Request, Response, Rocket};
use rocket_okapi::openapi_get_routes;
use rocket_okapi::swagger_ui::{SwaggerUIConfig, make_swagger_ui};

use crate::config::Config;
use crate::models::SharedState;
use crate::services::jwt::{JwtService, ADMIN_ROLE};

/* ----------------------------- CORS ----------------------------- */

pub struct CORS;

#[rocket::async_trait]
impl Fairing for CORS {
    fn info(&self) -> Info {
        Info {
            name: "CORS",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        if let Some(origin) = request.headers().get_one("Origin") {
            response.set_header(Header::new("Access-Control-Allow-Origin", origin));
        }

        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "GET, POST, PUT, OPTIONS",
        ));

        response.set_header(Header::new(
            "Access-Control-Allow-Headers",
            "Content-Type, Authorization",
        ));

        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

/* ----------------------------- OPTIONS ----------------------------- */

#[options("/<_..>")]
fn options_handler() {}

/* ----------------------------- ERRORS ----------------------------- */

#[catch(401)]
fn unauthorized() -> rocket::serde::json::Value {
    rocket::serde::json::json!({
        "success": false,
        "message": "Missing or invalid bearer token"
    })
}

#[catch(403)]
fn forbidden() -> rocket::serde::json::Value {
    rocket::serde::json::json!({
        "success": false,
        "message": "Dashboard access requires an admin token"
    })
}

#[catch(404)]
fn not_found() -> rocket::serde::json::Value {
    rocket::serde::json::json!({
        "success": false,
        "message": "Resource not found (check /api/v1 prefix)"
    })
}

#[catch(500)]
fn internal_error() -> rocket::serde::json::Value {
    rocket::serde::json::json!({
        "success": false,
        "message": "Internal server error"
    })
}

/* ----------------------------- SWAGGER ----------------------------- */

fn swagger_config() -> SwaggerUIConfig {
    SwaggerUIConfig {
        url: "/api/v1/openapi.json".to_string(),
        ..Default::default()
    }
}

/* ----------------------------- LAUNCH ----------------------------- */

/// Mounts routes, fairings and the shared UI state. The data source is
/// installed separately (see `db::init`).
pub fn mount(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket
        .manage(SharedState::default())
        .attach(CORS)
        .mount("/", routes![options_handler])
        .mount(
            "/api/v1",
            openapi_get_routes![
                // State
                routes::dashboard::initialize,
                routes::dashboard::get_state,
                routes::dashboard::set_status_filter,
                // Metrics & table
                routes::dashboard::get_metrics,
                routes::dashboard::get_all_kyc,
                routes::dashboard::get_status_color,
                // Documents
                routes::dashboard::set_kyc_document,
                routes::dashboard::handle_document_switch,
                routes::dashboard::get_document_type_options,
                routes::dashboard::add_kyc_document,
                // Charts
                routes::dashboard::get_chart_data,
                routes::dashboard::switch_chart,
                routes::dashboard::get_chart_type,
                routes::dashboard::get_daily_registrations,
                routes::dashboard::get_verified_users_by_month,
            ],
        )
        .mount("/api/docs", make_swagger_ui(&swagger_config()))
        .register("/", catchers![unauthorized, forbidden, not_found, internal_error])
}

#[launch]
fn rocket() -> Rocket<Build> {
    dotenv().ok();
    env_logger::init();

    if Config::is_development() {
        match JwtService::generate_access_token("dev-reviewer", ADMIN_ROLE) {
            Ok(token) => log::info!("Development admin token: {}", token),
            Err(e) => log::warn!("Could not mint development token: {}", e),
        }
    }

    println!("🚀 KYC dashboard API running");
    println!("📚 Swagger UI → http://localhost:8000/api/docs");

    mount(rocket::build().attach(db::init()))
}
