use actix_web::{get, HttpResponse, Responder};
use std::env;

#[get("/")]
pub async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Welcome to the JobBoard API!",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
        "api": "/api/v1",
        "health": "/api/v1/health"
    }))
}
