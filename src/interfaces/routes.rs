use actix_web::web;

use crate::handlers::{home::home, system::health_check};

mod admin;
mod applications;
mod auth;
mod bookmarks;
mod companies;
mod company;
mod jobs;
mod json_error;
mod uploads;
mod users;

pub use json_error::{multipart_config, JsonError};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);

    cfg.service(
        web::scope("/api/v1")
            .service(health_check)
            .configure(auth::config_routes)
            .configure(admin::config_routes)
            .configure(company::config_routes)
            .configure(users::config_routes)
            .configure(companies::config_routes)
            .configure(jobs::config_routes)
            .configure(applications::config_routes)
            .configure(bookmarks::config_routes)
            .configure(uploads::config_routes)
    );

    cfg.configure(json_error::config_routes);
}
