use actix_web::web;

use crate::handlers::dashboard;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(dashboard::admin_dashboard)
    );
}
