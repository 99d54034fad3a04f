use actix_web::web;

use crate::handlers::applications;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/applications")
            .service(
                web::resource("")
                    .route(web::post().to(applications::create_application))
            )
            .service(
                web::resource("/me")
                    .route(web::get().to(applications::my_applications))
            )
            .service(
                web::resource("/{application_id}")
                    .route(web::get().to(applications::get_application))
            )
            .service(
                web::resource("/{application_id}/status")
                    .route(web::patch().to(applications::set_application_status))
            )
    );
}
