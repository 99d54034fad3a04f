use actix_web::web;

use crate::handlers::jobs;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/jobs")
            .service(
                web::resource("")
                    .route(web::get().to(jobs::list_jobs))
                    .route(web::post().to(jobs::create_job))
            )
            .service(
                web::resource("/{job_id}")
                    .route(web::get().to(jobs::get_job))
                    .route(web::put().to(jobs::update_job))
                    .route(web::delete().to(jobs::delete_job))
            )
            .service(
                web::resource("/{job_id}/status")
                    .route(web::patch().to(jobs::set_job_status))
            )
            .service(
                web::resource("/{job_id}/applications")
                    .route(web::get().to(jobs::list_job_applications))
            )
    );
}
