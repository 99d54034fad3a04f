use actix_web::web;

use crate::handlers::bookmarks;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/bookmarks")
            .route(web::post().to(bookmarks::toggle_bookmark))
            .route(web::get().to(bookmarks::list_bookmarks))
    );
}
