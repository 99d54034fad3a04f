use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::bookmark::BookmarkToggleRequest,
    errors::AppError,
    use_cases::extractors::AuthClaims,
    AppState,
};

/// 201 when a bookmark was created, 200 when one was removed.
#[instrument(skip(claims, state, data))]
pub async fn toggle_bookmark(
    claims: AuthClaims,
    state: web::Data<AppState>,
    data: web::Json<BookmarkToggleRequest>,
) -> Result<impl Responder, AppError> {
    let actor = claims.actor()?;
    let response = state.bookmark_handler.toggle_bookmark(&actor, data.into_inner()).await?;

    if response.bookmarked {
        Ok(HttpResponse::Created().json(response))
    } else {
        Ok(HttpResponse::Ok().json(response))
    }
}

#[instrument(skip(claims, state))]
pub async fn list_bookmarks(
    claims: AuthClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let actor = claims.actor()?;
    let jobs = state.bookmark_handler.list_bookmarks(&actor).await?;
    Ok(HttpResponse::Ok().json(jobs))
}
