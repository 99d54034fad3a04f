use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::application::{ApplicationStatusRequest, NewApplicationRequest},
    errors::AppError,
    use_cases::extractors::AuthClaims,
    utils::valid_uuid::valid_uuid,
    AppState,
};

#[instrument(skip(claims, state, data))]
pub async fn create_application(
    claims: AuthClaims,
    state: web::Data<AppState>,
    data: web::Json<NewApplicationRequest>,
) -> Result<impl Responder, AppError> {
    let actor = claims.actor()?;
    let response = state
        .application_handler
        .create_application(&actor, data.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(response))
}

#[instrument(skip(claims, state, data))]
pub async fn set_application_status(
    claims: AuthClaims,
    application_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<ApplicationStatusRequest>,
) -> Result<impl Responder, AppError> {
    let actor = claims.actor()?;
    let id = valid_uuid(&application_id, "application_id")?;
    let application = state
        .application_handler
        .set_application_status(&actor, id, data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(application))
}

#[instrument(skip(claims, state))]
pub async fn my_applications(
    claims: AuthClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let actor = claims.actor()?;
    let applications = state.application_handler.list_mine(&actor).await?;
    Ok(HttpResponse::Ok().json(applications))
}

#[instrument(skip(claims, state))]
pub async fn get_application(
    claims: AuthClaims,
    application_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let actor = claims.actor()?;
    let id = valid_uuid(&application_id, "application_id")?;
    let application = state.application_handler.get_application(&actor, id).await?;
    Ok(HttpResponse::Ok().json(application))
}
