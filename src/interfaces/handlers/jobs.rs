use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::job::{JobListQuery, JobStatusRequest, NewJobRequest, UpdateJobRequest},
    errors::AppError,
    use_cases::extractors::{AuthClaims, MaybeClaims},
    utils::valid_uuid::valid_uuid,
    AppState,
};

#[instrument(skip(claims, state, query))]
pub async fn list_jobs(
    claims: MaybeClaims,
    state: web::Data<AppState>,
    query: web::Query<JobListQuery>,
) -> Result<impl Responder, AppError> {
    let actor = claims.actor();
    let jobs = state.job_handler.list_jobs(actor.as_ref(), query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(jobs))
}

#[instrument(skip(claims, state))]
pub async fn get_job(
    claims: MaybeClaims,
    job_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let actor = claims.actor();
    let id = valid_uuid(&job_id, "job_id")?;
    let job = state.job_handler.get_job(actor.as_ref(), id).await?;
    Ok(HttpResponse::Ok().json(job))
}

#[instrument(skip(claims, state, data))]
pub async fn create_job(
    claims: AuthClaims,
    state: web::Data<AppState>,
    data: web::Json<NewJobRequest>,
) -> Result<impl Responder, AppError> {
    let actor = claims.actor()?;
    let job = state.job_handler.create_job(&actor, data.into_inner()).await?;
    Ok(HttpResponse::Created().json(job))
}

#[instrument(skip(claims, state, data))]
pub async fn update_job(
    claims: AuthClaims,
    job_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpdateJobRequest>,
) -> Result<impl Responder, AppError> {
    let actor = claims.actor()?;
    let id = valid_uuid(&job_id, "job_id")?;
    let job = state.job_handler.update_job(&actor, id, data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(job))
}

#[instrument(skip(claims, state, data))]
pub async fn set_job_status(
    claims: AuthClaims,
    job_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<JobStatusRequest>,
) -> Result<impl Responder, AppError> {
    let actor = claims.actor()?;
    let id = valid_uuid(&job_id, "job_id")?;
    let job = state.job_handler.set_job_status(&actor, id, data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(job))
}

#[instrument(skip(claims, state))]
pub async fn delete_job(
    claims: AuthClaims,
    job_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let actor = claims.actor()?;
    let id = valid_uuid(&job_id, "job_id")?;
    state.job_handler.delete_job(&actor, id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Job deleted successfully",
        "id": id
    })))
}

#[instrument(skip(claims, state))]
pub async fn list_job_applications(
    claims: AuthClaims,
    job_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let actor = claims.actor()?;
    let id = valid_uuid(&job_id, "job_id")?;
    let applications = state.application_handler.list_for_job(&actor, id).await?;
    Ok(HttpResponse::Ok().json(applications))
}
