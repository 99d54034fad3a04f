use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    entities::company::CompanyStatusRequest,
    errors::AppError,
    use_cases::extractors::{AdminClaims, AuthClaims},
    utils::valid_uuid::valid_uuid,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct CompanyListQuery {
    pub status: Option<String>,
}

#[instrument(skip(claims, state))]
pub async fn list_companies(
    claims: AdminClaims,
    state: web::Data<AppState>,
    query: web::Query<CompanyListQuery>,
) -> Result<impl Responder, AppError> {
    let actor = claims.actor()?;
    let companies = state
        .company_handler
        .list_companies(&actor, query.status.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(companies))
}

#[instrument(skip(claims, state))]
pub async fn get_company(
    claims: AuthClaims,
    company_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let actor = claims.actor()?;
    let id = valid_uuid(&company_id, "company_id")?;
    let company = state.company_handler.get_company(&actor, id).await?;
    Ok(HttpResponse::Ok().json(company))
}

#[instrument(skip(claims, state, data))]
pub async fn set_company_status(
    claims: AuthClaims,
    company_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<CompanyStatusRequest>,
) -> Result<impl Responder, AppError> {
    let actor = claims.actor()?;
    let id = valid_uuid(&company_id, "company_id")?;
    let company = state
        .company_handler
        .set_company_status(&actor, id, data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(company))
}

#[instrument(skip(claims, state))]
pub async fn delete_company(
    claims: AuthClaims,
    company_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let actor = claims.actor()?;
    let id = valid_uuid(&company_id, "company_id")?;
    let company = state.company_handler.delete_company(&actor, id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Company deleted successfully",
        "id": company.id
    })))
}
