use actix_web::{get, web, HttpResponse, Responder};
use tracing::instrument;

use crate::{errors::AppError, use_cases::extractors::{AdminClaims, AuthClaims}, AppState};

#[instrument(skip(admin, state))]
#[get("/dashboard")]
pub async fn admin_dashboard(
    admin: AdminClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let actor = admin.actor()?;
    let dashboard = state.dashboard_handler.admin_dashboard(&actor).await?;
    Ok(HttpResponse::Ok().json(dashboard))
}

#[instrument(skip(claims, state))]
#[get("/dashboard")]
pub async fn company_dashboard(
    claims: AuthClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let actor = claims.actor()?;
    let dashboard = state.dashboard_handler.company_dashboard(&actor).await?;
    Ok(HttpResponse::Ok().json(dashboard))
}
