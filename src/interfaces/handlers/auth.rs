use actix_web::{post, web, HttpResponse, Responder};
use tracing::instrument;

use crate::entities::company::NewCompanyRequest;
use crate::entities::token::RefreshTokenRequest;
use crate::entities::user::{LoginUser, NewUser};
use crate::errors::{AppError, AuthError};
use crate::AppState;

#[instrument(skip(state, user))]
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    user: web::Json<NewUser>
) -> Result<impl Responder, AppError> {
    let response = state.auth_handler.register(user.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

#[instrument(skip(state, company))]
#[post("/register-company")]
pub async fn register_company(
    state: web::Data<AppState>,
    company: web::Json<NewCompanyRequest>
) -> Result<impl Responder, AppError> {
    let response = state.auth_handler.register_company(company.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

#[instrument(skip(state, user))]
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    user: web::Json<LoginUser>
) -> Result<impl Responder, AuthError> {
    let auth_response = state.auth_handler.login(user.into_inner()).await?;
    Ok(HttpResponse::Ok().json(auth_response))
}

#[instrument(skip(state, request))]
#[post("/refresh-token")]
pub async fn refresh_token(
    state: web::Data<AppState>,
    request: web::Json<RefreshTokenRequest>,
) -> Result<impl Responder, AuthError> {
    let auth_response = state.auth_handler.refresh_token(&request.refresh_token).await?;
    Ok(HttpResponse::Ok().json(auth_response))
}
