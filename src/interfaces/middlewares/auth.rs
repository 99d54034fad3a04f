use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage, ResponseError,
};
use futures_util::future::{ok, Ready, LocalBoxFuture};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{entities::{token::Claims, user::Role}, errors::AuthError, AppState};

const ADMIN_PREFIX: &str = "/api/v1/admin";

pub struct AuthMiddleware;

impl<S> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let path = req.path().to_string();
            let public = is_public_route(&path, req.method().as_str());

            let claims = match get_valid_claims(&req) {
                Ok(claims) => Some(claims),
                // Public routes serve anonymous callers; a bad token only drops the identity.
                Err(e) if public => {
                    if !matches!(e, AuthError::MissingCredentials) {
                        tracing::debug!(%path, "Ignoring unusable token on public route: {}", e);
                    }
                    None
                }
                Err(e) => {
                    tracing::warn!(%path, "Rejected request: {}", e);
                    return Ok(req.into_response(e.error_response()));
                }
            };

            if let Some(claims) = claims {
                if let Err(forbidden) = enforce_admin_access(&path, &claims) {
                    return Ok(req.into_response(forbidden.error_response()));
                }
                req.extensions_mut().insert(claims);
            }

            service.call(req).await
        })
    }
}

/// Routes reachable without a token. Claims are still attached when a valid one is sent.
fn is_public_route(path: &str, method: &str) -> bool {
    if method == "OPTIONS" {
        return true;
    }

    let is_job_read = method == "GET"
        && (path == "/api/v1/jobs"
            || path
                .strip_prefix("/api/v1/jobs/")
                .is_some_and(|rest| !rest.is_empty() && !rest.contains('/')));

    is_job_read
        || matches!(
            (path, method),
            ("/", "GET")
                | ("/api/v1/health", "GET")
                | ("/api/v1/auth/register", "POST")
                | ("/api/v1/auth/register-company", "POST")
                | ("/api/v1/auth/login", "POST")
                | ("/api/v1/auth/refresh-token", "POST")
                | ("/api/v1/uploads", "POST")
        )
}

fn extract_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| {
            let parts: Vec<&str> = header.split_whitespace().collect();
            if parts.len() == 2 && parts[0].eq_ignore_ascii_case("bearer") {
                Some(parts[1].to_string())
            } else {
                None
            }
        })
}

fn get_valid_claims(req: &ServiceRequest) -> Result<Claims, AuthError> {
    let token = extract_token(req).ok_or(AuthError::MissingCredentials)?;

    let state = req.app_data::<web::Data<AppState>>()
        .ok_or_else(|| {
            tracing::error!("AppState missing in middleware");
            AuthError::MissingJwtService
        })?;

    let decoded = state.auth_handler.token_service.decode_jwt(&token)?;
    Ok(decoded.claims)
}

fn enforce_admin_access(path: &str, claims: &Claims) -> Result<(), AuthError> {
    if path.starts_with(ADMIN_PREFIX) && claims.role != Role::Admin {
        tracing::warn!(user = %claims.sub, role = %claims.role, "Admin access required for path: {}", path);
        return Err(AuthError::Forbidden("Admin access required".into()));
    }
    Ok(())
}
