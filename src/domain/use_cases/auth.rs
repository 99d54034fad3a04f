use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::entities::actor::Actor;
use crate::entities::company::{CompanyRegisteredResponse, NewCompanyRequest};
use crate::entities::token::AuthResponse;
use crate::entities::user::{LoginUser, NewUser, NewUserResponse, PublicUser, User};
use crate::errors::{AppError, AuthError};
use crate::auth::password::{hash_password, verify_password};
use crate::repositories::{company::CompanyRepository, token::TokenServiceRepository, user::UserRepository};

pub struct AuthHandler {
    pub user_repo: Arc<dyn UserRepository>,
    pub company_repo: Arc<dyn CompanyRepository>,
    pub token_service: Arc<dyn TokenServiceRepository>,
}

impl AuthHandler {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        company_repo: Arc<dyn CompanyRepository>,
        token_service: Arc<dyn TokenServiceRepository>,
    ) -> Self {
        AuthHandler {
            user_repo,
            company_repo,
            token_service,
        }
    }

    /// Registers a job seeker after validation and password hashing
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: NewUser) -> Result<NewUserResponse, AppError> {
        request.validate()?;

        let hashed_password = hash_password(&request.password)?;
        let user_insert = request.prepare_for_insert(hashed_password);

        let id = self.user_repo.create_user(&user_insert).await?;
        tracing::info!(user_id = %id, "User registered");

        Ok(NewUserResponse {
            id,
            message: "User created successfully".to_string(),
        })
    }

    /// Creates the company admin account and a PENDING company together
    #[instrument(skip(self, request), fields(company = %request.name))]
    pub async fn register_company(&self, request: NewCompanyRequest) -> Result<CompanyRegisteredResponse, AppError> {
        request.validate()?;

        let hashed_password = hash_password(&request.password)?;
        let insert = request.prepare_for_insert(hashed_password);

        let company = self.company_repo.register_company(&insert).await?;
        let admin_id = company
            .admin_id
            .ok_or_else(|| AppError::InternalError("Registered company has no admin".into()))?;

        tracing::info!(company_id = %company.id, %admin_id, "Company registered, awaiting approval");

        Ok(CompanyRegisteredResponse {
            company_id: company.id,
            admin_id,
            status: company.status,
            message: "Company registered and awaiting approval".to_string(),
        })
    }

    /// Logs in a user by validating credentials and generating JWTs
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: LoginUser) -> Result<AuthResponse, AuthError> {
        request.validate().map_err(|_| AuthError::WrongCredentials)?;

        let email = request.email.trim().to_lowercase();
        let user = self.user_repo.get_user_by_email(&email)
            .await
            .map_err(|e| {
                tracing::error!("User lookup failed during login: {}", e);
                AuthError::WrongCredentials
            })?
            .ok_or(AuthError::WrongCredentials)?;

        // Accounts created through an OAuth provider have no password to check.
        let password_hash = user.password_hash.as_deref().ok_or(AuthError::WrongCredentials)?;

        let is_password_valid = verify_password(&request.password, password_hash)
            .map_err(|_| AuthError::WrongCredentials)?;
        if !is_password_valid {
            return Err(AuthError::WrongCredentials);
        }

        let response = self.create_auth_response(&user)?;

        tracing::info!(user_id = %user.id, role = %user.role, "User logged in successfully");
        Ok(response)
    }

    pub fn create_auth_response(&self, user: &User) -> Result<AuthResponse, AuthError> {
        let access_token = self.token_service.create_jwt(user)
            .map_err(|e| {
                tracing::warn!("Failed to create JWT: {}", e);
                AuthError::TokenCreation
            })?;

        let refresh_token = self.token_service.create_refresh_jwt(&user.id)
            .map_err(|e| {
                tracing::warn!("Failed to create refresh JWT: {}", e);
                AuthError::TokenCreation
            })?;
        Ok(AuthResponse::new(access_token, refresh_token))
    }

    /// Issues a fresh token pair; role and company are re-read from storage
    #[instrument(skip(self, token))]
    pub async fn refresh_token(&self, token: &str) -> Result<AuthResponse, AuthError> {
        let decoded = self.token_service.decode_refresh_jwt(token)?;
        let user_id = Uuid::parse_str(&decoded.claims.sub)
            .map_err(|_| AuthError::InvalidUserId)?;

        let user = self.user_repo.get_user_by_id(&user_id)
            .await
            .map_err(|_| AuthError::WrongCredentials)?
            .ok_or(AuthError::WrongCredentials)?;

        self.create_auth_response(&user)
    }

    #[instrument(skip(self), fields(user_id = %actor.user_id))]
    pub async fn me(&self, actor: &Actor) -> Result<PublicUser, AppError> {
        self.user_repo
            .get_user_by_id(&actor.user_id)
            .await?
            .map(PublicUser::from)
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }
}
