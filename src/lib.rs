use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{auth, db, mail, storage, utils};

use auth::jwt::JwtService;
use repositories::{
    application::ApplicationRepository,
    blob_store::BlobStore,
    bookmark::BookmarkRepository,
    company::CompanyRepository,
    job::JobRepository,
    notifier::Notifier,
    sqlx_repo::SqlxRepo,
    token::TokenServiceRepository,
    user::UserRepository,
};
use use_cases::{
    application::ApplicationHandler,
    auth::AuthHandler,
    bookmark::BookmarkHandler,
    company::CompanyHandler,
    dashboard::DashboardHandler,
    job::JobHandler,
    upload::UploadHandler,
};

pub struct AppState {
    pub user_repo: Arc<dyn UserRepository>,
    pub auth_handler: AuthHandler,
    pub company_handler: CompanyHandler,
    pub job_handler: JobHandler,
    pub application_handler: ApplicationHandler,
    pub bookmark_handler: BookmarkHandler,
    pub dashboard_handler: DashboardHandler,
    pub upload_handler: UploadHandler,
}

/// Storage and collaborator implementations the handlers are built from.
/// Production wires every repository to one `SqlxRepo`; tests substitute
/// in-memory doubles.
pub struct AppParts {
    pub user_repo: Arc<dyn UserRepository>,
    pub company_repo: Arc<dyn CompanyRepository>,
    pub job_repo: Arc<dyn JobRepository>,
    pub application_repo: Arc<dyn ApplicationRepository>,
    pub bookmark_repo: Arc<dyn BookmarkRepository>,
    pub token_service: Arc<dyn TokenServiceRepository>,
    pub notifier: Arc<dyn Notifier>,
    pub blob_store: Arc<dyn BlobStore>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> anyhow::Result<Self> {
        let repo = Arc::new(SqlxRepo::new(pool));

        Ok(AppState::from_parts(AppParts {
            user_repo: repo.clone(),
            company_repo: repo.clone(),
            job_repo: repo.clone(),
            application_repo: repo.clone(),
            bookmark_repo: repo,
            token_service: Arc::new(JwtService::new(config)),
            notifier: mail::build_notifier(config)?,
            blob_store: storage::build_blob_store(config)?,
            max_upload_bytes: config.max_upload_bytes,
        }))
    }

    pub fn from_parts(parts: AppParts) -> Self {
        let AppParts {
            user_repo,
            company_repo,
            job_repo,
            application_repo,
            bookmark_repo,
            token_service,
            notifier,
            blob_store,
            max_upload_bytes,
        } = parts;

        AppState {
            auth_handler: AuthHandler::new(user_repo.clone(), company_repo.clone(), token_service),
            company_handler: CompanyHandler::new(company_repo.clone(), notifier, blob_store.clone()),
            job_handler: JobHandler::new(job_repo.clone(), company_repo.clone()),
            application_handler: ApplicationHandler::new(
                application_repo.clone(),
                job_repo.clone(),
                company_repo.clone(),
            ),
            bookmark_handler: BookmarkHandler::new(bookmark_repo, job_repo.clone()),
            dashboard_handler: DashboardHandler::new(
                user_repo.clone(),
                company_repo,
                job_repo,
                application_repo,
            ),
            upload_handler: UploadHandler::new(blob_store, max_upload_bytes),
            user_repo,
        }
    }
}
