use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{
        actor::Actor,
        application::{Application, ApplicationCreatedResponse, ApplicationStatus, ApplicationStatusRequest, NewApplicationRequest},
        company::ApprovalStatus,
        user::Role,
    },
    errors::AppError,
    repositories::{
        application::{ApplicationRepository, DUPLICATE_APPLICATION},
        company::CompanyRepository,
        job::JobRepository,
    },
};

pub struct ApplicationHandler {
    pub application_repo: Arc<dyn ApplicationRepository>,
    pub job_repo: Arc<dyn JobRepository>,
    pub company_repo: Arc<dyn CompanyRepository>,
}

impl ApplicationHandler {
    pub fn new(
        application_repo: Arc<dyn ApplicationRepository>,
        job_repo: Arc<dyn JobRepository>,
        company_repo: Arc<dyn CompanyRepository>,
    ) -> Self {
        ApplicationHandler { application_repo, job_repo, company_repo }
    }

    /// Submits a job seeker's application. A second application for the same
    /// job is a conflict, whether caught here or by the storage constraint.
    #[instrument(skip(self, request), fields(actor = %actor.user_id, job_id = %request.job_id))]
    pub async fn create_application(
        &self,
        actor: &Actor,
        request: NewApplicationRequest,
    ) -> Result<ApplicationCreatedResponse, AppError> {
        actor.require_role(Role::JobSeeker)?;
        request.validate()?;

        let job_id = request.job_id;
        let job_is_open = self
            .job_repo
            .get_job(&job_id)
            .await?
            .is_some_and(|job| job.status == ApprovalStatus::Approved);
        if !job_is_open {
            return Err(AppError::NotFound("Job not found".into()));
        }

        if self.application_repo.has_applied(&actor.user_id, &job_id).await? {
            return Err(AppError::Conflict(DUPLICATE_APPLICATION.into()));
        }

        let insert = request.prepare_for_insert(actor.user_id);
        let id = self.application_repo.create_application(&insert).await?;

        tracing::info!(application_id = %id, %job_id, "Application submitted");
        Ok(ApplicationCreatedResponse {
            id,
            message: "Application submitted successfully".to_string(),
        })
    }

    /// Moves an application between review states. Only the admin of the
    /// company that owns the job may do this.
    #[instrument(skip(self, request), fields(actor = %actor.user_id))]
    pub async fn set_application_status(
        &self,
        actor: &Actor,
        application_id: Uuid,
        request: ApplicationStatusRequest,
    ) -> Result<Application, AppError> {
        actor.require_role(Role::CompanyAdmin)?;

        let ownership = self
            .application_repo
            .get_application_ownership(&application_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Application not found".into()))?;

        if ownership.company_admin_id != Some(actor.user_id) {
            tracing::warn!(
                user_id = %actor.user_id,
                %application_id,
                company_id = %ownership.company_id,
                "Application status change denied"
            );
            return Err(AppError::ForbiddenAccess);
        }

        let status: ApplicationStatus = request.status.parse()?;

        let application = self
            .application_repo
            .update_application_status(&application_id, status)
            .await?
            .ok_or_else(|| AppError::NotFound("Application not found".into()))?;

        tracing::info!(%application_id, %status, "Application status updated");
        Ok(application)
    }

    #[instrument(skip(self), fields(actor = %actor.user_id))]
    pub async fn list_for_job(&self, actor: &Actor, job_id: Uuid) -> Result<Vec<Application>, AppError> {
        actor.require_role(Role::CompanyAdmin)?;

        let job = self
            .job_repo
            .get_job(&job_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Job not found".into()))?;

        let owns_job = self
            .company_repo
            .get_company_by_admin(&actor.user_id)
            .await?
            .is_some_and(|company| company.id == job.company_id);
        if !owns_job {
            tracing::warn!(user_id = %actor.user_id, %job_id, "Application listing denied");
            return Err(AppError::ForbiddenAccess);
        }

        self.application_repo.list_applications_for_job(&job_id).await
    }

    #[instrument(skip(self), fields(actor = %actor.user_id))]
    pub async fn list_mine(&self, actor: &Actor) -> Result<Vec<Application>, AppError> {
        actor.require_role(Role::JobSeeker)?;
        self.application_repo.list_applications_for_user(&actor.user_id).await
    }

    /// Readable by the applicant, the owning company's admin, or a platform admin.
    #[instrument(skip(self), fields(actor = %actor.user_id))]
    pub async fn get_application(&self, actor: &Actor, application_id: Uuid) -> Result<Application, AppError> {
        let application = self
            .application_repo
            .get_application(&application_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Application not found".into()))?;

        if actor.is_admin() || application.user_id == actor.user_id {
            return Ok(application);
        }

        if actor.role == Role::CompanyAdmin {
            let owns = self
                .application_repo
                .get_application_ownership(&application_id)
                .await?
                .is_some_and(|o| o.company_admin_id == Some(actor.user_id));
            if owns {
                return Ok(application);
            }
        }

        Err(AppError::ForbiddenAccess)
    }
}
