use std::sync::Arc;

use tracing::instrument;

use crate::{
    entities::{
        actor::Actor,
        dashboard::{AdminDashboard, CompanyDashboard},
        job::JobFilter,
        user::Role,
    },
    errors::AppError,
    repositories::{
        application::ApplicationRepository,
        company::CompanyRepository,
        job::JobRepository,
        user::UserRepository,
    },
};

const COMPANY_DASHBOARD_JOB_LIMIT: u32 = 500;

pub struct DashboardHandler {
    pub user_repo: Arc<dyn UserRepository>,
    pub company_repo: Arc<dyn CompanyRepository>,
    pub job_repo: Arc<dyn JobRepository>,
    pub application_repo: Arc<dyn ApplicationRepository>,
}

impl DashboardHandler {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        company_repo: Arc<dyn CompanyRepository>,
        job_repo: Arc<dyn JobRepository>,
        application_repo: Arc<dyn ApplicationRepository>,
    ) -> Self {
        DashboardHandler { user_repo, company_repo, job_repo, application_repo }
    }

    #[instrument(skip(self), fields(actor = %actor.user_id))]
    pub async fn admin_dashboard(&self, actor: &Actor) -> Result<AdminDashboard, AppError> {
        actor.require_role(Role::Admin)?;

        Ok(AdminDashboard {
            users: self.user_repo.count_users().await?,
            companies: self.company_repo.count_companies_by_status().await?,
            jobs: self.job_repo.count_jobs_by_status().await?,
            applications: self.application_repo.count_applications().await?,
        })
    }

    /// The caller's company with all of its jobs, whatever their status.
    #[instrument(skip(self), fields(actor = %actor.user_id))]
    pub async fn company_dashboard(&self, actor: &Actor) -> Result<CompanyDashboard, AppError> {
        actor.require_role(Role::CompanyAdmin)?;

        let company = self
            .company_repo
            .get_company_by_admin(&actor.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Company not found".into()))?;

        let filter = JobFilter {
            status: None,
            company_id: Some(company.id),
            area: None,
            site: None,
            page: 1,
            per_page: COMPANY_DASHBOARD_JOB_LIMIT,
        };
        let jobs = self.job_repo.list_jobs(&filter).await?;
        let total_applications = jobs.iter().map(|job| job.application_count).sum();

        Ok(CompanyDashboard { company, jobs, total_applications })
    }
}
