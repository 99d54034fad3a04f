use std::sync::Arc;

use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::{
        actor::Actor,
        company::ApprovalStatus,
        job::{Job, JobFilter, JobInsert, JobListQuery, JobListResponse, JobSite, JobStatusRequest, NewJobRequest, UpdateJobRequest},
        user::Role,
    },
    errors::AppError,
    repositories::{company::CompanyRepository, job::JobRepository},
};

const DEFAULT_PER_PAGE: u32 = 20;
const MAX_PER_PAGE: u32 = 100;

pub struct JobHandler {
    pub job_repo: Arc<dyn JobRepository>,
    pub company_repo: Arc<dyn CompanyRepository>,
}

impl JobHandler {
    pub fn new(job_repo: Arc<dyn JobRepository>, company_repo: Arc<dyn CompanyRepository>) -> Self {
        JobHandler { job_repo, company_repo }
    }

    /// Posts a job for the caller's company. Only approved companies may post;
    /// the new job always starts PENDING whatever the payload says.
    #[instrument(skip(self, request), fields(actor = %actor.user_id))]
    pub async fn create_job(&self, actor: &Actor, request: NewJobRequest) -> Result<Job, AppError> {
        actor.require_role(Role::CompanyAdmin)?;

        let company = self
            .company_repo
            .get_company_by_admin(&actor.user_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!(user_id = %actor.user_id, "Company admin has no company");
                AppError::CompanyNotApproved
            })?;

        if company.status != ApprovalStatus::Approved {
            tracing::warn!(company_id = %company.id, status = %company.status, "Job posting blocked");
            return Err(AppError::CompanyNotApproved);
        }

        let content = request.into_content(Utc::now().date_naive())?;
        let insert = JobInsert {
            company_id: company.id,
            content,
            status: ApprovalStatus::Pending,
            created_at: Utc::now(),
        };

        let job = self.job_repo.create_job(&insert).await?;
        tracing::info!(job_id = %job.id, company_id = %company.id, "Job created");
        Ok(job)
    }

    /// Replaces every field of a job, including its value-lists.
    #[instrument(skip(self, request), fields(actor = %actor.user_id))]
    pub async fn update_job(&self, actor: &Actor, job_id: Uuid, request: UpdateJobRequest) -> Result<Job, AppError> {
        actor.require_role(Role::Admin)?;

        let update = request.into_update()?;

        if self.company_repo.get_company_by_id(&update.company_id).await?.is_none() {
            return Err(AppError::invalid_field("company_id", "Company does not exist"));
        }

        let job = self
            .job_repo
            .update_job(&job_id, &update)
            .await?
            .ok_or_else(|| AppError::NotFound("Job not found".into()))?;

        tracing::info!(%job_id, "Job updated");
        Ok(job)
    }

    #[instrument(skip(self, request), fields(actor = %actor.user_id))]
    pub async fn set_job_status(&self, actor: &Actor, job_id: Uuid, request: JobStatusRequest) -> Result<Job, AppError> {
        actor.require_role(Role::Admin)?;

        let status: ApprovalStatus = request.status.parse()?;

        let job = self
            .job_repo
            .update_job_status(&job_id, status)
            .await?
            .ok_or_else(|| AppError::NotFound("Job not found".into()))?;

        tracing::info!(%job_id, %status, "Job status updated");
        Ok(job)
    }

    /// Deletes the job together with its value-lists, applications and bookmarks.
    #[instrument(skip(self), fields(actor = %actor.user_id))]
    pub async fn delete_job(&self, actor: &Actor, job_id: Uuid) -> Result<(), AppError> {
        actor.require_role(Role::Admin)?;

        if !self.job_repo.delete_job(&job_id).await? {
            return Err(AppError::NotFound("Job not found".into()));
        }

        tracing::info!(%job_id, "Job deleted");
        Ok(())
    }

    /// Lists jobs newest first. Only admins see jobs that are not approved.
    #[instrument(skip(self, query))]
    pub async fn list_jobs(&self, actor: Option<&Actor>, query: JobListQuery) -> Result<JobListResponse, AppError> {
        let filter = Self::resolve_filter(actor, query)?;
        let jobs = self.job_repo.list_jobs(&filter).await?;

        Ok(JobListResponse {
            jobs,
            page: filter.page,
            per_page: filter.per_page,
        })
    }

    /// Non-approved jobs are reported as missing to everyone but admins.
    #[instrument(skip(self))]
    pub async fn get_job(&self, actor: Option<&Actor>, job_id: Uuid) -> Result<Job, AppError> {
        let job = self
            .job_repo
            .get_job(&job_id)
            .await?
            .filter(|job| actor.is_some_and(Actor::is_admin) || job.status == ApprovalStatus::Approved)
            .ok_or_else(|| AppError::NotFound("Job not found".into()))?;

        Ok(job)
    }

    fn resolve_filter(actor: Option<&Actor>, query: JobListQuery) -> Result<JobFilter, AppError> {
        let site = query
            .site
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<JobSite>)
            .transpose()?;

        let status = if actor.is_some_and(Actor::is_admin) {
            None
        } else {
            Some(ApprovalStatus::Approved)
        };

        Ok(JobFilter {
            status,
            company_id: None,
            area: query.area.map(|a| a.trim().to_string()).filter(|a| !a.is_empty()),
            site,
            page: query.page.unwrap_or(1).max(1),
            per_page: query.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    use crate::entities::company::Company;
    use crate::entities::job::JobContent;
    use crate::repositories::{company::MockCompanyRepository, job::MockJobRepository};

    fn company(status: ApprovalStatus, admin_id: Uuid) -> Company {
        Company {
            id: Uuid::new_v4(),
            name: "Acme".into(),
            admin_id: Some(admin_id),
            admin_email: "owner@acme.test".into(),
            address: "Addis Ababa".into(),
            logo: None,
            license_url: None,
            status,
            created_at: Utc::now(),
        }
    }

    fn job_from(insert: &JobInsert) -> Job {
        let content: &JobContent = &insert.content;
        Job {
            id: Uuid::new_v4(),
            title: content.title.clone(),
            company_id: insert.company_id,
            company_name: "Acme".into(),
            area: content.area.clone(),
            location: content.location.clone(),
            deadline: content.deadline,
            site: content.site,
            about_job: content.about_job.clone(),
            status: insert.status,
            created_at: insert.created_at,
            qualifications: content.qualifications.clone(),
            responsibilities: content.responsibilities.clone(),
            required_skills: content.required_skills.clone(),
            application_count: 0,
        }
    }

    fn request() -> NewJobRequest {
        NewJobRequest {
            title: "Backend Engineer".into(),
            area: "Engineering".into(),
            location: "Addis Ababa".into(),
            deadline: (Utc::now().date_naive() + Duration::days(30)).format("%Y-%m-%d").to_string(),
            site: "Full_time".into(),
            about_job: "Build the hiring platform".into(),
            qualifications: vec!["BSc".into()],
            responsibilities: vec!["Ship features".into()],
            required_skills: vec!["Rust".into()],
            status: Some("APPROVED".into()),
        }
    }

    fn handler(jobs: MockJobRepository, companies: MockCompanyRepository) -> JobHandler {
        JobHandler::new(Arc::new(jobs), Arc::new(companies))
    }

    #[tokio::test]
    async fn approved_company_creates_pending_job() {
        let admin_id = Uuid::new_v4();
        let mut companies = MockCompanyRepository::new();
        companies.expect_get_company_by_admin()
            .returning(move |_| Ok(Some(company(ApprovalStatus::Approved, admin_id))));

        let mut jobs = MockJobRepository::new();
        jobs.expect_create_job()
            .withf(|insert| insert.status == ApprovalStatus::Pending)
            .times(1)
            .returning(|insert| Ok(job_from(insert)));

        let actor = Actor::new(admin_id, Role::CompanyAdmin, None);
        let job = handler(jobs, companies).create_job(&actor, request()).await.unwrap();

        assert_eq!(job.status, ApprovalStatus::Pending);
        assert_eq!(job.site, JobSite::FullTime);
    }

    #[tokio::test]
    async fn pending_or_rejected_company_cannot_post() {
        for status in [ApprovalStatus::Pending, ApprovalStatus::Rejected] {
            let admin_id = Uuid::new_v4();
            let mut companies = MockCompanyRepository::new();
            companies.expect_get_company_by_admin()
                .returning(move |_| Ok(Some(company(status, admin_id))));

            let actor = Actor::new(admin_id, Role::CompanyAdmin, None);
            let result = handler(MockJobRepository::new(), companies).create_job(&actor, request()).await;

            assert!(matches!(result, Err(AppError::CompanyNotApproved)));
        }
    }

    #[tokio::test]
    async fn job_seeker_cannot_post_jobs() {
        let actor = Actor::new(Uuid::new_v4(), Role::JobSeeker, None);
        let result = handler(MockJobRepository::new(), MockCompanyRepository::new())
            .create_job(&actor, request())
            .await;

        assert!(matches!(result, Err(AppError::ForbiddenAccess)));
    }

    #[tokio::test]
    async fn invalid_job_status_is_a_validation_error() {
        let actor = Actor::new(Uuid::new_v4(), Role::Admin, None);
        let result = handler(MockJobRepository::new(), MockCompanyRepository::new())
            .set_job_status(&actor, Uuid::new_v4(), JobStatusRequest { status: "ARCHIVED".into() })
            .await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn listing_filter_hides_unapproved_jobs_from_non_admins() {
        let seeker = Actor::new(Uuid::new_v4(), Role::JobSeeker, None);
        let admin = Actor::new(Uuid::new_v4(), Role::Admin, None);

        let anonymous = JobHandler::resolve_filter(None, JobListQuery::default()).unwrap();
        assert_eq!(anonymous.status, Some(ApprovalStatus::Approved));
        assert_eq!(anonymous.per_page, DEFAULT_PER_PAGE);

        let seeker_filter = JobHandler::resolve_filter(Some(&seeker), JobListQuery::default()).unwrap();
        assert_eq!(seeker_filter.status, Some(ApprovalStatus::Approved));

        let admin_filter = JobHandler::resolve_filter(
            Some(&admin),
            JobListQuery { per_page: Some(1000), page: Some(0), ..Default::default() },
        )
        .unwrap();
        assert_eq!(admin_filter.status, None);
        assert_eq!(admin_filter.per_page, MAX_PER_PAGE);
        assert_eq!(admin_filter.page, 1);
    }

    #[tokio::test]
    async fn non_admins_do_not_see_pending_job_detail() {
        let pending = job_from(&JobInsert {
            company_id: Uuid::new_v4(),
            content: JobContent {
                title: "Designer".into(),
                area: "Design".into(),
                location: "Remote".into(),
                deadline: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
                site: JobSite::Freelance,
                about_job: "Design things".into(),
                qualifications: vec![],
                responsibilities: vec![],
                required_skills: vec![],
            },
            status: ApprovalStatus::Pending,
            created_at: Utc::now(),
        });

        let mut jobs = MockJobRepository::new();
        jobs.expect_get_job().returning(move |_| Ok(Some(pending.clone())));
        let handler = handler(jobs, MockCompanyRepository::new());

        let seeker = Actor::new(Uuid::new_v4(), Role::JobSeeker, None);
        let admin = Actor::new(Uuid::new_v4(), Role::Admin, None);

        assert!(matches!(handler.get_job(Some(&seeker), Uuid::new_v4()).await, Err(AppError::NotFound(_))));
        assert!(matches!(handler.get_job(None, Uuid::new_v4()).await, Err(AppError::NotFound(_))));
        assert!(handler.get_job(Some(&admin), Uuid::new_v4()).await.is_ok());
    }
}
