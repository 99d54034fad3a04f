use async_trait::async_trait;
use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    entities::application::{Application, ApplicationInsert, ApplicationOwnership, ApplicationStatus},
    errors::AppError,
    repositories::sqlx_repo::{is_unique_violation, SqlxRepo},
};

pub const DUPLICATE_APPLICATION: &str = "You have already applied for this job";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn has_applied(&self, user_id: &Uuid, job_id: &Uuid) -> Result<bool, AppError>;
    /// Fails with `Conflict` when the (user, job) pair already has an application.
    async fn create_application(&self, application: &ApplicationInsert) -> Result<Uuid, AppError>;
    async fn get_application(&self, id: &Uuid) -> Result<Option<Application>, AppError>;
    async fn get_application_ownership(&self, id: &Uuid) -> Result<Option<ApplicationOwnership>, AppError>;
    async fn update_application_status(&self, id: &Uuid, status: ApplicationStatus) -> Result<Option<Application>, AppError>;
    async fn list_applications_for_job(&self, job_id: &Uuid) -> Result<Vec<Application>, AppError>;
    async fn list_applications_for_user(&self, user_id: &Uuid) -> Result<Vec<Application>, AppError>;
    async fn count_applications(&self) -> Result<i64, AppError>;
}

#[async_trait]
impl ApplicationRepository for SqlxRepo {
    async fn has_applied(&self, user_id: &Uuid, job_id: &Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM applications WHERE user_id = $1 AND job_id = $2)",
        )
        .bind(user_id)
        .bind(job_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn create_application(&self, application: &ApplicationInsert) -> Result<Uuid, AppError> {
        let request = &application.request;

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO applications (
                user_id, job_id, full_name, email, year_of_birth, address, phone, portfolio,
                profession, career_level, cover_letter, experiences, degree_type, institution,
                graduation_date, skills, certifications, languages, projects, volunteer_work,
                resume_url, status, created_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23
            )
            RETURNING id
            "#,
        )
        .bind(application.user_id)
        .bind(request.job_id)
        .bind(&request.full_name)
        .bind(&request.email)
        .bind(request.year_of_birth)
        .bind(&request.address)
        .bind(&request.phone)
        .bind(&request.portfolio)
        .bind(&request.profession)
        .bind(&request.career_level)
        .bind(&request.cover_letter)
        .bind(Json(&request.experiences))
        .bind(&request.degree_type)
        .bind(&request.institution)
        .bind(request.graduation_date)
        .bind(&request.skills)
        .bind(&request.certifications)
        .bind(&request.languages)
        .bind(&request.projects)
        .bind(&request.volunteer_work)
        .bind(&request.resume_url)
        .bind(application.status)
        .bind(application.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "applications_user_job_key") {
                AppError::Conflict(DUPLICATE_APPLICATION.to_string())
            } else {
                AppError::from(e)
            }
        })?;

        Ok(id)
    }

    async fn get_application(&self, id: &Uuid) -> Result<Option<Application>, AppError> {
        let application = sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(application)
    }

    async fn get_application_ownership(&self, id: &Uuid) -> Result<Option<ApplicationOwnership>, AppError> {
        let ownership = sqlx::query_as::<_, ApplicationOwnership>(
            r#"
            SELECT
                a.id AS application_id,
                a.user_id AS applicant_id,
                a.job_id,
                j.company_id,
                c.admin_id AS company_admin_id
            FROM applications a
            JOIN jobs j ON j.id = a.job_id
            JOIN companies c ON c.id = j.company_id
            WHERE a.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ownership)
    }

    async fn update_application_status(&self, id: &Uuid, status: ApplicationStatus) -> Result<Option<Application>, AppError> {
        let application = sqlx::query_as::<_, Application>(
            "UPDATE applications SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(application)
    }

    async fn list_applications_for_job(&self, job_id: &Uuid) -> Result<Vec<Application>, AppError> {
        let applications = sqlx::query_as::<_, Application>(
            "SELECT * FROM applications WHERE job_id = $1 ORDER BY created_at DESC",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(applications)
    }

    async fn list_applications_for_user(&self, user_id: &Uuid) -> Result<Vec<Application>, AppError> {
        let applications = sqlx::query_as::<_, Application>(
            "SELECT * FROM applications WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(applications)
    }

    async fn count_applications(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM applications")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
