use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::postgres::with_transaction,
    entities::{
        company::{ApprovalStatus, Company, CompanyInsert},
        dashboard::StatusCounts,
        user::Role,
    },
    errors::AppError,
    repositories::sqlx_repo::{is_unique_violation, SqlxRepo},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Creates the company admin account and the company (status PENDING)
    /// as one unit of work. Returns the new company.
    async fn register_company(&self, company: &CompanyInsert) -> Result<Company, AppError>;
    async fn get_company_by_id(&self, id: &Uuid) -> Result<Option<Company>, AppError>;
    async fn get_company_by_admin(&self, admin_id: &Uuid) -> Result<Option<Company>, AppError>;
    async fn list_companies(&self, status: Option<ApprovalStatus>) -> Result<Vec<Company>, AppError>;
    /// Returns `None` when the company does not exist.
    async fn update_company_status(&self, id: &Uuid, status: ApprovalStatus) -> Result<Option<Company>, AppError>;
    /// Deletes the owning admin user and the company together. Jobs and their
    /// children go with the company through foreign-key cascades.
    /// Returns the deleted company, or `None` when it did not exist.
    async fn delete_company(&self, id: &Uuid) -> Result<Option<Company>, AppError>;
    async fn count_companies_by_status(&self) -> Result<StatusCounts, AppError>;
}

#[async_trait]
impl CompanyRepository for SqlxRepo {
    async fn register_company(&self, company: &CompanyInsert) -> Result<Company, AppError> {
        let company = company.clone();

        with_transaction(&self.pool, move |conn| Box::pin(async move {
            let admin_id: Uuid = sqlx::query_scalar(
                r#"
                INSERT INTO users (name, email, password_hash, role, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $5)
                RETURNING id
                "#,
            )
            .bind(&company.admin_name)
            .bind(&company.admin_email)
            .bind(&company.password_hash)
            .bind(Role::CompanyAdmin)
            .bind(company.created_at)
            .fetch_one(&mut *conn)
            .await
            .map_err(map_registration_conflict)?;

            let created = sqlx::query_as::<_, Company>(
                r#"
                INSERT INTO companies (name, admin_id, admin_email, address, logo, license_url, status, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *
                "#,
            )
            .bind(&company.name)
            .bind(admin_id)
            .bind(&company.admin_email)
            .bind(&company.address)
            .bind(&company.logo)
            .bind(&company.license_url)
            .bind(ApprovalStatus::Pending)
            .bind(company.created_at)
            .fetch_one(&mut *conn)
            .await
            .map_err(map_registration_conflict)?;

            sqlx::query("UPDATE users SET company_id = $1, updated_at = NOW() WHERE id = $2")
                .bind(created.id)
                .bind(admin_id)
                .execute(&mut *conn)
                .await?;

            Ok(created)
        }))
        .await
    }

    async fn get_company_by_id(&self, id: &Uuid) -> Result<Option<Company>, AppError> {
        let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(company)
    }

    async fn get_company_by_admin(&self, admin_id: &Uuid) -> Result<Option<Company>, AppError> {
        let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE admin_id = $1")
            .bind(admin_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(company)
    }

    async fn list_companies(&self, status: Option<ApprovalStatus>) -> Result<Vec<Company>, AppError> {
        let companies = sqlx::query_as::<_, Company>(
            r#"
            SELECT * FROM companies
            WHERE ($1::approval_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(companies)
    }

    async fn update_company_status(&self, id: &Uuid, status: ApprovalStatus) -> Result<Option<Company>, AppError> {
        let company = sqlx::query_as::<_, Company>(
            "UPDATE companies SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(company)
    }

    async fn delete_company(&self, id: &Uuid) -> Result<Option<Company>, AppError> {
        let id = *id;

        with_transaction(&self.pool, move |conn| Box::pin(async move {
            let company = sqlx::query_as::<_, Company>(
                "SELECT * FROM companies WHERE id = $1 FOR UPDATE",
            )
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

            let Some(company) = company else {
                return Ok(None);
            };

            if let Some(admin_id) = company.admin_id {
                sqlx::query("DELETE FROM users WHERE id = $1")
                    .bind(admin_id)
                    .execute(&mut *conn)
                    .await?;
            }

            sqlx::query("DELETE FROM companies WHERE id = $1")
                .bind(id)
                .execute(&mut *conn)
                .await?;

            Ok(Some(company))
        }))
        .await
    }

    async fn count_companies_by_status(&self) -> Result<StatusCounts, AppError> {
        let rows = sqlx::query_as::<_, (ApprovalStatus, i64)>(
            "SELECT status, COUNT(*) FROM companies GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(StatusCounts::from_rows(rows))
    }
}

fn map_registration_conflict(err: sqlx::Error) -> AppError {
    if is_unique_violation(&err, "users_email_key") || is_unique_violation(&err, "companies_admin_email_key") {
        AppError::Conflict("An account with this email already exists".to_string())
    } else {
        AppError::from(err)
    }
}
