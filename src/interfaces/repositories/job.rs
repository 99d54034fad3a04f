use async_trait::async_trait;
use sqlx::{PgConnection, QueryBuilder};
use uuid::Uuid;

use crate::{
    db::postgres::with_transaction,
    entities::{
        company::ApprovalStatus,
        dashboard::StatusCounts,
        job::{Job, JobContent, JobFilter, JobInsert, JobUpdate},
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxRepo,
};

/// Child value-list tables owned by a job, in deletion order.
const VALUE_LIST_TABLES: [&str; 3] = [
    "job_qualifications",
    "job_responsibilities",
    "job_required_skills",
];

pub(crate) const JOB_SELECT: &str = r#"
    SELECT
        j.id, j.title, j.company_id, c.name AS company_name, j.area, j.location,
        j.deadline, j.site, j.about_job, j.status, j.created_at,
        ARRAY(SELECT q.value FROM job_qualifications q WHERE q.job_id = j.id ORDER BY q.position) AS qualifications,
        ARRAY(SELECT r.value FROM job_responsibilities r WHERE r.job_id = j.id ORDER BY r.position) AS responsibilities,
        ARRAY(SELECT s.value FROM job_required_skills s WHERE s.job_id = j.id ORDER BY s.position) AS required_skills,
        (SELECT COUNT(*) FROM applications a WHERE a.job_id = j.id) AS application_count
    FROM jobs j
    JOIN companies c ON c.id = j.company_id
"#;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Inserts the job and its value-lists atomically.
    async fn create_job(&self, job: &JobInsert) -> Result<Job, AppError>;
    async fn get_job(&self, id: &Uuid) -> Result<Option<Job>, AppError>;
    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>, AppError>;
    /// Replaces scalar fields and all three value-lists in one transaction.
    /// Returns `None` when the job does not exist.
    async fn update_job(&self, id: &Uuid, update: &JobUpdate) -> Result<Option<Job>, AppError>;
    async fn update_job_status(&self, id: &Uuid, status: ApprovalStatus) -> Result<Option<Job>, AppError>;
    /// Deletes value-lists, applications, bookmarks and the job as one unit.
    /// Returns `false` when the job did not exist.
    async fn delete_job(&self, id: &Uuid) -> Result<bool, AppError>;
    async fn count_jobs_by_status(&self) -> Result<StatusCounts, AppError>;
}

/// `ILIKE` pattern matching `needle` anywhere, with its own wildcards taken literally.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

async fn fetch_job(conn: &mut PgConnection, id: Uuid) -> Result<Option<Job>, AppError> {
    let job = sqlx::query_as::<_, Job>(&format!("{JOB_SELECT} WHERE j.id = $1"))
        .bind(id)
        .fetch_optional(conn)
        .await?;

    Ok(job)
}

async fn insert_value_lists(conn: &mut PgConnection, job_id: Uuid, content: &JobContent) -> Result<(), AppError> {
    let lists = [
        &content.qualifications,
        &content.responsibilities,
        &content.required_skills,
    ];

    for (table, values) in VALUE_LIST_TABLES.iter().zip(lists) {
        if values.is_empty() {
            continue;
        }
        sqlx::query(&format!(
            r#"
            INSERT INTO {table} (job_id, position, value)
            SELECT $1, t.ord::int, t.value
            FROM UNNEST($2::text[]) WITH ORDINALITY AS t(value, ord)
            "#
        ))
        .bind(job_id)
        .bind(values)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

async fn delete_value_lists(conn: &mut PgConnection, job_id: Uuid) -> Result<(), AppError> {
    for table in VALUE_LIST_TABLES {
        sqlx::query(&format!("DELETE FROM {table} WHERE job_id = $1"))
            .bind(job_id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

#[async_trait]
impl JobRepository for SqlxRepo {
    async fn create_job(&self, job: &JobInsert) -> Result<Job, AppError> {
        let job = job.clone();

        with_transaction(&self.pool, move |conn| Box::pin(async move {
            let content = &job.content;
            let id: Uuid = sqlx::query_scalar(
                r#"
                INSERT INTO jobs (title, company_id, area, location, deadline, site, about_job, status, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING id
                "#,
            )
            .bind(&content.title)
            .bind(job.company_id)
            .bind(&content.area)
            .bind(&content.location)
            .bind(content.deadline)
            .bind(content.site)
            .bind(&content.about_job)
            .bind(job.status)
            .bind(job.created_at)
            .fetch_one(&mut *conn)
            .await?;

            insert_value_lists(&mut *conn, id, content).await?;

            fetch_job(&mut *conn, id)
                .await?
                .ok_or_else(|| AppError::InternalError("Created job could not be read back".into()))
        }))
        .await
    }

    async fn get_job(&self, id: &Uuid) -> Result<Option<Job>, AppError> {
        let mut conn = self.pool.acquire().await?;
        fetch_job(&mut conn, *id).await
    }

    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>, AppError> {
        let mut builder = QueryBuilder::new(JOB_SELECT);
        builder.push(" WHERE TRUE");

        if let Some(status) = filter.status {
            builder.push(" AND j.status = ").push_bind(status);
        }
        if let Some(company_id) = filter.company_id {
            builder.push(" AND j.company_id = ").push_bind(company_id);
        }
        if let Some(area) = &filter.area {
            builder
                .push(" AND j.area ILIKE ")
                .push_bind(contains_pattern(area))
                .push(r" ESCAPE '\'");
        }
        if let Some(site) = filter.site {
            builder.push(" AND j.site = ").push_bind(site);
        }

        builder.push(" ORDER BY j.created_at DESC");
        builder.push(" LIMIT ").push_bind(filter.per_page as i64);
        builder.push(" OFFSET ").push_bind(filter.offset());

        let jobs = builder
            .build_query_as::<Job>()
            .fetch_all(&self.pool)
            .await?;

        Ok(jobs)
    }

    async fn update_job(&self, id: &Uuid, update: &JobUpdate) -> Result<Option<Job>, AppError> {
        let id = *id;
        let update = update.clone();

        with_transaction(&self.pool, move |conn| Box::pin(async move {
            let content = &update.content;
            let result = sqlx::query(
                r#"
                UPDATE jobs SET
                    title = $2,
                    company_id = $3,
                    area = $4,
                    location = $5,
                    deadline = $6,
                    site = $7,
                    about_job = $8,
                    status = $9
                WHERE id = $1
                "#,
            )
            .bind(id)
            .bind(&content.title)
            .bind(update.company_id)
            .bind(&content.area)
            .bind(&content.location)
            .bind(content.deadline)
            .bind(content.site)
            .bind(&content.about_job)
            .bind(update.status)
            .execute(&mut *conn)
            .await?;

            if result.rows_affected() == 0 {
                return Ok(None);
            }

            delete_value_lists(&mut *conn, id).await?;
            insert_value_lists(&mut *conn, id, content).await?;

            fetch_job(&mut *conn, id).await
        }))
        .await
    }

    async fn update_job_status(&self, id: &Uuid, status: ApprovalStatus) -> Result<Option<Job>, AppError> {
        let result = sqlx::query("UPDATE jobs SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_job(id).await
    }

    async fn delete_job(&self, id: &Uuid) -> Result<bool, AppError> {
        let id = *id;

        with_transaction(&self.pool, move |conn| Box::pin(async move {
            delete_value_lists(&mut *conn, id).await?;

            for table in ["applications", "bookmarks"] {
                sqlx::query(&format!("DELETE FROM {table} WHERE job_id = $1"))
                    .bind(id)
                    .execute(&mut *conn)
                    .await?;
            }

            let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
                .bind(id)
                .execute(&mut *conn)
                .await?;

            Ok(result.rows_affected() > 0)
        }))
        .await
    }

    async fn count_jobs_by_status(&self) -> Result<StatusCounts, AppError> {
        let rows = sqlx::query_as::<_, (ApprovalStatus, i64)>(
            "SELECT status, COUNT(*) FROM jobs GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(StatusCounts::from_rows(rows))
    }
}
