use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{
        company::ApprovalStatus,
        validation::{validate_no_blank_entries, validate_not_blank, validate_required_entries},
    },
    errors::{AppError, FieldError},
};

// ───── Constants ──────────────────────────────────────────────────────
const MAX_TITLE_LENGTH: u64 = 150;
const MAX_LIST_ENTRIES: u64 = 30;
const MAX_ABOUT_LENGTH: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_site")]
pub enum JobSite {
    #[sqlx(rename = "Full_time")]
    #[serde(rename = "Full_time")]
    FullTime,
    #[sqlx(rename = "Part_time")]
    #[serde(rename = "Part_time")]
    PartTime,
    Freelance,
}

impl JobSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobSite::FullTime => "Full_time",
            JobSite::PartTime => "Part_time",
            JobSite::Freelance => "Freelance",
        }
    }
}

impl fmt::Display for JobSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobSite {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Full_time" => Ok(JobSite::FullTime),
            "Part_time" => Ok(JobSite::PartTime),
            "Freelance" => Ok(JobSite::Freelance),
            _ => Err(AppError::invalid_field(
                "site",
                "Site must be one of Full_time, Part_time, Freelance",
            )),
        }
    }
}

// ───── Database Models ───────────────────────────────────────────────

/// A job with its owned value-lists and the number of applications received.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub company_id: Uuid,
    pub company_name: String,
    pub area: String,
    pub location: String,
    pub deadline: NaiveDate,
    pub site: JobSite,
    pub about_job: String,
    pub status: ApprovalStatus,
    pub created_at: DateTime<Utc>,
    pub qualifications: Vec<String>,
    pub responsibilities: Vec<String>,
    pub required_skills: Vec<String>,
    pub application_count: i64,
}

/// Fully-typed job content, shared by creation and admin edits.
#[derive(Debug, Clone, PartialEq)]
pub struct JobContent {
    pub title: String,
    pub area: String,
    pub location: String,
    pub deadline: NaiveDate,
    pub site: JobSite,
    pub about_job: String,
    pub qualifications: Vec<String>,
    pub responsibilities: Vec<String>,
    pub required_skills: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct JobInsert {
    pub company_id: Uuid,
    pub content: JobContent,
    pub status: ApprovalStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct JobUpdate {
    pub company_id: Uuid,
    pub content: JobContent,
    pub status: ApprovalStatus,
}

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewJobRequest {
    #[validate(custom(function = "validate_not_blank"), length(max = MAX_TITLE_LENGTH))]
    pub title: String,

    #[validate(custom(function = "validate_not_blank"), length(max = 100))]
    pub area: String,

    #[validate(custom(function = "validate_not_blank"), length(max = 150))]
    pub location: String,

    /// `YYYY-MM-DD`
    pub deadline: String,

    pub site: String,

    #[validate(custom(function = "validate_not_blank"), length(max = MAX_ABOUT_LENGTH))]
    pub about_job: String,

    #[serde(default)]
    #[validate(length(max = MAX_LIST_ENTRIES), custom(function = "validate_no_blank_entries"))]
    pub qualifications: Vec<String>,

    #[serde(default)]
    #[validate(length(max = MAX_LIST_ENTRIES), custom(function = "validate_no_blank_entries"))]
    pub responsibilities: Vec<String>,

    #[serde(default)]
    #[validate(length(max = MAX_LIST_ENTRIES), custom(function = "validate_no_blank_entries"))]
    pub required_skills: Vec<String>,

    /// Ignored: new jobs always start as PENDING.
    #[serde(default)]
    pub status: Option<String>,
}

impl NewJobRequest {
    /// Validates the payload and resolves typed fields. Creation additionally
    /// requires the deadline not to be in the past.
    pub fn into_content(self, today: NaiveDate) -> Result<JobContent, AppError> {
        let mut errors = field_errors(self.validate());

        let deadline = parse_deadline(&self.deadline, &mut errors);
        if let Some(date) = deadline {
            if date < today {
                errors.push(FieldError {
                    field: "deadline".into(),
                    message: "Deadline cannot be in the past".into(),
                });
            }
        }
        let site = parse_field::<JobSite>(&self.site, &mut errors);

        match (deadline, site) {
            (Some(deadline), Some(site)) if errors.is_empty() => Ok(JobContent {
                title: self.title.trim().to_string(),
                area: self.area.trim().to_string(),
                location: self.location.trim().to_string(),
                deadline,
                site,
                about_job: self.about_job,
                qualifications: trim_all(self.qualifications),
                responsibilities: trim_all(self.responsibilities),
                required_skills: trim_all(self.required_skills),
            }),
            _ => Err(AppError::ValidationError(errors)),
        }
    }
}

/// Admin edit: every field is required and replaces the stored value.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateJobRequest {
    #[validate(custom(function = "validate_not_blank"), length(max = MAX_TITLE_LENGTH))]
    pub title: String,

    pub company_id: Uuid,

    #[validate(custom(function = "validate_not_blank"), length(max = 100))]
    pub area: String,

    #[validate(custom(function = "validate_not_blank"), length(max = 150))]
    pub location: String,

    pub deadline: String,

    pub site: String,

    #[validate(custom(function = "validate_not_blank"), length(max = MAX_ABOUT_LENGTH))]
    pub about_job: String,

    pub status: String,

    #[validate(length(max = MAX_LIST_ENTRIES), custom(function = "validate_required_entries"))]
    pub qualifications: Vec<String>,

    #[validate(length(max = MAX_LIST_ENTRIES), custom(function = "validate_required_entries"))]
    pub responsibilities: Vec<String>,

    #[validate(length(max = MAX_LIST_ENTRIES), custom(function = "validate_required_entries"))]
    pub required_skills: Vec<String>,
}

impl UpdateJobRequest {
    pub fn into_update(self) -> Result<JobUpdate, AppError> {
        let mut errors = field_errors(self.validate());

        let deadline = parse_deadline(&self.deadline, &mut errors);
        let site = parse_field::<JobSite>(&self.site, &mut errors);
        let status = parse_field::<ApprovalStatus>(&self.status, &mut errors);

        match (deadline, site, status) {
            (Some(deadline), Some(site), Some(status)) if errors.is_empty() => Ok(JobUpdate {
                company_id: self.company_id,
                status,
                content: JobContent {
                    title: self.title.trim().to_string(),
                    area: self.area.trim().to_string(),
                    location: self.location.trim().to_string(),
                    deadline,
                    site,
                    about_job: self.about_job,
                    qualifications: trim_all(self.qualifications),
                    responsibilities: trim_all(self.responsibilities),
                    required_skills: trim_all(self.required_skills),
                },
            }),
            _ => Err(AppError::ValidationError(errors)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusRequest {
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub area: Option<String>,
    pub site: Option<String>,
}

/// Resolved listing filter handed to the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct JobFilter {
    /// `None` lists every status (admin view).
    pub status: Option<ApprovalStatus>,
    pub company_id: Option<Uuid>,
    pub area: Option<String>,
    pub site: Option<JobSite>,
    pub page: u32,
    pub per_page: u32,
}

impl JobFilter {
    pub fn offset(&self) -> i64 {
        (self.page.saturating_sub(1) as i64) * (self.per_page as i64)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobListResponse {
    pub jobs: Vec<Job>,
    pub page: u32,
    pub per_page: u32,
}

// ───── Validation Helpers ───────────────────────────────────────────

fn field_errors(result: Result<(), validator::ValidationErrors>) -> Vec<FieldError> {
    match result {
        Ok(()) => Vec::new(),
        Err(errors) => match AppError::from(errors) {
            AppError::ValidationError(fields) => fields,
            _ => Vec::new(),
        },
    }
}

fn parse_deadline(raw: &str, errors: &mut Vec<FieldError>) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(FieldError {
                field: "deadline".into(),
                message: "Deadline must be a valid date (YYYY-MM-DD)".into(),
            });
            None
        }
    }
}

fn parse_field<T>(raw: &str, errors: &mut Vec<FieldError>) -> Option<T>
where
    T: FromStr<Err = AppError>,
{
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(AppError::ValidationError(fields)) => {
            errors.extend(fields);
            None
        }
        Err(other) => {
            errors.push(FieldError { field: "payload".into(), message: other.to_string() });
            None
        }
    }
}

fn trim_all(values: Vec<String>) -> Vec<String> {
    values.into_iter().map(|v| v.trim().to_string()).collect()
}
