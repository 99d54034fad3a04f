use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    entities::validation::{validate_no_blank_entries, validate_not_blank, validate_phone, validate_url},
    errors::AppError,
};

const MAX_SHORT_LIST: u64 = 5;
const MAX_EXPERIENCES: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "application_status")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Reviewed => "Reviewed",
            ApplicationStatus::Accepted => "Accepted",
            ApplicationStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Pending" => Ok(ApplicationStatus::Pending),
            "Reviewed" => Ok(ApplicationStatus::Reviewed),
            "Accepted" => Ok(ApplicationStatus::Accepted),
            "Rejected" => Ok(ApplicationStatus::Rejected),
            _ => Err(AppError::invalid_field(
                "status",
                "Status must be one of Pending, Reviewed, Accepted, Rejected",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Experience {
    #[validate(custom(function = "validate_not_blank"))]
    pub job_title: String,

    #[validate(custom(function = "validate_not_blank"))]
    pub company_name: String,

    #[validate(custom(function = "validate_not_blank"))]
    pub location: String,

    #[validate(custom(function = "validate_not_blank"))]
    pub responsibilities: String,
}

impl Experience {
    fn is_complete(&self) -> bool {
        [&self.job_title, &self.company_name, &self.location, &self.responsibilities]
            .iter()
            .all(|v| !v.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Application {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub year_of_birth: i32,
    pub address: String,
    pub phone: String,
    pub portfolio: Option<String>,
    pub profession: String,
    pub career_level: String,
    pub cover_letter: String,
    pub experiences: Json<Vec<Experience>>,
    pub degree_type: String,
    pub institution: String,
    pub graduation_date: NaiveDate,
    pub skills: Vec<String>,
    pub certifications: Vec<String>,
    pub languages: Vec<String>,
    pub projects: Option<String>,
    pub volunteer_work: Option<String>,
    pub resume_url: Option<String>,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewApplicationRequest {
    pub job_id: Uuid,

    #[validate(length(min = 2, max = 120, message = "Full name must be between 2 and 120 characters"))]
    pub full_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = "validate_year_of_birth"))]
    pub year_of_birth: i32,

    #[validate(custom(function = "validate_not_blank"), length(max = 255))]
    pub address: String,

    #[validate(custom(function = "validate_phone"))]
    pub phone: String,

    #[validate(custom(function = "validate_url"))]
    pub portfolio: Option<String>,

    #[validate(custom(function = "validate_not_blank"), length(max = 120))]
    pub profession: String,

    #[validate(custom(function = "validate_not_blank"), length(max = 60))]
    pub career_level: String,

    #[validate(length(min = 20, max = 5000, message = "Cover letter must be between 20 and 5000 characters"))]
    pub cover_letter: String,

    #[validate(
        length(min = 1, max = MAX_EXPERIENCES, message = "At least one work experience is required"),
        custom(function = "validate_experiences")
    )]
    pub experiences: Vec<Experience>,

    #[validate(custom(function = "validate_not_blank"))]
    pub degree_type: String,

    #[validate(custom(function = "validate_not_blank"))]
    pub institution: String,

    pub graduation_date: NaiveDate,

    #[validate(
        length(max = MAX_SHORT_LIST, message = "At most 5 skills"),
        custom(function = "validate_no_blank_entries")
    )]
    #[serde(default)]
    pub skills: Vec<String>,

    #[validate(
        length(max = MAX_SHORT_LIST, message = "At most 5 certifications"),
        custom(function = "validate_no_blank_entries")
    )]
    #[serde(default)]
    pub certifications: Vec<String>,

    #[validate(
        length(max = MAX_SHORT_LIST, message = "At most 5 languages"),
        custom(function = "validate_no_blank_entries")
    )]
    #[serde(default)]
    pub languages: Vec<String>,

    #[serde(default)]
    pub projects: Option<String>,

    #[serde(default)]
    pub volunteer_work: Option<String>,

    #[validate(custom(function = "validate_url"))]
    #[serde(default)]
    pub resume_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApplicationInsert {
    pub user_id: Uuid,
    pub request: NewApplicationRequest,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

impl NewApplicationRequest {
    pub fn prepare_for_insert(self, user_id: Uuid) -> ApplicationInsert {
        ApplicationInsert {
            user_id,
            request: self,
            status: ApplicationStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApplicationCreatedResponse {
    pub id: Uuid,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationStatusRequest {
    pub status: String,
}

/// Resolves an application to the admin of the company owning its job.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApplicationOwnership {
    pub application_id: Uuid,
    pub applicant_id: Uuid,
    pub job_id: Uuid,
    pub company_id: Uuid,
    pub company_admin_id: Option<Uuid>,
}

// ───── Validation Helpers ───────────────────────────────────────────

fn validate_year_of_birth(year: i32) -> Result<(), ValidationError> {
    let current = Utc::now().year();
    if (1900..=current - 14).contains(&year) {
        Ok(())
    } else {
        let mut err = ValidationError::new("year_of_birth");
        err.message = Some("Year of birth is out of range".into());
        Err(err)
    }
}

fn validate_experiences(experiences: &[Experience]) -> Result<(), ValidationError> {
    if !experiences.iter().any(Experience::is_complete) {
        let mut err = ValidationError::new("experiences");
        err.message = Some("At least one complete work experience is required".into());
        return Err(err);
    }
    if experiences.iter().any(|e| e.validate().is_err()) {
        let mut err = ValidationError::new("experiences");
        err.message = Some("Every work experience needs a title, company, location and responsibilities".into());
        return Err(err);
    }
    Ok(())
}
