use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::password::validate_password_strength,
    entities::validation::{validate_not_blank, validate_url},
    errors::AppError,
};

/// Approval state shared by companies and jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "approval_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "PENDING",
            ApprovalStatus::Approved => "APPROVED",
            ApprovalStatus::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApprovalStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Ok(ApprovalStatus::Pending),
            "APPROVED" => Ok(ApprovalStatus::Approved),
            "REJECTED" => Ok(ApprovalStatus::Rejected),
            _ => Err(AppError::invalid_field(
                "status",
                "Status must be one of PENDING, APPROVED, REJECTED",
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub admin_id: Option<Uuid>,
    pub admin_email: String,
    pub address: String,
    pub logo: Option<String>,
    pub license_url: Option<String>,
    pub status: ApprovalStatus,
    pub created_at: DateTime<Utc>,
}

/// Company registration: creates the company admin account and the
/// company itself in one unit of work.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewCompanyRequest {
    #[validate(length(min = 2, max = 120, message = "Company name must be between 2 and 120 characters"))]
    pub name: String,

    #[validate(length(min = 2, max = 100, message = "Admin name must be between 2 and 100 characters"))]
    pub admin_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub admin_email: String,

    #[validate(
        length(min = 8, message = "Must be at least 8 characters"),
        custom(function = "validate_password_strength")
    )]
    pub password: String,

    #[validate(custom(function = "validate_not_blank"), length(max = 255))]
    pub address: String,

    #[validate(custom(function = "validate_url"))]
    pub logo: Option<String>,

    #[validate(custom(function = "validate_url"))]
    pub license_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CompanyInsert {
    pub name: String,
    pub admin_name: String,
    pub admin_email: String,
    pub password_hash: String,
    pub address: String,
    pub logo: Option<String>,
    pub license_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewCompanyRequest {
    /// Registration always starts in `PENDING`; the status is not part of the insert.
    pub fn prepare_for_insert(&self, password_hash: String) -> CompanyInsert {
        CompanyInsert {
            name: self.name.trim().to_string(),
            admin_name: self.admin_name.trim().to_string(),
            admin_email: self.admin_email.trim().to_lowercase(),
            password_hash,
            address: self.address.trim().to_string(),
            logo: self.logo.clone(),
            license_url: self.license_url.clone(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompanyRegisteredResponse {
    pub company_id: Uuid,
    pub admin_id: Uuid,
    pub status: ApprovalStatus,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyStatusRequest {
    pub status: String,
    #[serde(default)]
    pub reason: Option<String>,
}

impl CompanyStatusRequest {
    /// Only APPROVED and REJECTED are settable; PENDING is the creation default.
    pub fn target_status(&self) -> Result<ApprovalStatus, AppError> {
        match self.status.parse::<ApprovalStatus>()? {
            ApprovalStatus::Pending => Err(AppError::invalid_field(
                "status",
                "Status must be APPROVED or REJECTED",
            )),
            status => Ok(status),
        }
    }
}
