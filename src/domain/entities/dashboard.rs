use serde::{Deserialize, Serialize};

use crate::entities::{company::{ApprovalStatus, Company}, job::Job};

/// Row counts grouped by approval status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
}

impl StatusCounts {
    pub fn from_rows(rows: impl IntoIterator<Item = (ApprovalStatus, i64)>) -> Self {
        rows.into_iter().fold(StatusCounts::default(), |mut counts, (status, count)| {
            match status {
                ApprovalStatus::Pending => counts.pending += count,
                ApprovalStatus::Approved => counts.approved += count,
                ApprovalStatus::Rejected => counts.rejected += count,
            }
            counts
        })
    }

    pub fn total(&self) -> i64 {
        self.pending + self.approved + self.rejected
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminDashboard {
    pub users: i64,
    pub companies: StatusCounts,
    pub jobs: StatusCounts,
    pub applications: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyDashboard {
    pub company: Company,
    pub jobs: Vec<Job>,
    pub total_applications: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_rows_fold_into_counts() {
        let counts = StatusCounts::from_rows(vec![
            (ApprovalStatus::Approved, 3),
            (ApprovalStatus::Pending, 2),
        ]);

        assert_eq!(counts, StatusCounts { pending: 2, approved: 3, rejected: 0 });
        assert_eq!(counts.total(), 5);
    }
}
