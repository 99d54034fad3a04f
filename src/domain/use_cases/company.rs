use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::{
        actor::Actor,
        company::{ApprovalStatus, Company, CompanyStatusRequest},
        user::Role,
    },
    errors::AppError,
    repositories::{blob_store::BlobStore, company::CompanyRepository, notifier::Notifier},
};

pub struct CompanyHandler {
    pub company_repo: Arc<dyn CompanyRepository>,
    pub notifier: Arc<dyn Notifier>,
    pub blob_store: Arc<dyn BlobStore>,
}

impl CompanyHandler {
    pub fn new(
        company_repo: Arc<dyn CompanyRepository>,
        notifier: Arc<dyn Notifier>,
        blob_store: Arc<dyn BlobStore>,
    ) -> Self {
        CompanyHandler { company_repo, notifier, blob_store }
    }

    /// Approves or rejects a company and notifies its admin in the background.
    /// Any prior status may move to either target; repeating a call rewrites the same value.
    #[instrument(skip(self, request), fields(actor = %actor.user_id))]
    pub async fn set_company_status(
        &self,
        actor: &Actor,
        company_id: Uuid,
        request: CompanyStatusRequest,
    ) -> Result<Company, AppError> {
        actor.require_role(Role::Admin)?;
        let status = request.target_status()?;

        let company = self
            .company_repo
            .update_company_status(&company_id, status)
            .await?
            .ok_or_else(|| AppError::NotFound("Company not found".into()))?;

        tracing::info!(%company_id, %status, "Company status updated");
        self.dispatch_notification(&company, request.reason);

        Ok(company)
    }

    /// Sends the approval or rejection email on its own task. Failures are logged only.
    fn dispatch_notification(&self, company: &Company, reason: Option<String>) {
        let notifier = Arc::clone(&self.notifier);
        let status = company.status;
        let name = company.name.clone();
        let email = company.admin_email.clone();

        tokio::spawn(async move {
            let result = match status {
                ApprovalStatus::Approved => notifier.send_approval_email(&name, &email).await,
                ApprovalStatus::Rejected => notifier.send_rejection_email(&name, &email, reason).await,
                ApprovalStatus::Pending => Ok(()),
            };

            if let Err(e) = result {
                tracing::warn!(company = %name, to = %email, "Failed to send company status email: {:#}", e);
            }
        });
    }

    /// Removes the company and its admin account; stored files are cleaned up best-effort.
    #[instrument(skip(self), fields(actor = %actor.user_id))]
    pub async fn delete_company(&self, actor: &Actor, company_id: Uuid) -> Result<Company, AppError> {
        actor.require_role(Role::Admin)?;

        let company = self
            .company_repo
            .delete_company(&company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Company not found".into()))?;

        tracing::info!(%company_id, "Company deleted");

        for url in [&company.logo, &company.license_url].into_iter().flatten() {
            if let Err(e) = self.blob_store.delete(url).await {
                tracing::warn!(%company_id, %url, "Failed to delete stored file: {:#}", e);
            }
        }

        Ok(company)
    }

    #[instrument(skip(self), fields(actor = %actor.user_id))]
    pub async fn list_companies(&self, actor: &Actor, status: Option<&str>) -> Result<Vec<Company>, AppError> {
        actor.require_role(Role::Admin)?;

        let status = status
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<ApprovalStatus>)
            .transpose()?;

        self.company_repo.list_companies(status).await
    }

    /// Admins see any company; a company admin only their own.
    #[instrument(skip(self), fields(actor = %actor.user_id))]
    pub async fn get_company(&self, actor: &Actor, company_id: Uuid) -> Result<Company, AppError> {
        let company = self
            .company_repo
            .get_company_by_id(&company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Company not found".into()))?;

        if actor.is_admin() || company.admin_id == Some(actor.user_id) {
            Ok(company)
        } else {
            tracing::warn!(user_id = %actor.user_id, %company_id, "Company read denied");
            Err(AppError::ForbiddenAccess)
        }
    }
}
