use async_trait::async_trait;

/// Outbound company approval notifications. Delivery is best-effort:
/// callers log failures and never roll back on them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_approval_email(&self, company_name: &str, admin_email: &str) -> anyhow::Result<()>;

    async fn send_rejection_email(
        &self,
        company_name: &str,
        admin_email: &str,
        reason: Option<String>,
    ) -> anyhow::Result<()>;
}
