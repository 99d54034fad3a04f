use async_trait::async_trait;

use crate::{
    infrastructure::mail::brevo::{approval_message, rejection_message},
    repositories::notifier::Notifier,
};

/// Writes notifications to the log instead of sending them.
/// Used when no mail provider is configured.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_approval_email(&self, company_name: &str, admin_email: &str) -> anyhow::Result<()> {
        let (subject, _) = approval_message(company_name);
        tracing::info!(to = %admin_email, %subject, "Mail provider not configured; approval email logged");
        Ok(())
    }

    async fn send_rejection_email(
        &self,
        company_name: &str,
        admin_email: &str,
        reason: Option<String>,
    ) -> anyhow::Result<()> {
        let (subject, _) = rejection_message(company_name, reason.as_deref());
        tracing::info!(
            to = %admin_email,
            %subject,
            reason = reason.as_deref().unwrap_or(""),
            "Mail provider not configured; rejection email logged"
        );
        Ok(())
    }
}
