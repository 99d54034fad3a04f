use std::time::Duration;

use anyhow::{bail, Context};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::repositories::notifier::Notifier;

const BREVO_SEND_URL: &str = "https://api.brevo.com/v3/smtp/email";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoEmailAddress {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoSendEmailBody {
    sender: BrevoEmailAddress,
    to: Vec<BrevoEmailAddress>,
    subject: String,
    html_content: String,
    text_content: String,
}

/// Transactional mail through the Brevo HTTP API.
#[derive(Clone)]
pub struct BrevoNotifier {
    client: Client,
    api_key: String,
    sender_email: String,
    sender_name: Option<String>,
    endpoint: String,
}

impl BrevoNotifier {
    pub fn new(api_key: String, sender_email: String, sender_name: Option<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build Brevo HTTP client")?;

        Ok(BrevoNotifier {
            client,
            api_key,
            sender_email,
            sender_name,
            endpoint: BREVO_SEND_URL.to_string(),
        })
    }

    async fn send_email(&self, to_email: &str, subject: String, text: String) -> anyhow::Result<()> {
        let body = BrevoSendEmailBody {
            sender: BrevoEmailAddress {
                email: self.sender_email.clone(),
                name: self.sender_name.clone(),
            },
            to: vec![BrevoEmailAddress {
                email: to_email.to_string(),
                name: None,
            }],
            subject,
            html_content: text_to_html(&text),
            text_content: text,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .context("Brevo request failed")?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(to = %to_email, "Notification email sent");
            return Ok(());
        }

        let detail = response.text().await.unwrap_or_default();
        bail!("Brevo send failed (status={status}): {detail}")
    }
}

#[async_trait]
impl Notifier for BrevoNotifier {
    async fn send_approval_email(&self, company_name: &str, admin_email: &str) -> anyhow::Result<()> {
        let (subject, text) = approval_message(company_name);
        self.send_email(admin_email, subject, text).await
    }

    async fn send_rejection_email(
        &self,
        company_name: &str,
        admin_email: &str,
        reason: Option<String>,
    ) -> anyhow::Result<()> {
        let (subject, text) = rejection_message(company_name, reason.as_deref());
        self.send_email(admin_email, subject, text).await
    }
}

pub(crate) fn approval_message(company_name: &str) -> (String, String) {
    (
        format!("{company_name} has been approved"),
        format!(
            "Good news! Your company {company_name} has been approved. \
             You can now sign in and post jobs."
        ),
    )
}

pub(crate) fn rejection_message(company_name: &str, reason: Option<&str>) -> (String, String) {
    let mut text = format!("We're sorry, your company {company_name} was not approved.");
    if let Some(reason) = reason.map(str::trim).filter(|r| !r.is_empty()) {
        text.push_str(&format!("\n\nReason: {reason}"));
    }
    (format!("Update on {company_name}'s registration"), text)
}

fn text_to_html(text: &str) -> String {
    let escaped = text
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    escaped
        .split("\n\n")
        .map(|p| format!("<p>{p}</p>"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_message_includes_reason_when_given() {
        let (_, text) = rejection_message("Acme", Some("Missing license"));
        assert!(text.contains("Reason: Missing license"));

        let (_, text) = rejection_message("Acme", Some("   "));
        assert!(!text.contains("Reason"));
    }

    #[test]
    fn html_body_escapes_markup() {
        let html = text_to_html("A <b> & B\n\nSecond");
        assert_eq!(html, "<p>A &lt;b&gt; &amp; B</p><p>Second</p>");
    }
}
