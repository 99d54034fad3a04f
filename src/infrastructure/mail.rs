use std::sync::Arc;

use crate::{repositories::notifier::Notifier, settings::AppConfig};

pub mod brevo;
pub mod log_notifier;

/// Picks Brevo when credentials are configured, otherwise logs notifications.
pub fn build_notifier(config: &AppConfig) -> anyhow::Result<Arc<dyn Notifier>> {
    match (&config.mail_api_key, &config.mail_sender_email) {
        (Some(api_key), Some(sender)) => {
            let notifier = brevo::BrevoNotifier::new(
                api_key.clone(),
                sender.clone(),
                config.mail_sender_name.clone(),
            )?;
            Ok(Arc::new(notifier))
        }
        _ => {
            tracing::warn!("MAIL_API_KEY not set; approval emails will only be logged");
            Ok(Arc::new(log_notifier::LogNotifier))
        }
    }
}
