pub mod templates;

use std::future::Future;
use std::time::Duration;

use crate::config::AppConfig;
use crate::models::{Booking, ChannelOutcome, NotificationReport, NotifyAction};
use crate::services::email::sendgrid::SendGridProvider;
use crate::services::email::{EmailMessage, EmailProvider};
use crate::services::messaging::twilio::TwilioSmsProvider;
use crate::services::messaging::MessagingProvider;

pub use templates::Branding;

/// Sends booking outcomes to the customer over whichever channels are
/// configured. Delivery problems are reported, never raised.
pub struct NotificationDispatcher {
    sms: Option<Box<dyn MessagingProvider>>,
    email: Option<Box<dyn EmailProvider>>,
    branding: Branding,
    timeout: Duration,
}

impl NotificationDispatcher {
    pub fn new(
        sms: Option<Box<dyn MessagingProvider>>,
        email: Option<Box<dyn EmailProvider>>,
        branding: Branding,
        timeout: Duration,
    ) -> Self {
        Self {
            sms,
            email,
            branding,
            timeout,
        }
    }

    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.notify_timeout_secs);

        let sms: Option<Box<dyn MessagingProvider>> = if config.sms_enabled() {
            tracing::info!("Twilio SMS notifications enabled");
            Some(Box::new(TwilioSmsProvider::new(
                config.twilio_account_sid.clone(),
                config.twilio_auth_token.clone(),
                config.twilio_phone_number.clone(),
                timeout,
            )?))
        } else {
            tracing::info!("Twilio credentials not configured, SMS notifications disabled");
            None
        };

        let email: Option<Box<dyn EmailProvider>> = if config.email_enabled() {
            tracing::info!("SendGrid email notifications enabled");
            Some(Box::new(SendGridProvider::new(
                config.sendgrid_api_key.clone(),
                config.email_from.clone(),
                config.org_name.clone(),
                timeout,
            )?))
        } else {
            tracing::info!("email credentials not configured, email notifications disabled");
            None
        };

        let branding = Branding {
            org_name: config.org_name.clone(),
            contact_phone: config.contact_phone.clone(),
        };

        Ok(Self::new(sms, email, branding, timeout))
    }

    pub async fn notify(
        &self,
        booking: &Booking,
        action: NotifyAction,
        reason: Option<&str>,
    ) -> NotificationReport {
        let (sms, email) = tokio::join!(
            self.send_sms(booking, action, reason),
            self.send_email(booking, action, reason)
        );
        NotificationReport { sms, email }
    }

    async fn send_sms(&self, booking: &Booking, action: NotifyAction, reason: Option<&str>) -> ChannelOutcome {
        let Some(provider) = &self.sms else {
            return ChannelOutcome::skipped();
        };
        if booking.phone.trim().is_empty() {
            return ChannelOutcome::skipped();
        }

        let body = templates::sms_body(booking, action, reason, &self.branding);
        let outcome = deliver(self.timeout, provider.send_message(&booking.phone, &body)).await;
        log_outcome("sms", booking, action, &outcome);
        outcome
    }

    async fn send_email(&self, booking: &Booking, action: NotifyAction, reason: Option<&str>) -> ChannelOutcome {
        let Some(provider) = &self.email else {
            return ChannelOutcome::skipped();
        };
        let Some(to) = booking.email.as_deref().filter(|e| !e.trim().is_empty()) else {
            return ChannelOutcome::skipped();
        };

        let message = EmailMessage {
            to: to.to_string(),
            subject: templates::email_subject(booking, action),
            html: templates::email_html(booking, action, reason, &self.branding),
        };
        let outcome = deliver(self.timeout, provider.send_email(&message)).await;
        log_outcome("email", booking, action, &outcome);
        outcome
    }
}

async fn deliver<F>(timeout: Duration, send: F) -> ChannelOutcome
where
    F: Future<Output = anyhow::Result<()>>,
{
    match tokio::time::timeout(timeout, send).await {
        Ok(Ok(())) => ChannelOutcome::delivered(),
        Ok(Err(e)) => ChannelOutcome::failed(format!("{e:#}")),
        Err(_) => ChannelOutcome::failed(format!("timed out after {timeout:?}")),
    }
}

fn log_outcome(channel: &str, booking: &Booking, action: NotifyAction, outcome: &ChannelOutcome) {
    match &outcome.error {
        None => tracing::info!(
            channel,
            booking_id = booking.id,
            action = action.as_str(),
            "notification sent"
        ),
        Some(error) => tracing::error!(
            channel,
            booking_id = booking.id,
            action = action.as_str(),
            error = %error,
            "notification failed"
        ),
    }
}
