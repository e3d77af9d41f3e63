use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use super::{EmailMessage, EmailProvider};

const SENDGRID_URL: &str = "https://api.sendgrid.com/v3/mail/send";

pub struct SendGridProvider {
    api_key: String,
    from_email: String,
    from_name: String,
    client: reqwest::Client,
}

impl SendGridProvider {
    pub fn new(
        api_key: String,
        from_email: String,
        from_name: String,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build SendGrid HTTP client")?;
        Ok(Self {
            api_key,
            from_email,
            from_name,
            client,
        })
    }
}

#[async_trait]
impl EmailProvider for SendGridProvider {
    async fn send_email(&self, message: &EmailMessage) -> anyhow::Result<()> {
        let body = json!({
            "personalizations": [{ "to": [{ "email": message.to }] }],
            "from": { "email": self.from_email, "name": self.from_name },
            "subject": message.subject,
            "content": [{ "type": "text/html", "value": message.html }],
        });

        let resp = self
            .client
            .post(SENDGRID_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("failed to call SendGrid API")?;

        let status = resp.status();
        if !status.is_success() {
            let data: serde_json::Value = resp.json().await.unwrap_or_default();
            anyhow::bail!("SendGrid API error ({}): {}", status, data["errors"]);
        }

        Ok(())
    }
}
