use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;

use super::{to_e164, MessagingProvider};

pub struct TwilioSmsProvider {
    account_sid: String,
    auth_token: String,
    from_number: String,
    client: reqwest::Client,
}

impl TwilioSmsProvider {
    pub fn new(
        account_sid: String,
        auth_token: String,
        from_number: String,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build Twilio HTTP client")?;
        Ok(Self {
            account_sid,
            auth_token,
            from_number,
            client,
        })
    }
}

#[async_trait]
impl MessagingProvider for TwilioSmsProvider {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<()> {
        let to = to_e164(to).with_context(|| format!("cannot send SMS to invalid number {to:?}"))?;
        let url = format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.account_sid
        );

        let resp = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("To", to.as_str()), ("From", self.from_number.as_str()), ("Body", body)])
            .send()
            .await
            .context("failed to send Twilio SMS")?;

        let status = resp.status();
        if !status.is_success() {
            let data: serde_json::Value = resp.json().await.unwrap_or_default();
            let message = data["message"].as_str().unwrap_or("unknown error");
            anyhow::bail!("Twilio API error ({status}): {message}");
        }

        Ok(())
    }
}
