use anyhow::{Context, Result, bail};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::notifier::IncompleteShift;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

/// Outbound mail gateway (Resend REST API). Cheap to clone; the inner
/// reqwest client shares its connection pool.
#[derive(Clone)]
pub struct Mailer {
    client: Client,
    api_key: String,
    sender: String,
}

#[derive(Debug, Deserialize)]
struct SendReceipt {
    id: Option<String>,
}

impl Mailer {
    pub fn new(api_key: &str, sender: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            sender: sender.to_string(),
        }
    }

    /// Without an API key the mailer degrades to a warn-and-skip stub.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Send one employer the daily incomplete-shift alert. Errors are
    /// returned for the caller to log; nothing is retried.
    pub async fn send_incomplete_shift_alert(
        &self,
        employer_email: &str,
        incomplete: &[IncompleteShift],
    ) -> Result<()> {
        if !self.is_configured() {
            warn!("Resend API key not configured. Email not sent.");
            return Ok(());
        }

        let payload = json!({
            "from": self.sender,
            "to": [employer_email],
            "subject": format!("Daily Attendance Alert - {} Incomplete Shifts", incomplete.len()),
            "html": render_alert_html(incomplete),
        });

        let response = self
            .client
            .post(RESEND_ENDPOINT)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .context("Failed to reach email gateway")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".to_string());
            bail!("Email gateway returned {}: {}", status, body);
        }

        let receipt: SendReceipt = response
            .json()
            .await
            .context("Failed to parse email gateway response")?;

        info!(
            to = employer_email,
            id = receipt.id.as_deref().unwrap_or("-"),
            "Alert email sent"
        );
        Ok(())
    }
}

/// One row per flagged employee, matching the alert layout employers
/// already receive.
fn render_alert_html(incomplete: &[IncompleteShift]) -> String {
    let mut rows = String::new();
    for shift in incomplete {
        rows.push_str(&format!(
            r#"
                <tr>
                    <td style="border: 1px solid #e5e7eb; padding: 12px;">{}</td>
                    <td style="border: 1px solid #e5e7eb; padding: 12px;">{}</td>
                    <td style="border: 1px solid #e5e7eb; padding: 12px;">{} hours</td>
                </tr>"#,
            shift.name, shift.email, shift.hours
        ));
    }

    format!(
        r#"
    <html>
    <body style="font-family: Arial, sans-serif; padding: 20px;">
        <h2 style="color: #2563eb;">Daily Attendance Alert</h2>
        <p>The following employees have not completed their 9-hour shift today:</p>
        <table style="border-collapse: collapse; width: 100%; margin-top: 20px;">
            <thead>
                <tr style="background-color: #f3f4f6;">
                    <th style="border: 1px solid #e5e7eb; padding: 12px; text-align: left;">Employee Name</th>
                    <th style="border: 1px solid #e5e7eb; padding: 12px; text-align: left;">Email</th>
                    <th style="border: 1px solid #e5e7eb; padding: 12px; text-align: left;">Hours Worked</th>
                </tr>
            </thead>
            <tbody>{}
            </tbody>
        </table>
        <p style="margin-top: 20px; color: #6b7280;">This is an automated alert sent at 9 PM IST.</p>
    </body>
    </html>"#,
        rows
    )
}
