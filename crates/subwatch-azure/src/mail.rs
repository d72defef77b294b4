//! Email dispatch through Microsoft Graph.
//!
//! Graph's sendMail wants a messaging-scope credential distinct from the
//! management token, so the mailer holds the token client and fetches a
//! fresh Graph token per notification.

use serde_json::json;

use subwatch_core::{ApiError, EmailMessage, Mailer};

use crate::auth::{TokenClient, GRAPH_SCOPE};
use crate::http::expect_success;

/// Production Graph endpoint.
pub const DEFAULT_GRAPH_BASE: &str = "https://graph.microsoft.com";

/// Sends plain-text notifications from a fixed sender mailbox.
#[derive(Debug)]
pub struct GraphMailer {
    http: reqwest::blocking::Client,
    tokens: TokenClient,
    sender: String,
    base: String,
}

impl GraphMailer {
    /// Build a mailer sending as `sender`.
    pub fn new(tokens: TokenClient, sender: impl Into<String>) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            tokens,
            sender: sender.into(),
            base: DEFAULT_GRAPH_BASE.to_string(),
        }
    }

    /// Point the mailer at a different endpoint (tests).
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }
}

impl Mailer for GraphMailer {
    fn send(&self, message: &EmailMessage) -> Result<(), ApiError> {
        const OP: &str = "send_email";
        let token = self
            .tokens
            .fetch(GRAPH_SCOPE)
            .map_err(|e| ApiError::transport(OP, e))?;

        let url = format!("{}/v1.0/users/{}/sendMail", self.base, self.sender);
        let response = self
            .http
            .post(url)
            .bearer_auth(token.secret())
            .json(&send_mail_payload(message))
            .send()
            .map_err(|e| ApiError::transport(OP, e))?;
        // Graph answers 202 Accepted on success.
        expect_success(OP, response)?;

        tracing::debug!(recipients = message.to.len(), "email accepted by graph");
        Ok(())
    }
}

fn send_mail_payload(message: &EmailMessage) -> serde_json::Value {
    let to_recipients: Vec<_> = message
        .to
        .iter()
        .map(|address| json!({ "emailAddress": { "address": address } }))
        .collect();
    json!({
        "message": {
            "subject": message.subject,
            "body": {
                "contentType": "Text",
                "content": message.body,
            },
            "toRecipients": to_recipients,
        },
        "saveToSentItems": "true",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> EmailMessage {
        EmailMessage {
            to: vec!["a@x.com".to_string(), "b@x.com".to_string()],
            subject: "Notification: Subscription Sandbox will expire in 14 days".to_string(),
            body: "Dear Team,\n\nThis is a reminder.".to_string(),
        }
    }

    #[test]
    fn test_send_mail_payload_shape() {
        let body = send_mail_payload(&message());
        assert_eq!(
            body["message"]["subject"],
            "Notification: Subscription Sandbox will expire in 14 days"
        );
        assert_eq!(body["message"]["body"]["contentType"], "Text");
        assert_eq!(
            body["message"]["toRecipients"][0]["emailAddress"]["address"],
            "a@x.com"
        );
        assert_eq!(
            body["message"]["toRecipients"][1]["emailAddress"]["address"],
            "b@x.com"
        );
        assert_eq!(body["saveToSentItems"], "true");
    }

    #[test]
    fn test_send_mail_url() {
        let mailer = GraphMailer::new(
            TokenClient::new("tenant", "app", "secret"),
            "noreply@contoso.com",
        );
        assert_eq!(mailer.base, DEFAULT_GRAPH_BASE);
        assert_eq!(mailer.sender, "noreply@contoso.com");
    }
}
