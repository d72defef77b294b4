//! Notification email composition.
//!
//! Plain-text bodies in the shape operators already know: a greeting, a
//! details block naming the subscription, and the action required. Owner
//! and expert lines appear only when the corresponding tags are set.

use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::fmt::Write;

use subwatch_core::dates::format_date;
use subwatch_core::{EmailMessage, Subscription, TagSet};

use crate::driver::SweepOptions;

/// The warning sent at the configured lead time before expiry.
pub fn warning_email(
    subscription: &Subscription,
    tags: &TagSet,
    deletion_date: &str,
    days_remaining: i64,
    recipients: &BTreeSet<String>,
    options: &SweepOptions,
) -> EmailMessage {
    let mut body = format!(
        "Dear Team,\n\n\
         This is a reminder that the subscription {name} (ID: {id}) is set to expire in {days} days.\n\n",
        name = subscription.name,
        id = subscription.id,
        days = days_remaining,
    );
    push_details(&mut body, subscription, tags, Some(deletion_date));

    body.push_str("\nAction Required:\n");
    match &options.ticket_url {
        Some(url) => {
            let _ = writeln!(
                body,
                "If this subscription is still required, please create a ticket to request an \
                 extension before the expiration date: {url}"
            );
        }
        None => body.push_str(
            "If this subscription is still required, please request an extension before the \
             expiration date.\n",
        ),
    }
    let _ = write!(
        body,
        "\nIf no action is taken, the subscription will be automatically canceled on the \
         expiration date.\n\
         If you have any questions or need assistance, please contact the {team}.\n\n\
         Best regards,\n{team}\n",
        team = options.team_name,
    );

    EmailMessage {
        to: recipients.iter().cloned().collect(),
        subject: format!(
            "Notification: Subscription {} will expire in {} days",
            subscription.name, days_remaining
        ),
        body,
    }
}

/// The notice sent once the deletion date is reached.
pub fn cancellation_email(
    subscription: &Subscription,
    tags: &TagSet,
    today: NaiveDate,
    recipients: &BTreeSet<String>,
    options: &SweepOptions,
) -> EmailMessage {
    let mut body = format!(
        "Dear Team,\n\n\
         The subscription {name} (ID: {id}) has been canceled as of {date}.\n\n",
        name = subscription.name,
        id = subscription.id,
        date = format_date(today),
    );
    push_details(&mut body, subscription, tags, None);

    body.push_str(
        "\nAdditional Information:\n\
         The subscription was canceled as part of the automated cleanup process.",
    );
    match &options.ticket_url {
        Some(url) => {
            let _ = writeln!(
                body,
                " If it is still required, please create a ticket to request its reactivation: {url}"
            );
        }
        None => body.push_str(" If it is still required, please request its reactivation.\n"),
    }
    let _ = write!(
        body,
        "\nPlease note: reactivation is possible within 90 days from the date of this email. \
         After this period, the subscription and its associated resources will be permanently \
         deleted.\n\
         If you have any questions or need assistance, please contact the {team}.\n\n\
         Best regards,\n{team}\n",
        team = options.team_name,
    );

    EmailMessage {
        to: recipients.iter().cloned().collect(),
        subject: format!(
            "Notification: Subscription {} has been canceled",
            subscription.name
        ),
        body,
    }
}

fn push_details(
    body: &mut String,
    subscription: &Subscription,
    tags: &TagSet,
    deletion_date: Option<&str>,
) {
    body.push_str("Subscription Details:\n");
    let _ = writeln!(body, "- Subscription Name: {}", subscription.name);
    let _ = writeln!(body, "- Subscription ID: {}", subscription.id);
    if let Some(date) = deletion_date {
        let _ = writeln!(body, "- Expiration Date: {date}");
    }
    if let Some(owner) = tags.business_owner().map(str::trim).filter(|s| !s.is_empty()) {
        let _ = writeln!(body, "- Business Owner: {owner}");
    }
    if let Some(expert) = tags
        .technical_expert()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        let _ = writeln!(body, "- Technical Expert: {expert}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subwatch_core::tags::keys;

    fn subscription() -> Subscription {
        Subscription {
            id: "sub-1".to_string(),
            name: "Sandbox A".to_string(),
        }
    }

    fn options() -> SweepOptions {
        SweepOptions {
            default_recipient: "cloud-team@contoso.com".to_string(),
            warn_lead_days: 14,
            dry_run: false,
            ticket_url: Some("https://jira.contoso.com/servicedesk".to_string()),
            team_name: "Cloud Team".to_string(),
        }
    }

    fn recipients() -> BTreeSet<String> {
        ["a@x.com", "cloud-team@contoso.com"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_warning_email_contents() {
        let tags: TagSet = [
            (keys::BUSINESS_OWNER, "a@x.com"),
            (keys::TECHNICAL_EXPERT, "t@x.com"),
        ]
        .into_iter()
        .collect();
        let message = warning_email(
            &subscription(),
            &tags,
            "01/03/2025",
            14,
            &recipients(),
            &options(),
        );

        assert_eq!(
            message.subject,
            "Notification: Subscription Sandbox A will expire in 14 days"
        );
        assert!(message.body.contains("set to expire in 14 days"));
        assert!(message.body.contains("- Subscription ID: sub-1"));
        assert!(message.body.contains("- Expiration Date: 01/03/2025"));
        assert!(message.body.contains("- Business Owner: a@x.com"));
        assert!(message.body.contains("- Technical Expert: t@x.com"));
        assert!(message
            .body
            .contains("https://jira.contoso.com/servicedesk"));
        assert_eq!(message.to, vec!["a@x.com", "cloud-team@contoso.com"]);
    }

    #[test]
    fn test_warning_email_omits_unset_contacts() {
        let message = warning_email(
            &subscription(),
            &TagSet::new(),
            "01/03/2025",
            14,
            &recipients(),
            &options(),
        );
        assert!(!message.body.contains("Business Owner"));
        assert!(!message.body.contains("Technical Expert"));
    }

    #[test]
    fn test_cancellation_email_contents() {
        let today = NaiveDate::from_ymd_opt(2025, 2, 15).unwrap();
        let message = cancellation_email(
            &subscription(),
            &TagSet::new(),
            today,
            &recipients(),
            &options(),
        );

        assert_eq!(
            message.subject,
            "Notification: Subscription Sandbox A has been canceled"
        );
        assert!(message.body.contains("canceled as of 15/02/2025"));
        assert!(message.body.contains("within 90 days"));
        assert!(!message.body.contains("Expiration Date"));
    }

    #[test]
    fn test_bodies_without_ticket_url() {
        let mut opts = options();
        opts.ticket_url = None;
        let message = warning_email(
            &subscription(),
            &TagSet::new(),
            "01/03/2025",
            14,
            &recipients(),
            &opts,
        );
        assert!(!message.body.contains("jira"));
        assert!(message.body.contains("request an extension"));
    }
}
