//! The per-sweep job driver.
//!
//! One invocation walks every subscription exactly once: fetch tags, run
//! the state machine, execute whatever it decided. Each subscription is
//! processed independently; a failed tag fetch, bad stored date, or failed
//! notification is logged and skipped without touching the rest of the
//! sweep. Only the initial listing aborts the run, since there is nothing
//! to iterate without it.

use chrono::NaiveDateTime;
use std::fmt;

use subwatch_core::dates::format_date;
use subwatch_core::tags::{keys, FLAG_TRUE};
use subwatch_core::{
    evaluate, resolve_recipients, ApiError, CloudApi, Decision, Mailer, Subscription, TagSet,
};
use tracing::{debug, error, info, warn};

use crate::config::JobConfig;
use crate::notify;

/// Everything the sweep needs besides credentials.
#[derive(Debug, Clone)]
pub struct SweepOptions {
    /// Address included in every notification.
    pub default_recipient: String,
    /// Days-remaining value that triggers the warning.
    pub warn_lead_days: i64,
    /// Decide but perform no tag writes and send no email.
    pub dry_run: bool,
    /// Ticket/self-service URL for notification bodies.
    pub ticket_url: Option<String>,
    /// Signature line for notification bodies.
    pub team_name: String,
}

impl SweepOptions {
    /// Derive sweep options from the loaded job configuration.
    pub fn from_config(config: &JobConfig, dry_run: bool) -> Self {
        Self {
            default_recipient: config.default_recipient.clone(),
            warn_lead_days: config.warn_lead_days,
            dry_run,
            ticket_url: config.ticket_url.clone(),
            team_name: config.team_name.clone(),
        }
    }
}

/// Counters for one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Subscriptions seen in the listing.
    pub processed: usize,
    /// Deletion dates assigned.
    pub assigned: usize,
    /// Warning emails sent.
    pub warned: usize,
    /// Cancellation notices sent.
    pub canceled: usize,
    /// Per-subscription failures (tag fetch/write, send, bad dates).
    pub errors: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed {} subscriptions: {} dates assigned, {} warned, {} canceled, {} errors",
            self.processed, self.assigned, self.warned, self.canceled, self.errors
        )
    }
}

/// Drives one sweep over a cloud directory and a mailer.
#[derive(Debug)]
pub struct JobDriver<C, M> {
    cloud: C,
    mailer: M,
    options: SweepOptions,
}

impl<C: CloudApi, M: Mailer> JobDriver<C, M> {
    /// Build a driver over the given collaborators.
    pub fn new(cloud: C, mailer: M, options: SweepOptions) -> Self {
        Self {
            cloud,
            mailer,
            options,
        }
    }

    /// Run one sweep at the given instant.
    ///
    /// Fails only when the subscription listing itself fails; everything
    /// after that is per-subscription and reported through the summary.
    pub fn run(&self, now: NaiveDateTime) -> Result<RunSummary, ApiError> {
        let subscriptions = self.cloud.list_subscriptions()?;
        let mut summary = RunSummary::default();

        if subscriptions.is_empty() {
            info!("no subscriptions to process");
            return Ok(summary);
        }

        for subscription in &subscriptions {
            summary.processed += 1;
            self.process(subscription, now, &mut summary);
        }

        info!(
            processed = summary.processed,
            assigned = summary.assigned,
            warned = summary.warned,
            canceled = summary.canceled,
            errors = summary.errors,
            "sweep complete"
        );
        Ok(summary)
    }

    fn process(&self, subscription: &Subscription, now: NaiveDateTime, summary: &mut RunSummary) {
        let tags = match self.cloud.get_tags(&subscription.id) {
            Ok(tags) => tags,
            Err(e) => {
                error!(
                    subscription_id = %subscription.id,
                    subscription_name = %subscription.name,
                    error = %e,
                    "failed to fetch tags, skipping"
                );
                summary.errors += 1;
                return;
            }
        };

        let decision = match evaluate(&tags, now, self.options.warn_lead_days) {
            Ok(decision) => decision,
            Err(e) => {
                warn!(
                    subscription_id = %subscription.id,
                    subscription_name = %subscription.name,
                    error = %e,
                    "skipping subscription this cycle"
                );
                summary.errors += 1;
                return;
            }
        };

        match decision {
            Decision::Untracked => {
                debug!(subscription_id = %subscription.id, "untracked, no valid Duration tag");
            }
            Decision::AwaitDuration => {
                info!(
                    subscription_id = %subscription.id,
                    subscription_name = %subscription.name,
                    duration = tags.duration().unwrap_or_default(),
                    "Duration tag has digits but no month count, awaiting manual follow-up"
                );
            }
            Decision::AssignDeletionDate { date } => {
                self.assign_deletion_date(subscription, &tags, format_date(date), summary);
            }
            Decision::Warn {
                deletion_date,
                days_remaining,
            } => {
                self.send_warning(subscription, &tags, &deletion_date, days_remaining, summary);
            }
            Decision::Cancel { deletion_date } => {
                self.send_cancellation(subscription, &tags, &deletion_date, now, summary);
            }
            Decision::Wait { days_remaining } => {
                info!(
                    subscription_id = %subscription.id,
                    subscription_name = %subscription.name,
                    duration = tags.duration().unwrap_or_default(),
                    deletion_date = tags.deletion_date().unwrap_or_default(),
                    days_remaining,
                    "nothing to do this cycle"
                );
            }
        }
    }

    fn assign_deletion_date(
        &self,
        subscription: &Subscription,
        tags: &TagSet,
        date: String,
        summary: &mut RunSummary,
    ) {
        info!(
            subscription_id = %subscription.id,
            subscription_name = %subscription.name,
            duration = tags.duration().unwrap_or_default(),
            deletion_date = %date,
            dry_run = self.options.dry_run,
            "assigning deletion date"
        );
        if self.options.dry_run {
            summary.assigned += 1;
            return;
        }
        match self
            .cloud
            .set_tag(&subscription.id, keys::DELETION_DATE, &date)
        {
            Ok(()) => summary.assigned += 1,
            Err(e) => {
                error!(
                    subscription_id = %subscription.id,
                    error = %e,
                    "failed to write Deletion Date tag"
                );
                summary.errors += 1;
            }
        }
    }

    fn send_warning(
        &self,
        subscription: &Subscription,
        tags: &TagSet,
        deletion_date: &str,
        days_remaining: i64,
        summary: &mut RunSummary,
    ) {
        let recipients = resolve_recipients(tags, &self.options.default_recipient);
        info!(
            subscription_id = %subscription.id,
            subscription_name = %subscription.name,
            deletion_date,
            days_remaining,
            recipients = recipients.len(),
            dry_run = self.options.dry_run,
            "sending expiry warning"
        );
        if self.options.dry_run {
            summary.warned += 1;
            return;
        }

        let message = notify::warning_email(
            subscription,
            tags,
            deletion_date,
            days_remaining,
            &recipients,
            &self.options,
        );
        if let Err(e) = self.mailer.send(&message) {
            error!(
                subscription_id = %subscription.id,
                error = %e,
                "failed to send warning email"
            );
            summary.errors += 1;
            return;
        }
        summary.warned += 1;

        // Guard tag write comes after the send; if it fails the next sweep
        // may warn again, which beats never warning at all.
        if let Err(e) = self
            .cloud
            .set_tag(&subscription.id, keys::NOTIFICATION_SENT, FLAG_TRUE)
        {
            error!(
                subscription_id = %subscription.id,
                error = %e,
                "warning sent but Notification Sent guard write failed"
            );
            summary.errors += 1;
        }
    }

    fn send_cancellation(
        &self,
        subscription: &Subscription,
        tags: &TagSet,
        deletion_date: &str,
        now: NaiveDateTime,
        summary: &mut RunSummary,
    ) {
        let recipients = resolve_recipients(tags, &self.options.default_recipient);
        info!(
            subscription_id = %subscription.id,
            subscription_name = %subscription.name,
            deletion_date,
            recipients = recipients.len(),
            dry_run = self.options.dry_run,
            "sending cancellation notice"
        );
        if self.options.dry_run {
            summary.canceled += 1;
            return;
        }

        let message =
            notify::cancellation_email(subscription, tags, now.date(), &recipients, &self.options);
        if let Err(e) = self.mailer.send(&message) {
            error!(
                subscription_id = %subscription.id,
                error = %e,
                "failed to send cancellation notice"
            );
            summary.errors += 1;
            return;
        }
        summary.canceled += 1;

        if let Err(e) = self
            .cloud
            .set_tag(&subscription.id, keys::CANCELLATION_SENT, FLAG_TRUE)
        {
            error!(
                subscription_id = %subscription.id,
                error = %e,
                "notice sent but Cancellation Sent guard write failed"
            );
            summary.errors += 1;
        }
    }
}
