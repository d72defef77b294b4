//! Abstract collaborator contracts.
//!
//! The driver only ever talks to the cloud provider and the mail service
//! through these traits. Each call is a single blocking best-effort
//! attempt; there are no retries, and a failure is scoped to the
//! subscription (or notification) being processed.

use serde::{Deserialize, Serialize};

use crate::tags::TagSet;

/// A cloud subscription as listed by the provider. Read-only to the lane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Opaque provider identifier.
    pub id: String,
    /// Human-readable display name.
    pub name: String,
}

/// One outbound notification email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// De-duplicated recipient addresses.
    pub to: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// A failed external call.
///
/// Never fatal to the run; the driver reports it and moves on to the next
/// subscription. Authentication failures are a separate concern handled
/// before a driver exists (nothing downstream can succeed without a
/// credential).
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The service answered with a non-success status.
    #[error("{operation} returned status {status}: {detail}")]
    Status {
        /// Which collaborator call failed.
        operation: &'static str,
        /// HTTP-level status code.
        status: u16,
        /// Response body or diagnostic excerpt.
        detail: String,
    },
    /// The request never produced a usable response.
    #[error("{operation} failed: {source}")]
    Transport {
        /// Which collaborator call failed.
        operation: &'static str,
        /// Underlying transport error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApiError {
    /// Wrap a transport-level failure.
    pub fn transport(
        operation: &'static str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            operation,
            source: Box::new(source),
        }
    }
}

/// Subscription listing and tag storage.
pub trait CloudApi {
    /// List every subscription visible to the credential.
    fn list_subscriptions(&self) -> Result<Vec<Subscription>, ApiError>;

    /// Fetch the current tag set of one subscription.
    fn get_tags(&self, subscription_id: &str) -> Result<TagSet, ApiError>;

    /// Merge a single key into the subscription's tag set.
    ///
    /// Read-then-write semantics: the implementation fetches the current
    /// tags, overlays the key, and writes the full merged set back. Not
    /// transactional; a crash between read and write loses the update and
    /// the next sweep recomputes it.
    fn set_tag(&self, subscription_id: &str, key: &str, value: &str) -> Result<(), ApiError>;
}

/// Outbound email dispatch.
pub trait Mailer {
    /// Send one message. A single attempt; the failure is scoped to this
    /// notification.
    fn send(&self, message: &EmailMessage) -> Result<(), ApiError>;
}
