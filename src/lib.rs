//! subwatch - tag-driven expiration lane for cloud subscriptions
//!
//! A recurring job that reads an intended-lifetime tag from every
//! subscription, tracks an absolute deletion date, warns the owners at a
//! fixed lead time, and sends a cancellation notice once the date is
//! reached. All state lives in the subscriptions' own tags, so repeated
//! runs are idempotent.

pub mod config;
pub mod driver;
pub mod mock;
pub mod notify;

pub use config::{ConfigError, JobConfig};
pub use driver::{JobDriver, RunSummary, SweepOptions};
pub use mock::MockCloud;
pub use subwatch_core::{
    evaluate, ApiError, CloudApi, Decision, EmailMessage, Mailer, Subscription, TagSet,
};
