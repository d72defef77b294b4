//! subwatch-core - Expiration state machine for tagged cloud subscriptions
//!
//! This crate holds the decision logic of the expiration lane: the tag
//! model, the duration parser, calendar date arithmetic, the per-cycle
//! state machine, and recipient resolution. It also defines the abstract
//! collaborator contracts (subscription listing, tag read/write, email
//! dispatch) that the driver is generic over; concrete implementations
//! live in `subwatch-azure`.

pub mod api;
pub mod dates;
pub mod duration;
pub mod machine;
pub mod recipients;
pub mod tags;

pub use api::{ApiError, CloudApi, EmailMessage, Mailer, Subscription};
pub use dates::{compute_deletion_date, days_until, format_date, DateFormatError};
pub use duration::parse_duration_months;
pub use machine::{evaluate, Decision, DEFAULT_WARN_LEAD_DAYS};
pub use recipients::resolve_recipients;
pub use tags::TagSet;
