//! subwatch-azure - concrete collaborators for the expiration lane.
//!
//! Implements the `subwatch-core` contracts against the real services:
//! OAuth2 client-credentials tokens from Entra ID, subscription and tag
//! access through Azure Resource Manager, and email dispatch through
//! Microsoft Graph. All calls are blocking single attempts; retry policy
//! belongs to the scheduler that invokes the job, not to this crate.

pub mod auth;
mod http;
pub mod mail;
pub mod management;

pub use auth::{AccessToken, AuthError, TokenClient, GRAPH_SCOPE, MANAGEMENT_SCOPE};
pub use mail::GraphMailer;
pub use management::ArmClient;
