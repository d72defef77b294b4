//! In-memory collaborators for testing.
//!
//! Provides tag storage, a subscription directory, and a captured-mail
//! outbox behind the same traits the real clients implement, plus failure
//! injection so error-isolation paths can be exercised without a network.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use subwatch_core::{ApiError, CloudApi, EmailMessage, Mailer, Subscription, TagSet};

/// Thread-safe in-memory cloud + mailer.
#[derive(Debug, Clone, Default)]
pub struct MockCloud {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    subscriptions: Vec<Subscription>,
    tags: HashMap<String, TagSet>,
    outbox: Vec<EmailMessage>,
    fail_listing: bool,
    fail_get_tags: HashSet<String>,
    fail_set_tag: HashSet<String>,
    fail_send: bool,
}

impl MockCloud {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscription with its initial tags.
    pub fn add_subscription(&self, id: &str, name: &str, tags: TagSet) {
        let mut inner = self.inner.write().expect("mock lock poisoned");
        inner.subscriptions.push(Subscription {
            id: id.to_string(),
            name: name.to_string(),
        });
        inner.tags.insert(id.to_string(), tags);
    }

    /// Current tag snapshot for a subscription.
    pub fn tags_of(&self, id: &str) -> TagSet {
        self.inner
            .read()
            .expect("mock lock poisoned")
            .tags
            .get(id)
            .cloned()
            .unwrap_or_default()
    }

    /// Every message sent so far, in order.
    pub fn outbox(&self) -> Vec<EmailMessage> {
        self.inner.read().expect("mock lock poisoned").outbox.clone()
    }

    /// Make `list_subscriptions` fail.
    pub fn fail_listing(&self) {
        self.inner.write().expect("mock lock poisoned").fail_listing = true;
    }

    /// Make `get_tags` fail for one subscription.
    pub fn fail_get_tags(&self, id: &str) {
        self.inner
            .write()
            .expect("mock lock poisoned")
            .fail_get_tags
            .insert(id.to_string());
    }

    /// Make `set_tag` fail for one subscription.
    pub fn fail_set_tag(&self, id: &str) {
        self.inner
            .write()
            .expect("mock lock poisoned")
            .fail_set_tag
            .insert(id.to_string());
    }

    /// Make every send fail.
    pub fn fail_sends(&self) {
        self.inner.write().expect("mock lock poisoned").fail_send = true;
    }

    fn injected(operation: &'static str) -> ApiError {
        ApiError::Status {
            operation,
            status: 503,
            detail: "injected failure".to_string(),
        }
    }
}

impl CloudApi for MockCloud {
    fn list_subscriptions(&self) -> Result<Vec<Subscription>, ApiError> {
        let inner = self.inner.read().expect("mock lock poisoned");
        if inner.fail_listing {
            return Err(Self::injected("list_subscriptions"));
        }
        Ok(inner.subscriptions.clone())
    }

    fn get_tags(&self, subscription_id: &str) -> Result<TagSet, ApiError> {
        let inner = self.inner.read().expect("mock lock poisoned");
        if inner.fail_get_tags.contains(subscription_id) {
            return Err(Self::injected("get_tags"));
        }
        Ok(inner.tags.get(subscription_id).cloned().unwrap_or_default())
    }

    fn set_tag(&self, subscription_id: &str, key: &str, value: &str) -> Result<(), ApiError> {
        let mut inner = self.inner.write().expect("mock lock poisoned");
        if inner.fail_set_tag.contains(subscription_id) {
            return Err(Self::injected("set_tag"));
        }
        inner
            .tags
            .entry(subscription_id.to_string())
            .or_default()
            .insert(key, value);
        Ok(())
    }
}

impl Mailer for MockCloud {
    fn send(&self, message: &EmailMessage) -> Result<(), ApiError> {
        let mut inner = self.inner.write().expect("mock lock poisoned");
        if inner.fail_send {
            return Err(Self::injected("send_email"));
        }
        inner.outbox.push(message.clone());
        Ok(())
    }
}
