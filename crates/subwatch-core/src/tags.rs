//! Subscription tag model.
//!
//! A subscription carries a flat string-to-string tag map. The expiration
//! lane recognizes a handful of well-known keys; everything else is
//! preserved untouched. Boolean guard tags are stored externally as the
//! literal string `"True"` (anything else, including absence, reads as
//! false) — that encoding stays at this boundary, the rest of the crate
//! sees `bool`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known tag keys.
pub mod keys {
    /// Free-text intended lifetime, e.g. "6 months".
    pub const DURATION: &str = "Duration";
    /// Absolute expiry date, `DD/MM/YYYY`.
    pub const DELETION_DATE: &str = "Deletion Date";
    /// Guard: the 14-day warning email has been sent.
    pub const NOTIFICATION_SENT: &str = "Notification Sent";
    /// Guard: the cancellation notice has been sent.
    pub const CANCELLATION_SENT: &str = "Cancellation Sent";
    /// Semicolon-separated owner email addresses.
    pub const BUSINESS_OWNER: &str = "Business owner";
    /// Semicolon-separated expert email addresses.
    pub const TECHNICAL_EXPERT: &str = "Technical Expert";
}

/// External encoding of a true guard flag.
pub const FLAG_TRUE: &str = "True";

/// A subscription's tag set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(BTreeMap<String, String>);

impl TagSet {
    /// Create an empty tag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw lookup by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Insert or replace a tag.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no tags are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `Duration` tag value, if present.
    pub fn duration(&self) -> Option<&str> {
        self.get(keys::DURATION)
    }

    /// The `Deletion Date` tag value, if present.
    pub fn deletion_date(&self) -> Option<&str> {
        self.get(keys::DELETION_DATE)
    }

    /// The `Business owner` tag value, if present.
    pub fn business_owner(&self) -> Option<&str> {
        self.get(keys::BUSINESS_OWNER)
    }

    /// The `Technical Expert` tag value, if present.
    pub fn technical_expert(&self) -> Option<&str> {
        self.get(keys::TECHNICAL_EXPERT)
    }

    /// Whether the warning email guard is set.
    pub fn notification_sent(&self) -> bool {
        self.flag(keys::NOTIFICATION_SENT)
    }

    /// Whether the cancellation notice guard is set.
    pub fn cancellation_sent(&self) -> bool {
        self.flag(keys::CANCELLATION_SENT)
    }

    /// A subscription is tracked once its `Duration` tag contains at least
    /// one digit. This is deliberately looser than the full month pattern:
    /// a malformed-but-numeric Duration still flags the subscription for
    /// follow-up even though no deletion date can be derived from it.
    pub fn has_valid_duration(&self) -> bool {
        self.duration()
            .map(|v| v.chars().any(|c| c.is_ascii_digit()))
            .unwrap_or(false)
    }

    fn flag(&self, key: &str) -> bool {
        self.get(key) == Some(FLAG_TRUE)
    }

    /// Iterate over key/value pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<BTreeMap<String, String>> for TagSet {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl From<TagSet> for BTreeMap<String, String> {
    fn from(tags: TagSet) -> Self {
        tags.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TagSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_valid_duration_with_digits() {
        let tags: TagSet = [(keys::DURATION, "6 months")].into_iter().collect();
        assert!(tags.has_valid_duration());
    }

    #[test]
    fn test_has_valid_duration_malformed_but_numeric() {
        // No "month" suffix, but still tracked for manual follow-up.
        let tags: TagSet = [(keys::DURATION, "about 12 weeks")].into_iter().collect();
        assert!(tags.has_valid_duration());
    }

    #[test]
    fn test_has_valid_duration_no_digits() {
        let tags: TagSet = [(keys::DURATION, "forever")].into_iter().collect();
        assert!(!tags.has_valid_duration());
    }

    #[test]
    fn test_has_valid_duration_missing_tag() {
        assert!(!TagSet::new().has_valid_duration());
    }

    #[test]
    fn test_guard_flags_require_exact_true() {
        let tags: TagSet = [
            (keys::NOTIFICATION_SENT, "True"),
            (keys::CANCELLATION_SENT, "true"),
        ]
        .into_iter()
        .collect();
        assert!(tags.notification_sent());
        // Lowercase is not the external true encoding.
        assert!(!tags.cancellation_sent());
    }

    #[test]
    fn test_absent_flags_read_false() {
        let tags = TagSet::new();
        assert!(!tags.notification_sent());
        assert!(!tags.cancellation_sent());
    }

    #[test]
    fn test_insert_and_get() {
        let mut tags = TagSet::new();
        tags.insert(keys::DELETION_DATE, "01/03/2025");
        assert_eq!(tags.deletion_date(), Some("01/03/2025"));
    }
}
