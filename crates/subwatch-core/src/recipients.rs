//! Notification recipient resolution.

use std::collections::BTreeSet;

use crate::tags::TagSet;

/// Resolve the recipient set for a subscription's notifications.
///
/// Splits the `Business owner` and `Technical Expert` tags on `;`, trims
/// whitespace, drops empty entries, and always includes the fixed default
/// address. The result is de-duplicated; ordering carries no meaning.
pub fn resolve_recipients(tags: &TagSet, default_recipient: &str) -> BTreeSet<String> {
    let mut recipients = BTreeSet::new();

    for value in [tags.business_owner(), tags.technical_expert()]
        .into_iter()
        .flatten()
    {
        for entry in value.split(';') {
            let entry = entry.trim();
            if !entry.is_empty() {
                recipients.insert(entry.to_string());
            }
        }
    }

    recipients.insert(default_recipient.to_string());
    recipients
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::keys;

    fn set(entries: &[&str]) -> BTreeSet<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_only() {
        let recipients = resolve_recipients(&TagSet::new(), "d@x.com");
        assert_eq!(recipients, set(&["d@x.com"]));
    }

    #[test]
    fn test_dedup_across_sources() {
        let tags: TagSet = [
            (keys::BUSINESS_OWNER, "a@x.com; b@x.com"),
            (keys::TECHNICAL_EXPERT, "b@x.com"),
        ]
        .into_iter()
        .collect();
        let recipients = resolve_recipients(&tags, "d@x.com");
        assert_eq!(recipients, set(&["a@x.com", "b@x.com", "d@x.com"]));
    }

    #[test]
    fn test_default_already_tagged() {
        let tags: TagSet = [(keys::BUSINESS_OWNER, "d@x.com")].into_iter().collect();
        let recipients = resolve_recipients(&tags, "d@x.com");
        assert_eq!(recipients, set(&["d@x.com"]));
    }

    #[test]
    fn test_trims_and_drops_empties() {
        let tags: TagSet = [(keys::TECHNICAL_EXPERT, " a@x.com ;; ;b@x.com;")]
            .into_iter()
            .collect();
        let recipients = resolve_recipients(&tags, "d@x.com");
        assert_eq!(recipients, set(&["a@x.com", "b@x.com", "d@x.com"]));
    }
}
