//! Azure Resource Manager client: subscription listing and tag storage.
//!
//! Tags live at the subscription-scope `Microsoft.Resources/tags/default`
//! resource. Writing a single tag is read-then-write: fetch the current
//! set, overlay the key, PUT the full merged set back.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use subwatch_core::{ApiError, CloudApi, Subscription, TagSet};

use crate::auth::{AccessToken, AuthError, TokenClient, MANAGEMENT_SCOPE};
use crate::http::expect_success;

/// Production Resource Manager endpoint.
pub const DEFAULT_MANAGEMENT_BASE: &str = "https://management.azure.com";

const SUBSCRIPTIONS_API_VERSION: &str = "2020-01-01";
const TAGS_API_VERSION: &str = "2021-04-01";

#[derive(Deserialize)]
struct SubscriptionList {
    #[serde(default)]
    value: Vec<SubscriptionEntry>,
}

#[derive(Deserialize)]
struct SubscriptionEntry {
    #[serde(rename = "subscriptionId")]
    subscription_id: String,
    #[serde(rename = "displayName")]
    display_name: String,
}

#[derive(Serialize, Deserialize, Default)]
struct TagsResource {
    #[serde(default)]
    properties: TagsProperties,
}

#[derive(Serialize, Deserialize, Default)]
struct TagsProperties {
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

/// Resource Manager client holding the management-scope credential for
/// the whole run.
#[derive(Debug)]
pub struct ArmClient {
    http: reqwest::blocking::Client,
    base: String,
    token: AccessToken,
}

impl ArmClient {
    /// Fetch the management-scope token and build the client. A failure
    /// here aborts the run.
    pub fn connect(tokens: &TokenClient) -> Result<Self, AuthError> {
        let token = tokens.fetch(MANAGEMENT_SCOPE)?;
        Ok(Self {
            http: reqwest::blocking::Client::new(),
            base: DEFAULT_MANAGEMENT_BASE.to_string(),
            token,
        })
    }

    /// Point the client at a different endpoint (tests, sovereign clouds).
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }

    fn tags_url(&self, subscription_id: &str) -> String {
        format!(
            "{}/subscriptions/{}/providers/Microsoft.Resources/tags/default?api-version={}",
            self.base, subscription_id, TAGS_API_VERSION
        )
    }
}

impl CloudApi for ArmClient {
    fn list_subscriptions(&self) -> Result<Vec<Subscription>, ApiError> {
        const OP: &str = "list_subscriptions";
        let url = format!(
            "{}/subscriptions?api-version={}",
            self.base, SUBSCRIPTIONS_API_VERSION
        );
        let response = self
            .http
            .get(url)
            .bearer_auth(self.token.secret())
            .send()
            .map_err(|e| ApiError::transport(OP, e))?;
        let list: SubscriptionList = expect_success(OP, response)?
            .json()
            .map_err(|e| ApiError::transport(OP, e))?;

        Ok(list
            .value
            .into_iter()
            .map(|entry| Subscription {
                id: entry.subscription_id,
                name: entry.display_name,
            })
            .collect())
    }

    fn get_tags(&self, subscription_id: &str) -> Result<TagSet, ApiError> {
        const OP: &str = "get_tags";
        let response = self
            .http
            .get(self.tags_url(subscription_id))
            .bearer_auth(self.token.secret())
            .send()
            .map_err(|e| ApiError::transport(OP, e))?;
        let resource: TagsResource = expect_success(OP, response)?
            .json()
            .map_err(|e| ApiError::transport(OP, e))?;
        Ok(resource.properties.tags.into())
    }

    fn set_tag(&self, subscription_id: &str, key: &str, value: &str) -> Result<(), ApiError> {
        const OP: &str = "set_tag";
        let mut tags = self.get_tags(subscription_id)?;
        tags.insert(key, value);

        tracing::debug!(subscription_id, key, value, "writing merged tag set");
        let response = self
            .http
            .put(self.tags_url(subscription_id))
            .bearer_auth(self.token.secret())
            .json(&tags_payload(&tags))
            .send()
            .map_err(|e| ApiError::transport(OP, e))?;
        expect_success(OP, response)?;
        Ok(())
    }
}

fn tags_payload(tags: &TagSet) -> TagsResource {
    TagsResource {
        properties: TagsProperties {
            tags: tags.clone().into(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_list_parsing() {
        let json = r#"{
            "value": [
                {"subscriptionId": "sub-1", "displayName": "Sandbox A", "state": "Enabled"},
                {"subscriptionId": "sub-2", "displayName": "Sandbox B", "state": "Enabled"}
            ]
        }"#;
        let list: SubscriptionList = serde_json::from_str(json).unwrap();
        assert_eq!(list.value.len(), 2);
        assert_eq!(list.value[0].subscription_id, "sub-1");
        assert_eq!(list.value[1].display_name, "Sandbox B");
    }

    #[test]
    fn test_subscription_list_empty_body() {
        let list: SubscriptionList = serde_json::from_str("{}").unwrap();
        assert!(list.value.is_empty());
    }

    #[test]
    fn test_tags_resource_parsing() {
        let json = r#"{
            "id": "/subscriptions/sub-1/providers/Microsoft.Resources/tags/default",
            "properties": {"tags": {"Duration": "6 months", "Business owner": "a@x.com"}}
        }"#;
        let resource: TagsResource = serde_json::from_str(json).unwrap();
        assert_eq!(
            resource.properties.tags.get("Duration").map(String::as_str),
            Some("6 months")
        );
    }

    #[test]
    fn test_tags_resource_missing_properties() {
        let resource: TagsResource = serde_json::from_str("{}").unwrap();
        assert!(resource.properties.tags.is_empty());
    }

    #[test]
    fn test_tags_payload_shape() {
        let tags: TagSet = [("Duration", "6 months"), ("Deletion Date", "15/07/2025")]
            .into_iter()
            .collect();
        let body = serde_json::to_value(tags_payload(&tags)).unwrap();
        assert_eq!(body["properties"]["tags"]["Duration"], "6 months");
        assert_eq!(body["properties"]["tags"]["Deletion Date"], "15/07/2025");
    }

    #[test]
    fn test_tags_url() {
        let client = ArmClient {
            http: reqwest::blocking::Client::new(),
            base: DEFAULT_MANAGEMENT_BASE.to_string(),
            token: AccessToken::new("test-token"),
        };
        assert_eq!(
            client.tags_url("sub-1"),
            "https://management.azure.com/subscriptions/sub-1/providers/Microsoft.Resources/tags/default?api-version=2021-04-01"
        );
    }
}
