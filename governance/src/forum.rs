//! Draft proposal discovery on the Discourse forum.
//!
//! Drafts are forum topics in the proposals category, named with the
//! proposal prefix and tagged `draft` or `review`.

use serde::Deserialize;
use std::time::Duration;

use crate::error::GovernanceError;
use crate::hub::{build_http, get_json};
use govdash_types::ValidationError;

const DRAFT_TAGS: [&str; 2] = ["draft", "review"];

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ForumTopic {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, deserialize_with = "tag_names")]
    pub tags: Vec<String>,
}

impl ForumTopic {
    pub fn url(&self, forum_url: &str) -> String {
        format!("{}/t/{}/{}", forum_url.trim_end_matches('/'), self.slug, self.id)
    }
}

// Discourse reports tags as plain names or as `{ "name": ... }` objects
// depending on version.
fn tag_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Tag {
        Name(String),
        Object { name: String },
    }

    let tags: Option<Vec<Tag>> = Option::deserialize(deserializer)?;
    Ok(tags
        .unwrap_or_default()
        .into_iter()
        .map(|t| match t {
            Tag::Name(name) | Tag::Object { name } => name,
        })
        .collect())
}

#[derive(Deserialize)]
struct CategoryResponse {
    topic_list: TopicList,
}

#[derive(Deserialize)]
struct TopicList {
    #[serde(default)]
    topics: Vec<ForumTopic>,
}

/// Keep topics named with `prefix` and tagged as drafts or under review.
pub fn select_drafts(topics: Vec<ForumTopic>, prefix: &str) -> Vec<ForumTopic> {
    topics
        .into_iter()
        .filter(|t| t.title.starts_with(prefix))
        .filter(|t| t.tags.iter().any(|tag| DRAFT_TAGS.contains(&tag.as_str())))
        .collect()
}

/// Read-only Discourse API client.
#[derive(Clone)]
pub struct ForumClient {
    http: reqwest::Client,
    forum_url: String,
    category: u32,
    api_key: Option<String>,
    api_username: Option<String>,
}

impl ForumClient {
    pub fn new(
        forum_url: impl Into<String>,
        category: u32,
        timeout: Duration,
    ) -> Result<Self, GovernanceError> {
        let forum_url: String = forum_url.into();
        Ok(Self {
            http: build_http(timeout)?,
            forum_url: forum_url.trim_end_matches('/').to_string(),
            category,
            api_key: None,
            api_username: None,
        })
    }

    /// Authenticate requests with a user API key.
    pub fn with_credentials(mut self, api_key: Option<String>, api_username: Option<String>) -> Self {
        self.api_key = api_key;
        self.api_username = api_username;
        self
    }

    pub fn forum_url(&self) -> &str {
        &self.forum_url
    }

    pub fn category_url(&self) -> String {
        format!("{}/c/{}.json", self.forum_url, self.category)
    }

    /// Latest topics in the category that are draft proposals.
    pub async fn draft_topics(&self, prefix: &str) -> Result<Vec<ForumTopic>, GovernanceError> {
        let mut headers = Vec::new();
        if let Some(key) = &self.api_key {
            headers.push(("Api-Key", key.as_str()));
        }
        if let Some(user) = &self.api_username {
            headers.push(("Api-Username", user.as_str()));
        }

        let json = get_json(&self.http, &self.category_url(), &headers).await?;
        let response: CategoryResponse = serde_json::from_value(json)
            .map_err(|e| ValidationError::malformed("forum category", e))?;

        let drafts = select_drafts(response.topic_list.topics, prefix);
        for topic in &drafts {
            tracing::info!(title = %topic.title, "draft proposal");
        }
        Ok(drafts)
    }
}
