use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    News,
    Education,
    Industry,
    Research,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::News => "news",
            Category::Education => "education",
            Category::Industry => "industry",
            Category::Research => "research",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "news" => Ok(Category::News),
            "education" => Ok(Category::Education),
            "industry" => Ok(Category::Industry),
            "research" => Ok(Category::Research),
            other => Err(Error::Validation(format!("Unknown category: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
    Archived,
}

/// A journal post as stored under the `blog:posts` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub content: String,
    pub summary: String,
    pub category: Category,
    pub tags: Vec<String>,
    pub author: String,
    pub published_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub slug: String,
    pub status: PostStatus,
}

impl BlogPost {
    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// Published and not scheduled for later than `now`.
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        self.is_published() && self.published_at <= now
    }

    /// Text the search matches against: title, content, summary and tags.
    pub fn search_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.title,
            self.content,
            self.summary,
            self.tags.join(" ")
        )
        .to_lowercase()
    }
}

/// A post as submitted for creation; the id is assigned by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub summary: String,
    pub category: Category,
    pub tags: Vec<String>,
    pub author: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub slug: String,
    pub status: PostStatus,
}

impl NewPost {
    pub fn with_id(self, id: String) -> BlogPost {
        BlogPost {
            id,
            title: self.title,
            content: self.content,
            summary: self.summary,
            category: self.category,
            tags: self.tags,
            author: self.author,
            published_at: self.published_at,
            updated_at: self.updated_at,
            image_url: self.image_url,
            slug: self.slug,
            status: self.status,
        }
    }
}

/// Deserializes a present field, `null` included, as `Some`, so an absent
/// field and an explicit `null` stay distinguishable.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial update merged over an existing post. `None` leaves a field as is;
/// `imageUrl: null` clears the image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub category: Option<Category>,
    pub tags: Option<Vec<String>>,
    pub author: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Option<String>>,
    pub slug: Option<String>,
    pub status: Option<PostStatus>,
}

impl PostUpdate {
    pub fn apply(self, post: &mut BlogPost) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
        if let Some(summary) = self.summary {
            post.summary = summary;
        }
        if let Some(category) = self.category {
            post.category = category;
        }
        if let Some(tags) = self.tags {
            post.tags = tags;
        }
        if let Some(author) = self.author {
            post.author = author;
        }
        if let Some(published_at) = self.published_at {
            post.published_at = published_at;
        }
        if let Some(image_url) = self.image_url {
            post.image_url = image_url;
        }
        if let Some(slug) = self.slug {
            post.slug = slug;
        }
        if let Some(status) = self.status {
            post.status = status;
        }
    }
}

/// Lowercases `title` and replaces every run of characters outside
/// `[a-z0-9]` with a single hyphen. Uniqueness is not checked.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut in_run = false;
    for c in title.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
            in_run = false;
        } else if !in_run {
            slug.push('-');
            in_run = true;
        }
    }
    slug
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Freshness {
    Day,
    Week,
    Month,
}

impl Freshness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Freshness::Day => "Day",
            Freshness::Week => "Week",
            Freshness::Month => "Month",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    pub freshness: Option<Freshness>,
    pub count: Option<u32>,
    pub category: Option<String>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn freshness(mut self, freshness: Freshness) -> Self {
        self.freshness = Some(freshness);
        self
    }

    pub fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_published: Option<String>,
}

/// A search result enriched with a generated insight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub insight: String,
    pub date: DateTime<Utc>,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawledPage {
    pub url: String,
    pub title: String,
    pub content: String,
    pub last_crawled: DateTime<Utc>,
}

/// Snapshot of a scraped domain, stored under `website:{domain}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteData {
    pub domain: String,
    pub pages: Vec<CrawledPage>,
    pub last_updated: DateTime<Utc>,
    pub page_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledPost {
    pub title: String,
    pub scheduled_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// A single completion call: the conversation plus sampling limits.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature: 0.7,
            max_tokens: 250,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
    }

    /// Content of the last user message.
    pub fn user_prompt(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }
}

/// `Title: ...\n\nContent: ...` as sent for every article summary.
pub fn article_prompt(title: &str, snippet: &str) -> String {
    format!("Title: {}\n\nContent: {}", title, snippet)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> BlogPost {
        BlogPost {
            id: "1".to_string(),
            title: "Old".to_string(),
            content: "Body".to_string(),
            summary: "Sum".to_string(),
            category: Category::News,
            tags: vec!["a".to_string()],
            author: "Editor".to_string(),
            published_at: Utc::now(),
            updated_at: None,
            image_url: None,
            slug: "old".to_string(),
            status: PostStatus::Draft,
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Botox & Fillers: 2024 Update"), "botox-fillers-2024-update");
        assert_eq!(slugify("  Leading space"), "-leading-space");
        assert_eq!(slugify("Trailing!"), "trailing-");
        assert_eq!(slugify("Crème brûlée"), "cr-me-br-l-e");
    }

    #[test]
    fn test_post_update_merges_only_present_fields() {
        let mut p = post();
        PostUpdate {
            title: Some("New".to_string()),
            status: Some(PostStatus::Published),
            ..Default::default()
        }
        .apply(&mut p);

        assert_eq!(p.title, "New");
        assert_eq!(p.status, PostStatus::Published);
        assert_eq!(p.content, "Body");
        assert_eq!(p.id, "1");
    }

    #[test]
    fn test_post_update_image_url_absent_set_or_cleared() {
        let mut p = post();
        p.image_url = Some("https://cdn.example/a.png".to_string());

        let untouched: PostUpdate = serde_json::from_value(serde_json::json!({ "title": "T" })).unwrap();
        assert_eq!(untouched.image_url, None);
        untouched.apply(&mut p);
        assert_eq!(p.image_url.as_deref(), Some("https://cdn.example/a.png"));

        let replaced: PostUpdate =
            serde_json::from_value(serde_json::json!({ "imageUrl": "https://cdn.example/b.png" })).unwrap();
        replaced.apply(&mut p);
        assert_eq!(p.image_url.as_deref(), Some("https://cdn.example/b.png"));

        let cleared: PostUpdate = serde_json::from_value(serde_json::json!({ "imageUrl": null })).unwrap();
        assert_eq!(cleared.image_url, Some(None));
        cleared.apply(&mut p);
        assert_eq!(p.image_url, None);
    }

    #[test]
    fn test_post_json_uses_camel_case() {
        let json = serde_json::to_value(post()).unwrap();
        assert!(json.get("publishedAt").is_some());
        assert_eq!(json["category"], "news");
        assert_eq!(json["status"], "draft");
        assert!(json.get("updatedAt").is_none());
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("research".parse::<Category>().unwrap(), Category::Research);
        assert!("gossip".parse::<Category>().is_err());
    }

    #[test]
    fn test_visibility() {
        let mut p = post();
        p.status = PostStatus::Published;
        p.published_at = Utc::now() + chrono::Duration::hours(1);
        assert!(!p.is_visible_at(Utc::now()));
        assert!(p.is_visible_at(Utc::now() + chrono::Duration::hours(2)));
    }
}
