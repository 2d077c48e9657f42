use async_trait::async_trait;
use serde_json::Value;
use crate::Result;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` when the key is unset
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Stores `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Removes `key`; removing an unset key is not an error
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Well-known store keys.
pub mod keys {
    pub const BLOG_POSTS: &str = "blog:posts";
    pub const NEWS_RULES: &str = "news:rules";
    pub const AUTO_POSTS_PER_DAY: &str = "news:autoPostsPerDay";
    pub const LATEST_NEWS: &str = "latest-news";

    pub fn website(domain: &str) -> String {
        format!("website:{}", domain)
    }
}
