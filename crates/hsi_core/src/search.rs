use async_trait::async_trait;
use crate::types::{SearchOptions, SearchResult};
use crate::Result;

#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Run a free-text query and return normalized results in upstream order
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>>;
}
