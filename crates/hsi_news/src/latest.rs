use chrono::Utc;
use futures::future::try_join_all;
use hsi_core::{
    article_prompt, keys, CompletionRequest, Error, Freshness, KeyValueStore, NewsItem, Result,
    SearchClient, SearchOptions, SummarizationModel,
};
use hsi_storage::typed::{get_json, set_json};
use std::sync::Arc;
use tracing::info;
use crate::aggregator::source_host;
use crate::config::NewsConfig;

const EXPERT_PROMPT: &str = "You are an expert in aesthetic medicine. Analyze this news article and \
provide key insights relevant to medical professionals and students in aesthetic medicine.";

/// Periodic refresh of the `latest-news` snapshot, run by an external cron.
pub struct LatestNews {
    search: Arc<dyn SearchClient>,
    model: Arc<dyn SummarizationModel>,
    store: Arc<dyn KeyValueStore>,
    config: Arc<NewsConfig>,
}

impl LatestNews {
    pub fn new(
        search: Arc<dyn SearchClient>,
        model: Arc<dyn SummarizationModel>,
        store: Arc<dyn KeyValueStore>,
        config: Arc<NewsConfig>,
    ) -> Self {
        Self { search, model, store, config }
    }

    /// Replaces the snapshot with today's articles and returns how many were
    /// stored. With no articles the previous snapshot is left alone.
    pub async fn refresh(&self) -> Result<usize> {
        let options = SearchOptions::new()
            .freshness(Freshness::Day)
            .count(self.config.digest_count)
            .category(self.config.news_category.clone());
        let articles = self.search.search(&self.config.digest_query, &options).await?;
        if articles.is_empty() {
            info!("No new articles found");
            return Ok(0);
        }

        let items = articles.into_iter().map(|article| async move {
            let request = CompletionRequest::new(EXPERT_PROMPT, article_prompt(&article.title, &article.snippet))
                .temperature(0.7)
                .max_tokens(250);
            let insight = self.model.complete(&request).await?;
            let source = source_host(&article.url)?;
            Ok::<_, Error>(NewsItem {
                title: article.title,
                url: article.url,
                snippet: article.snippet,
                insight,
                date: Utc::now(),
                source,
            })
        });
        let items = try_join_all(items).await?;

        set_json(self.store.as_ref(), keys::LATEST_NEWS, &items).await?;
        info!(count = items.len(), "📰 Latest news refreshed");
        Ok(items.len())
    }

    /// The stored snapshot; empty before the first refresh.
    pub async fn latest(&self) -> Result<Vec<NewsItem>> {
        Ok(get_json(self.store.as_ref(), keys::LATEST_NEWS)
            .await?
            .unwrap_or_default())
    }
}
