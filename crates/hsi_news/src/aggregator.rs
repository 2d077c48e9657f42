use chrono::Utc;
use futures::future::try_join_all;
use hsi_core::{
    article_prompt, CompletionRequest, Error, Freshness, KeyValueStore, NewsItem, Result,
    SearchClient, SearchOptions, SearchResult, SummarizationModel,
};
use std::sync::Arc;
use tracing::info;
use url::Url;
use crate::config::NewsConfig;
use crate::rules;

const INSIGHT_PROMPT: &str = "Analyze this aesthetic medicine news article and provide key insights. \
Focus on scientific and medical aspects. Exclude any mentions of training providers or courses.";

const DEFAULT_RULES: &str = "Focus on industry news, research, and developments.";

pub(crate) fn insight_instruction(rules: Option<&str>) -> String {
    format!("{}\n\nRules:\n{}", INSIGHT_PROMPT, rules.unwrap_or(DEFAULT_RULES))
}

/// Hostname of an article URL.
pub(crate) fn source_host(url: &str) -> Result<String> {
    let parsed = Url::parse(url)?;
    parsed
        .host_str()
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidUrl(format!("{} has no host", url)))
}

pub(crate) fn is_banned(snippet: &str, markers: &[String]) -> bool {
    let snippet = snippet.to_lowercase();
    markers
        .iter()
        .any(|marker| snippet.contains(marker.to_lowercase().as_str()))
}

/// Builds the on-demand news feed from the approved domains.
pub struct NewsAggregator {
    search: Arc<dyn SearchClient>,
    model: Arc<dyn SummarizationModel>,
    store: Arc<dyn KeyValueStore>,
    config: Arc<NewsConfig>,
}

impl NewsAggregator {
    pub fn new(
        search: Arc<dyn SearchClient>,
        model: Arc<dyn SummarizationModel>,
        store: Arc<dyn KeyValueStore>,
        config: Arc<NewsConfig>,
    ) -> Self {
        Self { search, model, store, config }
    }

    /// Searches every approved domain, keeps results in domain order, drops
    /// banned snippets, truncates to the article limit.
    pub async fn collect_articles(&self) -> Result<Vec<SearchResult>> {
        let options = SearchOptions::new()
            .freshness(Freshness::Month)
            .count(self.config.per_domain_count)
            .category(self.config.news_category.clone());

        let searches = self.config.approved_domains.iter().map(|domain| {
            let query = format!("site:{}", domain);
            let options = &options;
            async move { self.search.search(&query, options).await }
        });
        let per_domain = try_join_all(searches).await?;

        let articles: Vec<SearchResult> = per_domain
            .into_iter()
            .flatten()
            .filter(|article| !is_banned(&article.snippet, &self.config.banned_markers))
            .take(self.config.article_limit)
            .collect();
        Ok(articles)
    }

    /// The feed: every surviving article with a generated insight. Any
    /// failed search or completion fails the whole call.
    pub async fn fetch_news(&self) -> Result<Vec<NewsItem>> {
        let rules = rules::rules_text(self.store.as_ref()).await?;
        let instruction = insight_instruction(rules.as_deref());
        let articles = self.collect_articles().await?;
        info!("📰 Generating insights for {} articles", articles.len());

        let items = articles.into_iter().map(|article| {
            let instruction = instruction.as_str();
            async move {
                let request = CompletionRequest::new(instruction, article_prompt(&article.title, &article.snippet))
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
            }
        });
        try_join_all(items).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hsi_core::testing::{result, FailingSearch, ScriptedModel, StaticSearch};
    use hsi_storage::InMemoryStore;
    use pretty_assertions::assert_eq;

    fn aggregator(search: StaticSearch, model: Arc<ScriptedModel>, store: Arc<InMemoryStore>) -> NewsAggregator {
        NewsAggregator::new(Arc::new(search), model, store, Arc::new(NewsConfig::default()))
    }

    fn domain_results(domain: &str, n: usize) -> Vec<SearchResult> {
        (0..n)
            .map(|i| {
                result(
                    &format!("{} #{}", domain, i),
                    &format!("https://{}/article-{}", domain, i),
                    "Clinical findings on hyaluronic fillers.",
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_banned_snippets_never_appear() {
        let search = StaticSearch::new()
            .with_query(
                "site:aestheticmed.co.uk",
                vec![
                    result("Keep", "https://aestheticmed.co.uk/a", "New toxin study"),
                    result("Drop", "https://aestheticmed.co.uk/b", "Book our COURSE today"),
                    result("Drop too", "https://aestheticmed.co.uk/c", "From a leading Training Provider"),
                ],
            )
            .with_query(
                "site:en.anti-age-magazine.com",
                vec![result("Also drop", "https://en.anti-age-magazine.com/d", "Recourse for patients")],
            );
        let model = Arc::new(ScriptedModel::new());
        let news = aggregator(search, model, Arc::new(InMemoryStore::new()))
            .fetch_news()
            .await
            .unwrap();

        let titles: Vec<&str> = news.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Keep"]);
        assert!(news.iter().all(|n| !n.snippet.to_lowercase().contains("course")));
        assert_eq!(news[0].source, "aestheticmed.co.uk");
        assert_eq!(news[0].insight, "generated: Title: Keep\n\nContent: New toxin study");
    }

    #[tokio::test]
    async fn test_concatenates_in_domain_order_and_truncates() {
        let search = StaticSearch::new()
            .with_query("site:aestheticmed.co.uk", domain_results("aestheticmed.co.uk", 10))
            .with_query("site:en.anti-age-magazine.com", domain_results("en.anti-age-magazine.com", 10));
        let model = Arc::new(ScriptedModel::new());
        let news = aggregator(search, model.clone(), Arc::new(InMemoryStore::new()))
            .fetch_news()
            .await
            .unwrap();

        assert_eq!(news.len(), 15);
        assert_eq!(news[0].title, "aestheticmed.co.uk #0");
        assert_eq!(news[9].title, "aestheticmed.co.uk #9");
        assert_eq!(news[10].title, "en.anti-age-magazine.com #0");
        assert_eq!(news[14].source, "en.anti-age-magazine.com");
        assert_eq!(model.calls().len(), 15);
    }

    #[tokio::test]
    async fn test_search_options_per_domain() {
        let search = Arc::new(StaticSearch::new());
        let agg = NewsAggregator::new(
            search.clone(),
            Arc::new(ScriptedModel::new()),
            Arc::new(InMemoryStore::new()),
            Arc::new(NewsConfig::default()),
        );
        agg.fetch_news().await.unwrap();

        let calls = search.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, "site:aestheticmed.co.uk");
        assert_eq!(calls[1].0, "site:en.anti-age-magazine.com");
        assert_eq!(
            calls[0].1,
            SearchOptions::new().freshness(Freshness::Month).count(15).category("Health")
        );
    }

    #[tokio::test]
    async fn test_rules_are_embedded_in_instruction() {
        let store = Arc::new(InMemoryStore::new());
        rules::save(store.as_ref(), "Mention regulation changes.", 5).await.unwrap();
        let search = StaticSearch::new().with_fallback(vec![result("A", "https://x.org/a", "Study")]);
        let model = Arc::new(ScriptedModel::new());
        aggregator(search, model.clone(), store).fetch_news().await.unwrap();

        let system = model.calls()[0].system_prompt().unwrap().to_string();
        assert!(system.ends_with("Rules:\nMention regulation changes."));
    }

    #[tokio::test]
    async fn test_default_rules_without_configuration() {
        let search = StaticSearch::new().with_fallback(vec![result("A", "https://x.org/a", "Study")]);
        let model = Arc::new(ScriptedModel::new());
        aggregator(search, model.clone(), Arc::new(InMemoryStore::new()))
            .fetch_news()
            .await
            .unwrap();

        let system = model.calls()[0].system_prompt().unwrap().to_string();
        assert!(system.contains(DEFAULT_RULES));
    }

    #[tokio::test]
    async fn test_one_failed_insight_aborts_the_batch() {
        let search = StaticSearch::new().with_fallback(vec![
            result("Fine", "https://x.org/a", "Study"),
            result("Broken", "https://x.org/b", "Study"),
        ]);
        let model = Arc::new(ScriptedModel::new().failing_on("Broken"));
        let result = aggregator(search, model, Arc::new(InMemoryStore::new())).fetch_news().await;
        assert!(matches!(result, Err(Error::Upstream(_))));
    }

    #[tokio::test]
    async fn test_search_failure_surfaces() {
        let agg = NewsAggregator::new(
            Arc::new(FailingSearch),
            Arc::new(ScriptedModel::new()),
            Arc::new(InMemoryStore::new()),
            Arc::new(NewsConfig::default()),
        );
        assert!(agg.fetch_news().await.is_err());
    }

    #[test]
    fn test_source_host() {
        assert_eq!(source_host("https://www.example.com/path?q=1").unwrap(), "www.example.com");
        assert!(source_host("not a url").is_err());
    }
}
