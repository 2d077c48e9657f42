use chrono::Utc;
use hsi_core::{
    article_prompt, keys, CompletionRequest, CrawledPage, Error, KeyValueStore, Result,
    SearchClient, SearchOptions, SummarizationModel, WebsiteData,
};
use hsi_storage::typed::set_json;
use std::sync::Arc;
use url::Url;
use crate::config::NewsConfig;
use crate::logging::Logger;

const EXTRACT_PROMPT: &str = "Extract key information about aesthetic medicine training and procedures. \
Focus on courses, qualifications, and training programs.";

/// Snapshots a domain's indexed pages with extracted summaries.
pub struct SiteScraper {
    search: Arc<dyn SearchClient>,
    model: Arc<dyn SummarizationModel>,
    store: Arc<dyn KeyValueStore>,
    config: Arc<NewsConfig>,
}

impl SiteScraper {
    pub fn new(
        search: Arc<dyn SearchClient>,
        model: Arc<dyn SummarizationModel>,
        store: Arc<dyn KeyValueStore>,
        config: Arc<NewsConfig>,
    ) -> Self {
        Self { search, model, store, config }
    }

    /// Scrapes `domain` (a full URL) and replaces its stored snapshot.
    ///
    /// Pages are summarized one at a time with `scrape_delay` between calls.
    /// A page whose summary fails keeps its search snippet as content.
    pub async fn scrape(&self, domain: &str) -> Result<WebsiteData> {
        Url::parse(domain)?;
        let logger = Logger::new().with_prefix("scrape").with_prefix(domain);
        logger.info("🦗 Starting scrape");

        let pages = self
            .search
            .search(&format!("site:{}", domain), &SearchOptions::new())
            .await?;
        if pages.is_empty() {
            logger.warn("No pages found via search");
            return Err(Error::NotFound("No pages found to scrape".to_string()));
        }

        let total = pages.len();
        let mut processed = Vec::with_capacity(total);
        for (i, page) in pages.into_iter().enumerate() {
            logger.debug(&format!("Processing page {}/{}: {}", i + 1, total, page.url));
            let request = CompletionRequest::new(EXTRACT_PROMPT, article_prompt(&page.title, &page.snippet))
                .temperature(0.3)
                .max_tokens(500);

            let content = match self.model.complete(&request).await {
                Ok(summary) => {
                    if i + 1 < total && !self.config.scrape_delay.is_zero() {
                        tokio::time::sleep(self.config.scrape_delay).await;
                    }
                    if summary.is_empty() {
                        page.snippet
                    } else {
                        summary
                    }
                }
                Err(e) => {
                    logger.error(&format!("Error processing page {}: {}", page.url, e));
                    page.snippet
                }
            };

            processed.push(CrawledPage {
                url: page.url,
                title: page.title,
                content,
                last_crawled: Utc::now(),
            });
        }

        let data = WebsiteData {
            domain: domain.to_string(),
            page_count: processed.len(),
            pages: processed,
            last_updated: Utc::now(),
        };
        set_json(self.store.as_ref(), &keys::website(domain), &data).await?;
        logger.info(&format!("✨ Processed {} pages", data.page_count));
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hsi_core::testing::{result, ScriptedModel, StaticSearch};
    use hsi_core::SearchResult;
    use hsi_storage::typed::get_json;
    use hsi_storage::InMemoryStore;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn pages(n: usize) -> Vec<SearchResult> {
        (0..n)
            .map(|i| {
                result(
                    &format!("Page {}", i),
                    &format!("https://clinic.example/{}", i),
                    &format!("Snippet for page {}", i),
                )
            })
            .collect()
    }

    fn scraper(search: StaticSearch, model: ScriptedModel, store: Arc<InMemoryStore>) -> SiteScraper {
        let config = NewsConfig {
            scrape_delay: Duration::ZERO,
            ..Default::default()
        };
        SiteScraper::new(Arc::new(search), Arc::new(model), store, Arc::new(config))
    }

    #[tokio::test]
    async fn test_failed_summary_keeps_snippet() {
        let store = Arc::new(InMemoryStore::new());
        let search = StaticSearch::new().with_query("site:https://clinic.example", pages(5));
        let model = ScriptedModel::new().failing_on("Page 3");

        let data = scraper(search, model, store.clone())
            .scrape("https://clinic.example")
            .await
            .unwrap();

        assert_eq!(data.page_count, 5);
        assert_eq!(data.pages.len(), 5);
        assert_eq!(data.pages[3].content, "Snippet for page 3");
        assert_eq!(
            data.pages[0].content,
            "generated: Title: Page 0\n\nContent: Snippet for page 0"
        );

        let stored: WebsiteData = get_json(store.as_ref(), "website:https://clinic.example")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, data);
    }

    #[tokio::test]
    async fn test_rescrape_overwrites_snapshot() {
        let store = Arc::new(InMemoryStore::new());
        scraper(StaticSearch::new().with_fallback(pages(4)), ScriptedModel::new(), store.clone())
            .scrape("https://clinic.example")
            .await
            .unwrap();
        scraper(StaticSearch::new().with_fallback(pages(2)), ScriptedModel::new(), store.clone())
            .scrape("https://clinic.example")
            .await
            .unwrap();

        let stored: WebsiteData = get_json(store.as_ref(), "website:https://clinic.example")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.page_count, 2);
    }

    #[tokio::test]
    async fn test_no_pages_is_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let err = scraper(StaticSearch::new(), ScriptedModel::new(), store.clone())
            .scrape("https://empty.example")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_domain_must_be_a_url() {
        let err = scraper(StaticSearch::new(), ScriptedModel::new(), Arc::new(InMemoryStore::new()))
            .scrape("clinic.example")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_summaries_use_low_temperature() {
        let model = Arc::new(ScriptedModel::new());
        let scraper = SiteScraper::new(
            Arc::new(StaticSearch::new().with_fallback(pages(1))),
            model.clone(),
            Arc::new(InMemoryStore::new()),
            Arc::new(NewsConfig { scrape_delay: Duration::ZERO, ..Default::default() }),
        );
        scraper.scrape("https://clinic.example").await.unwrap();

        let call = &model.calls()[0];
        assert_eq!(call.temperature, 0.3);
        assert_eq!(call.max_tokens, 500);
    }
}
