use std::sync::Arc;
use hsi_core::{KeyValueStore, SearchClient, SummarizationModel};
use hsi_news::{ChatAssistant, LatestNews, NewsAggregator, NewsConfig, PostingJob, SiteScraper};
use hsi_storage::BlogRepository;

pub struct AppState {
    pub store: Arc<dyn KeyValueStore>,
    pub posts: Arc<BlogRepository>,
    pub aggregator: NewsAggregator,
    pub posting: PostingJob,
    pub scraper: SiteScraper,
    pub latest: LatestNews,
    pub chat: ChatAssistant,
    /// Bearer token the cron endpoint expects; unset rejects every call
    pub cron_secret: Option<String>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        search: Arc<dyn SearchClient>,
        model: Arc<dyn SummarizationModel>,
        config: Arc<NewsConfig>,
        cron_secret: Option<String>,
    ) -> Self {
        let posts = Arc::new(BlogRepository::new(store.clone()));
        Self {
            aggregator: NewsAggregator::new(search.clone(), model.clone(), store.clone(), config.clone()),
            posting: PostingJob::new(search.clone(), model.clone(), posts.clone(), config.clone()),
            scraper: SiteScraper::new(search.clone(), model.clone(), store.clone(), config.clone()),
            latest: LatestNews::new(search.clone(), model.clone(), store.clone(), config),
            chat: ChatAssistant::new(search, model),
            posts,
            store,
            cron_secret,
        }
    }
}
