pub mod aggregator;
pub mod chat;
pub mod config;
pub mod latest;
pub mod logging;
pub mod posting;
pub mod rules;
pub mod schedule;
pub mod scrape;

pub use aggregator::NewsAggregator;
pub use chat::ChatAssistant;
pub use config::NewsConfig;
pub use latest::LatestNews;
pub use logging::{init_logging, Logger};
pub use posting::PostingJob;
pub use rules::NewsRules;
pub use scrape::SiteScraper;

pub mod prelude {
    pub use super::{ChatAssistant, LatestNews, NewsAggregator, NewsConfig, PostingJob, SiteScraper};
    pub use hsi_core::{Error, NewsItem, Result, ScheduledPost, WebsiteData};
}
