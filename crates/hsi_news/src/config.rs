use chrono::NaiveTime;
use std::time::Duration;

pub const MAX_POSTS_PER_DAY: u8 = 20;
pub const DEFAULT_POSTS_PER_DAY: u8 = 5;

/// Knobs for the news pipelines.
#[derive(Debug, Clone)]
pub struct NewsConfig {
    /// Domains the aggregated feed is drawn from, in output order
    pub approved_domains: Vec<String>,
    /// Snippets containing any of these (case-insensitive) are dropped
    pub banned_markers: Vec<String>,
    pub article_limit: usize,
    pub per_domain_count: u32,
    pub news_category: String,
    /// Latest local time a generated post may be published at
    pub posting_cutoff: NaiveTime,
    pub posting_query: String,
    pub post_tags: Vec<String>,
    pub post_author: String,
    pub digest_query: String,
    pub digest_count: u32,
    pub scrape_delay: Duration,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            approved_domains: vec![
                "aestheticmed.co.uk".to_string(),
                "en.anti-age-magazine.com".to_string(),
            ],
            banned_markers: vec!["course".to_string(), "training provider".to_string()],
            article_limit: 15,
            per_domain_count: 15,
            news_category: "Health".to_string(),
            posting_cutoff: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default(),
            posting_query: "aesthetic medicine news".to_string(),
            post_tags: vec!["aesthetic-medicine".to_string(), "industry-news".to_string()],
            post_author: "AI Editor".to_string(),
            digest_query: "aesthetic medicine training OR cosmetic procedures OR aesthetic industry news"
                .to_string(),
            digest_count: 10,
            scrape_delay: Duration::from_secs(1),
        }
    }
}
