use chrono::{DateTime, Local, Utc};
use futures::future::try_join_all;
use hsi_core::{
    article_prompt, slugify, Category, CompletionRequest, Error, Freshness, NewPost, PostStatus,
    Result, ScheduledPost, SearchClient, SearchOptions, SearchResult, SummarizationModel,
};
use hsi_storage::BlogRepository;
use std::sync::Arc;
use crate::config::NewsConfig;
use crate::logging::Logger;
use crate::rules::validate_posts_per_day;
use crate::schedule::generate_post_times;

const POST_PROMPT: &str = "Generate an engaging blog post about this aesthetic medicine news article. \
Focus on the educational and scientific aspects.";

/// Turns today's news into journal posts with staggered `publishedAt` times.
///
/// Times are labels only: posts are written immediately and nothing fires
/// at the scheduled instant. The public listing hides them until then.
pub struct PostingJob {
    search: Arc<dyn SearchClient>,
    model: Arc<dyn SummarizationModel>,
    repository: Arc<BlogRepository>,
    config: Arc<NewsConfig>,
}

impl PostingJob {
    pub fn new(
        search: Arc<dyn SearchClient>,
        model: Arc<dyn SummarizationModel>,
        repository: Arc<BlogRepository>,
        config: Arc<NewsConfig>,
    ) -> Self {
        Self { search, model, repository, config }
    }

    /// Schedules `count` posts between now and the local posting cutoff.
    pub async fn run(&self, count: u8) -> Result<Vec<ScheduledPost>> {
        let count = validate_posts_per_day(count)?;
        let times = generate_post_times(
            Local::now(),
            self.config.posting_cutoff,
            count as usize,
            &mut rand::thread_rng(),
        );
        self.publish(times).await
    }

    /// Fetches one news batch and writes a post per timestamp, in order.
    /// Posts are persisted one by one, so a failure part way through leaves
    /// the earlier ones stored.
    pub async fn publish(&self, times: Vec<DateTime<Utc>>) -> Result<Vec<ScheduledPost>> {
        let logger = Logger::new().with_prefix("schedule");
        let options = SearchOptions::new()
            .freshness(Freshness::Day)
            .count(times.len() as u32);
        let articles = self.search.search(&self.config.posting_query, &options).await?;
        if articles.is_empty() {
            return Err(Error::NotFound("No news articles found".to_string()));
        }
        logger.info(&format!("🗓️ Scheduling {} posts", articles.len().min(times.len())));

        let posts = articles
            .into_iter()
            .zip(times)
            .map(|(article, published_at)| self.write_post(article, published_at, &logger));
        let scheduled = try_join_all(posts).await;
        if let Err(e) = &scheduled {
            logger.error(&format!("Scheduling stopped: {}", e));
        }
        scheduled
    }

    async fn write_post(
        &self,
        article: SearchResult,
        published_at: DateTime<Utc>,
        logger: &Logger,
    ) -> Result<ScheduledPost> {
        let request = CompletionRequest::new(POST_PROMPT, article_prompt(&article.title, &article.snippet))
            .temperature(0.7)
            .max_tokens(500);
        let content = self.model.complete(&request).await?;

        let post = NewPost {
            slug: slugify(&article.title),
            title: article.title,
            content,
            summary: article.snippet,
            category: Category::News,
            tags: self.config.post_tags.clone(),
            author: self.config.post_author.clone(),
            published_at,
            updated_at: None,
            image_url: None,
            status: PostStatus::Published,
        };
        let post = self.repository.create(post).await?;
        logger.debug(&format!("Stored \"{}\" for {}", post.title, published_at));

        Ok(ScheduledPost {
            title: post.title,
            scheduled_time: published_at,
        })
    }
}
