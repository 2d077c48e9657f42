use chrono::{DateTime, Duration, Utc};
use hsi_core::{keys, BlogPost, Category, KeyValueStore, NewPost, PostUpdate, Result};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;
use crate::typed::{get_json, set_json};

/// Journal posts kept as one list under `blog:posts`.
///
/// Every mutation is a read-modify-write of the whole list. The writer lock
/// serialises those cycles so concurrent callers in this process cannot
/// overwrite each other's changes.
pub struct BlogRepository {
    store: Arc<dyn KeyValueStore>,
    writer: Mutex<()>,
}

fn sort_newest_first(posts: &mut [BlogPost]) {
    posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}

/// A stamp strictly later than `previous`, even if the clock has not moved.
fn next_update_stamp(previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    match previous {
        Some(prev) if now <= prev => prev + Duration::milliseconds(1),
        _ => now,
    }
}

impl BlogRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            writer: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<Vec<BlogPost>> {
        let mut posts: Vec<BlogPost> = get_json(self.store.as_ref(), keys::BLOG_POSTS)
            .await?
            .unwrap_or_default();
        sort_newest_first(&mut posts);
        Ok(posts)
    }

    async fn save(&self, posts: &[BlogPost]) -> Result<()> {
        set_json(self.store.as_ref(), keys::BLOG_POSTS, posts).await
    }

    /// Every post, newest first.
    pub async fn all_posts(&self) -> Result<Vec<BlogPost>> {
        self.load().await
    }

    pub async fn published_posts(&self) -> Result<Vec<BlogPost>> {
        let mut posts = self.load().await?;
        posts.retain(BlogPost::is_published);
        Ok(posts)
    }

    pub async fn post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>> {
        let posts = self.load().await?;
        Ok(posts.into_iter().find(|p| p.slug == slug))
    }

    pub async fn posts_by_category(&self, category: Category) -> Result<Vec<BlogPost>> {
        let mut posts = self.published_posts().await?;
        posts.retain(|p| p.category == category);
        Ok(posts)
    }

    /// Published posts containing every whitespace-separated term of `query`
    /// (case-insensitive) somewhere in title, content, summary or tags.
    pub async fn search(&self, query: &str) -> Result<Vec<BlogPost>> {
        let terms: Vec<String> = query
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        let mut posts = self.published_posts().await?;
        posts.retain(|p| {
            let text = p.search_text();
            terms.iter().all(|term| text.contains(term.as_str()))
        });
        Ok(posts)
    }

    pub async fn create(&self, post: NewPost) -> Result<BlogPost> {
        let _guard = self.writer.lock().await;
        let mut posts = self.load().await?;
        let post = post.with_id(Uuid::new_v4().to_string());
        posts.push(post.clone());
        self.save(&posts).await?;
        debug!(id = %post.id, slug = %post.slug, "Created post");
        Ok(post)
    }

    /// Merges `update` into the post with `id`. `None` if there is no such post.
    pub async fn update(&self, id: &str, update: PostUpdate) -> Result<Option<BlogPost>> {
        let _guard = self.writer.lock().await;
        let mut posts = self.load().await?;
        let Some(post) = posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        update.apply(post);
        post.updated_at = Some(next_update_stamp(post.updated_at));
        let updated = post.clone();

        self.save(&posts).await?;
        debug!(id = %id, "Updated post");
        Ok(Some(updated))
    }

    /// Removes the post with `id`. `false` if there was no such post.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let _guard = self.writer.lock().await;
        let mut posts = self.load().await?;
        let before = posts.len();
        posts.retain(|p| p.id != id);
        if posts.len() == before {
            return Ok(false);
        }

        self.save(&posts).await?;
        debug!(id = %id, "Deleted post");
        Ok(true)
    }
}
