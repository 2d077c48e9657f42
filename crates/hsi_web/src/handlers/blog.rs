use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    Json,
};
use chrono::Utc;
use hsi_core::{BlogPost, Category, NewPost, PostUpdate};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogQuery {
    pub category: Option<String>,
    pub q: Option<String>,
    pub slug: Option<String>,
    /// Also list published posts whose publish time is still ahead
    #[serde(default)]
    pub include_scheduled: bool,
}

/// `?slug=` returns one visible post (or null); `?category=`, `?q=` and the bare
/// listing return published posts, newest first.
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    query: Result<Query<BlogQuery>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(query) = query?;
    let now = Utc::now();

    if let Some(slug) = &query.slug {
        let post = state
            .posts
            .post_by_slug(slug)
            .await?
            .filter(|p| query.include_scheduled || p.is_visible_at(now));
        return Ok(Json(json!({ "posts": post })));
    }

    let mut posts: Vec<BlogPost> = if let Some(category) = &query.category {
        let category: Category = category.parse()?;
        state.posts.posts_by_category(category).await?
    } else if let Some(q) = &query.q {
        state.posts.search(q).await?
    } else {
        state.posts.published_posts().await?
    };

    if !query.include_scheduled {
        posts.retain(|p| p.is_visible_at(now));
    }
    Ok(Json(json!({ "posts": posts })))
}

pub async fn create_post(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewPost>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(post) = body?;
    let post = state.posts.create(post).await?;
    Ok(Json(json!({ "post": post })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub id: Option<String>,
    #[serde(flatten)]
    pub updates: PostUpdate,
}

pub async fn update_post(
    State(state): State<Arc<AppState>>,
    body: Result<Json<UpdateRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(request) = body?;
    let id = request
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Post ID is required".to_string()))?;

    let post = state
        .posts
        .update(&id, request.updates)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;
    Ok(Json(json!({ "post": post })))
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub id: Option<String>,
}

pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    query: Result<Query<DeleteQuery>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(query) = query?;
    let id = query
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Post ID is required".to_string()))?;

    if !state.posts.delete(&id).await? {
        return Err(ApiError::NotFound("Post not found".to_string()));
    }
    Ok(Json(json!({ "success": true })))
}
