use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use hsi_news::rules;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;
use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    pub domain: String,
}

pub async fn scrape_domain(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ScrapeRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(request) = body?;
    let data = state.scraper.scrape(&request.domain).await?;
    Ok(Json(json!({
        "success": true,
        "pageCount": data.page_count,
        "message": format!("Successfully processed {} pages", data.page_count),
        "data": data,
    })))
}

pub async fn get_news_rules(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let rules = rules::load(state.store.as_ref()).await?;
    Ok(Json(json!(rules)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsRulesRequest {
    pub rules: String,
    pub auto_posts_per_day: u8,
}

/// Saves the rules, then runs the posting job at the new rate. A failed
/// job does not undo the save.
pub async fn save_news_rules(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewsRulesRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(request) = body?;
    rules::save(state.store.as_ref(), &request.rules, request.auto_posts_per_day).await?;

    let scheduled = match state.posting.run(request.auto_posts_per_day).await {
        Ok(posts) => posts.len(),
        Err(e) => {
            warn!("Saved news rules but scheduling failed: {}", e);
            0
        }
    };
    Ok(Json(json!({ "success": true, "scheduled": scheduled })))
}
