use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::AUTHORIZATION, HeaderMap},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub async fn get_news(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let news = state.aggregator.fetch_news().await?;
    Ok(Json(json!({ "success": true, "news": news })))
}

pub async fn get_latest_news(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let news = state.latest.latest().await?;
    Ok(Json(json!({ "news": news })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub posts_per_day: u8,
}

pub async fn schedule_posts(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ScheduleRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(request) = body?;
    let scheduled = state.posting.run(request.posts_per_day).await?;
    Ok(Json(json!({ "success": true, "scheduledPosts": scheduled })))
}

/// Checks `Authorization: Bearer <secret>`. Without a configured secret no
/// caller is accepted.
pub(crate) fn authorize_cron(headers: &HeaderMap, secret: Option<&str>) -> ApiResult<()> {
    let secret = secret.filter(|s| !s.is_empty()).ok_or(ApiError::Unauthorized)?;
    let presented = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    match presented {
        Some(token) if token == secret => Ok(()),
        _ => Err(ApiError::Unauthorized),
    }
}

pub async fn refresh_news(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    authorize_cron(&headers, state.cron_secret.as_deref())?;

    let count = state.latest.refresh().await?;
    if count == 0 {
        return Ok(Json(json!({ "message": "No new articles found" })));
    }
    Ok(Json(json!({
        "success": true,
        "message": format!("Processed {} news articles", count),
        "timestamp": Utc::now(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_authorize_cron() {
        assert!(authorize_cron(&headers("Bearer s3cret"), Some("s3cret")).is_ok());
        assert!(authorize_cron(&headers("Bearer wrong"), Some("s3cret")).is_err());
        assert!(authorize_cron(&headers("s3cret"), Some("s3cret")).is_err());
        assert!(authorize_cron(&HeaderMap::new(), Some("s3cret")).is_err());
    }

    #[test]
    fn test_unset_secret_rejects_everyone() {
        assert!(authorize_cron(&headers("Bearer undefined"), None).is_err());
        assert!(authorize_cron(&headers("Bearer "), Some("")).is_err());
    }
}
