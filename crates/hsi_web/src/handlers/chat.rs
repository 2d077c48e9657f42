use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use hsi_core::ChatMessage;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(request) = body?;
    let reply = state.chat.reply(request.messages).await?;
    Ok(Json(json!({ "reply": reply })))
}
