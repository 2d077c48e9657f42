use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handlers;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route(
            "/api/blog",
            get(handlers::blog::list_posts)
                .post(handlers::blog::create_post)
                .put(handlers::blog::update_post)
                .delete(handlers::blog::delete_post),
        )
        .route("/api/news", get(handlers::news::get_news))
        .route("/api/news/latest", get(handlers::news::get_latest_news))
        .route("/api/news/schedule", post(handlers::news::schedule_posts))
        .route("/api/news/cron", post(handlers::news::refresh_news))
        .route(
            "/api/admin/news-rules",
            get(handlers::admin::get_news_rules).post(handlers::admin::save_news_rules),
        )
        .route("/api/admin/scrape", post(handlers::admin::scrape_domain))
        .route("/api/chat", post(handlers::chat::chat))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use crate::{create_app, ApiError, AppState};
    pub use hsi_core::{Error, Result};
}
