//! Web 路由定义

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::web::{handlers::*, types::AppState};

/// 创建路由结构
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/translate", post(translate_text))
        .route("/collect-texts", post(collect_texts))
        .route("/languages", get(get_languages))
        .route("/api/cache/stats", get(get_cache_stats))
}
