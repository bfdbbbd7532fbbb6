//! 缓存相关API处理器

use std::sync::Arc;

use axum::{extract::State, response::Json};

use crate::web::handlers::{error_response, ApiError};
use crate::web::types::{AppState, CacheStatsResponse};

/// 获取缓存统计信息
pub async fn get_cache_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CacheStatsResponse>, ApiError> {
    let cache = state
        .service
        .cache_stats()
        .await
        .map_err(|e| error_response(&e))?;

    Ok(Json(CacheStatsResponse {
        hit_rate: cache.hit_rate(),
        cache,
        service: state.service.stats().snapshot(),
    }))
}
