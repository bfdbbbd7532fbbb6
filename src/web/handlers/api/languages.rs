//! 语言列表API处理器

use std::sync::Arc;

use axum::{extract::State, response::Json};
use serde_json::{Map, Value};

use crate::translation::LanguageCatalog;
use crate::web::handlers::{error_response, ApiError};
use crate::web::types::AppState;

/// 返回语言参考数据
///
/// 每次请求重新读取文件，文件更新后无需重启服务。
pub async fn get_languages(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Map<String, Value>>, ApiError> {
    let path = state.languages_path.clone();
    let rtl_languages = state.rtl_languages.clone();

    let catalog = tokio::task::spawn_blocking(move || LanguageCatalog::load(&path, rtl_languages.as_slice()))
        .await
        .map_err(|e| {
            error_response(&crate::translation::TranslationError::StorageError(format!(
                "读取语言列表任务失败: {}",
                e
            )))
        })?
        .map_err(|e| error_response(&e))?;

    Ok(Json(catalog.as_json().clone()))
}
