//! 文本收集API处理器

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use serde_json::Value;

use crate::web::handlers::{bad_request, error_response, ApiError};
use crate::web::types::{AppState, CollectTextsRequest, CollectTextsResponse};

const INVALID_PAYLOAD: &str = r#"invalid payload, expected {"texts": [..]}"#;

/// 收集前端页面上的文本，追加到文本日志
///
/// `count` 为收到的文本数量，包括规范化后为空而被跳过的条目。
pub async fn collect_texts(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CollectTextsRequest>, JsonRejection>,
) -> Result<Json<CollectTextsResponse>, ApiError> {
    let Json(request) = payload.map_err(|_| bad_request(INVALID_PAYLOAD))?;

    let texts = request
        .texts
        .filter(|texts| !texts.is_empty())
        .ok_or_else(|| bad_request(INVALID_PAYLOAD))?;

    let lines: Vec<String> = texts.iter().filter_map(text_of).collect();
    let written = state
        .text_log
        .append(&lines)
        .await
        .map_err(|e| error_response(&e))?;

    tracing::info!(
        "收集文本 {} 条, 写入 {} 行 (来源: {})",
        texts.len(),
        written,
        request.source.as_deref().unwrap_or("-")
    );

    Ok(Json(CollectTextsResponse {
        status: "ok".to_string(),
        count: texts.len(),
    }))
}

/// 非字符串条目按 JSON 文本记录，`null` 跳过
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
