//! 翻译API处理器

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};

use crate::web::handlers::{bad_request, error_response, ApiError};
use crate::web::types::{AppState, TranslateRequest, TranslateResponse};

/// 翻译单段文本
///
/// 成功时返回完整译文；任何失败都返回错误状态，不会返回部分或占位译文。
pub async fn translate_text(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| bad_request(format!("请求体无效: {}", e)))?;

    // 空白目标语言由服务拒绝，空白正文由服务原样返回
    let target = request
        .target
        .as_deref()
        .ok_or_else(|| bad_request("缺少 target 字段"))?;
    let text = request
        .text
        .as_deref()
        .ok_or_else(|| bad_request("缺少 text 字段"))?;

    let translation = state
        .service
        .translate(target, text)
        .await
        .map_err(|e| error_response(&e))?;

    Ok(Json(TranslateResponse { translation }))
}
