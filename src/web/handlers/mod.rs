//! Web 路由处理器

pub mod api;

pub use api::*;

use axum::{http::StatusCode, response::Json};

use crate::translation::TranslationError;

/// 处理器统一的错误响应：状态码与 `{"error": 消息}`
pub type ApiError = (StatusCode, Json<serde_json::Value>);

/// 将翻译错误映射为 HTTP 响应
pub fn error_response(error: &TranslationError) -> ApiError {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        tracing::error!("请求处理失败: {}", error);
    } else {
        tracing::debug!("请求被拒绝: {}", error);
    }
    (status, Json(serde_json::json!({ "error": error.to_string() })))
}

/// 请求体格式错误
pub fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message.into() })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (TranslationError::InputError("x".into()), StatusCode::BAD_REQUEST),
            (TranslationError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (TranslationError::BackendError("x".into()), StatusCode::BAD_GATEWAY),
            (
                TranslationError::StorageError("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, expected) in cases {
            let (status, Json(body)) = error_response(&error);
            assert_eq!(status, expected);
            assert_eq!(body["error"], error.to_string());
        }
    }
}
