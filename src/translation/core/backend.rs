//! 翻译后端
//!
//! 外部机器翻译服务的抽象，以及兼容 LibreTranslate `/translate` 接口的 HTTP 实现。
//!
//! 请求体：`{q, source, target, alternatives}`
//! 响应体：`{translatedText, alternatives?}` 或错误状态码

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::translation::config::TranslationConfig;
use crate::translation::error::{TranslationError, TranslationResult};

/// 发往后端的翻译请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendRequest {
    pub q: String,
    pub source: String,
    pub target: String,
    pub alternatives: usize,
}

/// 后端响应
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternatives: Option<Vec<String>>,
}

impl BackendResponse {
    /// 选出最终译文
    ///
    /// 备选列表非空时优先使用第一个备选：后端的主字段有时会原样回显输入。
    /// 两个字段都没有内容时返回后端错误。
    pub fn into_translation(self) -> TranslationResult<String> {
        let alternative = self
            .alternatives
            .and_then(|alternatives| alternatives.into_iter().next())
            .filter(|text| !text.is_empty());
        if let Some(text) = alternative {
            return Ok(text);
        }

        match self.translated_text {
            Some(text) if !text.is_empty() => Ok(text),
            _ => Err(TranslationError::BackendError(
                "响应中既没有 translatedText 也没有 alternatives".to_string(),
            )),
        }
    }
}

/// 机器翻译后端
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// 翻译一段正文，只尝试一次
    async fn translate(&self, request: &BackendRequest) -> TranslationResult<String>;

    /// 用于日志的后端名称
    fn name(&self) -> &str {
        "backend"
    }
}

/// LibreTranslate 兼容的 HTTP 后端
#[derive(Debug, Clone)]
pub struct LibreTranslateBackend {
    client: reqwest::Client,
    api_url: String,
}

impl LibreTranslateBackend {
    /// 创建后端客户端，超时作用于整个请求
    pub fn new(api_url: &str, timeout: Duration) -> TranslationResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TranslationError::ConfigError(format!("创建HTTP客户端失败: {}", e)))?;

        Ok(Self {
            client,
            api_url: api_url.to_string(),
        })
    }

    pub fn from_config(config: &TranslationConfig) -> TranslationResult<Self> {
        Self::new(&config.api_url, config.request_timeout())
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl TranslationBackend for LibreTranslateBackend {
    async fn translate(&self, request: &BackendRequest) -> TranslationResult<String> {
        tracing::debug!(
            "请求翻译后端 {} [{} -> {}]",
            self.api_url,
            request.source,
            request.target
        );

        let response = self.client.post(&self.api_url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::BackendError(format!(
                "状态码 {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }

        let body: BackendResponse = response.json().await?;
        body.into_translation()
    }

    fn name(&self) -> &str {
        &self.api_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(primary: Option<&str>, alternatives: Option<Vec<&str>>) -> BackendResponse {
        BackendResponse {
            translated_text: primary.map(str::to_string),
            alternatives: alternatives
                .map(|list| list.into_iter().map(str::to_string).collect()),
        }
    }

    #[test]
    fn test_alternative_preferred_over_primary() {
        let body = response(Some("Hello"), Some(vec!["Bonjour", "Salut"]));
        assert_eq!(body.into_translation().unwrap(), "Bonjour");
    }

    #[test]
    fn test_primary_used_without_alternatives() {
        assert_eq!(
            response(Some("Hola"), None).into_translation().unwrap(),
            "Hola"
        );
        assert_eq!(
            response(Some("Hola"), Some(vec![])).into_translation().unwrap(),
            "Hola"
        );
    }

    #[test]
    fn test_empty_response_is_backend_error() {
        for body in [
            response(None, None),
            response(Some(""), Some(vec![])),
            response(None, Some(vec![""])),
        ] {
            assert!(matches!(
                body.into_translation(),
                Err(TranslationError::BackendError(_))
            ));
        }
    }

    #[test]
    fn test_wire_format() {
        let request = BackendRequest {
            q: "Hello world".to_string(),
            source: "en".to_string(),
            target: "fr".to_string(),
            alternatives: 1,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"q": "Hello world", "source": "en", "target": "fr", "alternatives": 1})
        );

        let body: BackendResponse = serde_json::from_str(
            r#"{"translatedText": "Bonjour le monde", "alternatives": ["Salut le monde"]}"#,
        )
        .unwrap();
        assert_eq!(body.translated_text.as_deref(), Some("Bonjour le monde"));
        assert_eq!(body.into_translation().unwrap(), "Salut le monde");
    }
}
