//! Web 模块的数据类型定义

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::translation::{CacheStats, ServiceStatsSnapshot, TextLog, TranslationService};

/// 应用状态
pub struct AppState {
    pub service: TranslationService,
    pub text_log: TextLog,
    pub languages_path: PathBuf,
    pub rtl_languages: Vec<String>,
}

impl AppState {
    /// 路径与方向配置取自服务配置
    pub fn new(service: TranslationService) -> Self {
        let config = service.config();
        let text_log = TextLog::new(&config.text_log_path);
        let languages_path = config.languages_path.clone();
        let rtl_languages = config.rtl_languages.clone();

        Self {
            service,
            text_log,
            languages_path,
            rtl_languages,
        }
    }
}

/// 翻译请求
///
/// 字段缺失时由处理器返回 400，而不是交给提取器拒绝。
#[derive(Debug, Default, Deserialize)]
pub struct TranslateRequest {
    pub target: Option<String>,
    pub text: Option<String>,
}

/// 翻译响应
#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translation: String,
}

/// 文本收集请求
#[derive(Debug, Default, Deserialize)]
pub struct CollectTextsRequest {
    pub texts: Option<Vec<serde_json::Value>>,
    /// 来源页面，仅用于日志
    pub source: Option<String>,
}

/// 文本收集响应
#[derive(Debug, Serialize, Deserialize)]
pub struct CollectTextsResponse {
    pub status: String,
    pub count: usize,
}

/// 缓存统计响应
#[derive(Debug, Serialize)]
pub struct CacheStatsResponse {
    pub cache: CacheStats,
    pub service: ServiceStatsSnapshot,
    pub hit_rate: f64,
}
