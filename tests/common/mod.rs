// 集成测试公共模块
//
// 提供可编排的翻译后端和隔离的临时目录

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use civiclens_translate::translation::{
    BackendRequest, TranslationBackend, TranslationConfig, TranslationError, TranslationResult,
    TranslationService,
};

/// 可编排的翻译后端
///
/// 未登记的正文翻译为 `"{target}:{q}"`，登记为失败的正文返回后端错误。
#[derive(Default)]
pub struct MockBackend {
    translations: HashMap<String, String>,
    failing: HashSet<String>,
    delay: Option<Duration>,
    requests: Mutex<Vec<BackendRequest>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_translation(mut self, core_text: &str, translated: &str) -> Self {
        self.translations
            .insert(core_text.to_string(), translated.to_string());
        self
    }

    pub fn failing_on(mut self, core_text: &str) -> Self {
        self.failing.insert(core_text.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<BackendRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// 后端实际收到的正文
    pub fn seen_texts(&self) -> Vec<String> {
        self.requests().into_iter().map(|request| request.q).collect()
    }
}

#[async_trait]
impl TranslationBackend for MockBackend {
    async fn translate(&self, request: &BackendRequest) -> TranslationResult<String> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.contains(&request.q) {
            return Err(TranslationError::BackendError(format!(
                "状态码 500: cannot translate '{}'",
                request.q
            )));
        }

        Ok(self
            .translations
            .get(&request.q)
            .cloned()
            .unwrap_or_else(|| format!("{}:{}", request.target, request.q)))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// 测试环境：所有文件都放在独立的临时目录里
pub struct TestEnvironment {
    pub dir: TempDir,
    pub config: TranslationConfig,
}

impl TestEnvironment {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config = TranslationConfig {
            cache_path: dir.path().join("translations.json"),
            languages_path: dir.path().join("languages.json"),
            text_log_path: dir.path().join("logs").join("texts.log"),
            ..TranslationConfig::default()
        };

        Self { dir, config }
    }

    pub fn cache_path(&self) -> &Path {
        &self.config.cache_path
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn service(&self, backend: Arc<MockBackend>) -> TranslationService {
        TranslationService::new(self.config.clone(), backend).expect("create service")
    }

    /// 读取磁盘上的缓存文件
    pub fn read_cache(&self) -> serde_json::Value {
        let content = std::fs::read_to_string(self.cache_path()).expect("read cache file");
        serde_json::from_str(&content).expect("cache file is JSON")
    }

    pub fn write_languages(&self, content: &str) {
        std::fs::write(&self.config.languages_path, content).expect("write languages.json");
    }
}

pub const SAMPLE_LANGUAGES: &str = r#"{
    "ar": {"language": "Arabic", "endonym": "العربية"},
    "es": {"language": "Spanish", "endonym": "Español"},
    "fr": {"language": "French", "endonym": "Français"}
}"#;
