//! 简化的配置管理器
//!
//! 提供统一的配置接口，支持文件配置、环境变量和默认值。
//! 优先级：环境变量 > 配置文件 > 默认值

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants;
use crate::translation::error::{TranslationError, TranslationResult};

/// 翻译服务配置
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TranslationConfig {
    // 后端配置
    pub source_lang: String,
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub alternatives: usize,

    // 方向配置
    pub rtl_languages: Vec<String>,

    // 存储配置
    pub cache_path: PathBuf,
    pub languages_path: PathBuf,
    pub text_log_path: PathBuf,

    // 并发配置
    pub max_concurrent_requests: usize,
    pub queue_capacity: usize,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            source_lang: constants::DEFAULT_SOURCE_LANG.to_string(),
            api_url: constants::DEFAULT_API_URL.to_string(),
            request_timeout_secs: constants::DEFAULT_REQUEST_TIMEOUT.as_secs(),
            alternatives: constants::DEFAULT_ALTERNATIVES,

            rtl_languages: constants::RTL_LANGUAGES.iter().map(|s| s.to_string()).collect(),

            cache_path: PathBuf::from(constants::DEFAULT_CACHE_PATH),
            languages_path: PathBuf::from(constants::DEFAULT_LANGUAGES_PATH),
            text_log_path: PathBuf::from(constants::DEFAULT_TEXT_LOG_PATH),

            max_concurrent_requests: constants::DEFAULT_MAX_CONCURRENT_REQUESTS,
            queue_capacity: constants::DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl TranslationConfig {
    /// 验证配置
    pub fn validate(&self) -> TranslationResult<()> {
        let url = url::Url::parse(&self.api_url).map_err(|e| {
            TranslationError::ConfigError(format!("API地址无效 '{}': {}", self.api_url, e))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(TranslationError::ConfigError(format!(
                "API地址必须使用 http 或 https: {}",
                self.api_url
            )));
        }

        if self.source_lang.trim().is_empty() {
            return Err(TranslationError::ConfigError("源语言不能为空".to_string()));
        }

        if self.request_timeout_secs == 0 {
            return Err(TranslationError::ConfigError("请求超时必须大于0".to_string()));
        }

        if self.max_concurrent_requests == 0 {
            return Err(TranslationError::ConfigError("最大并发数不能为0".to_string()));
        }

        if self.queue_capacity == 0 {
            return Err(TranslationError::ConfigError("缓存队列容量不能为0".to_string()));
        }

        if self.cache_path.as_os_str().is_empty() {
            return Err(TranslationError::ConfigError("缓存文件路径不能为空".to_string()));
        }

        Ok(())
    }

    /// 应用环境变量覆盖
    ///
    /// 只有显式设置的变量才会覆盖；设置了但无法解析的值会作为配置错误返回。
    pub fn apply_env_overrides(&mut self) -> TranslationResult<()> {
        use crate::env::{storage, translation, EnvVar};

        let invalid = |e: crate::env::EnvError| TranslationError::ConfigError(e.to_string());

        if let Some(source_lang) = translation::SourceLang::get_if_set() {
            self.source_lang = source_lang.map_err(invalid)?;
        }

        if let Some(api_url) = translation::ApiUrl::get_if_set() {
            self.api_url = api_url.map_err(invalid)?;
            tracing::info!("环境变量覆盖 API URL: {}", self.api_url);
        }

        if let Some(timeout) = translation::RequestTimeout::get_if_set() {
            self.request_timeout_secs = timeout.map_err(invalid)?.as_secs();
        }

        if let Some(alternatives) = translation::Alternatives::get_if_set() {
            self.alternatives = alternatives.map_err(invalid)?;
        }

        if let Some(max_concurrent) = translation::MaxConcurrentRequests::get_if_set() {
            self.max_concurrent_requests = max_concurrent.map_err(invalid)?;
        }

        if let Some(rtl) = translation::RtlLanguages::get_if_set() {
            self.rtl_languages = rtl.map_err(invalid)?;
        }

        if let Some(path) = storage::CachePath::get_if_set() {
            self.cache_path = PathBuf::from(path.map_err(invalid)?);
        }

        if let Some(path) = storage::LanguagesPath::get_if_set() {
            self.languages_path = PathBuf::from(path.map_err(invalid)?);
        }

        if let Some(path) = storage::TextLogPath::get_if_set() {
            self.text_log_path = PathBuf::from(path.map_err(invalid)?);
        }

        Ok(())
    }

    /// 后端请求超时
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// 简化的配置管理器
pub struct ConfigManager {
    config: TranslationConfig,
}

impl ConfigManager {
    /// 创建新的配置管理器：搜索配置文件并应用环境变量
    pub fn new() -> TranslationResult<Self> {
        let config = Self::load_config()?;
        Self::finish(config)
    }

    /// 使用指定配置文件创建配置管理器
    pub fn from_file<P: AsRef<Path>>(path: P) -> TranslationResult<Self> {
        Self::load_dotenv();
        let config = Self::load_from_file(path.as_ref())?;
        Self::finish(config)
    }

    fn finish(mut config: TranslationConfig) -> TranslationResult<Self> {
        config.apply_env_overrides()?;
        config.validate()?;

        Ok(Self { config })
    }

    /// 取出配置
    pub fn into_config(self) -> TranslationConfig {
        self.config
    }

    /// 从搜索路径加载配置
    fn load_config() -> TranslationResult<TranslationConfig> {
        // 首先尝试加载 .env 文件
        Self::load_dotenv();

        for path in constants::CONFIG_PATHS {
            let expanded_path = shellexpand::tilde(path);
            let candidate = Path::new(expanded_path.as_ref());
            if candidate.exists() {
                tracing::info!("加载配置文件: {}", expanded_path);
                return Self::load_from_file(candidate);
            }
        }

        tracing::info!("未找到配置文件，使用默认配置");
        Ok(TranslationConfig::default())
    }

    /// 从指定文件加载配置
    fn load_from_file(path: &Path) -> TranslationResult<TranslationConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TranslationError::ConfigError(format!("读取配置文件失败 {}: {}", path.display(), e))
        })?;

        let is_json = path.extension().is_some_and(|ext| ext == "json");
        if is_json {
            serde_json::from_str(&content)
                .map_err(|e| TranslationError::ConfigError(format!("解析JSON配置失败: {}", e)))
        } else {
            toml::from_str(&content)
                .map_err(|e| TranslationError::ConfigError(format!("解析TOML配置失败: {}", e)))
        }
    }

    /// 加载 .env 文件
    fn load_dotenv() {
        let env_files = [".env.local", ".env"];

        for env_file in &env_files {
            if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
                tracing::info!("已加载环境变量文件: {}", env_file);
                break;
            }
        }
    }

    /// 生成示例配置文件
    pub fn generate_example_config<P: AsRef<Path>>(path: P) -> TranslationResult<()> {
        let config = TranslationConfig::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| TranslationError::ConfigError(format!("序列化配置失败: {}", e)))?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| TranslationError::ConfigError(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }
}
