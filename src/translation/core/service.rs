//! 翻译服务核心实现
//!
//! 将前缀分离、缓存查询、后端调用与结果拼接串成一次完整的翻译。
//!
//! ## 流程
//!
//! 1. 校验目标语言，目标语言等于源语言时原样返回
//! 2. 按目标语言的书写方向拆分前缀与正文
//! 3. 正文为空时直接返回前缀，不访问缓存和后端
//! 4. 以 `源语言-目标语言` 为流水线查询缓存，命中即拼接返回
//! 5. 未命中时调用后端（带超时），成功后先写入缓存再拼接返回
//!
//! 后端失败时缓存保持不变，也不会返回任何占位译文。

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use serde::Serialize;

use crate::translation::{
    config::TranslationConfig,
    core::backend::{BackendRequest, LibreTranslateBackend, TranslationBackend},
    core::worker::CacheHandle,
    error::{TranslationError, TranslationResult},
    pipeline::prefix::{reverse_prefix, split_prefix, SplitRule},
    storage::{CacheStats, Pipeline, TranslationCache},
};

/// 翻译服务
///
/// 克隆开销很小，所有克隆共享同一个后端、缓存工作线程和统计信息，
/// 可以直接放进 web 状态或分发给批处理任务。
#[derive(Clone)]
pub struct TranslationService {
    inner: Arc<ServiceInner>,
}

struct ServiceInner {
    backend: Arc<dyn TranslationBackend>,
    cache: CacheHandle,
    config: TranslationConfig,
    stats: ServiceStats,
}

impl TranslationService {
    /// 使用指定后端创建服务
    ///
    /// 缓存文件在这里加载；文件存在但格式错误时返回 `StorageError`，
    /// 不会退回到空缓存。
    pub fn new(
        config: TranslationConfig,
        backend: Arc<dyn TranslationBackend>,
    ) -> TranslationResult<Self> {
        config.validate()?;

        let cache = TranslationCache::load(&config.cache_path)?;
        tracing::info!(
            "翻译缓存已加载: {} ({} 条流水线, {} 条译文)",
            cache.path().display(),
            cache.pipelines().count(),
            cache.len()
        );
        let cache = CacheHandle::spawn(cache, config.queue_capacity)?;

        Ok(Self {
            inner: Arc::new(ServiceInner {
                backend,
                cache,
                config,
                stats: ServiceStats::default(),
            }),
        })
    }

    /// 使用配置中的 HTTP 后端创建服务
    pub fn from_config(config: TranslationConfig) -> TranslationResult<Self> {
        let backend = LibreTranslateBackend::from_config(&config)?;
        tracing::info!("翻译后端: {}", backend.api_url());
        Self::new(config, Arc::new(backend))
    }

    /// 翻译一段文本
    pub async fn translate(&self, target_lang: &str, text: &str) -> TranslationResult<String> {
        let inner = &self.inner;
        inner.stats.requests.fetch_add(1, Ordering::Relaxed);

        let target_lang = target_lang.trim();
        if target_lang.is_empty() {
            return Err(TranslationError::InputError("目标语言不能为空".to_string()));
        }

        let source_lang = inner.config.source_lang.as_str();
        if target_lang == source_lang {
            inner.stats.short_circuits.fetch_add(1, Ordering::Relaxed);
            return Ok(text.to_string());
        }

        let rule = SplitRule::for_target(target_lang, inner.config.rtl_languages.as_slice());
        let split = split_prefix(text, rule);
        if split.is_untranslatable() {
            inner.stats.short_circuits.fetch_add(1, Ordering::Relaxed);
            return Ok(split.prefix.to_string());
        }

        let pipeline = Pipeline::new(source_lang, target_lang).key();

        if let Some(translated) = inner.cache.lookup(&pipeline, split.core).await? {
            inner.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("缓存命中 [{}]: {}", pipeline, split.core);
            return Ok(compose(split.prefix, &translated, rule));
        }
        inner.stats.cache_misses.fetch_add(1, Ordering::Relaxed);

        let translated = self.call_backend(source_lang, target_lang, split.core).await?;

        inner.cache.store(&pipeline, split.core, &translated).await?;
        tracing::debug!("已缓存译文 [{}]: {}", pipeline, split.core);

        Ok(compose(split.prefix, &translated, rule))
    }

    async fn call_backend(
        &self,
        source_lang: &str,
        target_lang: &str,
        core_text: &str,
    ) -> TranslationResult<String> {
        let inner = &self.inner;
        let request = BackendRequest {
            q: core_text.to_string(),
            source: source_lang.to_string(),
            target: target_lang.to_string(),
            alternatives: inner.config.alternatives,
        };

        inner.stats.backend_calls.fetch_add(1, Ordering::Relaxed);
        let result = tokio::time::timeout(
            inner.config.request_timeout(),
            inner.backend.translate(&request),
        )
        .await
        .map_err(TranslationError::from)
        .and_then(|result| result);

        if let Err(ref e) = result {
            inner.stats.backend_failures.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(
                "后端 {} 翻译失败 [{} -> {}]: {}",
                inner.backend.name(),
                source_lang,
                target_lang,
                e
            );
        }
        result
    }

    /// 持久化缓存的统计信息
    pub async fn cache_stats(&self) -> TranslationResult<CacheStats> {
        self.inner.cache.stats().await
    }

    pub fn stats(&self) -> &ServiceStats {
        &self.inner.stats
    }

    pub fn config(&self) -> &TranslationConfig {
        &self.inner.config
    }
}

/// 拼接前缀与译文
///
/// 从右向左语言的前缀反转后接在译文末尾，其余语言前缀保持原位。
fn compose(prefix: &str, translated: &str, rule: SplitRule) -> String {
    match rule {
        SplitRule::RightToLeft if !prefix.is_empty() => {
            let mut output = String::with_capacity(translated.len() + prefix.len());
            output.push_str(translated);
            output.push_str(&reverse_prefix(prefix));
            output
        }
        _ => format!("{}{}", prefix, translated),
    }
}

/// 服务运行统计
///
/// 计数器使用原子操作，多个并发请求可以同时更新。
#[derive(Debug, Default)]
pub struct ServiceStats {
    /// 收到的翻译请求数
    pub requests: AtomicUsize,
    /// 缓存命中次数
    pub cache_hits: AtomicUsize,
    /// 缓存未命中次数
    pub cache_misses: AtomicUsize,
    /// 后端调用次数
    pub backend_calls: AtomicUsize,
    /// 后端失败次数（含超时）
    pub backend_failures: AtomicUsize,
    /// 无需翻译直接返回的次数
    pub short_circuits: AtomicUsize,
}

impl ServiceStats {
    pub fn snapshot(&self) -> ServiceStatsSnapshot {
        ServiceStatsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            backend_calls: self.backend_calls.load(Ordering::Relaxed),
            backend_failures: self.backend_failures.load(Ordering::Relaxed),
            short_circuits: self.short_circuits.load(Ordering::Relaxed),
        }
    }
}

/// 统计数据快照
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ServiceStatsSnapshot {
    pub requests: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
    pub backend_calls: usize,
    pub backend_failures: usize,
    pub short_circuits: usize,
}
