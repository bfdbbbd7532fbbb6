//! 翻译缓存模块
//!
//! 持久化的两级映射：流水线（源语言-目标语言）→ 正文 → 译文。
//!
//! 整个结构在启动时一次性读入内存，每次写入新条目后整体序列化，
//! 先写入同目录下的临时文件再原子重命名覆盖目标文件。
//! 条目一旦写入就不会失效，也没有删除路径。
//! 流水线与条目都按插入顺序迭代和写出。

use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::translation::error::{TranslationError, TranslationResult};

/// 单个流水线下的缓存条目：正文 → 译文
pub type CacheEntries = IndexMap<String, String>;

/// 翻译流水线标识
///
/// 由有序的（源语言, 目标语言）对构成，渲染为 `"en-fr"` 形式，作为缓存的顶层键。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pipeline {
    source: String,
    target: String,
}

impl Pipeline {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    /// 缓存中使用的键
    pub fn key(&self) -> String {
        format!("{}-{}", self.source, self.target)
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.target)
    }
}

/// 缓存统计信息
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub pipelines: usize,
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub stores: u64,
}

impl CacheStats {
    /// 计算缓存命中率
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// 持久化的数据结构，与磁盘上的 JSON 一一对应
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
struct CacheData {
    pipelines: IndexMap<String, CacheEntries>,
}

/// 文件持久化的翻译缓存
#[derive(Debug)]
pub struct TranslationCache {
    path: PathBuf,
    data: CacheData,
    hits: u64,
    misses: u64,
    stores: u64,
}

impl TranslationCache {
    /// 读取完整的持久化结构
    ///
    /// 文件不存在时返回空缓存；文件存在但无法读取或不是
    /// `{流水线: {正文: 译文}}` 结构时返回存储错误，不做任何静默恢复。
    pub fn load<P: AsRef<Path>>(path: P) -> TranslationResult<Self> {
        let path = path.as_ref().to_path_buf();

        let data = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str::<CacheData>(&content).map_err(|e| {
                TranslationError::StorageError(format!(
                    "缓存文件格式错误 {}: {}",
                    path.display(),
                    e
                ))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("缓存文件不存在，使用空缓存: {}", path.display());
                CacheData::default()
            }
            Err(e) => {
                return Err(TranslationError::StorageError(format!(
                    "读取缓存文件失败 {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let cache = Self {
            path,
            data,
            hits: 0,
            misses: 0,
            stores: 0,
        };
        tracing::info!(
            "已加载翻译缓存: {} 个流水线, {} 个条目",
            cache.data.pipelines.len(),
            cache.len()
        );

        Ok(cache)
    }

    /// 查找缓存译文，从不访问网络
    pub fn lookup(&mut self, pipeline: &str, core_text: &str) -> Option<&str> {
        let found = self
            .data
            .pipelines
            .get(pipeline)
            .and_then(|entries| entries.get(core_text));

        match found {
            Some(translated) => {
                self.hits += 1;
                Some(translated.as_str())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// 写入条目并立即持久化整个结构
    ///
    /// 持久化失败时内存中的修改会被撤销，保证内存状态与磁盘一致。
    pub fn store(
        &mut self,
        pipeline: &str,
        core_text: &str,
        translated_text: &str,
    ) -> TranslationResult<()> {
        let previous = self
            .data
            .pipelines
            .entry(pipeline.to_string())
            .or_default()
            .insert(core_text.to_string(), translated_text.to_string());

        if let Err(e) = self.persist() {
            self.rollback(pipeline, core_text, previous);
            return Err(e);
        }

        self.stores += 1;
        tracing::debug!("缓存已写入 [{}] {:?}", pipeline, core_text);
        Ok(())
    }

    fn rollback(&mut self, pipeline: &str, core_text: &str, previous: Option<String>) {
        if let Some(entries) = self.data.pipelines.get_mut(pipeline) {
            match previous {
                Some(value) => {
                    entries.insert(core_text.to_string(), value);
                }
                None => {
                    entries.shift_remove(core_text);
                }
            }
            if entries.is_empty() {
                self.data.pipelines.shift_remove(pipeline);
            }
        }
    }

    /// 原子地覆盖持久化文件
    fn persist(&self) -> TranslationResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| self.storage_error("创建缓存目录失败", e))?;

        let content = serde_json::to_string_pretty(&self.data)
            .map_err(|e| self.storage_error("序列化缓存失败", e))?;

        let mut file =
            NamedTempFile::new_in(&dir).map_err(|e| self.storage_error("创建临时文件失败", e))?;
        // 临时文件默认仅属主可读写，沿用原文件的权限
        if let Ok(metadata) = fs::metadata(&self.path) {
            file.as_file()
                .set_permissions(metadata.permissions())
                .map_err(|e| self.storage_error("设置缓存文件权限失败", e))?;
        }
        file.write_all(content.as_bytes())
            .and_then(|_| file.as_file().sync_all())
            .map_err(|e| self.storage_error("写入缓存失败", e))?;
        file.persist(&self.path)
            .map_err(|e| self.storage_error("替换缓存文件失败", e.error))?;

        Ok(())
    }

    fn storage_error(&self, action: &str, error: impl fmt::Display) -> TranslationError {
        TranslationError::StorageError(format!("{} {}: {}", action, self.path.display(), error))
    }

    /// 持久化文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 指定流水线的全部条目
    pub fn entries(&self, pipeline: &str) -> Option<&CacheEntries> {
        self.data.pipelines.get(pipeline)
    }

    /// 所有流水线键
    pub fn pipelines(&self) -> impl Iterator<Item = &str> {
        self.data.pipelines.keys().map(String::as_str)
    }

    /// 条目总数
    pub fn len(&self) -> usize {
        self.data.pipelines.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 获取统计信息
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            pipelines: self.data.pipelines.len(),
            entries: self.len(),
            hits: self.hits,
            misses: self.misses,
            stores: self.stores,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("translations.json")
    }

    #[test]
    fn test_pipeline_key_is_stable() {
        let pipeline = Pipeline::new("en", "fr");
        assert_eq!(pipeline.key(), "en-fr");
        assert_eq!(pipeline.to_string(), "en-fr");
        assert_eq!(Pipeline::new("en", "pt-BR").key(), "en-pt-BR");
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TranslationCache::load(cache_path(&dir)).unwrap();

        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheStats::default());
        // 加载本身不创建文件
        assert!(!cache_path(&dir).exists());
    }

    #[test]
    fn test_store_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = TranslationCache::load(cache_path(&dir)).unwrap();

        cache.store("en-fr", "Hello world", "Bonjour le monde").unwrap();
        cache.store("en-es", "Hello world", "Hola mundo").unwrap();

        let mut reloaded = TranslationCache::load(cache_path(&dir)).unwrap();
        assert_eq!(reloaded.lookup("en-fr", "Hello world"), Some("Bonjour le monde"));
        assert_eq!(reloaded.lookup("en-es", "Hello world"), Some("Hola mundo"));
        assert_eq!(reloaded.stats().pipelines, 2);
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn test_persisted_layout_is_pipeline_to_entries() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = TranslationCache::load(cache_path(&dir)).unwrap();
        cache.store("en-de", "Budget", "Haushalt").unwrap();

        let raw = fs::read_to_string(cache_path(&dir)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value, serde_json::json!({"en-de": {"Budget": "Haushalt"}}));
    }

    #[test]
    fn test_lookup_is_exact_match() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = TranslationCache::load(cache_path(&dir)).unwrap();
        cache.store("en-fr", "Health", "Santé").unwrap();

        assert_eq!(cache.lookup("en-fr", "Health"), Some("Santé"));
        assert_eq!(cache.lookup("en-fr", "health"), None);
        assert_eq!(cache.lookup("en-fr", "Health "), None);
        assert_eq!(cache.lookup("en-es", "Health"), None);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 3);
        assert_eq!(stats.hit_rate(), 0.25);
    }

    #[test]
    fn test_store_overwrites_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = TranslationCache::load(cache_path(&dir)).unwrap();
        cache.store("en-fr", "Labor", "Travail").unwrap();
        cache.store("en-fr", "Labor", "Main-d'œuvre").unwrap();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.lookup("en-fr", "Labor"), Some("Main-d'œuvre"));
        assert_eq!(cache.stats().stores, 2);
    }

    #[test]
    fn test_malformed_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(cache_path(&dir), "{ not json").unwrap();

        let result = TranslationCache::load(cache_path(&dir));
        assert!(matches!(result, Err(TranslationError::StorageError(_))));
    }

    #[test]
    fn test_wrong_shape_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        for content in [
            r#"{"en-fr": "Bonjour"}"#,
            r#"{"en-fr": {"Hello": 42}}"#,
            r#"["en-fr"]"#,
            "",
        ] {
            fs::write(cache_path(&dir), content).unwrap();
            assert!(
                matches!(
                    TranslationCache::load(cache_path(&dir)),
                    Err(TranslationError::StorageError(_))
                ),
                "{:?} should be rejected",
                content
            );
        }
    }

    #[test]
    fn test_insertion_order_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(cache_path(&dir), r#"{"en-zz": {"z": "zed"}}"#).unwrap();

        let mut cache = TranslationCache::load(cache_path(&dir)).unwrap();
        cache.store("en-aa", "z", "zed").unwrap();
        cache.store("en-aa", "a", "ay").unwrap();

        let reloaded = TranslationCache::load(cache_path(&dir)).unwrap();
        assert_eq!(reloaded.pipelines().collect::<Vec<_>>(), vec!["en-zz", "en-aa"]);
        let keys: Vec<&str> = reloaded
            .entries("en-aa")
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["z", "a"]);

        let raw = fs::read_to_string(cache_path(&dir)).unwrap();
        assert!(raw.find("\"en-zz\"").unwrap() < raw.find("\"en-aa\"").unwrap());
    }

    #[test]
    fn test_overwrite_keeps_entry_position() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = TranslationCache::load(cache_path(&dir)).unwrap();
        cache.store("en-fr", "Vote", "Voter").unwrap();
        cache.store("en-fr", "Ballot", "Bulletin").unwrap();
        cache.store("en-fr", "Vote", "Votez").unwrap();

        let keys: Vec<&String> = cache.entries("en-fr").unwrap().keys().collect();
        assert_eq!(keys, vec!["Vote", "Ballot"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_store_keeps_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        fs::write(cache_path(&dir), "{}").unwrap();
        fs::set_permissions(cache_path(&dir), fs::Permissions::from_mode(0o644)).unwrap();

        let mut cache = TranslationCache::load(cache_path(&dir)).unwrap();
        cache.store("en-fr", "Hello", "Bonjour").unwrap();
        cache.store("en-fr", "Vote", "Voter").unwrap();

        let mode = fs::metadata(cache_path(&dir)).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_store_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.json");
        let mut cache = TranslationCache::load(&path).unwrap();

        cache.store("en-it", "Housing", "Alloggi").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_failed_persist_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        // 让目标路径成为一个目录，使重命名失败
        let path = dir.path().join("cache.json");
        fs::create_dir(&path).unwrap();
        let mut cache = TranslationCache {
            path: path.clone(),
            data: CacheData::default(),
            hits: 0,
            misses: 0,
            stores: 0,
        };

        let result = cache.store("en-fr", "Crime", "Crime");
        assert!(matches!(result, Err(TranslationError::StorageError(_))));
        assert!(cache.is_empty());
        assert_eq!(cache.stats().stores, 0);
    }
}
