//! 缓存工作线程
//!
//! 一个专用线程独占 `TranslationCache`，所有查询与写入通过有界队列发送给它。
//! 由于只有这一个所有者，对持久化文件的读-改-写天然串行，不会丢失更新。
//! 后端调用发生在工作线程之外，不会阻塞其他流水线的查询。

use std::thread;

use tokio::sync::{mpsc, oneshot};

use crate::translation::error::{TranslationError, TranslationResult};
use crate::translation::storage::{CacheStats, TranslationCache};

/// 发往工作线程的命令
#[derive(Debug)]
enum CacheCommand {
    Lookup {
        pipeline: String,
        core_text: String,
        reply: oneshot::Sender<Option<String>>,
    },
    Store {
        pipeline: String,
        core_text: String,
        translated_text: String,
        reply: oneshot::Sender<TranslationResult<()>>,
    },
    Stats {
        reply: oneshot::Sender<CacheStats>,
    },
}

/// 缓存工作线程的句柄，可廉价克隆
///
/// 最后一个句柄被释放后工作线程退出。
#[derive(Debug, Clone)]
pub struct CacheHandle {
    sender: mpsc::Sender<CacheCommand>,
}

impl CacheHandle {
    /// 启动工作线程并接管缓存
    pub fn spawn(cache: TranslationCache, queue_capacity: usize) -> TranslationResult<Self> {
        let (sender, receiver) = mpsc::channel(queue_capacity.max(1));

        thread::Builder::new()
            .name("translation-cache".to_string())
            .spawn(move || run(cache, receiver))
            .map_err(|e| TranslationError::StorageError(format!("启动缓存工作线程失败: {}", e)))?;

        Ok(Self { sender })
    }

    /// 查询缓存
    pub async fn lookup(&self, pipeline: &str, core_text: &str) -> TranslationResult<Option<String>> {
        let (reply, response) = oneshot::channel();
        self.send(CacheCommand::Lookup {
            pipeline: pipeline.to_string(),
            core_text: core_text.to_string(),
            reply,
        })
        .await?;
        response.await.map_err(|_| worker_stopped())
    }

    /// 写入缓存并持久化
    pub async fn store(
        &self,
        pipeline: &str,
        core_text: &str,
        translated_text: &str,
    ) -> TranslationResult<()> {
        let (reply, response) = oneshot::channel();
        self.send(CacheCommand::Store {
            pipeline: pipeline.to_string(),
            core_text: core_text.to_string(),
            translated_text: translated_text.to_string(),
            reply,
        })
        .await?;
        response.await.map_err(|_| worker_stopped())?
    }

    /// 缓存统计
    pub async fn stats(&self) -> TranslationResult<CacheStats> {
        let (reply, response) = oneshot::channel();
        self.send(CacheCommand::Stats { reply }).await?;
        response.await.map_err(|_| worker_stopped())
    }

    async fn send(&self, command: CacheCommand) -> TranslationResult<()> {
        self.sender.send(command).await.map_err(|_| worker_stopped())
    }
}

fn worker_stopped() -> TranslationError {
    TranslationError::StorageError("缓存工作线程已停止".to_string())
}

fn run(mut cache: TranslationCache, mut receiver: mpsc::Receiver<CacheCommand>) {
    tracing::debug!("缓存工作线程启动: {}", cache.path().display());

    while let Some(command) = receiver.blocking_recv() {
        match command {
            CacheCommand::Lookup {
                pipeline,
                core_text,
                reply,
            } => {
                let found = cache.lookup(&pipeline, &core_text).map(str::to_string);
                // 调用方可能已放弃等待
                let _ = reply.send(found);
            }
            CacheCommand::Store {
                pipeline,
                core_text,
                translated_text,
                reply,
            } => {
                let result = cache.store(&pipeline, &core_text, &translated_text);
                if let Err(ref e) = result {
                    tracing::error!("缓存持久化失败: {}", e);
                }
                let _ = reply.send(result);
            }
            CacheCommand::Stats { reply } => {
                let _ = reply.send(cache.stats());
            }
        }
    }

    tracing::debug!("缓存工作线程退出");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_and_store_through_worker() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("translations.json");
        let handle = CacheHandle::spawn(TranslationCache::load(&path).unwrap(), 8).unwrap();

        assert_eq!(handle.lookup("en-fr", "Hello").await.unwrap(), None);
        handle.store("en-fr", "Hello", "Bonjour").await.unwrap();
        assert_eq!(
            handle.lookup("en-fr", "Hello").await.unwrap().as_deref(),
            Some("Bonjour")
        );

        let stats = handle.stats().await.unwrap();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.stores, 1);

        // 写入已落盘
        let mut reloaded = TranslationCache::load(&path).unwrap();
        assert_eq!(reloaded.lookup("en-fr", "Hello"), Some("Bonjour"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_stores_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("translations.json");
        let handle = CacheHandle::spawn(TranslationCache::load(&path).unwrap(), 4).unwrap();

        let tasks: Vec<_> = (0..32)
            .map(|i| {
                let handle = handle.clone();
                tokio::spawn(async move {
                    let target = if i % 2 == 0 { "en-fr" } else { "en-de" };
                    handle
                        .store(target, &format!("text {}", i), &format!("translated {}", i))
                        .await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let reloaded = TranslationCache::load(&path).unwrap();
        assert_eq!(reloaded.len(), 32);
        assert_eq!(reloaded.entries("en-fr").unwrap().len(), 16);
    }
}
