//! 批量翻译
//!
//! 对一组文本行和一组目标语言逐对调用翻译服务：目标语言在外层，文本行在内层。
//! 每一对相互独立，单对失败只产生一条失败结果，不会中断整批处理。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use futures::StreamExt;
//!
//! let runner = BatchRunner::new(service, targets, lines);
//! let mut outcomes = runner.run();
//! while let Some(outcome) = outcomes.next().await {
//!     println!("{}", outcome);
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use futures::stream::{self, Stream, StreamExt};

use crate::translation::core::TranslationService;
use crate::translation::error::{ErrorStats, TranslationError};

/// 单个 (目标语言, 文本) 对的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    Translated {
        target: String,
        text: String,
        translation: String,
    },
    Failed {
        target: String,
        text: String,
        error: TranslationError,
    },
}

impl BatchOutcome {
    pub fn target(&self) -> &str {
        match self {
            BatchOutcome::Translated { target, .. } | BatchOutcome::Failed { target, .. } => target,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            BatchOutcome::Translated { text, .. } | BatchOutcome::Failed { text, .. } => text,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BatchOutcome::Translated { .. })
    }
}

impl fmt::Display for BatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchOutcome::Translated { translation, .. } => write!(f, "{}", translation),
            BatchOutcome::Failed {
                target,
                text,
                error,
            } => write!(f, "[{}] {}: {}", target, text, error),
        }
    }
}

/// 批处理汇总
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: usize,
    pub failures: Vec<BatchOutcome>,
    pub errors: ErrorStats,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.succeeded + self.failures.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// 批量翻译执行器
///
/// `run()` 每次调用都会从头开始；已缓存的对直接命中缓存，不会再次请求后端，
/// 因此中断后重跑只会补齐缺失的部分。
#[derive(Clone)]
pub struct BatchRunner {
    service: TranslationService,
    targets: Arc<[String]>,
    lines: Arc<[String]>,
    concurrency: usize,
}

impl BatchRunner {
    /// 并发度默认取服务配置中的 `max_concurrent_requests`
    pub fn new(service: TranslationService, targets: Vec<String>, lines: Vec<String>) -> Self {
        let concurrency = service.config().max_concurrent_requests;
        Self {
            service,
            targets: targets.into(),
            lines: lines.into(),
            concurrency,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// 将要处理的对数（跳过空行）
    pub fn pair_count(&self) -> usize {
        self.targets.len() * self.lines.iter().filter(|line| !line.is_empty()).count()
    }

    /// 按输入顺序产出每一对的结果
    ///
    /// 最多同时有 `concurrency` 对在处理中，输出顺序与输入顺序一致。
    pub fn run(&self) -> impl Stream<Item = BatchOutcome> + Send + 'static {
        tracing::info!(
            "开始批量翻译: {} 种语言, {} 对, 并发 {}",
            self.targets.len(),
            self.pair_count(),
            self.concurrency
        );

        // 按下标惰性生成（目标语言, 行）对，只有处理到时才复制字符串
        let source = Arc::clone(&self.lines);
        let pairs = (0..self.targets.len()).flat_map(move |target_index| {
            let lines = Arc::clone(&source);
            (0..lines.len())
                .filter_map(move |line_index| {
                    (!lines[line_index].is_empty()).then_some((target_index, line_index))
                })
        });

        let service = self.service.clone();
        let targets = Arc::clone(&self.targets);
        let lines = Arc::clone(&self.lines);
        stream::iter(pairs)
            .map(move |(target_index, line_index)| {
                let service = service.clone();
                let target = targets[target_index].clone();
                let text = lines[line_index].clone();
                async move {
                    match service.translate(&target, &text).await {
                        Ok(translation) => BatchOutcome::Translated {
                            target,
                            text,
                            translation,
                        },
                        Err(error) => {
                            tracing::warn!("批量翻译失败 [{}] {}: {}", target, text, error);
                            BatchOutcome::Failed {
                                target,
                                text,
                                error,
                            }
                        }
                    }
                }
            })
            .buffered(self.concurrency.max(1))
    }

    /// 执行整批并汇总结果
    pub async fn run_to_report(&self) -> BatchReport {
        let report = self
            .run()
            .fold(BatchReport::default(), |mut report, outcome| async move {
                match outcome {
                    BatchOutcome::Translated { .. } => report.succeeded += 1,
                    BatchOutcome::Failed { ref error, .. } => {
                        report.errors.record_error(error);
                        report.failures.push(outcome);
                    }
                }
                report
            })
            .await;

        tracing::info!(
            "批量翻译完成: 成功 {}, 失败 {}",
            report.succeeded,
            report.failures.len()
        );
        report
    }
}
