//! 文本收集日志
//!
//! 追加写入的纯文本文件，每行一条待翻译文本，是批处理的输入来源。

use std::path::{Path, PathBuf};

use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::translation::error::{TranslationError, TranslationResult};

/// 规范化单条文本：换行替换为空格并去除首尾空白
pub fn normalize_line(text: &str) -> String {
    text.replace(['\n', '\r'], " ").trim().to_string()
}

/// 文本收集日志
///
/// 所有追加操作经过同一把锁，多个请求并发写入时行不会交错。
#[derive(Debug)]
pub struct TextLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl TextLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 追加一组文本，返回实际写入的行数
    pub async fn append<S: AsRef<str>>(&self, texts: &[S]) -> TranslationResult<usize> {
        let lines: Vec<String> = texts
            .iter()
            .map(|text| normalize_line(text.as_ref()))
            .filter(|line| !line.is_empty())
            .collect();

        if lines.is_empty() {
            return Ok(0);
        }

        let mut buffer = lines.join("\n");
        buffer.push('\n');

        let _guard = self.lock.lock().await;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                TranslationError::StorageError(format!(
                    "创建日志目录失败 {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                TranslationError::StorageError(format!(
                    "打开文本日志失败 {}: {}",
                    self.path.display(),
                    e
                ))
            })?;
        file.write_all(buffer.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!("已追加 {} 行到 {}", lines.len(), self.path.display());
        Ok(lines.len())
    }
}

/// 读取文本日志中的所有非空行
pub async fn read_source_log<P: AsRef<Path>>(path: P) -> TranslationResult<Vec<String>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            TranslationError::NotFound(format!("{} not found", path.display()))
        } else {
            TranslationError::StorageError(format!("读取文本日志失败 {}: {}", path.display(), e))
        }
    })?;

    Ok(content
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_line() {
        assert_eq!(normalize_line("  Hello\nworld\r\n"), "Hello world");
        assert_eq!(normalize_line("\n\r "), "");
        assert_eq!(normalize_line("¡Hola!"), "¡Hola!");
    }

    #[tokio::test]
    async fn test_append_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let log = TextLog::new(dir.path().join("logs").join("texts.log"));

        let written = log.append(&["Health care", "  ", "Line\nbreak"]).await.unwrap();
        assert_eq!(written, 2);
        let written = log.append(&["🌱 Agriculture".to_string()]).await.unwrap();
        assert_eq!(written, 1);

        let lines = read_source_log(log.path()).await.unwrap();
        assert_eq!(lines, vec!["Health care", "Line break", "🌱 Agriculture"]);
    }

    #[tokio::test]
    async fn test_append_nothing_does_not_create_file() {
        let dir = tempfile::tempdir().unwrap();
        let log = TextLog::new(dir.path().join("texts.log"));

        assert_eq!(log.append(&["", "\n"]).await.unwrap(), 0);
        assert!(!log.path().exists());
    }

    #[tokio::test]
    async fn test_read_missing_log() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_source_log(dir.path().join("missing.log")).await;
        assert!(matches!(result, Err(TranslationError::NotFound(_))));
    }
}
