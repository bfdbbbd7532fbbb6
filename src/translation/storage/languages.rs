//! 语言参考数据
//!
//! 只读的 `ISO 代码 → 语言描述` 映射，来自 `languages.json`。
//! 除 `language` 与 `endonym` 外的显示元数据原样保留。

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::translation::error::{TranslationError, TranslationResult};

/// 书写方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

/// 单个语言的描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageDescriptor {
    /// 英文名称
    pub language: String,
    /// 本族语名称
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endonym: Option<String>,
    /// 其余显示元数据
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

/// 语言目录
///
/// 代码保持文件中的顺序，批处理按该顺序遍历目标语言，对外接口也原样返回。
#[derive(Debug, Clone, Default)]
pub struct LanguageCatalog {
    codes: Vec<String>,
    descriptors: Vec<LanguageDescriptor>,
    rtl: BTreeSet<String>,
    raw: Map<String, Value>,
}

impl LanguageCatalog {
    /// 从 JSON 文件加载
    pub fn load<P: AsRef<Path>, S: AsRef<str>>(
        path: P,
        rtl_languages: &[S],
    ) -> TranslationResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                TranslationError::NotFound(format!("{} not found", path.display()))
            } else {
                TranslationError::StorageError(format!(
                    "读取语言列表失败 {}: {}",
                    path.display(),
                    e
                ))
            }
        })?;

        Self::from_json(&content, rtl_languages)
            .map_err(|e| e.with_context(path.display()))
    }

    /// 从 JSON 文本解析
    pub fn from_json<S: AsRef<str>>(content: &str, rtl_languages: &[S]) -> TranslationResult<Self> {
        let raw: Map<String, Value> = serde_json::from_str(content)?;

        let mut codes = Vec::with_capacity(raw.len());
        let mut descriptors = Vec::with_capacity(raw.len());
        for (code, value) in &raw {
            let descriptor: LanguageDescriptor =
                serde_json::from_value(value.clone()).map_err(|e| {
                    TranslationError::StorageError(format!("语言 '{}' 的描述无效: {}", code, e))
                })?;
            codes.push(code.clone());
            descriptors.push(descriptor);
        }

        let rtl = rtl_languages.iter().map(|code| code.as_ref().to_string()).collect();

        tracing::debug!("已加载 {} 种语言", codes.len());
        Ok(Self {
            codes,
            descriptors,
            rtl,
            raw,
        })
    }

    /// 全部 ISO 代码
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    /// 查询语言描述
    pub fn get(&self, code: &str) -> Option<&LanguageDescriptor> {
        self.codes
            .iter()
            .position(|c| c == code)
            .map(|index| &self.descriptors[index])
    }

    /// 书写方向
    pub fn direction(&self, code: &str) -> Direction {
        if self.rtl.contains(code) {
            Direction::Rtl
        } else {
            Direction::Ltr
        }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// 原始 JSON，供对外接口原样返回
    pub fn as_json(&self) -> &Map<String, Value> {
        &self.raw
    }
}
