//! 前缀分离器
//!
//! 将输入文本拆分为不可翻译的前导前缀（标点、符号、表情、标记）和可翻译的正文。
//! 只有正文会被送往翻译后端并作为缓存键，前缀在输出时原样（或反转后）拼回。

/// 前缀扫描规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitRule {
    /// 默认规则：前缀为第一个字母或数字（Unicode）之前的所有字符
    Default,
    /// 从右向左语言：前缀为第一个可打印 ASCII 字符（空格到 `~`）之前的所有字符
    ///
    /// 用于处理位于拉丁文正文之前的旗帜、表情和非拉丁引导符号。
    RightToLeft,
}

impl SplitRule {
    /// 根据目标语言选择规则
    pub fn for_target<S: AsRef<str>>(target_lang: &str, rtl_languages: &[S]) -> Self {
        if rtl_languages.iter().any(|code| code.as_ref() == target_lang) {
            SplitRule::RightToLeft
        } else {
            SplitRule::Default
        }
    }

    /// 该字符是否开始正文
    fn starts_core(self, c: char) -> bool {
        match self {
            SplitRule::Default => c.is_alphanumeric(),
            SplitRule::RightToLeft => (' '..='~').contains(&c),
        }
    }
}

/// 拆分结果，借用原始输入
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixedText<'a> {
    pub prefix: &'a str,
    pub core: &'a str,
}

impl<'a> PrefixedText<'a> {
    /// 没有可翻译内容
    pub fn is_untranslatable(&self) -> bool {
        self.core.is_empty()
    }
}

/// 拆分前缀与正文
///
/// `prefix` 与 `core` 拼接后总是等于输入。找不到正文起点时整个输入都是前缀。
pub fn split_prefix(text: &str, rule: SplitRule) -> PrefixedText<'_> {
    let index = text
        .char_indices()
        .find(|&(_, c)| rule.starts_core(c))
        .map(|(i, _)| i)
        .unwrap_or(text.len());

    let (prefix, core) = text.split_at(index);
    PrefixedText { prefix, core }
}

/// 按字符反转前缀，用于从右向左语言的输出拼接
pub fn reverse_prefix(prefix: &str) -> String {
    prefix.chars().rev().collect()
}
