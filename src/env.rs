//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量访问，所有变量统一使用 `CIVICLENS_` 前缀

use std::env;
use std::fmt;
use std::time::Duration;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }

    /// 仅在变量被显式设置时返回值，用于配置覆盖
    fn get_if_set() -> Option<EnvResult<T>> {
        env::var(Self::NAME).ok().map(|value| Self::parse(&value))
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "CIVICLENS_LOG_LEVEL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("info".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn parse(value: &str) -> EnvResult<String> {
            match value.trim().to_lowercase().as_str() {
                level @ ("trace" | "debug" | "info" | "warn" | "error") => Ok(level.to_string()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }
}

/// 翻译相关环境变量
pub mod translation {
    use super::*;

    /// 源语言
    pub struct SourceLang;
    impl EnvVar<String> for SourceLang {
        const NAME: &'static str = "CIVICLENS_SOURCE_LANG";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("en".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Source language of all translated text (ISO code)";

        fn parse(value: &str) -> EnvResult<String> {
            parse_language_code(value, Self::NAME)
        }
    }

    /// 翻译后端 API URL
    pub struct ApiUrl;
    impl EnvVar<String> for ApiUrl {
        const NAME: &'static str = "CIVICLENS_TRANSLATE_API_URL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("http://localhost:5000/translate".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Translation backend endpoint URL";

        fn parse(value: &str) -> EnvResult<String> {
            let url = value.trim();
            if url.starts_with("http://") || url.starts_with("https://") {
                Ok(url.to_string())
            } else {
                Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "API URL must start with http:// or https://".to_string(),
                })
            }
        }
    }

    /// 单次后端请求超时
    pub struct RequestTimeout;
    impl EnvVar<Duration> for RequestTimeout {
        const NAME: &'static str = "CIVICLENS_TRANSLATE_TIMEOUT";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(10));
        const DESCRIPTION: &'static str = "Translation backend request timeout in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            let seconds: u64 = value.trim().parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: "Must be a valid number of seconds".to_string(),
            })?;

            if seconds == 0 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Timeout must be greater than 0".to_string(),
                });
            }

            if seconds > 300 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Timeout too long (max 300 seconds)".to_string(),
                });
            }

            Ok(Duration::from_secs(seconds))
        }
    }

    /// 请求的备选译文数量
    pub struct Alternatives;
    impl EnvVar<usize> for Alternatives {
        const NAME: &'static str = "CIVICLENS_TRANSLATE_ALTERNATIVES";
        const DEFAULT: Option<usize> = Some(1);
        const DESCRIPTION: &'static str = "Number of alternative translations to request";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 0, 10)
        }
    }

    /// 最大并发请求数
    pub struct MaxConcurrentRequests;
    impl EnvVar<usize> for MaxConcurrentRequests {
        const NAME: &'static str = "CIVICLENS_MAX_CONCURRENT_REQUESTS";
        const DEFAULT: Option<usize> = Some(4);
        const DESCRIPTION: &'static str = "Maximum concurrent requests issued by the batch runner";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1, 100)
        }
    }

    /// 从右向左书写的语言列表
    pub struct RtlLanguages;
    impl EnvVar<Vec<String>> for RtlLanguages {
        const NAME: &'static str = "CIVICLENS_RTL_LANGUAGES";
        const DEFAULT: Option<Vec<String>> = None;

        fn get() -> EnvResult<Vec<String>> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok(["ar", "fa", "he", "ur"].iter().map(|s| s.to_string()).collect()),
            }
        }
        const DESCRIPTION: &'static str = "Comma-separated right-to-left language codes";

        fn parse(value: &str) -> EnvResult<Vec<String>> {
            value
                .split(',')
                .map(str::trim)
                .filter(|code| !code.is_empty())
                .map(|code| parse_language_code(code, Self::NAME))
                .collect()
        }
    }
}

/// 存储路径相关环境变量
pub mod storage {
    use super::*;

    /// 翻译缓存文件
    pub struct CachePath;
    impl EnvVar<String> for CachePath {
        const NAME: &'static str = "CIVICLENS_CACHE_PATH";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("translations.json".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Path of the persisted translation cache (JSON)";

        fn parse(value: &str) -> EnvResult<String> {
            parse_path(value, Self::NAME)
        }
    }

    /// 语言列表文件
    pub struct LanguagesPath;
    impl EnvVar<String> for LanguagesPath {
        const NAME: &'static str = "CIVICLENS_LANGUAGES_PATH";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("languages.json".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Path of the reference language list (JSON)";

        fn parse(value: &str) -> EnvResult<String> {
            parse_path(value, Self::NAME)
        }
    }

    /// 文本收集日志
    pub struct TextLogPath;
    impl EnvVar<String> for TextLogPath {
        const NAME: &'static str = "CIVICLENS_TEXT_LOG_PATH";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("logs/texts.log".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Path of the collected text log (one text per line)";

        fn parse(value: &str) -> EnvResult<String> {
            parse_path(value, Self::NAME)
        }
    }
}

/// Web服务器相关环境变量
pub mod web {
    use super::*;

    /// 绑定地址
    pub struct BindAddress;
    impl EnvVar<String> for BindAddress {
        const NAME: &'static str = "CIVICLENS_WEB_BIND_ADDRESS";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("127.0.0.1".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Web server bind address";

        fn parse(value: &str) -> EnvResult<String> {
            let addr = value.trim();
            if addr.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Address cannot be empty".to_string(),
                });
            }
            Ok(addr.to_string())
        }
    }

    /// 端口
    pub struct Port;
    impl EnvVar<u16> for Port {
        const NAME: &'static str = "CIVICLENS_WEB_PORT";
        const DEFAULT: Option<u16> = Some(5000);
        const DESCRIPTION: &'static str = "Web server port";

        fn parse(value: &str) -> EnvResult<u16> {
            let port: u16 = value.trim().parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: "Must be a valid port number (1-65535)".to_string(),
            })?;

            if port == 0 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Port cannot be 0".to_string(),
                });
            }

            Ok(port)
        }
    }
}

fn parse_language_code(value: &str, var_name: &str) -> EnvResult<String> {
    let code = value.trim();
    // 允许 "pt-BR"、"zh-Hans" 这类带区域/书写系统后缀的代码
    let valid = !code.is_empty()
        && code.len() <= 8
        && code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if valid {
        Ok(code.to_string())
    } else {
        Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Invalid language code '{}'", value),
        })
    }
}

fn parse_path(value: &str, var_name: &str) -> EnvResult<String> {
    let path = value.trim();
    if path.is_empty() {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: "Path cannot be empty".to_string(),
        });
    }
    Ok(shellexpand::tilde(path).into_owned())
}

fn parse_positive_usize(value: &str, var_name: &str, min: usize, max: usize) -> EnvResult<usize> {
    let num: usize = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid positive number".to_string(),
    })?;

    if num < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {}", num, min),
        });
    }

    if num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is above maximum {}", num, max),
        });
    }

    Ok(num)
}

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    let mut docs = String::new();
    docs.push_str("# Environment Variables Documentation\n\n");

    let sections: [(&str, Vec<(&str, &str)>); 4] = [
        ("Core Configuration", vec![(core::LogLevel::NAME, core::LogLevel::DESCRIPTION)]),
        (
            "Translation Configuration",
            vec![
                (translation::SourceLang::NAME, translation::SourceLang::DESCRIPTION),
                (translation::ApiUrl::NAME, translation::ApiUrl::DESCRIPTION),
                (translation::RequestTimeout::NAME, translation::RequestTimeout::DESCRIPTION),
                (translation::Alternatives::NAME, translation::Alternatives::DESCRIPTION),
                (
                    translation::MaxConcurrentRequests::NAME,
                    translation::MaxConcurrentRequests::DESCRIPTION,
                ),
                (translation::RtlLanguages::NAME, translation::RtlLanguages::DESCRIPTION),
            ],
        ),
        (
            "Storage Configuration",
            vec![
                (storage::CachePath::NAME, storage::CachePath::DESCRIPTION),
                (storage::LanguagesPath::NAME, storage::LanguagesPath::DESCRIPTION),
                (storage::TextLogPath::NAME, storage::TextLogPath::DESCRIPTION),
            ],
        ),
        (
            "Web Server Configuration",
            vec![
                (web::BindAddress::NAME, web::BindAddress::DESCRIPTION),
                (web::Port::NAME, web::Port::DESCRIPTION),
            ],
        ),
    ];

    for (title, vars) in sections {
        docs.push_str(&format!("## {}\n\n", title));
        for (name, description) in vars {
            docs.push_str(&format!("- `{}`: {}\n", name, description));
        }
        docs.push('\n');
    }

    docs
}
