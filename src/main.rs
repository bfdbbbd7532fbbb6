//! 命令行入口

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use futures::StreamExt;

use civiclens_translate::translation::{
    storage::read_source_log, BatchOutcome, BatchRunner, ConfigManager, LanguageCatalog,
    TranslationConfig, TranslationResult, TranslationService,
};

#[derive(Debug, Parser)]
#[command(name = "civiclens-translate", version, about = "带持久化缓存的界面文本翻译工具")]
struct Cli {
    /// 配置文件路径（TOML 或 JSON），默认按搜索路径查找
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 翻译单段文本
    Translate {
        /// 目标语言代码
        #[arg(short, long)]
        target: String,
        /// 待翻译文本
        text: String,
    },
    /// 将文本日志逐行翻译到每个目标语言
    Batch {
        /// 文本日志路径，默认取配置中的 text_log_path
        #[arg(short, long)]
        log: Option<PathBuf>,
        /// 目标语言，可重复；默认使用语言列表中的全部语言
        #[arg(short = 't', long = "target")]
        targets: Vec<String>,
        /// 同时进行的请求数
        #[arg(long)]
        concurrency: Option<usize>,
    },
    /// 列出语言参考数据
    Languages,
    /// 生成示例配置文件
    InitConfig {
        /// 输出路径
        path: PathBuf,
    },
    /// 显示支持的环境变量
    EnvDocs,
}

#[tokio::main]
async fn main() -> ExitCode {
    civiclens_translate::init_tracing();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("错误: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> TranslationResult<ExitCode> {
    match cli.command {
        Command::InitConfig { path } => {
            ConfigManager::generate_example_config(&path)?;
            println!("已生成示例配置: {}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        Command::EnvDocs => {
            print!("{}", civiclens_translate::env::generate_env_docs());
            Ok(ExitCode::SUCCESS)
        }
        Command::Languages => {
            let config = load_config(cli.config)?;
            let catalog = LanguageCatalog::load(&config.languages_path, config.rtl_languages.as_slice())?;
            for code in catalog.codes() {
                if let Some(descriptor) = catalog.get(code) {
                    println!(
                        "{}\t{}\t{}\t{:?}",
                        code,
                        descriptor.language,
                        descriptor.endonym.as_deref().unwrap_or("-"),
                        catalog.direction(code)
                    );
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Translate { target, text } => {
            let service = TranslationService::from_config(load_config(cli.config)?)?;
            let translation = service.translate(&target, &text).await?;
            println!("{}", translation);
            Ok(ExitCode::SUCCESS)
        }
        Command::Batch {
            log,
            targets,
            concurrency,
        } => {
            let config = load_config(cli.config)?;
            let log_path = log.unwrap_or_else(|| config.text_log_path.clone());
            let lines = read_source_log(&log_path).await?;

            let targets = if targets.is_empty() {
                LanguageCatalog::load(&config.languages_path, config.rtl_languages.as_slice())?
                    .codes()
                    .to_vec()
            } else {
                targets
            };

            let service = TranslationService::from_config(config)?;
            let mut runner = BatchRunner::new(service, targets, lines);
            if let Some(concurrency) = concurrency {
                runner = runner.with_concurrency(concurrency);
            }

            let mut failures = 0usize;
            let mut outcomes = Box::pin(runner.run());
            while let Some(outcome) = outcomes.next().await {
                match outcome {
                    BatchOutcome::Translated { ref translation, .. } => println!("{}", translation),
                    BatchOutcome::Failed { .. } => {
                        failures += 1;
                        eprintln!("{}", outcome);
                    }
                }
            }

            if failures > 0 {
                eprintln!("共 {} 对, 失败 {}", runner.pair_count(), failures);
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn load_config(path: Option<PathBuf>) -> TranslationResult<TranslationConfig> {
    let manager = match path {
        Some(path) => ConfigManager::from_file(path)?,
        None => ConfigManager::new()?,
    };
    Ok(manager.into_config())
}
