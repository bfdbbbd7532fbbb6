//! 批量翻译集成测试

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;

use civiclens_translate::translation::{
    storage::read_source_log, BatchOutcome, BatchRunner, ErrorCategory, TextLog,
    TranslationError,
};

mod common {
    include!("common/mod.rs");
}

use common::{MockBackend, TestEnvironment};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

#[tokio::test]
async fn test_failed_pair_does_not_stop_batch() {
    let env = TestEnvironment::new();
    let backend = Arc::new(MockBackend::new().failing_on("Second"));
    let service = env.service(backend.clone());

    let runner = BatchRunner::new(service, strings(&["fr"]), strings(&["First", "Second", "Third"]));
    let outcomes: Vec<BatchOutcome> = runner.run().collect().await;

    assert_eq!(outcomes.len(), 3);
    assert_eq!(
        outcomes[0],
        BatchOutcome::Translated {
            target: "fr".to_string(),
            text: "First".to_string(),
            translation: "fr:First".to_string(),
        }
    );
    assert!(matches!(
        &outcomes[1],
        BatchOutcome::Failed { target, text, error: TranslationError::BackendError(_) }
            if target == "fr" && text == "Second"
    ));
    assert_eq!(
        outcomes[2],
        BatchOutcome::Translated {
            target: "fr".to_string(),
            text: "Third".to_string(),
            translation: "fr:Third".to_string(),
        }
    );
}

#[tokio::test]
async fn test_targets_outer_lines_inner_and_empty_lines_skipped() {
    let env = TestEnvironment::new();
    let backend = Arc::new(MockBackend::new());
    let service = env.service(backend.clone());

    let runner = BatchRunner::new(service, strings(&["es", "fr"]), strings(&["One", "", "Two"]))
        .with_concurrency(1);
    assert_eq!(runner.pair_count(), 4);

    let order: Vec<(String, String)> = runner
        .run()
        .map(|outcome| (outcome.target().to_string(), outcome.text().to_string()))
        .collect()
        .await;

    assert_eq!(
        order,
        vec![
            ("es".to_string(), "One".to_string()),
            ("es".to_string(), "Two".to_string()),
            ("fr".to_string(), "One".to_string()),
            ("fr".to_string(), "Two".to_string()),
        ]
    );
    assert_eq!(backend.call_count(), 4);
}

#[tokio::test]
async fn test_output_order_matches_input_under_concurrency() {
    let env = TestEnvironment::new();
    let backend = Arc::new(MockBackend::new().with_delay(Duration::from_millis(10)));
    let service = env.service(backend.clone());

    let lines: Vec<String> = (0..12).map(|i| format!("Line {}", i)).collect();
    let runner = BatchRunner::new(service, strings(&["fr"]), lines.clone()).with_concurrency(4);

    let texts: Vec<String> = runner
        .run()
        .map(|outcome| outcome.text().to_string())
        .collect()
        .await;

    assert_eq!(texts, lines);
}

#[tokio::test]
async fn test_rerun_only_calls_backend_for_missing_pairs() {
    let env = TestEnvironment::new();

    let backend = Arc::new(MockBackend::new().failing_on("Beta"));
    let runner = BatchRunner::new(
        env.service(backend.clone()),
        strings(&["fr", "ar"]),
        strings(&["Alpha", "Beta", "¡Gamma"]),
    );
    let report = runner.run_to_report().await;

    assert_eq!(report.succeeded, 4);
    assert_eq!(report.failures.len(), 2);
    assert_eq!(report.errors.count(ErrorCategory::Backend), 2);
    assert_eq!(report.total(), 6);
    assert!(!report.is_complete_success());
    assert_eq!(backend.call_count(), 6);

    // 换一个正常的后端重跑，只补齐失败的两对
    let backend = Arc::new(MockBackend::new());
    let runner = BatchRunner::new(
        env.service(backend.clone()),
        strings(&["fr", "ar"]),
        strings(&["Alpha", "Beta", "¡Gamma"]),
    );
    let report = runner.run_to_report().await;

    assert!(report.is_complete_success());
    assert_eq!(report.succeeded, 6);
    assert_eq!(backend.seen_texts(), vec!["Beta", "Beta"]);
}

#[tokio::test]
async fn test_large_batch_yields_first_pairs_without_walking_the_rest() {
    let env = TestEnvironment::new();
    let backend = Arc::new(MockBackend::new());

    let targets: Vec<String> = (0..500).map(|i| format!("t{}", i)).collect();
    let lines: Vec<String> = (0..2000).map(|i| format!("Line {}", i)).collect();
    let runner =
        BatchRunner::new(env.service(backend.clone()), targets, lines).with_concurrency(1);
    assert_eq!(runner.pair_count(), 1_000_000);

    let first: Vec<String> = runner
        .run()
        .take(2)
        .map(|outcome| outcome.to_string())
        .collect()
        .await;

    assert_eq!(first, vec!["t0:Line 0", "t0:Line 1"]);
    assert!(backend.call_count() <= 3);
}

#[tokio::test]
async fn test_run_is_restartable() {
    let env = TestEnvironment::new();
    let backend = Arc::new(MockBackend::new());
    let runner = BatchRunner::new(
        env.service(backend.clone()),
        strings(&["fr"]),
        strings(&["Alpha", "Beta"]),
    );

    let first: Vec<BatchOutcome> = runner.run().collect().await;
    let second: Vec<BatchOutcome> = runner.run().collect().await;

    assert_eq!(first, second);
    assert_eq!(backend.call_count(), 2);
}

#[tokio::test]
async fn test_collected_texts_feed_the_batch() {
    let env = TestEnvironment::new();
    let log = TextLog::new(&env.config.text_log_path);
    log.append(&["Vote here", "  ", "Register\nnow"]).await.unwrap();

    let lines = read_source_log(log.path()).await.unwrap();
    assert_eq!(lines, vec!["Vote here", "Register now"]);

    let backend = Arc::new(MockBackend::new());
    let runner = BatchRunner::new(env.service(backend.clone()), strings(&["es"]), lines);
    let translations: Vec<String> = runner.run().map(|outcome| outcome.to_string()).collect().await;

    assert_eq!(translations, vec!["es:Vote here", "es:Register now"]);
}
