//! 통합 테스트 -- 배치 분석 전체 흐름 검증
//!
//! 파일 입력부터 분류, 클러스터링, 요약까지의 전체 파이프라인을 검증합니다.

use std::io::Write;
use std::time::Duration;

use loglens_analyzer::{
    AnalyzerBuilder, AnalyzerConfigBuilder, AnalyzerError, SummaryBackend, SummaryError,
    SummarySource,
};
use loglens_core::types::{Category, ClassifiedEvent, LogLevel, Severity};

/// 항상 실패하는 요약 백엔드
struct UnreachableBackend;

impl SummaryBackend for UnreachableBackend {
    fn name(&self) -> &str {
        "unreachable"
    }

    async fn summarize(&self, _events: &[ClassifiedEvent]) -> Result<String, SummaryError> {
        Err(SummaryError::Http("connection refused".to_owned()))
    }
}

/// 응답하지 않는 요약 백엔드
struct StalledBackend;

impl SummaryBackend for StalledBackend {
    fn name(&self) -> &str {
        "stalled"
    }

    async fn summarize(&self, _events: &[ClassifiedEvent]) -> Result<String, SummaryError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok("too late".to_owned())
    }
}

fn write_log(contents: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("failed to create temp file");
    file.write_all(contents).expect("failed to write temp file");
    file.flush().expect("failed to flush temp file");
    file
}

/// 대표 라인 하나의 전체 흐름
#[tokio::test]
async fn test_end_to_end_single_line() {
    let file = write_log(
        b"2024-01-01 10:00:00,123 ERROR [com.example.Service] Database connection timeout\n",
    );
    let analyzer = AnalyzerBuilder::new().build().unwrap();

    let report = analyzer.analyze_file(file.path()).await.unwrap();

    assert_eq!(report.events.len(), 1);
    let event = &report.events[0];
    assert_eq!(event.event.timestamp, "2024-01-01 10:00:00,123");
    assert_eq!(event.event.level, LogLevel::Error);
    assert_eq!(event.event.component, "com.example.Service");
    assert!(event.event.message.ends_with("Database connection timeout"));
    assert_eq!(event.category, Category::Database);
    assert_eq!(event.severity, Severity::High);

    // DATABASE 이벤트는 클러스터링 대상이 아님
    assert!(report.clusters.is_empty());
    assert_eq!(report.summary_source, SummarySource::Fallback);
}

/// 6000개 유효 라인 중 앞의 5000개만 순서대로 유지
#[tokio::test]
async fn test_batch_cap_keeps_first_5000_in_order() {
    let mut contents = String::new();
    for i in 0..6000 {
        contents.push_str(&format!(
            "2024-01-01 10:00:00,{:03} INFO [svc] request {i} served\n",
            i % 1000
        ));
    }
    let file = write_log(contents.as_bytes());
    let analyzer = AnalyzerBuilder::new().build().unwrap();

    let report = analyzer.analyze_file(file.path()).await.unwrap();

    assert_eq!(report.events.len(), 5000);
    for (i, event) in report.events.iter().enumerate() {
        assert_eq!(event.event.message, format!(" request {i} served"));
    }
    assert_eq!(report.stats.events_parsed, 6000);
    assert_eq!(report.stats.events_dropped, 1000);
    assert!(report.stats.truncated);
    assert!(report.summary.contains("Total events: 5000"));
}

/// 백엔드 없이 4 HIGH / 1 MEDIUM / 0 LOW
#[tokio::test]
async fn test_fallback_counts_without_credentials() {
    let contents = "\
2024-01-01 10:00:00,001 ERROR [db] Database pool exhausted
2024-01-01 10:00:00,002 ERROR [http] Read timeout after 30s
2024-01-01 10:00:00,003 ERROR [client] Upstream API returned 502
2024-01-01 10:00:00,004 ERROR [jvm] Out of memory
2024-01-01 10:00:00,005 WARN  [svc] Slow response detected
";
    let file = write_log(contents.as_bytes());
    let analyzer = AnalyzerBuilder::new().build().unwrap();
    assert!(!analyzer.has_summary_backend());

    let report = analyzer.analyze_file(file.path()).await.unwrap();

    assert_eq!(report.summary_source, SummarySource::Fallback);
    assert!(report.summary.contains("Total events: 5"));
    assert!(report.summary.contains("High severity events: 4"));
    assert!(report.summary.contains("Medium severity events: 1"));
    assert!(report.summary.contains("Low severity events: 0"));
}

/// 백엔드 실패도 같은 폴백으로 대체
#[tokio::test]
async fn test_failing_backend_is_invisible_to_caller() {
    let analyzer = AnalyzerBuilder::new()
        .summary_backend(UnreachableBackend)
        .build()
        .unwrap();
    let report = analyzer
        .analyze_bytes(b"2024-01-01 10:00:00,001 ERROR [db] Database pool exhausted\n")
        .await;
    assert_eq!(report.summary_source, SummarySource::Fallback);
    assert!(report.summary.contains("High severity events: 1"));
}

/// 타임아웃된 백엔드는 이벤트 목록에 영향을 주지 않음
#[tokio::test(start_paused = true)]
async fn test_stalled_backend_times_out() {
    let config = AnalyzerConfigBuilder::new()
        .summary_timeout_secs(2)
        .build()
        .unwrap();
    let analyzer = AnalyzerBuilder::new()
        .config(config)
        .summary_backend(StalledBackend)
        .build()
        .unwrap();

    let report = analyzer
        .analyze_bytes(b"2024-01-01 10:00:00,001 WARN [svc] slow\n2024-01-01 10:00:00,002 INFO [svc] ok\n")
        .await;

    assert_eq!(report.summary_source, SummarySource::Fallback);
    assert_eq!(report.events.len(), 2);
}

/// 읽을 수 없는 파일만 에러로 전파
#[tokio::test]
async fn test_unreadable_file_is_input_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.log");
    let analyzer = AnalyzerBuilder::new().build().unwrap();

    let err = analyzer.analyze_file(&missing).await.unwrap_err();
    match err {
        AnalyzerError::Input { path, .. } => assert!(path.ends_with("missing.log")),
        other => panic!("expected input error, got {other:?}"),
    }

    // 디렉터리도 읽을 수 없음
    assert!(matches!(
        analyzer.analyze_file(dir.path()).await,
        Err(AnalyzerError::Input { .. })
    ));
}

/// 잘못된 UTF-8 바이트는 건너뛰고 나머지는 처리
#[tokio::test]
async fn test_invalid_utf8_is_skipped() {
    let mut contents = Vec::new();
    contents.extend_from_slice(b"2024-01-01 10:00:00,001 ERROR [svc] bad \xff\xfebytes here\n");
    contents.extend_from_slice(b"\xc3\x28 garbage line\n");
    contents.extend_from_slice(b"2024-01-01 10:00:00,002 INFO [svc] fine\n");
    let file = write_log(&contents);
    let analyzer = AnalyzerBuilder::new().build().unwrap();

    let report = analyzer.analyze_file(file.path()).await.unwrap();

    assert_eq!(report.events.len(), 2);
    assert_eq!(report.events[0].event.message, " bad bytes here");
    assert_eq!(report.stats.lines_unparsed, 1);
}

/// 색상 코드, CRLF, 노이즈가 섞인 실제 서버 로그 형태
#[tokio::test]
async fn test_mixed_server_log() {
    let contents = "\x1b[0m\x1b[0m10:00:00 build started\r\n\
\x1b[31m2024-03-05 08:15:42,007 ERROR [org.jboss.as.controller] (Controller Boot Thread) WFLYCTL0013: Operation failed\x1b[0m\r\n\
\tat org.jboss.as.server.Foo.bar(Foo.java:10)\r\n\
\r\n\
2024-03-05 08:15:43,001 DEBUG [org.hibernate] loading entity\r\n";
    let analyzer = AnalyzerBuilder::new().build().unwrap();

    let report = analyzer.analyze_bytes(contents.as_bytes()).await;

    assert_eq!(report.stats.lines_total, 5);
    assert_eq!(report.stats.lines_blank, 1);
    assert_eq!(report.stats.lines_unparsed, 2);
    assert_eq!(report.events.len(), 2);
    assert_eq!(report.events[0].event.component, "org.jboss.as.controller");
    assert_eq!(
        report.events[0].event.message,
        " (Controller Boot Thread) WFLYCTL0013: Operation failed"
    );
    assert_eq!(report.events[0].category, Category::Unknown);
    assert_eq!(report.events[0].severity, Severity::Medium);
    assert_eq!(report.events[1].severity, Severity::Low);
}

/// 같은 입력과 시드는 같은 클러스터를 생성
#[tokio::test]
async fn test_clustering_is_deterministic() {
    let messages = [
        "NullPointerException in OrderHandler",
        "ClassCastException casting Invoice",
        "NullPointerException in PaymentHandler",
        "ClassCastException casting Receipt",
        "IllegalStateException session closed",
        "IllegalStateException session expired",
    ];
    let contents: String = messages
        .iter()
        .enumerate()
        .map(|(i, m)| format!("2024-01-01 10:00:00,{i:03} ERROR [svc] {m}\n"))
        .collect();
    let config = AnalyzerConfigBuilder::new().n_clusters(3).build().unwrap();
    let analyzer = AnalyzerBuilder::new().config(config).build().unwrap();

    let first = analyzer.analyze_bytes(contents.as_bytes()).await;
    let second = analyzer.analyze_bytes(contents.as_bytes()).await;

    assert_eq!(first.clusters, second.clusters);
    let total: usize = first.clusters.values().map(Vec::len).sum();
    assert_eq!(total, messages.len());
    assert_ne!(first.batch_id, second.batch_id);
}

/// 클러스터 수보다 적은 미분류 에러는 클러스터링하지 않음
#[tokio::test]
async fn test_single_unknown_error_is_not_clustered() {
    let analyzer = AnalyzerBuilder::new().build().unwrap();
    let report = analyzer
        .analyze_bytes(b"2024-01-01 10:00:00,001 ERROR [svc] NullPointerException\n")
        .await;
    assert!(report.clusters.is_empty());
}

/// JSON 보고서 형태
#[tokio::test]
async fn test_report_json_shape() {
    let analyzer = AnalyzerBuilder::new().build().unwrap();
    let report = analyzer
        .analyze_bytes(b"2024-01-01 10:00:00,123 ERROR [com.example.Service] Database connection timeout\n")
        .await;

    let value = serde_json::to_value(&report).unwrap();
    let event = &value["events"][0];
    assert_eq!(event["level"], "ERROR");
    assert_eq!(event["category"], "DATABASE");
    assert_eq!(event["severity"], "HIGH");
    assert!(value["batch_id"].is_string());
    assert!(value["clusters"].is_object());
    assert_eq!(value["summary_source"], "fallback");
    assert_eq!(value["stats"]["events_parsed"], 1);
}
