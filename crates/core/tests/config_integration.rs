//! loglens.toml 통합 설정 테스트
//!
//! - loglens.toml.example 파싱 테스트
//! - 부분 설정 (일부 섹션만) 로딩 테스트
//! - 환경변수 우선순위 테스트
//! - 빈 파일 / 잘못된 형식 에러 테스트

use loglens_core::config::LoglensConfig;
use loglens_core::error::{ConfigError, LoglensError};
use serial_test::serial;

// =============================================================================
// loglens.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../loglens.toml.example");
    let config = LoglensConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "pretty");
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../loglens.toml.example");
    let config = LoglensConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

#[test]
fn example_config_matches_defaults() {
    let content = include_str!("../../../loglens.toml.example");
    let config = LoglensConfig::parse(content).expect("should parse");
    let defaults = LoglensConfig::default();

    assert_eq!(config.analysis.max_events, defaults.analysis.max_events);
    assert_eq!(config.analysis.n_clusters, defaults.analysis.n_clusters);
    assert_eq!(config.analysis.cluster_seed, defaults.analysis.cluster_seed);
    assert_eq!(
        config.analysis.max_iterations,
        defaults.analysis.max_iterations
    );
    assert_eq!(config.summary.model, defaults.summary.model);
    assert_eq!(config.summary.api_key_env, defaults.summary.api_key_env);
    assert_eq!(config.summary.timeout_secs, defaults.summary.timeout_secs);
}

// =============================================================================
// 파일 로딩 테스트
// =============================================================================

#[tokio::test]
#[serial]
async fn load_partial_file_merges_with_defaults() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("loglens.toml");
    std::fs::write(&path, "[analysis]\nn_clusters = 3\n").expect("should write config");

    let config = LoglensConfig::load(&path).await.expect("should load");
    assert_eq!(config.analysis.n_clusters, 3);
    assert_eq!(config.analysis.max_events, 5000);
    assert_eq!(config.general.log_level, "info");
}

#[tokio::test]
#[serial]
async fn env_override_wins_over_file() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("loglens.toml");
    std::fs::write(&path, "[analysis]\nn_clusters = 3\n").expect("should write config");

    // SAFETY: #[serial]로 환경변수를 조작하는 테스트끼리 직렬 실행됩니다.
    unsafe { std::env::set_var("LOGLENS_ANALYSIS_N_CLUSTERS", "6") };
    let result = LoglensConfig::load(&path).await;
    unsafe { std::env::remove_var("LOGLENS_ANALYSIS_N_CLUSTERS") };

    let config = result.expect("should load");
    assert_eq!(config.analysis.n_clusters, 6);
}

#[tokio::test]
#[serial]
async fn env_override_is_validated() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("loglens.toml");
    std::fs::write(&path, "").expect("should write config");

    // SAFETY: #[serial]로 환경변수를 조작하는 테스트끼리 직렬 실행됩니다.
    unsafe { std::env::set_var("LOGLENS_ANALYSIS_MAX_EVENTS", "9000") };
    let result = LoglensConfig::load(&path).await;
    unsafe { std::env::remove_var("LOGLENS_ANALYSIS_MAX_EVENTS") };

    let err = result.expect_err("max_events above ceiling must be rejected");
    assert!(matches!(
        err,
        LoglensError::Config(ConfigError::InvalidValue { .. })
    ));
}

#[tokio::test]
async fn empty_file_uses_defaults() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("empty.toml");
    std::fs::write(&path, "").expect("should write config");

    let config = LoglensConfig::from_file(&path).await.expect("should load");
    assert_eq!(config.analysis.n_clusters, 2);
}

#[tokio::test]
async fn malformed_file_returns_parse_error() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[analysis\nn_clusters = 3\n").expect("should write config");

    let err = LoglensConfig::from_file(&path)
        .await
        .expect_err("malformed TOML should fail");
    assert!(matches!(
        err,
        LoglensError::Config(ConfigError::ParseFailed { .. })
    ));
}

#[tokio::test]
async fn wrong_type_returns_parse_error() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("typed.toml");
    std::fs::write(&path, "[analysis]\nn_clusters = \"two\"\n").expect("should write config");

    let result = LoglensConfig::from_file(&path).await;
    assert!(result.is_err());
}
