//! 설정 관리: loglens.toml 파싱 및 런타임 설정
//!
//! [`LoglensConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`LOGLENS_ANALYSIS_N_CLUSTERS=3` 형식)
//! 3. 설정 파일 (`loglens.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), loglens_core::error::LoglensError> {
//! use loglens_core::config::LoglensConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = LoglensConfig::load("loglens.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = LoglensConfig::parse("[analysis]\nn_clusters = 3")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, LoglensError};

/// 한 배치에서 분류할 수 있는 최대 이벤트 수 (상한)
pub const MAX_EVENTS_CEILING: usize = 5000;

/// loglens 통합 설정
///
/// `loglens.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 모듈은 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoglensConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 분석(파싱/분류/클러스터링) 설정
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// 인시던트 요약 설정
    #[serde(default)]
    pub summary: SummaryConfig,
}

impl LoglensConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    /// 3. 유효성 검증
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LoglensError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 기본값에 환경변수 오버라이드만 적용한 설정을 생성합니다.
    ///
    /// 설정 파일 없이 실행할 때 사용합니다.
    pub fn from_env() -> Result<Self, LoglensError> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, LoglensError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LoglensError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                LoglensError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, LoglensError> {
        toml::from_str(toml_str).map_err(|e| {
            LoglensError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 설정을 TOML 문자열로 직렬화합니다.
    pub fn to_toml(&self) -> Result<String, LoglensError> {
        toml::to_string_pretty(self).map_err(|e| {
            LoglensError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `LOGLENS_{SECTION}_{FIELD}`
    /// 예: `LOGLENS_SUMMARY_TIMEOUT_SECS=10`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "LOGLENS_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "LOGLENS_GENERAL_LOG_FORMAT");

        // Analysis
        override_usize(
            &mut self.analysis.max_events,
            "LOGLENS_ANALYSIS_MAX_EVENTS",
        );
        override_usize(
            &mut self.analysis.n_clusters,
            "LOGLENS_ANALYSIS_N_CLUSTERS",
        );
        override_u64(
            &mut self.analysis.cluster_seed,
            "LOGLENS_ANALYSIS_CLUSTER_SEED",
        );
        override_usize(
            &mut self.analysis.max_iterations,
            "LOGLENS_ANALYSIS_MAX_ITERATIONS",
        );
        override_f64(&mut self.analysis.tolerance, "LOGLENS_ANALYSIS_TOLERANCE");

        // Summary
        override_bool(&mut self.summary.enabled, "LOGLENS_SUMMARY_ENABLED");
        override_string(&mut self.summary.endpoint, "LOGLENS_SUMMARY_ENDPOINT");
        override_string(&mut self.summary.model, "LOGLENS_SUMMARY_MODEL");
        override_string(&mut self.summary.api_key_env, "LOGLENS_SUMMARY_API_KEY_ENV");
        override_u64(
            &mut self.summary.timeout_secs,
            "LOGLENS_SUMMARY_TIMEOUT_SECS",
        );
        override_usize(
            &mut self.summary.context_events,
            "LOGLENS_SUMMARY_CONTEXT_EVENTS",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LoglensError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        self.analysis.validate()?;
        self.summary.validate()?;

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 분석 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// 배치당 최대 분류 이벤트 수 (1 ~ 5000)
    pub max_events: usize,
    /// 목표 클러스터 수
    pub n_clusters: usize,
    /// k-means 초기화 시드
    pub cluster_seed: u64,
    /// k-means 최대 반복 횟수
    pub max_iterations: usize,
    /// k-means 수렴 허용 오차 (특성 분산 평균 대비 비율)
    pub tolerance: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_events: MAX_EVENTS_CEILING,
            n_clusters: 2,
            cluster_seed: 42,
            max_iterations: 300,
            tolerance: 1e-4,
        }
    }
}

impl AnalysisConfig {
    /// 분석 설정의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_events == 0 || self.max_events > MAX_EVENTS_CEILING {
            return Err(ConfigError::InvalidValue {
                field: "analysis.max_events".to_owned(),
                reason: format!("must be 1-{MAX_EVENTS_CEILING}"),
            });
        }

        if self.n_clusters == 0 {
            return Err(ConfigError::InvalidValue {
                field: "analysis.n_clusters".to_owned(),
                reason: "must be at least 1".to_owned(),
            });
        }

        if self.max_iterations == 0 {
            return Err(ConfigError::InvalidValue {
                field: "analysis.max_iterations".to_owned(),
                reason: "must be at least 1".to_owned(),
            });
        }

        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "analysis.tolerance".to_owned(),
                reason: "must be a finite, non-negative number".to_owned(),
            });
        }

        Ok(())
    }
}

/// 인시던트 요약 설정
///
/// API 키 자체는 설정에 저장하지 않고, 키를 담은 환경변수 이름만 보관합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// LLM 요약 사용 여부 (false면 항상 결정적 요약)
    pub enabled: bool,
    /// OpenAI 호환 API 엔드포인트 (경로 제외)
    pub endpoint: String,
    /// 모델 이름
    pub model: String,
    /// API 키를 읽을 환경변수 이름
    pub api_key_env: String,
    /// 요약 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// LLM에 전달할 최대 이벤트 수
    pub context_events: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://api.openai.com".to_owned(),
            model: "gpt-4o-mini".to_owned(),
            api_key_env: "OPENAI_API_KEY".to_owned(),
            timeout_secs: 30,
            context_events: 50,
        }
    }
}

impl SummaryConfig {
    /// 요약 설정의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), ConfigError> {
        const MAX_TIMEOUT_SECS: u64 = 600;

        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::InvalidValue {
                field: "summary.timeout_secs".to_owned(),
                reason: format!("must be 1-{MAX_TIMEOUT_SECS}"),
            });
        }

        if self.context_events == 0 {
            return Err(ConfigError::InvalidValue {
                field: "summary.context_events".to_owned(),
                reason: "must be at least 1".to_owned(),
            });
        }

        if self.enabled {
            if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    field: "summary.endpoint".to_owned(),
                    reason: "must start with http:// or https://".to_owned(),
                });
            }

            if self.model.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "summary.model".to_owned(),
                    reason: "model must not be empty when summary is enabled".to_owned(),
                });
            }

            if self.api_key_env.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "summary.api_key_env".to_owned(),
                    reason: "api_key_env must not be empty when summary is enabled".to_owned(),
                });
            }
        }

        Ok(())
    }

    /// 요약용 API 키를 환경에서 한 번 읽어옵니다.
    ///
    /// 요약이 비활성화되어 있거나 환경변수가 없거나 비어 있으면 `None`입니다.
    /// 시작 시점에 한 번만 호출하고, 결과로 백엔드 생성 여부를 결정합니다.
    pub fn resolve_api_key(&self) -> Option<String> {
        if !self.enabled {
            return None;
        }
        std::env::var(&self.api_key_env)
            .ok()
            .map(|key| key.trim().to_owned())
            .filter(|key| !key.is_empty())
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

fn override_f64(target: &mut f64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<f64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse f64 from env var, ignoring"
            ),
        }
    }
}
