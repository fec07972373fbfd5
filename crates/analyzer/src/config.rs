//! 분석기 설정
//!
//! [`AnalyzerConfig`]는 core의 [`AnalysisConfig`](loglens_core::config::AnalysisConfig)와
//! [`SummaryConfig`](loglens_core::config::SummaryConfig)를 기반으로
//! 분석기 전용 설정을 제공합니다.
//!
//! # 사용 예시
//! ```ignore
//! use loglens_core::config::LoglensConfig;
//! use loglens_analyzer::config::AnalyzerConfig;
//!
//! let core_config = LoglensConfig::default();
//! let config = AnalyzerConfig::from_core(&core_config);
//! ```

use std::time::Duration;

use loglens_core::config::{LoglensConfig, MAX_EVENTS_CEILING};
use serde::{Deserialize, Serialize};

use crate::cluster::ClusterConfig;
use crate::error::AnalyzerError;

/// 요약 타임아웃 상한 (초)
const MAX_SUMMARY_TIMEOUT_SECS: u64 = 600;

/// 분석기 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// 배치당 최대 이벤트 수
    pub max_events: usize,
    /// 클러스터 수
    pub n_clusters: usize,
    /// 클러스터링 시드
    pub cluster_seed: u64,
    /// k-means 최대 반복 횟수
    pub max_iterations: usize,
    /// k-means 수렴 허용 오차
    pub tolerance: f64,
    /// 요약 백엔드 호출 타임아웃 (초)
    pub summary_timeout_secs: u64,
    /// 요약 백엔드에 전달할 이벤트 수
    pub context_events: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_events: MAX_EVENTS_CEILING,
            n_clusters: 2,
            cluster_seed: 42,
            max_iterations: 300,
            tolerance: 1e-4,
            summary_timeout_secs: 30,
            context_events: 50,
        }
    }
}

impl AnalyzerConfig {
    /// core 설정에서 분석기 설정을 생성합니다.
    pub fn from_core(core: &LoglensConfig) -> Self {
        Self {
            max_events: core.analysis.max_events,
            n_clusters: core.analysis.n_clusters,
            cluster_seed: core.analysis.cluster_seed,
            max_iterations: core.analysis.max_iterations,
            tolerance: core.analysis.tolerance,
            summary_timeout_secs: core.summary.timeout_secs,
            context_events: core.summary.context_events,
        }
    }

    /// 클러스터링 파라미터
    pub fn cluster_config(&self) -> ClusterConfig {
        ClusterConfig {
            n_clusters: self.n_clusters,
            seed: self.cluster_seed,
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
        }
    }

    /// 요약 타임아웃
    pub fn summary_timeout(&self) -> Duration {
        Duration::from_secs(self.summary_timeout_secs)
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), AnalyzerError> {
        if self.max_events == 0 || self.max_events > MAX_EVENTS_CEILING {
            return Err(AnalyzerError::Config {
                field: "max_events".to_owned(),
                reason: format!("must be 1-{MAX_EVENTS_CEILING}"),
            });
        }

        if self.n_clusters == 0 {
            return Err(AnalyzerError::Config {
                field: "n_clusters".to_owned(),
                reason: "must be at least 1".to_owned(),
            });
        }

        if self.max_iterations == 0 {
            return Err(AnalyzerError::Config {
                field: "max_iterations".to_owned(),
                reason: "must be at least 1".to_owned(),
            });
        }

        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(AnalyzerError::Config {
                field: "tolerance".to_owned(),
                reason: "must be a finite, non-negative number".to_owned(),
            });
        }

        if self.summary_timeout_secs == 0 || self.summary_timeout_secs > MAX_SUMMARY_TIMEOUT_SECS {
            return Err(AnalyzerError::Config {
                field: "summary_timeout_secs".to_owned(),
                reason: format!("must be 1-{MAX_SUMMARY_TIMEOUT_SECS}"),
            });
        }

        if self.context_events == 0 {
            return Err(AnalyzerError::Config {
                field: "context_events".to_owned(),
                reason: "must be at least 1".to_owned(),
            });
        }

        Ok(())
    }
}

/// 분석기 설정 빌더
#[derive(Default)]
pub struct AnalyzerConfigBuilder {
    config: AnalyzerConfig,
}

impl AnalyzerConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 기존 설정에서 빌더를 시작합니다.
    pub fn from_config(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// 배치당 최대 이벤트 수를 설정합니다.
    pub fn max_events(mut self, max_events: usize) -> Self {
        self.config.max_events = max_events;
        self
    }

    /// 클러스터 수를 설정합니다.
    pub fn n_clusters(mut self, n_clusters: usize) -> Self {
        self.config.n_clusters = n_clusters;
        self
    }

    /// 클러스터링 시드를 설정합니다.
    pub fn cluster_seed(mut self, seed: u64) -> Self {
        self.config.cluster_seed = seed;
        self
    }

    /// k-means 최대 반복 횟수를 설정합니다.
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// k-means 허용 오차를 설정합니다.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    /// 요약 타임아웃(초)을 설정합니다.
    pub fn summary_timeout_secs(mut self, secs: u64) -> Self {
        self.config.summary_timeout_secs = secs;
        self
    }

    /// 요약 컨텍스트 이벤트 수를 설정합니다.
    pub fn context_events(mut self, count: usize) -> Self {
        self.config.context_events = count;
        self
    }

    /// 설정을 검증하고 `AnalyzerConfig`를 생성합니다.
    pub fn build(self) -> Result<AnalyzerConfig, AnalyzerError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
