//! 미분류 에러 클러스터링
//!
//! UNKNOWN 카테고리의 ERROR 메시지를 텍스트 유사도로 묶습니다.
//! TF-IDF 벡터화 후 k-means를 적용하며, 실패는 파이프라인 에러가 아니라
//! 빈 클러스터 맵과 경고 로그로 처리됩니다.
//!
//! # 사용 예시
//! ```ignore
//! use loglens_analyzer::cluster::{ClusterConfig, UnknownErrorClusterer};
//!
//! let clusterer = UnknownErrorClusterer::new(ClusterConfig::default())?;
//! let clusters = clusterer.cluster(&messages);
//! ```

mod kmeans;
mod stop_words;
mod tfidf;

use std::time::Instant;

use loglens_core::types::ClusterMap;
use tracing::{debug, warn};

use crate::error::AnalyzerError;
use kmeans::KMeans;
use tfidf::TfidfVectorizer;

/// 클러스터링 실패
#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    /// 모든 토큰이 불용어이거나 토큰이 없음
    #[error("empty vocabulary: every message consists only of stop words or short tokens")]
    EmptyVocabulary,

    /// 블로킹 작업 조인 실패
    #[error("clustering task failed: {0}")]
    Task(String),
}

/// 클러스터링 파라미터
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterConfig {
    /// 클러스터 수
    pub n_clusters: usize,
    /// 난수 시드
    pub seed: u64,
    /// Lloyd 반복 최대 횟수
    pub max_iterations: usize,
    /// 수렴 허용 오차
    pub tolerance: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            n_clusters: 2,
            seed: 42,
            max_iterations: 300,
            tolerance: 1e-4,
        }
    }
}

/// 미분류 에러 클러스터러
#[derive(Clone)]
pub struct UnknownErrorClusterer {
    config: ClusterConfig,
    vectorizer: TfidfVectorizer,
}

impl UnknownErrorClusterer {
    /// 새 클러스터러를 생성합니다.
    pub fn new(config: ClusterConfig) -> Result<Self, AnalyzerError> {
        if config.n_clusters == 0 {
            return Err(AnalyzerError::Config {
                field: "n_clusters".to_owned(),
                reason: "must be at least 1".to_owned(),
            });
        }
        Ok(Self {
            config,
            vectorizer: TfidfVectorizer::new()?,
        })
    }

    /// 현재 파라미터
    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// 메시지를 클러스터로 묶습니다.
    ///
    /// 메시지 수가 `n_clusters`보다 적으면 빈 맵입니다. 각 클러스터의
    /// 멤버는 입력 순서를 유지하며, 멤버가 없는 인덱스는 맵에 나타나지 않습니다.
    pub fn try_cluster(&self, messages: &[String]) -> Result<ClusterMap, ClusterError> {
        if messages.len() < self.config.n_clusters {
            debug!(
                messages = messages.len(),
                n_clusters = self.config.n_clusters,
                "too few messages to cluster"
            );
            return Ok(ClusterMap::new());
        }

        let started = Instant::now();
        let matrix = self.vectorizer.fit_transform(messages)?;
        let labels = KMeans {
            n_clusters: self.config.n_clusters,
            seed: self.config.seed,
            max_iterations: self.config.max_iterations,
            tolerance: self.config.tolerance,
        }
        .fit_predict(&matrix);

        let mut clusters = ClusterMap::new();
        for (message, label) in messages.iter().zip(labels) {
            clusters.entry(label).or_default().push(message.clone());
        }

        metrics::histogram!(loglens_core::metrics::CLUSTERING_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());
        debug!(
            messages = messages.len(),
            features = matrix.n_features,
            clusters = clusters.len(),
            "clustered unknown errors"
        );
        Ok(clusters)
    }

    /// 메시지를 클러스터로 묶고, 실패하면 경고 후 빈 맵을 반환합니다.
    pub fn cluster(&self, messages: &[String]) -> ClusterMap {
        self.try_cluster(messages).unwrap_or_else(|e| {
            warn!(error = %e, messages = messages.len(), "clustering failed, returning no clusters");
            ClusterMap::new()
        })
    }

    /// 블로킹 스레드 풀에서 클러스터링을 수행합니다.
    ///
    /// 작업 조인 실패도 빈 맵으로 처리됩니다.
    pub async fn cluster_blocking(&self, messages: Vec<String>) -> ClusterMap {
        let clusterer = self.clone();
        let count = messages.len();
        let result = tokio::task::spawn_blocking(move || clusterer.try_cluster(&messages))
            .await
            .map_err(|e| ClusterError::Task(format!("spawn_blocking failed: {e}")))
            .and_then(|r| r);

        result.unwrap_or_else(|e| {
            warn!(error = %e, messages = count, "clustering failed, returning no clusters");
            ClusterMap::new()
        })
    }
}
