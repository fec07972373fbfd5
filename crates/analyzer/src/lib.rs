#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`normalizer`]: ANSI 색상 코드 제거와 공백 정리
//! - [`parser`]: WildFly/JBoss 로그 라인 파서
//! - [`classifier`]: 키워드 규칙 기반 카테고리 분류
//! - [`severity`]: (레벨, 카테고리) 심각도 표
//! - [`cluster`]: TF-IDF + k-means 미분류 에러 클러스터링
//! - [`summary`]: 요약 백엔드 trait, OpenAI 호환 백엔드, 폴백 요약
//! - [`analyzer`]: 배치 오케스트레이션
//! - [`config`]: 분석기 설정 (core 설정 확장)
//! - [`error`]: 도메인 에러 타입

pub mod analyzer;
pub mod classifier;
pub mod cluster;
pub mod config;
pub mod error;
pub mod normalizer;
pub mod parser;
pub mod severity;
pub mod summary;

// --- 주요 타입 re-export ---

// 분석기
pub use analyzer::{AnalysisReport, Analyzer, AnalyzerBuilder, BatchStats, ClassifiedBatch};

// 설정
pub use config::{AnalyzerConfig, AnalyzerConfigBuilder};

// 에러
pub use error::AnalyzerError;

// 단계
pub use classifier::classify;
pub use cluster::{ClusterConfig, ClusterError, UnknownErrorClusterer};
pub use normalizer::LineNormalizer;
pub use parser::WildflyParser;
pub use severity::assign_severity;

// 요약
pub use summary::{
    IncidentSummarizer, IncidentSummary, OpenAiBackend, SummaryBackend, SummaryError,
    SummarySource,
};
