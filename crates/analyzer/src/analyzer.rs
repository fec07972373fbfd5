//! 배치 분석기: 단계를 연결하는 오케스트레이터
//!
//! # 데이터 흐름
//! ```text
//! bytes -> 디코딩(잘못된 UTF-8 건너뜀) -> 라인 분리 -> LineNormalizer -> LogParser
//!       -> classify + assign_severity -> 이벤트 목록 (max_events 상한)
//!       -> UNKNOWN/ERROR 메시지 -> UnknownErrorClusterer -> 클러스터 맵
//!       -> 이벤트 목록 -> IncidentSummarizer -> 요약
//! ```
//!
//! 상한을 넘은 이벤트는 에러 없이 버려지며 [`BatchStats`]의
//! `events_dropped`와 `truncated`로만 드러납니다.
//!
//! # 사용 예시
//! ```ignore
//! use loglens_analyzer::AnalyzerBuilder;
//!
//! let analyzer = AnalyzerBuilder::new().build()?;
//! let report = analyzer.analyze_file("/var/log/wildfly/server.log").await?;
//! println!("{}", report.summary);
//! ```

use std::path::Path;

use loglens_core::metrics as m;
use loglens_core::pipeline::LogParser;
use loglens_core::types::{ClassifiedEvent, ClusterMap};
use serde::{Deserialize, Serialize};
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use crate::classifier::classify;
use crate::cluster::UnknownErrorClusterer;
use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::normalizer::LineNormalizer;
use crate::parser::WildflyParser;
use crate::severity::assign_severity;
use crate::summary::{IncidentSummarizer, OpenAiBackend, SummaryBackend, SummarySource};

/// 배치 처리 통계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    /// 읽은 전체 라인 수
    pub lines_total: usize,
    /// 정규화 후 비어 있던 라인 수
    pub lines_blank: usize,
    /// 문법에 맞지 않아 버려진 라인 수
    pub lines_unparsed: usize,
    /// 파싱에 성공한 이벤트 수 (상한 초과분 포함)
    pub events_parsed: usize,
    /// 상한 초과로 버려진 이벤트 수
    pub events_dropped: usize,
    /// 상한에 도달했는지 여부
    pub truncated: bool,
}

/// 파싱/분류 단계 결과
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedBatch {
    /// 분류된 이벤트 (입력 순서)
    pub events: Vec<ClassifiedEvent>,
    /// 클러스터링 대상 메시지 (UNKNOWN 카테고리의 ERROR)
    pub unknown_errors: Vec<String>,
    /// 처리 통계
    pub stats: BatchStats,
}

/// 배치 분석 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// 배치 식별자
    pub batch_id: Uuid,
    /// 분류된 이벤트
    pub events: Vec<ClassifiedEvent>,
    /// 미분류 에러 클러스터
    pub clusters: ClusterMap,
    /// 요약 텍스트
    pub summary: String,
    /// 요약 출처
    pub summary_source: SummarySource,
    /// 처리 통계
    pub stats: BatchStats,
}

/// 잘못된 UTF-8 바이트를 건너뛰며 디코딩합니다.
pub fn decode_lossy_skip(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

/// `\n`, `\r\n`, `\r`을 모두 줄 끝으로 취급하여 라인을 나눕니다.
///
/// 마지막 종결자 뒤의 빈 조각은 라인으로 세지 않습니다.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let bytes = text.as_bytes();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                i += 1;
                if bytes.get(i) == Some(&b'\n') {
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < bytes.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// 배치 분석기
pub struct Analyzer<B: SummaryBackend = OpenAiBackend> {
    config: AnalyzerConfig,
    normalizer: LineNormalizer,
    parser: Box<dyn LogParser>,
    clusterer: UnknownErrorClusterer,
    summarizer: IncidentSummarizer<B>,
}

impl<B: SummaryBackend> Analyzer<B> {
    /// 현재 설정
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// 요약 백엔드가 구성되어 있는지 확인합니다.
    pub fn has_summary_backend(&self) -> bool {
        self.summarizer.has_backend()
    }

    /// 텍스트를 파싱하고 분류합니다 (동기, 블로킹 없음).
    pub fn process_text(&self, text: &str) -> ClassifiedBatch {
        let mut batch = ClassifiedBatch::default();
        let max_events = self.config.max_events;

        for raw in split_lines(text) {
            batch.stats.lines_total += 1;

            let line = self.normalizer.normalize(raw);
            if line.is_empty() {
                batch.stats.lines_blank += 1;
                continue;
            }

            let Some(event) = self.parser.parse_line(&line) else {
                batch.stats.lines_unparsed += 1;
                debug!(parser = self.parser.format_name(), line = %line, "line does not match log grammar");
                continue;
            };

            batch.stats.events_parsed += 1;
            if batch.events.len() >= max_events {
                batch.stats.events_dropped += 1;
                continue;
            }

            let category = classify(&event.message);
            let severity = assign_severity(event.level, category);
            metrics::counter!(
                m::EVENTS_CLASSIFIED_TOTAL,
                m::LABEL_CATEGORY => category.as_str(),
                m::LABEL_SEVERITY => severity.as_str()
            )
            .increment(1);

            let classified = ClassifiedEvent::new(event, category, severity);
            if classified.is_unknown_error() {
                batch.unknown_errors.push(classified.event.message.clone());
            }
            batch.events.push(classified);
        }

        batch.stats.truncated = batch.stats.events_dropped > 0;

        metrics::counter!(m::LINES_READ_TOTAL).increment(batch.stats.lines_total as u64);
        metrics::counter!(m::LINES_DISCARDED_TOTAL, m::LABEL_REASON => "blank")
            .increment(batch.stats.lines_blank as u64);
        metrics::counter!(m::LINES_DISCARDED_TOTAL, m::LABEL_REASON => "unparsed")
            .increment(batch.stats.lines_unparsed as u64);
        metrics::counter!(m::EVENTS_DROPPED_TOTAL).increment(batch.stats.events_dropped as u64);

        if batch.stats.truncated {
            debug!(
                max_events,
                dropped = batch.stats.events_dropped,
                "batch cap reached, remaining events dropped"
            );
        }

        batch
    }

    /// 원시 바이트로 전체 파이프라인을 실행합니다.
    pub async fn analyze_bytes(&self, bytes: &[u8]) -> AnalysisReport {
        let batch_id = Uuid::new_v4();
        let span = info_span!("batch", batch_id = %batch_id);
        self.run(batch_id, bytes).instrument(span).await
    }

    /// 파일을 읽어 전체 파이프라인을 실행합니다.
    ///
    /// 파일을 열거나 읽을 수 없는 경우만 에러입니다.
    pub async fn analyze_file(&self, path: impl AsRef<Path>) -> Result<AnalysisReport, AnalyzerError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AnalyzerError::Input {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        debug!(path = %path.display(), bytes = bytes.len(), "input file read");
        Ok(self.analyze_bytes(&bytes).await)
    }

    async fn run(&self, batch_id: Uuid, bytes: &[u8]) -> AnalysisReport {
        let text = decode_lossy_skip(bytes);
        let ClassifiedBatch {
            events,
            unknown_errors,
            stats,
        } = self.process_text(&text);

        let clusters = self.clusterer.cluster_blocking(unknown_errors).await;
        let summary = self.summarizer.summarize(&events).await;

        info!(
            events = events.len(),
            lines = stats.lines_total,
            unparsed = stats.lines_unparsed,
            dropped = stats.events_dropped,
            clusters = clusters.len(),
            summary_source = %summary.source,
            "batch analyzed"
        );

        AnalysisReport {
            batch_id,
            events,
            clusters,
            summary: summary.text,
            summary_source: summary.source,
            stats,
        }
    }
}

/// 분석기 빌더
pub struct AnalyzerBuilder<B: SummaryBackend = OpenAiBackend> {
    config: AnalyzerConfig,
    parser: Option<Box<dyn LogParser>>,
    backend: Option<B>,
}

impl AnalyzerBuilder<OpenAiBackend> {
    /// 새 빌더를 생성합니다. 기본 백엔드 타입은 [`OpenAiBackend`]이며 설정하지 않으면 폴백만 사용합니다.
    pub fn new() -> Self {
        Self {
            config: AnalyzerConfig::default(),
            parser: None,
            backend: None,
        }
    }
}

impl Default for AnalyzerBuilder<OpenAiBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: SummaryBackend> AnalyzerBuilder<B> {
    /// 분석기 설정을 지정합니다.
    pub fn config(mut self, config: AnalyzerConfig) -> Self {
        self.config = config;
        self
    }

    /// 기본 WildFly 파서 대신 사용할 파서를 지정합니다.
    pub fn parser(mut self, parser: Box<dyn LogParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    /// 요약 백엔드를 지정합니다. 백엔드 타입이 바뀝니다.
    pub fn summary_backend<C: SummaryBackend>(self, backend: C) -> AnalyzerBuilder<C> {
        AnalyzerBuilder {
            config: self.config,
            parser: self.parser,
            backend: Some(backend),
        }
    }

    /// 선택적 요약 백엔드를 지정합니다 (시작 시 해석된 결과를 그대로 전달).
    pub fn optional_backend(mut self, backend: Option<B>) -> Self {
        self.backend = backend;
        self
    }

    /// 분석기를 빌드합니다.
    pub fn build(self) -> Result<Analyzer<B>, AnalyzerError> {
        self.config.validate()?;

        let parser = match self.parser {
            Some(parser) => parser,
            None => Box::new(WildflyParser::new()?),
        };
        let summarizer = IncidentSummarizer::new(self.backend)
            .with_timeout(self.config.summary_timeout())
            .with_context_events(self.config.context_events);

        Ok(Analyzer {
            normalizer: LineNormalizer::new()?,
            parser,
            clusterer: UnknownErrorClusterer::new(self.config.cluster_config())?,
            summarizer,
            config: self.config,
        })
    }
}
