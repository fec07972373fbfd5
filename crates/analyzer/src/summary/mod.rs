//! 인시던트 요약
//!
//! 분류된 이벤트 전체로부터 사람이 읽을 수 있는 요약 텍스트를 만듭니다.
//!
//! - 요약 백엔드([`SummaryBackend`])가 구성되어 있으면 먼저 호출합니다.
//! - 백엔드가 없거나 실패/타임아웃이면 결정적 폴백 요약을 반환합니다.
//!
//! 호출자는 에러를 관찰하지 않습니다. 결과는 항상 비어 있지 않은 텍스트와
//! 그 출처([`SummarySource`])입니다.

mod fallback;
pub mod openai;

use std::fmt;
use std::future::Future;
use std::time::Duration;

use loglens_core::types::ClassifiedEvent;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use fallback::{SeverityCounts, fallback_summary};
pub use openai::OpenAiBackend;

/// 요약 백엔드 호출 실패
#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    /// 호출 시간 초과
    #[error("summary backend timed out after {0:?}")]
    Timeout(Duration),

    /// 인증 실패 (401/403)
    #[error("summary backend rejected credentials: HTTP {status}")]
    Auth {
        /// HTTP 상태 코드
        status: u16,
    },

    /// 전송 실패 또는 비정상 HTTP 상태
    #[error("summary backend request failed: {0}")]
    Http(String),

    /// 응답 본문을 해석할 수 없음
    #[error("malformed summary response: {0}")]
    MalformedResponse(String),

    /// 응답에 텍스트가 없음
    #[error("summary backend returned an empty response")]
    EmptyResponse,
}

/// 요약 백엔드 trait
///
/// 테스트에서는 항상 실패/성공/지연하는 가짜 구현으로 대체합니다.
pub trait SummaryBackend: Send + Sync + 'static {
    /// 백엔드 이름 (로그용)
    fn name(&self) -> &str;

    /// 이벤트 목록을 요약합니다.
    ///
    /// 전달되는 이벤트는 이미 컨텍스트 크기로 잘린 앞부분입니다.
    fn summarize(
        &self,
        events: &[ClassifiedEvent],
    ) -> impl Future<Output = Result<String, SummaryError>> + Send;
}

/// 요약 출처
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummarySource {
    /// 언어 모델 백엔드
    Llm,
    /// 결정적 폴백
    Fallback,
}

impl fmt::Display for SummarySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Llm => f.write_str("llm"),
            Self::Fallback => f.write_str("fallback"),
        }
    }
}

/// 요약 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentSummary {
    /// 요약 텍스트 (비어 있지 않음)
    pub text: String,
    /// 출처
    pub source: SummarySource,
}

/// 기본 백엔드 호출 타임아웃
pub const DEFAULT_SUMMARY_TIMEOUT: Duration = Duration::from_secs(30);

/// 백엔드에 전달하는 기본 이벤트 수
pub const DEFAULT_CONTEXT_EVENTS: usize = 50;

/// 인시던트 요약기
pub struct IncidentSummarizer<B: SummaryBackend> {
    backend: Option<B>,
    timeout: Duration,
    context_events: usize,
}

impl<B: SummaryBackend> IncidentSummarizer<B> {
    /// 새 요약기를 생성합니다. `backend`가 `None`이면 항상 폴백입니다.
    pub fn new(backend: Option<B>) -> Self {
        Self {
            backend,
            timeout: DEFAULT_SUMMARY_TIMEOUT,
            context_events: DEFAULT_CONTEXT_EVENTS,
        }
    }

    /// 백엔드 호출 타임아웃을 설정합니다.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 백엔드에 전달할 이벤트 수를 설정합니다 (최소 1).
    pub fn with_context_events(mut self, count: usize) -> Self {
        self.context_events = count.max(1);
        self
    }

    /// 백엔드가 구성되어 있는지 확인합니다.
    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// 이벤트 목록을 요약합니다.
    pub async fn summarize(&self, events: &[ClassifiedEvent]) -> IncidentSummary {
        let Some(backend) = &self.backend else {
            debug!("no summary backend configured, using fallback");
            metrics::counter!(
                loglens_core::metrics::SUMMARIES_TOTAL,
                loglens_core::metrics::LABEL_RESULT => "disabled"
            )
            .increment(1);
            return Self::fallback(events);
        };

        let context = &events[..events.len().min(self.context_events)];
        let outcome = match tokio::time::timeout(self.timeout, backend.summarize(context)).await {
            Ok(result) => result,
            Err(_) => Err(SummaryError::Timeout(self.timeout)),
        };

        match outcome {
            Ok(text) if !text.trim().is_empty() => {
                debug!(backend = backend.name(), "summary produced by backend");
                metrics::counter!(
                    loglens_core::metrics::SUMMARIES_TOTAL,
                    loglens_core::metrics::LABEL_RESULT => "llm"
                )
                .increment(1);
                IncidentSummary {
                    text,
                    source: SummarySource::Llm,
                }
            }
            Ok(_) => {
                warn!(
                    backend = backend.name(),
                    error = %SummaryError::EmptyResponse,
                    "summary backend failed, using fallback"
                );
                Self::record_fallback();
                Self::fallback(events)
            }
            Err(e) => {
                warn!(backend = backend.name(), error = %e, "summary backend failed, using fallback");
                Self::record_fallback();
                Self::fallback(events)
            }
        }
    }

    fn record_fallback() {
        metrics::counter!(
            loglens_core::metrics::SUMMARIES_TOTAL,
            loglens_core::metrics::LABEL_RESULT => "fallback"
        )
        .increment(1);
    }

    fn fallback(events: &[ClassifiedEvent]) -> IncidentSummary {
        IncidentSummary {
            text: fallback_summary(events),
            source: SummarySource::Fallback,
        }
    }
}
