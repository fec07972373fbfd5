//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()`, `metrics::histogram!()`
//! 매크로를 호출합니다. 전역 레코더가 설치되지 않았으면 기록은 no-op입니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `loglens_`
//! - 접미어: `_total` (counter), `_seconds` (histogram)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(loglens_core::metrics::LINES_READ_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 심각도 레이블 키 (LOW, MEDIUM, HIGH)
pub const LABEL_SEVERITY: &str = "severity";

/// 카테고리 레이블 키 (DATABASE, TIMEOUT, API, MEMORY, UNKNOWN)
pub const LABEL_CATEGORY: &str = "category";

/// 라인 폐기 사유 레이블 키 (blank, unparsed)
pub const LABEL_REASON: &str = "reason";

/// 결과 레이블 키 (llm, fallback, disabled)
pub const LABEL_RESULT: &str = "result";

// ─── 분석 메트릭 ────────────────────────────────────────────────────

/// 읽은 원시 라인 수 (counter)
pub const LINES_READ_TOTAL: &str = "loglens_lines_read_total";

/// 폐기된 라인 수 (counter, label: reason)
pub const LINES_DISCARDED_TOTAL: &str = "loglens_lines_discarded_total";

/// 분류된 이벤트 수 (counter, labels: category, severity)
pub const EVENTS_CLASSIFIED_TOTAL: &str = "loglens_events_classified_total";

/// 배치 상한 초과로 버려진 이벤트 수 (counter)
pub const EVENTS_DROPPED_TOTAL: &str = "loglens_events_dropped_total";

/// 클러스터링 소요 시간 (histogram, 초)
pub const CLUSTERING_DURATION_SECONDS: &str = "loglens_clustering_duration_seconds";

/// 요약 생성 결과 수 (counter, label: result)
pub const SUMMARIES_TOTAL: &str = "loglens_summaries_total";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출해야 합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(LINES_READ_TOTAL, "Total number of raw lines read from input");
    describe_counter!(
        LINES_DISCARDED_TOTAL,
        "Lines discarded before classification (blank or not matching the log grammar)"
    );
    describe_counter!(
        EVENTS_CLASSIFIED_TOTAL,
        "Events classified, by category and severity"
    );
    describe_counter!(
        EVENTS_DROPPED_TOTAL,
        "Parsed events dropped because the batch cap was reached"
    );
    describe_histogram!(
        CLUSTERING_DURATION_SECONDS,
        "Time spent vectorizing and clustering unknown errors"
    );
    describe_counter!(SUMMARIES_TOTAL, "Incident summaries produced, by source");
}
