//! 결정적 폴백 요약
//!
//! 네트워크 없이 심각도별 이벤트 수만으로 요약 텍스트를 만듭니다.

use std::fmt::Write as _;

use loglens_core::types::{ClassifiedEvent, Severity};

/// 심각도별 이벤트 수
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    /// 전체 이벤트 수
    pub total: usize,
    /// HIGH 이벤트 수
    pub high: usize,
    /// MEDIUM 이벤트 수
    pub medium: usize,
    /// LOW 이벤트 수
    pub low: usize,
}

impl SeverityCounts {
    /// 이벤트 목록에서 집계합니다.
    pub fn from_events(events: &[ClassifiedEvent]) -> Self {
        events.iter().fold(Self::default(), |mut acc, event| {
            acc.total += 1;
            match event.severity {
                Severity::High => acc.high += 1,
                Severity::Medium => acc.medium += 1,
                Severity::Low => acc.low += 1,
            }
            acc
        })
    }
}

/// 폴백 요약 텍스트를 생성합니다.
pub fn fallback_summary(events: &[ClassifiedEvent]) -> String {
    let counts = SeverityCounts::from_events(events);
    let mut text = String::with_capacity(512);
    text.push_str("LLM unavailable. Generated fallback incident summary.\n\n");
    text.push_str("Incident Overview:\n");
    // String에 대한 write!는 실패하지 않음
    let _ = writeln!(text, "- Total events: {}", counts.total);
    let _ = writeln!(text, "- High severity events: {}", counts.high);
    let _ = writeln!(text, "- Medium severity events: {}", counts.medium);
    let _ = writeln!(text, "- Low severity events: {}", counts.low);
    text.push('\n');
    text.push_str("Recommended Next Actions:\n");
    text.push_str("- Investigate high severity errors first\n");
    text.push_str("- Review recurring database, memory, or timeout issues\n");
    text.push_str("- Monitor system stability after remediation");
    text
}
