//! 파이프라인 trait: 모듈 확장 포인트 정의

use crate::types::LogEvent;

/// 로그 라인 파서 trait
///
/// 새로운 로그 형식을 지원하려면 이 trait을 구현합니다.
/// 형식에 맞지 않는 라인은 에러가 아니라 `None`으로 버려집니다.
pub trait LogParser: Send + Sync {
    /// 지원하는 로그 형식 이름
    fn format_name(&self) -> &str;

    /// 정규화된 한 줄을 로그 이벤트로 파싱
    fn parse_line(&self, line: &str) -> Option<LogEvent>;
}
