//! WildFly/JBoss 로그 라인 파서
//!
//! 정규화된 한 줄에서 타임스탬프, 레벨, 컴포넌트, 메시지를 추출합니다.
//!
//! # 라인 형식
//! ```text
//! 2024-01-01 10:00:00,123 ERROR [com.example.Service] (default task-1) Database connection timeout
//! ```
//!
//! 매칭은 앵커 없는 검색이므로 타임스탬프 앞의 텍스트는 허용됩니다.
//! 메시지는 컴포넌트의 닫는 `]` 이후 전부이며 앞쪽 공백도 그대로 보존됩니다.
//! 형식에 맞지 않는 라인(빌드 출력, 스택 트레이스 연속 라인 등)은 `None`입니다.
//!
//! # 사용 예시
//! ```ignore
//! use loglens_analyzer::parser::WildflyParser;
//! use loglens_core::pipeline::LogParser;
//!
//! let parser = WildflyParser::new()?;
//! let event = parser.parse_line("2024-01-01 10:00:00,1 INFO [app] started");
//! assert!(event.is_some());
//! ```

use loglens_core::pipeline::LogParser;
use loglens_core::types::{LogEvent, LogLevel};
use regex::Regex;

use crate::error::AnalyzerError;

/// 구조화 로그 문법
const WILDFLY_LINE_PATTERN: &str = r"(?P<timestamp>\d{4}-\d{2}-\d{2}\s+\d{2}:\d{2}:\d{2},\d+)\s+(?P<level>INFO|WARN|ERROR|DEBUG)\s+\[(?P<component>[^\]]+)\].*?(?P<message>.+)";

/// WildFly/JBoss 형식 파서
///
/// core의 [`LogParser`] trait을 구현합니다.
pub struct WildflyParser {
    pattern: Regex,
}

impl WildflyParser {
    /// 새 파서를 생성합니다.
    pub fn new() -> Result<Self, AnalyzerError> {
        Ok(Self {
            pattern: Regex::new(WILDFLY_LINE_PATTERN)?,
        })
    }
}

impl LogParser for WildflyParser {
    fn format_name(&self) -> &str {
        "wildfly"
    }

    fn parse_line(&self, line: &str) -> Option<LogEvent> {
        let caps = self.pattern.captures(line)?;
        let level = LogLevel::from_token(caps.name("level")?.as_str())?;

        Some(LogEvent {
            timestamp: caps.name("timestamp")?.as_str().to_owned(),
            level,
            component: caps.name("component")?.as_str().to_owned(),
            message: caps.name("message")?.as_str().to_owned(),
        })
    }
}
