//! 심각도 할당
//!
//! `(LogLevel, Category)` 조합을 고정된 표에 따라 심각도로 매핑합니다.
//!
//! | 레벨 \ 카테고리 | DATABASE | TIMEOUT | API | MEMORY | UNKNOWN |
//! |---|---|---|---|---|---|
//! | ERROR | HIGH | HIGH | HIGH | HIGH | MEDIUM |
//! | WARN  | MEDIUM | MEDIUM | MEDIUM | MEDIUM | MEDIUM |
//! | INFO  | LOW | LOW | LOW | LOW | LOW |
//! | DEBUG | LOW | LOW | LOW | LOW | LOW |

use loglens_core::types::{Category, LogLevel, Severity};

/// 레벨과 카테고리로 심각도를 결정합니다.
pub fn assign_severity(level: LogLevel, category: Category) -> Severity {
    match (level, category) {
        (LogLevel::Error, Category::Unknown) => Severity::Medium,
        (
            LogLevel::Error,
            Category::Database | Category::Timeout | Category::Api | Category::Memory,
        ) => Severity::High,
        (LogLevel::Warn, _) => Severity::Medium,
        (LogLevel::Info | LogLevel::Debug, _) => Severity::Low,
    }
}
