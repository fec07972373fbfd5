//! 에러 분류기
//!
//! 메시지를 소문자로 바꾼 뒤 순서가 고정된 키워드 규칙으로 카테고리를 결정합니다.
//! 먼저 일치한 규칙이 이깁니다. `"database connection timeout"`은 DATABASE입니다.

use loglens_core::types::Category;

/// 우선순위 순서의 키워드 규칙
const KEYWORD_RULES: &[(Category, &[&str])] = &[
    (Category::Database, &["database", "db"]),
    (Category::Timeout, &["timeout"]),
    (Category::Api, &["api"]),
    (Category::Memory, &["memory"]),
];

/// 메시지를 카테고리로 분류합니다.
///
/// 대소문자를 구분하지 않는 부분 문자열 검색입니다. 어느 규칙에도
/// 해당하지 않으면 [`Category::Unknown`]을 반환합니다.
pub fn classify(message: &str) -> Category {
    let lowered = message.to_lowercase();
    KEYWORD_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lowered.contains(kw)))
        .map_or(Category::Unknown, |(category, _)| *category)
}
