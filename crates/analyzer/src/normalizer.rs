//! 라인 정규화
//!
//! 터미널 색상 이스케이프(ANSI CSI 시퀀스)를 제거하고 앞뒤 공백을 잘라냅니다.
//! 시퀀스를 하나 제거했을 때 앞뒤 조각이 합쳐져 새 시퀀스가 생길 수 있으므로
//! 더 이상 일치하는 시퀀스가 없을 때까지 반복합니다.

use regex::Regex;

use crate::error::AnalyzerError;

/// ANSI CSI 시퀀스: ESC `[` 파라미터 바이트(0x30-0x3F)* 중간 바이트(0x20-0x2F)* 종료 바이트(0x40-0x7E)
const ANSI_CSI_PATTERN: &str = r"\x1B\[[0-?]*[ -/]*[@-~]";

/// 라인 정규화기
///
/// 상태가 없으며 컴파일된 정규식 하나만 보유합니다.
pub struct LineNormalizer {
    escape: Regex,
}

impl LineNormalizer {
    /// 새 정규화기를 생성합니다.
    pub fn new() -> Result<Self, AnalyzerError> {
        Ok(Self {
            escape: Regex::new(ANSI_CSI_PATTERN)?,
        })
    }

    /// 한 줄을 정규화합니다. 결과가 빈 문자열이면 호출자는 해당 라인을 건너뜁니다.
    pub fn normalize(&self, raw: &str) -> String {
        let mut current = raw.to_owned();
        while self.escape.is_match(&current) {
            current = self.escape.replace_all(&current, "").into_owned();
        }
        current.trim().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn normalizer() -> LineNormalizer {
        LineNormalizer::new().unwrap()
    }

    #[test]
    fn strips_color_codes() {
        let n = normalizer();
        let raw = "\x1b[0m\x1b[31m2024-01-01 10:00:00,123 ERROR [x] boom\x1b[0m";
        assert_eq!(n.normalize(raw), "2024-01-01 10:00:00,123 ERROR [x] boom");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let n = normalizer();
        assert_eq!(n.normalize("   hello world \t"), "hello world");
    }

    #[test]
    fn blank_and_escape_only_lines_become_empty() {
        let n = normalizer();
        assert_eq!(n.normalize(""), "");
        assert_eq!(n.normalize("   "), "");
        assert_eq!(n.normalize("\x1b[1;32m\x1b[0m"), "");
    }

    #[test]
    fn spliced_sequence_is_removed() {
        let n = normalizer();
        // 안쪽 시퀀스를 제거하면 바깥 조각이 `ESC[m`으로 합쳐짐
        let raw = "\x1b\x1b[0m[mtext";
        assert_eq!(n.normalize(raw), "text");
    }

    #[test]
    fn lone_escape_without_final_byte_is_kept() {
        let n = normalizer();
        assert_eq!(n.normalize("a\x1b[b"), "a");
        assert_eq!(n.normalize("a\x1bz"), "a\x1bz");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(raw in "(\\x1b|\\[|[0-9;]|m| |[a-z]){0,40}") {
            let n = normalizer();
            let once = n.normalize(&raw);
            prop_assert_eq!(n.normalize(&once), once.clone());
        }

        #[test]
        fn normalize_is_idempotent_for_any_string(raw in any::<String>()) {
            let n = normalizer();
            let once = n.normalize(&raw);
            prop_assert_eq!(n.normalize(&once), once.clone());
        }
    }
}
