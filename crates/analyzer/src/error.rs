//! 분석기 에러 타입
//!
//! [`AnalyzerError`]는 분석기 구성과 입력 읽기에서 발생하는 에러를 표현합니다.
//! 라인 파싱 실패, 클러스터링 실패, 요약 실패는 에러로 전파되지 않고
//! 각 단계 안에서 복구되므로 여기에 포함되지 않습니다.
//! `From<AnalyzerError> for LoglensError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use loglens_core::error::{ConfigError, LoglensError};

/// 분석기 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    /// 입력 파일을 열거나 읽을 수 없음 (호출자에게 보이는 유일한 분석 실패)
    #[error("input error: {path}: {reason}")]
    Input {
        /// 입력 파일 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 요약 백엔드 구성 실패 (HTTP 클라이언트 생성 등)
    #[error("summary backend error: {0}")]
    Backend(String),

    /// 정규식 컴파일 에러
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl From<AnalyzerError> for LoglensError {
    fn from(err: AnalyzerError) -> Self {
        match err {
            AnalyzerError::Config { field, reason } => {
                LoglensError::Config(ConfigError::InvalidValue { field, reason })
            }
            other => LoglensError::Analysis(other.to_string()),
        }
    }
}
