//! 도메인 타입: 시스템 전역에서 사용되는 공통 타입
//!
//! 파서, 분류기, 클러스터러, 요약기가 공유하는 데이터 구조를 정의합니다.
//! 열거형은 모두 대문자 토큰(`ERROR`, `DATABASE`, `HIGH` 등)으로 직렬화됩니다.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// 로그 레벨
///
/// WildFly/JBoss 로그에서 인식하는 네 가지 레벨입니다.
/// 원본 라인에서는 대문자 토큰으로만 인식됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// 정보성 메시지
    Info,
    /// 경고
    Warn,
    /// 에러
    Error,
    /// 디버그 출력
    Debug,
}

impl LogLevel {
    /// 모든 레벨 (선언 순서)
    pub const ALL: [LogLevel; 4] = [Self::Info, Self::Warn, Self::Error, Self::Debug];

    /// 대문자 토큰에서 레벨을 파싱합니다.
    ///
    /// 대소문자를 구분합니다. `"error"`나 `"WARNING"`은 `None`입니다.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "INFO" => Some(Self::Info),
            "WARN" => Some(Self::Warn),
            "ERROR" => Some(Self::Error),
            "DEBUG" => Some(Self::Debug),
            _ => None,
        }
    }

    /// 대문자 토큰 문자열을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 진단 카테고리
///
/// 분류기가 메시지에 부여하는 고정 분류 체계입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    /// 데이터베이스 관련
    Database,
    /// 타임아웃
    Timeout,
    /// 외부/내부 API 호출
    Api,
    /// 메모리 부족 등
    Memory,
    /// 어느 규칙에도 해당하지 않음
    Unknown,
}

impl Category {
    /// 모든 카테고리 (분류 우선순위 순서, `Unknown`은 마지막)
    pub const ALL: [Category; 5] = [
        Self::Database,
        Self::Timeout,
        Self::Api,
        Self::Memory,
        Self::Unknown,
    ];

    /// 대문자 토큰 문자열을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Database => "DATABASE",
            Self::Timeout => "TIMEOUT",
            Self::Api => "API",
            Self::Memory => "MEMORY",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 심각도 등급
///
/// `Ord` 구현으로 비교가 가능합니다 (`Low < Medium < High`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// 낮음
    Low,
    /// 중간
    Medium,
    /// 높음: 우선 조사 대상
    High,
}

impl Severity {
    /// 모든 등급 (낮은 순)
    pub const ALL: [Severity; 3] = [Self::Low, Self::Medium, Self::High];

    /// 대문자 토큰 문자열을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 파싱된 로그 이벤트
///
/// 파서가 한 줄에서 추출한 구조화 레코드입니다.
/// `timestamp`는 원본 형식(`YYYY-MM-DD HH:MM:SS,mmm`) 그대로 보존하며
/// 시간 값으로 변환하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    /// 원본 타임스탬프 문자열
    pub timestamp: String,
    /// 로그 레벨
    pub level: LogLevel,
    /// 대괄호 안의 컴포넌트 (로거 이름 등)
    pub component: String,
    /// 컴포넌트 태그 이후의 나머지 텍스트
    pub message: String,
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}]{}",
            self.timestamp, self.level, self.component, self.message,
        )
    }
}

/// 분류된 로그 이벤트
///
/// [`LogEvent`]에 카테고리와 심각도를 덧붙인 레코드입니다.
/// 직렬화 시 필드가 평탄화되어
/// `timestamp, level, component, message, category, severity` 순서로 출력됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedEvent {
    /// 원본 이벤트
    #[serde(flatten)]
    pub event: LogEvent,
    /// 분류 카테고리
    pub category: Category,
    /// 심각도
    pub severity: Severity,
}

impl ClassifiedEvent {
    /// 이벤트에 분류 결과를 결합합니다.
    pub fn new(event: LogEvent, category: Category, severity: Severity) -> Self {
        Self {
            event,
            category,
            severity,
        }
    }

    /// 클러스터링 대상(UNKNOWN 카테고리의 ERROR 레벨)인지 확인합니다.
    pub fn is_unknown_error(&self) -> bool {
        self.category == Category::Unknown && self.event.level == LogLevel::Error
    }
}

impl fmt::Display for ClassifiedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}/{}] {}", self.severity, self.category, self.event)
    }
}

/// 클러스터 맵: 클러스터 인덱스에서 소속 메시지 목록으로의 매핑
///
/// 인덱스는 한 번의 클러스터링 호출 안에서만 의미를 가집니다.
/// JSON으로 직렬화하면 키가 문자열(`"0"`, `"1"`)이 됩니다.
pub type ClusterMap = BTreeMap<usize, Vec<String>>;
