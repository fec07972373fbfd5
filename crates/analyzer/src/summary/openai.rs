//! OpenAI 호환 채팅 완성 백엔드
//!
//! `{endpoint}/v1/chat/completions`에 Bearer 인증으로 요청을 보내고
//! `choices[0].message.content`를 요약 텍스트로 사용합니다.
//! 자격 증명은 시작 시 한 번 해석되어 생성자로 전달됩니다.

use std::time::Duration;

use loglens_core::config::SummaryConfig;
use loglens_core::types::ClassifiedEvent;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{SummaryBackend, SummaryError};
use crate::error::AnalyzerError;

/// 시스템 프롬프트
const SYSTEM_PROMPT: &str = "You are an SRE assistant summarizing incidents from logs.";

/// 채팅 완성 요청
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// 채팅 완성 응답 (필요한 필드만)
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// 이벤트를 `[LEVEL] message` 줄 목록으로 만든 사용자 프롬프트
fn build_user_prompt(events: &[ClassifiedEvent]) -> String {
    let context = events
        .iter()
        .map(|e| format!("[{}] {}", e.event.level, e.event.message))
        .collect::<Vec<_>>()
        .join("\n");
    format!("Summarize the following logs:\n{context}")
}

/// OpenAI 호환 요약 백엔드
pub struct OpenAiBackend {
    http_client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    timeout: Duration,
}

impl OpenAiBackend {
    /// 새 백엔드를 생성합니다.
    ///
    /// `timeout`은 HTTP 클라이언트 수준 타임아웃입니다.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AnalyzerError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AnalyzerError::Backend(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into().trim_end_matches('/').to_owned(),
            model: model.into(),
            api_key: api_key.into(),
            timeout,
        })
    }

    /// 전송 오류를 요약 오류로 변환합니다. 클라이언트 타임아웃은 `Timeout`입니다.
    fn transport_error(&self, e: reqwest::Error) -> SummaryError {
        if e.is_timeout() {
            SummaryError::Timeout(self.timeout)
        } else {
            SummaryError::Http(e.to_string())
        }
    }

    /// 설정과 해석된 자격 증명으로 백엔드를 생성합니다.
    ///
    /// 요약이 비활성화되어 있거나 자격 증명이 없으면 `Ok(None)`입니다.
    pub fn from_config(config: &SummaryConfig) -> Result<Option<Self>, AnalyzerError> {
        let Some(api_key) = config.resolve_api_key() else {
            debug!(
                enabled = config.enabled,
                env = %config.api_key_env,
                "summary backend not configured"
            );
            return Ok(None);
        };
        Self::new(
            config.endpoint.as_str(),
            config.model.as_str(),
            api_key,
            Duration::from_secs(config.timeout_secs),
        )
        .map(Some)
    }

    /// 요청 URL
    pub fn url(&self) -> String {
        format!("{}/v1/chat/completions", self.endpoint)
    }

    /// 모델 이름
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl SummaryBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    async fn summarize(&self, events: &[ClassifiedEvent]) -> Result<String, SummaryError> {
        let user_prompt = build_user_prompt(events);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
        };

        let response = self
            .http_client
            .post(self.url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(SummaryError::Auth {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(SummaryError::Http(format!("unexpected status {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;
        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| SummaryError::MalformedResponse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_owned())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(SummaryError::EmptyResponse);
        }
        debug!(model = %self.model, chars = content.len(), "summary received");
        Ok(content)
    }
}
