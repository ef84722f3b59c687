pub mod types;
pub mod fallback;
mod review;

pub use types::*;

use std::sync::Arc;
use tracing::{debug, warn};

use crate::analyzer;
use crate::api::{GeminiClient, GenerateRequest, GenerativeTransport};
use crate::config::{usable_key, Config, ConfigFileStore, CredentialStore};
use crate::error::{Result, SageError};
use crate::prompts::{Intent, PromptBuilder};

/// 코드 리뷰 멘토 클라이언트
///
/// 모든 연산은 자격 증명을 먼저 확인하고, 미설정이면 네트워크 호출 없이
/// `SageError::Configuration` 을 돌려준다. 그 외 실패는 폴백 결과로 흡수한다.
pub struct CodeSage {
    transport: Arc<dyn GenerativeTransport>,
    credentials: Arc<dyn CredentialStore>,
    prompts: PromptBuilder,
}

impl CodeSage {
    pub fn new(
        transport: Arc<dyn GenerativeTransport>,
        credentials: Arc<dyn CredentialStore>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            credentials,
            prompts: PromptBuilder::new(language),
        }
    }

    /// 설정 파일 위치의 키와 설정된 endpoint 로 구성
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let transport = GeminiClient::new(config)?;
        let credentials = ConfigFileStore::default_location()?;

        Ok(Self::new(
            Arc::new(transport),
            Arc::new(credentials),
            config.model_preferences.language.clone(),
        ))
    }

    pub fn language(&self) -> &str {
        self.prompts.language()
    }

    pub fn set_api_key(&self, key: &str) -> Result<()> {
        self.credentials
            .set(key)
            .map_err(|e| SageError::Configuration(format!("API 키 저장 실패: {e:#}")))
    }

    pub async fn analyze(&self, code: &str) -> Result<AnalysisRecord> {
        let key = self.api_key()?;

        let raw = match self.request(&key, Intent::Review, self.prompts.review(code)).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "코드 분석 요청 실패, 휴리스틱 결과 사용");
                return Ok(analyzer::fallback_record(code));
            }
        };

        let mut record = analyzer::normalize(&raw);
        if record.fixed_code.is_empty() {
            record.fixed_code = code.to_string();
        }
        Ok(record)
    }

    pub async fn explain(&self, issue: &Issue) -> Result<String> {
        let key = self.api_key()?;

        match self.request(&key, Intent::Explain, self.prompts.explain(issue)).await {
            Ok(text) => Ok(text),
            Err(err) => {
                warn!(error = %err, issue_type = %issue.issue_type, "설명 요청 실패, 기본 설명 사용");
                Ok(fallback::beginner_explanation(&issue.issue_type).render())
            }
        }
    }

    pub async fn suggest_improvements(&self, code: &str, analysis: &AnalysisRecord) -> Result<String> {
        let key = self.api_key()?;

        match self.request(&key, Intent::Improve, self.prompts.improve(code, analysis)).await {
            Ok(text) => Ok(text),
            Err(err) => {
                warn!(error = %err, "개선 계획 요청 실패, 기본 학습 계획 사용");
                Ok(fallback::LEARNING_PLAN.to_string())
            }
        }
    }

    pub async fn generate_fixed_code(&self, code: &str, issues: &[Issue]) -> Result<String> {
        let key = self.api_key()?;
        let language = self.language();

        match self.request(&key, Intent::FixCode, self.prompts.fix_code(code, issues)).await {
            Ok(raw) => Ok(analyzer::extract_fixed_code(&raw, code, issues.len(), language)),
            Err(err) => {
                warn!(error = %err, "수정 코드 요청 실패, 기본 정리 사용");
                Ok(analyzer::basic_fix(code, issues.len(), language))
            }
        }
    }

    pub async fn synthesize_insights(&self, history: &[HistoryEntry]) -> Result<InsightsRecord> {
        let key = self.api_key()?;

        match self.request(&key, Intent::Insights, self.prompts.insights(history)).await {
            Ok(raw) => Ok(analyzer::normalize_insights(&raw, history)),
            Err(err) => {
                warn!(error = %err, reviews = history.len(), "인사이트 요청 실패, 이력 기반 폴백 사용");
                Ok(analyzer::fallback_insights(history))
            }
        }
    }

    pub async fn mentorship(&self, history: &[HistoryEntry]) -> Result<String> {
        let key = self.api_key()?;

        match self.request(&key, Intent::Mentorship, self.prompts.mentorship(history)).await {
            Ok(text) => Ok(text),
            Err(err) => {
                warn!(error = %err, "멘토링 요청 실패");
                Ok(fallback::MENTORSHIP_MESSAGE.to_string())
            }
        }
    }

    fn api_key(&self) -> Result<String> {
        usable_key(self.credentials.get()).ok_or_else(|| {
            SageError::Configuration(
                "Gemini API 키가 설정되지 않았습니다. `codesage config set-key <KEY>` 또는 GEMINI_API_KEY 를 설정하세요".to_string(),
            )
        })
    }

    async fn request(
        &self,
        key: &str,
        intent: Intent,
        request: Result<GenerateRequest>,
    ) -> Result<String> {
        let request = request?;
        debug!(intent = intent.name(), "요청 생성 완료");
        self.transport.generate(key, &request).await
    }
}
