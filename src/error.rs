use thiserror::Error;

/// 라이브러리 공통 에러
///
/// 퍼사드 경계를 넘는 것은 `Configuration` 뿐이다. 나머지는 내부에서
/// 폴백 값으로 처리된다.
#[derive(Debug, Error)]
pub enum SageError {
    /// API 키가 없거나 플레이스홀더 값
    #[error("설정 오류: {0}")]
    Configuration(String),

    /// 네트워크 실패 또는 API가 보고한 에러
    #[error("전송 오류: {0}")]
    Transport(String),

    /// 응답에 유효한 JSON 블록이 없거나 스키마 검증 실패
    #[error("잘못된 응답: {0}")]
    MalformedResponse(String),
}

impl SageError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

impl From<reqwest::Error> for SageError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<minijinja::Error> for SageError {
    fn from(err: minijinja::Error) -> Self {
        Self::Transport(format!("프롬프트 렌더링 실패: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, SageError>;
