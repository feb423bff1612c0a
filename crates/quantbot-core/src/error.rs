//! 핵심 도메인 에러 타입.
//!
//! 설정 검증과 도메인 값 파싱에서 발생하는 에러를 정의합니다.
//! 거래소 호출 에러는 `quantbot-exchange`의 `ExchangeError`가 담당합니다.

use thiserror::Error;

/// 핵심 도메인 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 도메인 불변 조건 위반
    #[error("불변 조건 위반: {0}")]
    InvariantViolation(String),
}

/// 핵심 도메인 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        CoreError::Config(err.to_string())
    }
}
