//! 거래소 에러 타입.
//!
//! 모든 어댑터 작업은 성공 값 또는 아래 에러 중 정확히 하나를 반환합니다.
//! 호출자는 `kind()`로 종류를 구분해 재시도/중단/에스컬레이션을 결정합니다.

use thiserror::Error;

/// 거래소 관련 에러.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// 심볼 테이블에 없는 심볼 (네트워크 호출 없음)
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    /// 지원하지 않는 캔들 주기 (네트워크 호출 없음)
    #[error("Unknown period: {0}")]
    UnknownPeriod(String),

    /// 잘못된 호출 인자 (네트워크 호출 없음)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// 연결 실패, 타임아웃, 2xx 이외의 HTTP 상태
    #[error("Transport error{}: {message}", .status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// 응답 본문을 해석할 수 없음 (API 계약 변경 의심)
    #[error("Decode error: {0}")]
    Decode(String),

    /// 인증 실패 (서명, 타임스탬프, 키, 패스프레이즈)
    #[error("Unauthorized{}: {message}", .code.as_ref().map(|c| format!(" [{}]", c)).unwrap_or_default())]
    Unauthorized {
        code: Option<String>,
        message: String,
    },

    /// 거래소가 요청을 거부함 (잔고 부족, 알 수 없는 주문 ID 등)
    #[error("Venue rejected [{code}]: {message}")]
    VenueRejected { code: String, message: String },

    /// 응답에 필요한 데이터가 부족함 (예: 호가가 한쪽에 없음)
    #[error("Insufficient data: {0}")]
    InsufficientData(String),
}

/// 에러 종류 태그.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnknownSymbol,
    UnknownPeriod,
    InvalidArgument,
    Transport,
    Decode,
    Unauthorized,
    VenueRejected,
    InsufficientData,
}

impl ExchangeError {
    /// 에러 종류를 반환합니다.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExchangeError::UnknownSymbol(_) => ErrorKind::UnknownSymbol,
            ExchangeError::UnknownPeriod(_) => ErrorKind::UnknownPeriod,
            ExchangeError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            ExchangeError::Transport { .. } => ErrorKind::Transport,
            ExchangeError::Decode(_) => ErrorKind::Decode,
            ExchangeError::Unauthorized { .. } => ErrorKind::Unauthorized,
            ExchangeError::VenueRejected { .. } => ErrorKind::VenueRejected,
            ExchangeError::InsufficientData(_) => ErrorKind::InsufficientData,
        }
    }

    /// 재시도 가능한 에러인지 확인.
    ///
    /// 커넥터는 스스로 재시도하지 않습니다. 주문 제출처럼 중복 실행 위험이 있는
    /// 작업의 재시도 여부는 호출자가 결정합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExchangeError::Transport { .. })
    }

    /// 재시도해도 결과가 바뀌지 않는 에러인지 확인.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ExchangeError::UnknownSymbol(_)
                | ExchangeError::UnknownPeriod(_)
                | ExchangeError::InvalidArgument(_)
                | ExchangeError::Unauthorized { .. }
                | ExchangeError::VenueRejected { .. }
        )
    }

    /// API 계약 변경을 의심해야 하는 에러인지 확인.
    pub fn is_contract_drift(&self) -> bool {
        matches!(self, ExchangeError::Decode(_))
    }

    /// 네트워크 호출 전에 로컬 검증에서 발생한 에러인지 확인.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ExchangeError::UnknownSymbol(_)
                | ExchangeError::UnknownPeriod(_)
                | ExchangeError::InvalidArgument(_)
        )
    }
}

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("request timed out: {}", err)
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            err.to_string()
        };

        ExchangeError::Transport {
            status: err.status().map(|s| s.as_u16()),
            message,
        }
    }
}

impl From<serde_json::Error> for ExchangeError {
    fn from(err: serde_json::Error) -> Self {
        ExchangeError::Decode(err.to_string())
    }
}
