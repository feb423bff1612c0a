//! 거래소 프로필.
//!
//! OKEX v3와 Xnodes는 같은 REST 구조를 공유하고 심볼 테이블, 호스트, 에러 필드 이름 같은
//! 세부 사항만 다릅니다. 하나의 제네릭 어댑터가 `VenueProfile`로 매개변수화됩니다.

use crate::error::ExchangeError;
use crate::signer::AuthHeaderNames;
use crate::symbol_table::SymbolTable;
use quantbot_core::Period;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// 지원 거래소 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VenueKind {
    OkexV3,
    Xnodes,
}

impl VenueKind {
    /// 설정 파일에서 사용하는 식별자.
    pub fn as_str(&self) -> &'static str {
        match self {
            VenueKind::OkexV3 => "OKEX-v3",
            VenueKind::Xnodes => "Xnodes",
        }
    }

    /// 이 거래소의 기본 프로필.
    pub fn profile(&self) -> VenueProfile {
        match self {
            VenueKind::OkexV3 => VenueProfile::okex_v3(),
            VenueKind::Xnodes => VenueProfile::xnodes(),
        }
    }
}

impl fmt::Display for VenueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VenueKind {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "okex-v3" | "okex_v3" | "okexv3" => Ok(VenueKind::OkexV3),
            "xnodes" => Ok(VenueKind::Xnodes),
            other => Err(ExchangeError::InvalidArgument(format!(
                "unsupported venue: {}",
                other
            ))),
        }
    }
}

/// 호가창 매도 측 wire 정렬 순서.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskOrder {
    /// 가격 오름차순 (최우선 매도호가가 첫 번째)
    Ascending,
    /// 가격 내림차순 (최우선 매도호가가 마지막, 파싱 시 뒤집음). 기본 프로필의 값입니다.
    Descending,
}

/// 거래소별 매개변수.
#[derive(Debug, Clone)]
pub struct VenueProfile {
    pub kind: VenueKind,
    pub symbols: SymbolTable,
    /// 기본 호스트 (스킴 포함, 끝 슬래시 없음)
    pub host: &'static str,
    /// 버전 경로 접두사
    pub path_prefix: &'static str,
    pub auth_headers: AuthHeaderNames,
    /// 거래소 에러 코드 필드 이름
    pub error_code_field: &'static str,
    /// 거래소 에러 메시지 필드 이름
    pub error_message_field: &'static str,
    /// 인증 실패로 분류할 에러 코드 범위
    pub auth_error_codes: Option<RangeInclusive<i64>>,
    /// 지원 캔들 주기
    pub periods: Vec<Period>,
    pub ask_order: AskOrder,
    /// 시장가 주문에도 price 필드를 전송할지 여부
    pub send_price_for_market: bool,
}

impl VenueProfile {
    /// OKEX v3 현물 API.
    pub fn okex_v3() -> Self {
        let symbols = SymbolTable::new()
            .with("BTC", "USDT", dec!(0.001))
            .with("ETH", "USDT", dec!(0.001))
            .with("EOS", "USDT", dec!(0.001))
            .with("ONT", "USDT", dec!(0.001))
            .with("QTUM", "USDT", dec!(0.001))
            .with("ONT", "ETH", dec!(0.001))
            .with("GST", "ETH", dec!(100))
            .with("GST", "BTC", Decimal::ZERO)
            .with("GST", "USDT", dec!(100));

        Self {
            kind: VenueKind::OkexV3,
            symbols,
            host: "https://www.okex.com",
            path_prefix: "/api/spot/v3",
            auth_headers: AuthHeaderNames::OK_ACCESS,
            error_code_field: "error_code",
            error_message_field: "error_message",
            auth_error_codes: Some(30001..=30015),
            periods: Period::ALL.to_vec(),
            ask_order: AskOrder::Descending,
            send_price_for_market: false,
        }
    }

    /// Xnodes 현물 API (OKEX v3 호환).
    pub fn xnodes() -> Self {
        let symbols = SymbolTable::new()
            .with("BTC", "USDT", dec!(0.001))
            .with("ETH", "USDT", dec!(0.001))
            .with("EOS", "USDT", dec!(0.001))
            .with("GST", "ETH", dec!(100))
            .with("GST", "BTC", dec!(100))
            .with("GST", "USDT", dec!(100));

        Self {
            kind: VenueKind::Xnodes,
            symbols,
            host: "https://www.xnodes.pro",
            path_prefix: "/api/spot/v3",
            auth_headers: AuthHeaderNames::OK_ACCESS,
            error_code_field: "code",
            error_message_field: "message",
            auth_error_codes: None,
            periods: Period::ALL.to_vec(),
            ask_order: AskOrder::Descending,
            send_price_for_market: true,
        }
    }

    /// 호가창 매도 측 정렬 순서 변경.
    pub fn with_ask_order(mut self, ask_order: AskOrder) -> Self {
        self.ask_order = ask_order;
        self
    }

    /// 주기 문자열을 granularity(초)로 변환합니다.
    pub fn granularity(&self, period: &str) -> Result<(Period, u64), ExchangeError> {
        let parsed = Period::from_str(period)
            .map_err(|_| ExchangeError::UnknownPeriod(period.to_string()))?;

        if !self.periods.contains(&parsed) {
            return Err(ExchangeError::UnknownPeriod(period.to_string()));
        }

        Ok((parsed, parsed.as_secs()))
    }

    /// 에러 코드가 인증 실패인지 확인.
    pub fn is_auth_code(&self, code: &str) -> bool {
        match (&self.auth_error_codes, code.trim().parse::<i64>()) {
            (Some(range), Ok(code)) => range.contains(&code),
            _ => false,
        }
    }

    /// 접두사를 포함한 요청 경로.
    pub fn path(&self, endpoint: &str) -> String {
        format!("{}{}", self.path_prefix, endpoint)
    }
}
