//! 거래 페어 심볼 정의.
//!
//! 호출자가 사용하는 정규 심볼(예: `BTC/USDT`)을 나타냅니다.
//! 거래소별 표기(`btc_usdt` 등)로의 변환은 커넥터의 심볼 테이블이 담당합니다.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 거래소와 무관한 정규 트레이딩 심볼.
///
/// 기준 자산과 호가 자산은 항상 대문자로 정규화됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Symbol {
    /// 기준 자산 (예: BTC)
    pub base: String,
    /// 호가 자산 (예: USDT)
    pub quote: String,
}

impl Symbol {
    /// 새 심볼을 생성합니다.
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into().trim().to_uppercase(),
            quote: quote.into().trim().to_uppercase(),
        }
    }

    /// "BASE/QUOTE" 형식 문자열에서 심볼을 파싱합니다.
    pub fn parse(s: &str) -> Option<Self> {
        let (base, quote) = s.trim().split_once('/')?;
        if base.trim().is_empty() || quote.trim().is_empty() || quote.contains('/') {
            return None;
        }
        Some(Self::new(base, quote))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

impl FromStr for Symbol {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CoreError::InvalidInput(format!("Invalid symbol: {}", s)))
    }
}
