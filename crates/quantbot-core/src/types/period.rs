//! 캔들스틱 데이터를 위한 주기 정의.
//!
//! 트레이딩 엔진은 `M`, `M5`, `H`, `D` 같은 짧은 주기 코드로 캔들을 요청합니다.
//! 거래소별 표현(granularity 초 단위)은 커넥터가 변환합니다.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// 캔들스틱 주기.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Period {
    /// 1분봉
    M,
    /// 5분봉
    M5,
    /// 15분봉
    M15,
    /// 30분봉
    M30,
    /// 1시간봉
    H,
    /// 일봉
    D,
    /// 주봉
    W,
}

impl Period {
    /// 지원하는 모든 주기.
    pub const ALL: [Period; 7] = [
        Period::M,
        Period::M5,
        Period::M15,
        Period::M30,
        Period::H,
        Period::D,
        Period::W,
    ];

    /// 이 주기의 기간을 반환합니다.
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.as_secs())
    }

    /// 이 주기의 초 단위 값을 반환합니다.
    pub fn as_secs(&self) -> u64 {
        match self {
            Period::M => 60,
            Period::M5 => 5 * 60,
            Period::M15 => 15 * 60,
            Period::M30 => 30 * 60,
            Period::H => 60 * 60,
            Period::D => 24 * 60 * 60,
            Period::W => 7 * 24 * 60 * 60,
        }
    }

    /// 주기 코드 문자열을 반환합니다.
    pub fn code(&self) -> &'static str {
        match self {
            Period::M => "M",
            Period::M5 => "M5",
            Period::M15 => "M15",
            Period::M30 => "M30",
            Period::H => "H",
            Period::D => "D",
            Period::W => "W",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "M" | "1m" => Ok(Period::M),
            "M5" | "5m" => Ok(Period::M5),
            "M15" | "15m" => Ok(Period::M15),
            "M30" | "30m" => Ok(Period::M30),
            "H" | "1h" => Ok(Period::H),
            "D" | "1d" => Ok(Period::D),
            "W" | "1w" => Ok(Period::W),
            _ => Err(CoreError::InvalidInput(format!("Invalid period: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_duration() {
        assert_eq!(Period::M.as_secs(), 60);
        assert_eq!(Period::H.as_secs(), 3600);
        assert_eq!(Period::D.as_secs(), 86400);
        assert_eq!(Period::W.duration(), Duration::from_secs(604800));
    }

    #[test]
    fn test_period_parse() {
        assert_eq!("M15".parse::<Period>().unwrap(), Period::M15);
        assert_eq!("1h".parse::<Period>().unwrap(), Period::H);
        assert!("m".parse::<Period>().is_err());
        assert!("Y".parse::<Period>().is_err());
    }

    #[test]
    fn test_period_code_roundtrip() {
        for period in Period::ALL {
            assert_eq!(period.code().parse::<Period>().unwrap(), period);
        }
    }
}
