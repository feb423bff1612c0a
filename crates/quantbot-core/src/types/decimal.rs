//! 정밀한 금융 계산을 위한 Decimal 유틸리티.

use rust_decimal::Decimal;
use std::str::FromStr;

/// 금융 정밀도를 위한 가격 타입.
pub type Price = Decimal;

/// 주문 수량을 위한 타입.
pub type Quantity = Decimal;

/// 거래소가 보내는 숫자 문자열을 Decimal로 파싱합니다.
///
/// 일반 표기(`"0.001"`)와 지수 표기(`"1.0E-3"`)를 모두 허용하며,
/// 빈 문자열은 0으로 취급합니다 (시장가 주문의 가격 필드 등).
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return Some(Decimal::ZERO);
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_decimal_plain() {
        assert_eq!(parse_decimal("0.001"), Some(dec!(0.001)));
        assert_eq!(parse_decimal(" 100 "), Some(dec!(100)));
    }

    #[test]
    fn test_parse_decimal_scientific() {
        assert_eq!(parse_decimal("1e-3"), Some(dec!(0.001)));
        assert_eq!(parse_decimal("2.5E2"), Some(dec!(250)));
    }

    #[test]
    fn test_parse_decimal_empty_and_garbage() {
        assert_eq!(parse_decimal(""), Some(Decimal::ZERO));
        assert_eq!(parse_decimal("abc"), None);
    }
}
