//! 시장 데이터 타입 및 구조체.
//!
//! - `OrderBookLevel` - 호가창 가격 레벨
//! - `Ticker` - 호가창 기반 최우선 호가 스냅샷
//! - `Record` - OHLCV 캔들스틱 데이터

use crate::types::{Price, Quantity};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 호가창 가격 레벨.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookLevel {
    /// 가격
    pub price: Price,
    /// 수량
    pub amount: Quantity,
}

/// 호가창 스냅샷과 최우선 호가.
///
/// 매수/매도 호가가 각각 최소 한 레벨 이상 있을 때만 생성됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    /// 매수 호가 (인덱스 0이 최우선)
    pub bids: Vec<OrderBookLevel>,
    /// 매도 호가 (인덱스 0이 최우선)
    pub asks: Vec<OrderBookLevel>,
    /// 최우선 매수 호가
    pub buy: Price,
    /// 최우선 매도 호가
    pub sell: Price,
    /// 중간 가격
    pub mid: Price,
}

impl Ticker {
    /// 정렬된 호가 레벨로부터 시세를 생성합니다.
    ///
    /// 어느 한쪽이라도 비어 있으면 `None`을 반환합니다.
    pub fn from_levels(bids: Vec<OrderBookLevel>, asks: Vec<OrderBookLevel>) -> Option<Self> {
        let buy = bids.first()?.price;
        let sell = asks.first()?.price;
        Some(Self {
            bids,
            asks,
            buy,
            sell,
            mid: (buy + sell) / Decimal::from(2),
        })
    }

    /// 매수/매도 스프레드를 반환합니다.
    pub fn spread(&self) -> Decimal {
        self.sell - self.buy
    }
}

/// OHLCV 캔들 하나.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// 캔들 시작 시각 (거래소 시계 기준 epoch 밀리초)
    pub time: i64,
    /// 시가
    pub open: Price,
    /// 고가
    pub high: Price,
    /// 저가
    pub low: Price,
    /// 종가
    pub close: Price,
    /// 거래량
    pub volume: Quantity,
}

impl Record {
    /// 캔들 시작 시각을 UTC 시각으로 반환합니다.
    pub fn open_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.time)
    }
}

/// 주기별 캔들 이력 (시간 오름차순).
pub type RecordSeries = Vec<Record>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn level(price: Decimal, amount: Decimal) -> OrderBookLevel {
        OrderBookLevel { price, amount }
    }

    #[test]
    fn test_ticker_from_levels() {
        let ticker = Ticker::from_levels(
            vec![level(dec!(100), dec!(1)), level(dec!(99), dec!(2))],
            vec![level(dec!(101), dec!(1)), level(dec!(102), dec!(3))],
        )
        .unwrap();

        assert_eq!(ticker.buy, dec!(100));
        assert_eq!(ticker.sell, dec!(101));
        assert_eq!(ticker.mid, dec!(100.5));
        assert_eq!(ticker.spread(), dec!(1));
    }

    #[test]
    fn test_ticker_requires_both_sides() {
        assert!(Ticker::from_levels(vec![], vec![level(dec!(101), dec!(1))]).is_none());
        assert!(Ticker::from_levels(vec![level(dec!(100), dec!(1))], vec![]).is_none());
    }

    #[test]
    fn test_record_open_time() {
        let record = Record {
            time: 1_552_993_200_000,
            open: dec!(1),
            high: dec!(2),
            low: dec!(0.5),
            close: dec!(1.5),
            volume: dec!(10),
        };
        let open_time = record.open_time().unwrap();
        assert_eq!(open_time.to_rfc3339(), "2019-03-19T11:00:00+00:00");
    }
}
