//! 주문 타입.
//!
//! - `Side` - 주문 방향 (매수/매도)
//! - `OrderType` - 주문 유형 (지정가/시장가)
//! - `Order` - 거래소에서 생성되거나 조회된 주문

use crate::error::{CoreError, CoreResult};
use crate::types::{Price, Quantity, Symbol};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 주문 방향 (매수 또는 매도).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// 매수
    Buy,
    /// 매도
    Sell,
}

impl Side {
    /// 거래소 요청 본문에 쓰이는 소문자 표기를 반환합니다.
    pub fn as_wire(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

impl FromStr for Side {
    type Err = CoreError;

    /// 거래소 응답의 `buy_market`/`sell_market`도 같은 방향으로 취급합니다.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" | "buy_market" => Ok(Side::Buy),
            "sell" | "sell_market" => Ok(Side::Sell),
            _ => Err(CoreError::InvalidInput(format!("Invalid side: {}", s))),
        }
    }
}

/// 주문 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// 지정가 주문
    Limit,
    /// 시장가 주문
    Market,
}

impl OrderType {
    /// 주문 가격으로부터 유형을 결정합니다. 가격 0은 시장가 주문입니다.
    pub fn for_price(price: Price) -> Self {
        if price.is_zero() {
            OrderType::Market
        } else {
            OrderType::Limit
        }
    }

    /// 거래소 요청 본문에 쓰이는 표기를 반환합니다.
    pub fn as_wire(&self) -> &'static str {
        match self {
            OrderType::Limit => "limit",
            OrderType::Market => "market",
        }
    }
}

/// 거래소에서 생성되거나 조회된 주문.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// 거래소 주문 ID
    pub id: String,
    /// 주문 가격 (생성 시점의 0은 시장가 주문)
    pub price: Price,
    /// 요청 수량
    pub amount: Quantity,
    /// 체결 수량
    pub filled_amount: Quantity,
    /// 주문 방향
    pub side: Side,
    /// 정규 심볼
    pub symbol: Symbol,
}

impl Order {
    /// 불변 조건(`0 <= filled_amount <= amount`, `price >= 0`)을 검증하며 주문을 생성합니다.
    pub fn new(
        id: impl Into<String>,
        price: Price,
        amount: Quantity,
        filled_amount: Quantity,
        side: Side,
        symbol: Symbol,
    ) -> CoreResult<Self> {
        let id = id.into();
        if price < Decimal::ZERO {
            return Err(CoreError::InvariantViolation(format!(
                "order {} has negative price {}",
                id, price
            )));
        }
        if filled_amount < Decimal::ZERO {
            return Err(CoreError::InvariantViolation(format!(
                "order {} has negative filled amount {}",
                id, filled_amount
            )));
        }
        if filled_amount > amount {
            return Err(CoreError::InvariantViolation(format!(
                "order {} filled {} exceeds amount {}",
                id, filled_amount, amount
            )));
        }

        Ok(Self {
            id,
            price,
            amount,
            filled_amount,
            side,
            symbol,
        })
    }

    /// 미체결 잔량을 반환합니다.
    pub fn remaining(&self) -> Quantity {
        (self.amount - self.filled_amount).max(Decimal::ZERO)
    }

    /// 전량 체결되었는지 확인합니다.
    pub fn is_filled(&self) -> bool {
        self.filled_amount >= self.amount
    }
}
