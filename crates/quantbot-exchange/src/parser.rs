//! 거래소 응답 해석.
//!
//! 모든 응답은 다음 중 정확히 하나로 분류됩니다.
//! - 전송 실패: 2xx가 아닌 상태 (본문 해석 불가)
//! - 인증 실패: 401/403 또는 거래소 인증 에러 코드
//! - 거래소 거부: 올바른 JSON이지만 결과 플래그/에러 코드가 실패를 나타냄
//! - 디코딩 실패: 2xx지만 JSON이 아니거나 필수 필드가 없음
//!
//! 숫자 필드는 JSON 숫자와 숫자 문자열(지수 표기 포함)을 모두 허용합니다.

use crate::error::ExchangeError;
use crate::traits::ExchangeResult;
use crate::transport::HttpResponse;
use crate::venue::{AskOrder, VenueProfile};
use chrono::DateTime;
use quantbot_core::{
    parse_decimal, AccountBalances, Balance, Order, OrderBookLevel, Record, Side, Symbol, Ticker,
};
use rust_decimal::Decimal;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

// ============================================================================
// 응답 분류
// ============================================================================

/// 응답을 분류하고, 성공이면 JSON 값을 반환합니다.
pub fn classify(profile: &VenueProfile, response: &HttpResponse) -> ExchangeResult<Value> {
    let status = response.status;

    if !response.is_success() {
        let venue_error = serde_json::from_str::<Value>(&response.body)
            .ok()
            .and_then(|v| venue_error(profile, &v));

        let err = match (status, venue_error) {
            (401 | 403, Some((code, message))) => ExchangeError::Unauthorized {
                code: Some(code),
                message,
            },
            (401 | 403, None) => ExchangeError::Unauthorized {
                code: None,
                message: snippet(&response.body),
            },
            (500..=599, _) | (_, None) => ExchangeError::Transport {
                status: Some(status),
                message: snippet(&response.body),
            },
            (_, Some((code, message))) => rejection(profile, code, message),
        };

        warn!(venue = %profile.kind, status, error = %err, "request failed");
        return Err(err);
    }

    let value: Value = serde_json::from_str(&response.body).map_err(|e| {
        warn!(venue = %profile.kind, error = %e, body = %snippet(&response.body), "invalid JSON response");
        ExchangeError::Decode(format!("invalid JSON: {}", e))
    })?;

    if let Some((code, message)) = logical_failure(profile, &value) {
        let err = rejection(profile, code, message);
        warn!(venue = %profile.kind, error = %err, "venue rejected request");
        return Err(err);
    }

    Ok(value)
}

/// 2xx 응답 본문에서 거래소 논리적 실패를 찾습니다.
fn logical_failure(profile: &VenueProfile, value: &Value) -> Option<(String, String)> {
    let object = value.as_object()?;

    match object.get("result").and_then(Value::as_bool) {
        Some(true) => None,
        Some(false) => {
            let (code, message) = venue_error(profile, value)
                .unwrap_or_else(|| ("unknown".to_string(), "result: false".to_string()));
            Some((code, message))
        }
        None => venue_error(profile, value),
    }
}

/// 에러 코드 필드가 있고 0이 아닌 경우 (코드, 메시지)를 반환합니다.
///
/// 프로필의 코드 필드가 없거나 비어 있으면 HTTP 에러 본문에 쓰이는 `code`를 봅니다.
fn venue_error(profile: &VenueProfile, value: &Value) -> Option<(String, String)> {
    let code = error_code_at(value, profile.error_code_field)
        .or_else(|| error_code_at(value, "code"))?;

    let message = value
        .get(profile.error_message_field)
        .or_else(|| value.get("message"))
        .or_else(|| value.get("msg"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Some((code, message))
}

fn error_code_at(value: &Value, field: &str) -> Option<String> {
    let code = match value.get(field)? {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };

    if code.is_empty() || code == "0" {
        None
    } else {
        Some(code)
    }
}

fn rejection(profile: &VenueProfile, code: String, message: String) -> ExchangeError {
    if profile.is_auth_code(&code) {
        ExchangeError::Unauthorized {
            code: Some(code),
            message,
        }
    } else {
        ExchangeError::VenueRejected { code, message }
    }
}

fn snippet(body: &str) -> String {
    const MAX: usize = 256;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

// ============================================================================
// 유연한 필드 디코딩
// ============================================================================

/// JSON 숫자 또는 숫자 문자열을 Decimal로 변환합니다.
///
/// `null`과 빈 문자열은 값이 없는 것으로 보고 `None`을 반환합니다.
pub fn value_to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) if !s.trim().is_empty() => parse_decimal(s),
        _ => None,
    }
}

fn de_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_to_decimal(&value)
        .ok_or_else(|| de::Error::custom(format!("expected decimal, got {}", value)))
}

fn de_opt_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(None),
        Value::String(ref s) if s.trim().is_empty() => Ok(None),
        _ => value_to_decimal(&value)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("expected decimal, got {}", value))),
    }
}

fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!("expected order id, got {}", other))),
    }
}

fn decode<T: for<'de> Deserialize<'de>>(value: Value, what: &str) -> ExchangeResult<T> {
    serde_json::from_value(value).map_err(|e| {
        warn!(error = %e, "failed to decode {}", what);
        ExchangeError::Decode(format!("{}: {}", what, e))
    })
}

// ============================================================================
// Wire 타입
// ============================================================================

#[derive(Debug, Deserialize)]
struct WireBalance {
    currency: String,
    #[serde(deserialize_with = "de_decimal")]
    available: Decimal,
    #[serde(default, deserialize_with = "de_decimal")]
    hold: Decimal,
}

#[derive(Debug, Deserialize)]
struct WireOrderId {
    #[serde(deserialize_with = "de_id")]
    order_id: String,
}

#[derive(Debug, Deserialize)]
struct WireOrder {
    #[serde(deserialize_with = "de_id")]
    order_id: String,
    #[serde(default, deserialize_with = "de_opt_decimal")]
    price: Option<Decimal>,
    #[serde(default, deserialize_with = "de_opt_decimal")]
    size: Option<Decimal>,
    #[serde(default, deserialize_with = "de_opt_decimal")]
    filled_size: Option<Decimal>,
    side: String,
}

#[derive(Debug, Deserialize)]
struct WireBook {
    #[serde(default)]
    bids: Vec<Vec<Value>>,
    #[serde(default)]
    asks: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct WireCandle {
    time: Value,
    #[serde(deserialize_with = "de_decimal")]
    open: Decimal,
    #[serde(deserialize_with = "de_decimal")]
    high: Decimal,
    #[serde(deserialize_with = "de_decimal")]
    low: Decimal,
    #[serde(deserialize_with = "de_decimal")]
    close: Decimal,
    #[serde(default, deserialize_with = "de_decimal")]
    volume: Decimal,
}

// ============================================================================
// 도메인 변환
// ============================================================================

/// 계좌 잔고 목록 (`[{currency, available, hold}]`).
pub fn parse_account(value: Value) -> ExchangeResult<AccountBalances> {
    let balances: Vec<WireBalance> = decode(value, "account balances")?;

    Ok(balances
        .into_iter()
        .map(|b| {
            (
                b.currency.trim().to_uppercase(),
                Balance {
                    available: b.available,
                    held: b.hold,
                },
            )
        })
        .collect())
}

/// 주문 생성 응답에서 주문 ID를 꺼냅니다.
pub fn parse_order_id(value: Value) -> ExchangeResult<String> {
    let wire: WireOrderId = decode(value, "order id")?;
    Ok(wire.order_id)
}

/// 단일 주문.
pub fn parse_order(value: Value, symbol: &Symbol) -> ExchangeResult<Order> {
    let wire: WireOrder = decode(value, "order")?;
    order_from_wire(wire, symbol)
}

/// 주문 목록.
pub fn parse_orders(value: Value, symbol: &Symbol) -> ExchangeResult<Vec<Order>> {
    let wires: Vec<WireOrder> = decode(value, "orders")?;
    wires
        .into_iter()
        .map(|wire| order_from_wire(wire, symbol))
        .collect()
}

fn order_from_wire(wire: WireOrder, symbol: &Symbol) -> ExchangeResult<Order> {
    let side: Side = wire
        .side
        .parse()
        .map_err(|_| ExchangeError::Decode(format!("unknown order side: {}", wire.side)))?;

    // 시장가 주문은 price가, 금액 기준 시장가 주문은 size가 비어 있습니다.
    let filled = wire.filled_size.unwrap_or(Decimal::ZERO);
    let amount = wire.size.unwrap_or(filled);

    Order::new(
        wire.order_id,
        wire.price.unwrap_or(Decimal::ZERO),
        amount,
        filled,
        side,
        symbol.clone(),
    )
    .map_err(|e| ExchangeError::Decode(e.to_string()))
}

/// 호가창 응답을 `Ticker`로 변환합니다.
///
/// 매수/매도 어느 한쪽이라도 비어 있으면 `InsufficientData`를 반환합니다.
pub fn parse_book(value: Value, ask_order: AskOrder) -> ExchangeResult<Ticker> {
    let book: WireBook = decode(value, "order book")?;

    let bids = parse_levels(book.bids)?;
    let mut asks = parse_levels(book.asks)?;
    if ask_order == AskOrder::Descending {
        asks.reverse();
    }

    let (bid_count, ask_count) = (bids.len(), asks.len());
    Ticker::from_levels(bids, asks).ok_or_else(|| {
        ExchangeError::InsufficientData(format!(
            "order book has {} bid and {} ask levels",
            bid_count, ask_count
        ))
    })
}

fn parse_levels(raw: Vec<Vec<Value>>) -> ExchangeResult<Vec<OrderBookLevel>> {
    let mut levels = Vec::with_capacity(raw.len());
    for level in raw {
        let (price, amount) = match level.as_slice() {
            [price, amount, ..] => (value_to_decimal(price), value_to_decimal(amount)),
            _ => (None, None),
        };
        let (Some(price), Some(amount)) = (price, amount) else {
            return Err(ExchangeError::Decode(format!(
                "malformed book level: {:?}",
                level
            )));
        };

        if amount <= Decimal::ZERO {
            debug!(%price, "skipping empty book level");
            continue;
        }
        levels.push(OrderBookLevel { price, amount });
    }
    Ok(levels)
}

/// 캔들 목록. 객체 형식과 `[time, o, h, l, c, v]` 배열 형식을 모두 허용합니다.
///
/// 반환 순서는 응답 순서 그대로입니다.
pub fn parse_candles(value: Value) -> ExchangeResult<Vec<Record>> {
    let Value::Array(items) = value else {
        return Err(ExchangeError::Decode(
            "candles: expected a JSON array".to_string(),
        ));
    };

    items.into_iter().map(parse_candle).collect()
}

fn parse_candle(item: Value) -> ExchangeResult<Record> {
    let wire = match item {
        Value::Array(fields) => {
            if fields.len() < 5 {
                return Err(ExchangeError::Decode(format!(
                    "candle array has {} fields",
                    fields.len()
                )));
            }
            let field = |idx: usize| -> ExchangeResult<Decimal> {
                match fields.get(idx) {
                    // 거래량이 없는 6번째 필드만 생략 가능
                    None if idx == 5 => Ok(Decimal::ZERO),
                    field => field.and_then(value_to_decimal).ok_or_else(|| {
                        ExchangeError::Decode(format!("candle field {} is not numeric", idx))
                    }),
                }
            };
            WireCandle {
                time: fields[0].clone(),
                open: field(1)?,
                high: field(2)?,
                low: field(3)?,
                close: field(4)?,
                volume: field(5)?,
            }
        }
        other => decode(other, "candle")?,
    };

    Ok(Record {
        time: parse_time_ms(&wire.time)?,
        open: wire.open,
        high: wire.high,
        low: wire.low,
        close: wire.close,
        volume: wire.volume,
    })
}

/// 캔들 시각을 epoch 밀리초로 변환합니다. RFC 3339 문자열 또는 epoch ms.
pub fn parse_time_ms(value: &Value) -> ExchangeResult<i64> {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => {
            let s = s.trim();
            if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
                s.parse::<i64>().ok()
            } else {
                DateTime::parse_from_rfc3339(s)
                    .ok()
                    .map(|t| t.timestamp_millis())
            }
        }
        _ => None,
    };

    parsed.ok_or_else(|| ExchangeError::Decode(format!("invalid candle time: {}", value)))
}
