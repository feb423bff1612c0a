//! 제네릭 거래소 어댑터.
//!
//! OKEX v3 호환 REST API를 `VenueProfile`로 매개변수화해 구현합니다.
//! 요청 흐름: 심볼 정규화 → 심볼 테이블 조회 → 속도 제한 → 서명 → 전송 → 응답 분류/해석.
//! 캔들 요청은 해석 결과를 `CandleCache`와 병합한 뒤 반환합니다.

use crate::cache::{effective_window, CandleCache};
use crate::parser;
use crate::rate_limiter::RateLimiter;
use crate::signer::Signer;
use crate::traits::{Exchange, ExchangeResult};
use crate::transport::{HttpRequest, Transport};
use crate::venue::{VenueKind, VenueProfile};
use crate::ExchangeError;
use async_trait::async_trait;
use quantbot_core::{
    AccountBalances, Credentials, Order, OrderType, Price, Quantity, RecordSeries, Side, Symbol,
    Ticker,
};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 호가창 기본 깊이.
pub const DEFAULT_BOOK_DEPTH: u32 = 20;

// ============================================================================
// 요청 본문
// ============================================================================

#[derive(Debug, Serialize)]
struct PlaceOrderBody<'a> {
    client_oid: String,
    instrument_id: &'a str,
    side: &'static str,
    #[serde(rename = "type")]
    order_type: &'static str,
    size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    price: Option<String>,
}

#[derive(Debug, Serialize)]
struct CancelOrderBody<'a> {
    instrument_id: &'a str,
}

/// 거래소 규칙(문자로 시작, 최대 32자)에 맞는 클라이언트 주문 ID.
fn client_order_id() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("q{}", &id[..31])
}

/// URL 경로에 들어가는 주문 ID 검증. `[A-Za-z0-9_-]`만 허용합니다.
fn path_order_id(order_id: &str) -> ExchangeResult<&str> {
    let order_id = order_id.trim();
    if order_id.is_empty() {
        return Err(ExchangeError::InvalidArgument(
            "order id must not be empty".to_string(),
        ));
    }
    if !order_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ExchangeError::InvalidArgument(format!(
            "invalid order id: {:?}",
            order_id
        )));
    }
    Ok(order_id)
}

fn format_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

// ============================================================================
// 어댑터
// ============================================================================

/// `Exchange` trait의 제네릭 구현.
///
/// 속도 제한 상태와 캔들 캐시는 인스턴스별 `tokio::sync::Mutex`로 보호되며
/// 다른 어댑터와 공유되지 않습니다.
pub struct VenueAdapter<T: Transport> {
    profile: VenueProfile,
    name: String,
    trader_id: Option<i64>,
    signer: Signer,
    transport: T,
    limiter: RateLimiter,
    cache: Mutex<CandleCache>,
}

impl<T: Transport> VenueAdapter<T> {
    /// 새 어댑터 생성.
    pub fn new(
        profile: VenueProfile,
        name: impl Into<String>,
        credentials: Credentials,
        transport: T,
        max_calls_per_second: f64,
    ) -> Self {
        let signer = Signer::new(credentials, profile.auth_headers);

        Self {
            profile,
            name: name.into(),
            trader_id: None,
            signer,
            transport,
            limiter: RateLimiter::new(max_calls_per_second),
            cache: Mutex::new(CandleCache::new()),
        }
    }

    /// 로그 필드에 포함할 트레이더 ID 설정.
    pub fn with_trader_id(mut self, trader_id: Option<i64>) -> Self {
        self.trader_id = trader_id;
        self
    }

    pub fn profile(&self) -> &VenueProfile {
        &self.profile
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// 캐시된 캔들 시리즈 조회 (네트워크 호출 없음).
    pub async fn cached_records(&self, symbol: &str, period: &str) -> Option<RecordSeries> {
        let (symbol, _) = self.resolve(symbol).ok()?;
        let (period, _) = self.profile.granularity(period).ok()?;
        self.cache.lock().await.get(&symbol, period).cloned()
    }

    /// 정규 심볼을 검증하고 wire 심볼을 반환합니다.
    fn resolve(&self, symbol: &str) -> ExchangeResult<(Symbol, String)> {
        match self.profile.symbols.resolve(symbol) {
            Some((symbol, entry)) => Ok((symbol, entry.wire.clone())),
            None => {
                warn!(
                    venue = %self.profile.kind,
                    name = %self.name,
                    symbol = %symbol.trim().to_uppercase(),
                    "unrecognized symbol"
                );
                Err(ExchangeError::UnknownSymbol(symbol.trim().to_uppercase()))
            }
        }
    }

    /// 서명된 GET 요청.
    async fn get(&self, endpoint: &str) -> ExchangeResult<Value> {
        self.execute(HttpRequest::get(self.profile.path(endpoint)))
            .await
    }

    /// 서명된 POST 요청. 본문은 직렬화된 그대로 서명되고 전송됩니다.
    async fn post<B: Serialize>(&self, endpoint: &str, body: &B) -> ExchangeResult<Value> {
        let body = serde_json::to_string(body).map_err(|e| {
            ExchangeError::InvalidArgument(format!("failed to serialize request body: {}", e))
        })?;
        self.execute(HttpRequest::post(self.profile.path(endpoint), body))
            .await
    }

    async fn execute(&self, mut request: HttpRequest) -> ExchangeResult<Value> {
        // 대기 후에 서명해야 타임스탬프가 만료되지 않습니다.
        self.limiter.pace().await;

        request.headers = self.signer.auth_headers(
            request.method.as_str(),
            &request.path,
            request.body_str(),
        );

        debug!(
            venue = %self.profile.kind,
            trader_id = ?self.trader_id,
            method = %request.method,
            path = %request.path,
            "dispatching signed request"
        );

        let response = self.transport.send(request).await?;
        parser::classify(&self.profile, &response)
    }
}

#[async_trait]
impl<T: Transport> Exchange for VenueAdapter<T> {
    fn venue(&self) -> VenueKind {
        self.profile.kind
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn get_account(&self) -> ExchangeResult<AccountBalances> {
        let value = self.get("/accounts").await?;
        let account = parser::parse_account(value)?;
        debug!(venue = %self.profile.kind, currencies = account.len(), "account loaded");
        Ok(account)
    }

    async fn place_order(
        &self,
        symbol: &str,
        side: Side,
        price: Price,
        amount: Quantity,
    ) -> ExchangeResult<String> {
        let (symbol, wire) = self.resolve(symbol)?;

        if amount <= Decimal::ZERO {
            return Err(ExchangeError::InvalidArgument(format!(
                "order amount must be positive, got {}",
                amount
            )));
        }
        if price < Decimal::ZERO {
            return Err(ExchangeError::InvalidArgument(format!(
                "order price must not be negative, got {}",
                price
            )));
        }

        let order_type = OrderType::for_price(price);
        let send_price = order_type == OrderType::Limit || self.profile.send_price_for_market;
        let body = PlaceOrderBody {
            client_oid: client_order_id(),
            instrument_id: &wire,
            side: side.as_wire(),
            order_type: order_type.as_wire(),
            size: format_decimal(amount),
            price: send_price.then(|| format_decimal(price)),
        };

        let value = self.post("/orders", &body).await?;
        let order_id = parser::parse_order_id(value)?;

        info!(
            venue = %self.profile.kind,
            name = %self.name,
            trader_id = ?self.trader_id,
            symbol = %symbol,
            %side,
            %price,
            %amount,
            order_id = %order_id,
            client_oid = %body.client_oid,
            "order placed"
        );
        Ok(order_id)
    }

    async fn get_order(&self, symbol: &str, order_id: &str) -> ExchangeResult<Order> {
        let (symbol, wire) = self.resolve(symbol)?;
        let order_id = path_order_id(order_id)?;

        let value = self
            .get(&format!("/orders/{}?instrument_id={}", order_id, wire))
            .await?;
        parser::parse_order(value, &symbol)
    }

    async fn list_open_orders(&self, symbol: &str) -> ExchangeResult<Vec<Order>> {
        let (symbol, wire) = self.resolve(symbol)?;
        let value = self
            .get(&format!("/orders_pending?instrument_id={}", wire))
            .await?;
        parser::parse_orders(value, &symbol)
    }

    async fn list_recent_fills(&self, symbol: &str) -> ExchangeResult<Vec<Order>> {
        let (symbol, wire) = self.resolve(symbol)?;
        let value = self
            .get(&format!("/orders?instrument_id={}&status=filled", wire))
            .await?;
        parser::parse_orders(value, &symbol)
    }

    async fn cancel_order(&self, order: &Order) -> ExchangeResult<()> {
        let (symbol, wire) = self.resolve(&order.symbol.to_string())?;
        let order_id = path_order_id(&order.id)?;

        let body = CancelOrderBody {
            instrument_id: &wire,
        };
        self.post(&format!("/cancel_orders/{}", order_id), &body)
            .await?;

        info!(
            venue = %self.profile.kind,
            name = %self.name,
            trader_id = ?self.trader_id,
            symbol = %symbol,
            order_id = %order.id,
            side = %order.side,
            price = %order.price,
            remaining = %order.remaining(),
            "order cancelled"
        );
        Ok(())
    }

    async fn get_ticker(&self, symbol: &str, depth: Option<u32>) -> ExchangeResult<Ticker> {
        let (_, wire) = self.resolve(symbol)?;
        let depth = depth.filter(|d| *d > 0).unwrap_or(DEFAULT_BOOK_DEPTH);

        let value = self
            .get(&format!("/instruments/{}/book?size={}", wire, depth))
            .await?;
        parser::parse_book(value, self.profile.ask_order)
    }

    async fn get_records(
        &self,
        symbol: &str,
        period: &str,
        window: Option<usize>,
    ) -> ExchangeResult<RecordSeries> {
        let (symbol, wire) = self.resolve(symbol)?;
        let (period, granularity) = self.profile.granularity(period).map_err(|e| {
            warn!(venue = %self.profile.kind, error = %e, "unrecognized period");
            e
        })?;
        let window = effective_window(window);

        let value = self
            .get(&format!(
                "/instruments/{}/candles?granularity={}",
                wire, granularity
            ))
            .await?;
        let fetched = parser::parse_candles(value)?;
        let fetched_count = fetched.len();

        let (series, outcome) = self
            .cache
            .lock()
            .await
            .merge(&symbol, period, fetched, window);

        debug!(
            venue = %self.profile.kind,
            symbol = %symbol,
            %period,
            fetched = fetched_count,
            appended = outcome.appended,
            updated_last = outcome.updated_last,
            cached = series.len(),
            "candles merged"
        );
        Ok(series)
    }

    async fn set_max_calls_per_second(&self, max_calls_per_second: f64) -> f64 {
        let applied = self
            .limiter
            .set_max_calls_per_second(max_calls_per_second)
            .await;
        info!(venue = %self.profile.kind, name = %self.name, applied, "rate limit updated");
        applied
    }

    async fn throttle(&self) {
        self.limiter.throttle().await;
    }

    fn minimum_trade_size(&self, symbol: &str) -> Quantity {
        self.profile.symbols.minimum_trade_size(symbol)
    }
}
