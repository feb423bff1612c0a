//! 거래소 trait 정의.

use async_trait::async_trait;
use quantbot_core::{AccountBalances, Order, Price, Quantity, RecordSeries, Side, Ticker};

use crate::venue::VenueKind;
use crate::ExchangeError;

/// 거래소 작업을 위한 Result 타입.
pub type ExchangeResult<T> = Result<T, ExchangeError>;

/// 통합 거래소 인터페이스를 위한 Exchange trait.
///
/// 모든 심볼 인자는 정규 심볼(`"BTC/USDT"`, 대소문자 무관)입니다.
/// 심볼 테이블에 없는 심볼은 네트워크 호출 없이 `ExchangeError::UnknownSymbol`을 반환합니다.
#[async_trait]
pub trait Exchange: Send + Sync {
    /// 거래소 종류 반환.
    fn venue(&self) -> VenueKind;

    /// 설정된 표시 이름 반환.
    fn name(&self) -> &str;

    // === 계좌 작업 ===

    /// 통화별 잔고 (사용 가능/주문에 묶임) 조회.
    async fn get_account(&self) -> ExchangeResult<AccountBalances>;

    // === 주문 작업 ===

    /// 주문 생성. `price`가 0이면 시장가 주문입니다.
    ///
    /// 거래소가 발급한 주문 ID를 반환합니다.
    async fn place_order(
        &self,
        symbol: &str,
        side: Side,
        price: Price,
        amount: Quantity,
    ) -> ExchangeResult<String>;

    /// 주문 조회.
    async fn get_order(&self, symbol: &str, order_id: &str) -> ExchangeResult<Order>;

    /// 미체결 주문 목록.
    async fn list_open_orders(&self, symbol: &str) -> ExchangeResult<Vec<Order>>;

    /// 최근 체결된 주문 목록.
    async fn list_recent_fills(&self, symbol: &str) -> ExchangeResult<Vec<Order>>;

    /// 주문 취소. 성공 시 미체결 잔량과 함께 로그를 남깁니다.
    async fn cancel_order(&self, order: &Order) -> ExchangeResult<()>;

    // === 시장 데이터 ===

    /// 호가창 기반 시세 조회 (기본 깊이 20).
    async fn get_ticker(&self, symbol: &str, depth: Option<u32>) -> ExchangeResult<Ticker>;

    /// 캔들 조회 (기본 윈도우 200). 결과는 캐시와 병합된 오름차순 시리즈입니다.
    async fn get_records(
        &self,
        symbol: &str,
        period: &str,
        window: Option<usize>,
    ) -> ExchangeResult<RecordSeries>;

    // === 속도 제한 ===

    /// 초당 최대 호출 수를 설정하고 적용된 값을 반환합니다.
    async fn set_max_calls_per_second(&self, max_calls_per_second: f64) -> f64;

    /// 설정된 호출 속도를 지키도록 필요한 만큼 대기합니다.
    async fn throttle(&self);

    /// 최소 거래 수량. 알 수 없는 심볼이면 0.
    fn minimum_trade_size(&self, symbol: &str) -> Quantity;

    // === 편의 메서드 ===

    /// 문자열 주문 유형(`"buy"`, `"sell"`)으로 주문을 생성합니다.
    async fn trade(
        &self,
        trade_type: &str,
        symbol: &str,
        price: Price,
        amount: Quantity,
    ) -> ExchangeResult<String> {
        let side: Side = trade_type.parse().map_err(|_| {
            ExchangeError::InvalidArgument(format!("unrecognized trade type: {}", trade_type))
        })?;
        self.place_order(symbol, side, price, amount).await
    }

    /// 매수 주문.
    async fn buy(&self, symbol: &str, price: Price, amount: Quantity) -> ExchangeResult<String> {
        self.place_order(symbol, Side::Buy, price, amount).await
    }

    /// 매도 주문.
    async fn sell(&self, symbol: &str, price: Price, amount: Quantity) -> ExchangeResult<String> {
        self.place_order(symbol, Side::Sell, price, amount).await
    }
}
