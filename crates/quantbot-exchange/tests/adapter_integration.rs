//! Integration tests for the venue adapter driven through an in-memory transport.

use async_trait::async_trait;
use quantbot_core::{Credentials, Order, Side, Symbol};
use quantbot_exchange::signer::{hmac_sha256_base64, prehash};
use quantbot_exchange::{
    AskOrder, ErrorKind, Exchange, ExchangeError, ExchangeResult, HttpRequest, HttpResponse,
    Transport, VenueAdapter, VenueProfile,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

const T: i64 = 1_552_993_200_000;
const MIN: i64 = 60_000;

/// Records every request and replays canned responses in order.
#[derive(Default)]
struct FakeTransport {
    requests: Mutex<Vec<HttpRequest>>,
    responses: Mutex<VecDeque<HttpResponse>>,
}

impl FakeTransport {
    fn push(&self, status: u16, body: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(HttpResponse::new(status, body));
    }

    fn push_json(&self, body: Value) {
        self.push(200, body.to_string());
    }

    fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> ExchangeResult<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ExchangeError::Transport {
                status: None,
                message: "connection refused".to_string(),
            })
    }
}

fn adapter(profile: VenueProfile) -> VenueAdapter<FakeTransport> {
    VenueAdapter::new(
        profile,
        "test",
        Credentials::new("test-key", "secret", "test-pass"),
        FakeTransport::default(),
        0.0,
    )
}

fn okex() -> VenueAdapter<FakeTransport> {
    adapter(VenueProfile::okex_v3())
}

fn candle(time: i64, close: &str) -> Value {
    let iso = chrono::DateTime::from_timestamp_millis(time)
        .unwrap()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string();
    json!({"time": iso, "open": close, "high": close, "low": close, "close": close, "volume": "1"})
}

fn times(series: &[quantbot_core::Record]) -> Vec<i64> {
    series.iter().map(|r| r.time).collect()
}

// ============================================================================
// 로컬 검증
// ============================================================================

#[tokio::test]
async fn test_unknown_symbol_makes_no_network_call() {
    let exchange = okex();
    let unknown = "DOGE/USDT";

    let kind = |r: ExchangeResult<()>| r.unwrap_err().kind();

    assert_eq!(
        kind(exchange.place_order(unknown, Side::Buy, dec!(1), dec!(1)).await.map(drop)),
        ErrorKind::UnknownSymbol
    );
    assert_eq!(kind(exchange.get_order(unknown, "1").await.map(drop)), ErrorKind::UnknownSymbol);
    assert_eq!(kind(exchange.list_open_orders(unknown).await.map(drop)), ErrorKind::UnknownSymbol);
    assert_eq!(kind(exchange.list_recent_fills(unknown).await.map(drop)), ErrorKind::UnknownSymbol);
    assert_eq!(kind(exchange.get_ticker(unknown, None).await.map(drop)), ErrorKind::UnknownSymbol);
    assert_eq!(
        kind(exchange.get_records(unknown, "M", None).await.map(drop)),
        ErrorKind::UnknownSymbol
    );
    assert_eq!(kind(exchange.trade("buy", unknown, dec!(1), dec!(1)).await.map(drop)), ErrorKind::UnknownSymbol);

    let order = Order::new("1", dec!(1), dec!(1), dec!(0), Side::Buy, Symbol::new("DOGE", "USDT")).unwrap();
    assert_eq!(kind(exchange.cancel_order(&order).await), ErrorKind::UnknownSymbol);

    // 테이블에 있지만 다른 거래소 전용인 심볼
    let xnodes = adapter(VenueProfile::xnodes());
    assert_eq!(
        kind(xnodes.get_ticker("ONT/USDT", None).await.map(drop)),
        ErrorKind::UnknownSymbol
    );

    assert_eq!(exchange.minimum_trade_size(unknown), Decimal::ZERO);
    assert_eq!(exchange.transport().call_count(), 0);
    assert_eq!(xnodes.transport().call_count(), 0);
}

#[tokio::test]
async fn test_local_argument_validation() {
    let exchange = okex();

    let err = exchange.get_records("BTC/USDT", "M2", None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownPeriod);

    let err = exchange
        .place_order("BTC/USDT", Side::Buy, dec!(100), Decimal::ZERO)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let err = exchange
        .place_order("BTC/USDT", Side::Sell, dec!(-1), dec!(1))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let err = exchange.trade("hold", "BTC/USDT", dec!(1), dec!(1)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    assert_eq!(exchange.transport().call_count(), 0);
}

#[tokio::test]
async fn test_order_id_cannot_alter_request_path() {
    let exchange = okex();

    for id in ["", "1?instrument_id=eth_usdt&x=", "1/../../accounts", "1#x"] {
        let err = exchange.get_order("BTC/USDT", id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument, "id {:?}", id);

        let order = Order {
            id: id.to_string(),
            ..Order::new("1", dec!(1), dec!(1), dec!(0), Side::Buy, Symbol::new("BTC", "USDT")).unwrap()
        };
        let err = exchange.cancel_order(&order).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument, "id {:?}", id);
    }

    assert_eq!(exchange.transport().call_count(), 0);
}

#[tokio::test]
async fn test_symbol_is_case_normalized() {
    let exchange = okex();
    exchange.transport().push_json(json!({"bids": [["100", "1"]], "asks": [["101", "1"]]}));

    exchange.get_ticker(" btc/usdt", None).await.unwrap();

    assert_eq!(
        exchange.transport().last_request().path,
        "/api/spot/v3/instruments/btc_usdt/book?size=20"
    );
    assert_eq!(exchange.minimum_trade_size("gst/eth"), dec!(100));
}

// ============================================================================
// 시세
// ============================================================================

#[tokio::test]
async fn test_ticker_from_book() {
    // 실제 wire 정렬은 확인되지 않았으므로 오름차순 응답은 명시적으로 지정합니다.
    let exchange = adapter(VenueProfile::okex_v3().with_ask_order(AskOrder::Ascending));
    exchange.transport().push_json(json!({
        "bids": [[100, 1], [99, 2]],
        "asks": [[101, 1], [102, 3]]
    }));

    let ticker = exchange.get_ticker("BTC/USDT", Some(5)).await.unwrap();

    assert_eq!(ticker.buy, dec!(100));
    assert_eq!(ticker.sell, dec!(101));
    assert_eq!(ticker.mid, dec!(100.5));
    assert_eq!(ticker.bids.len(), 2);
    assert_eq!(ticker.asks.len(), 2);
    assert_eq!(
        exchange.transport().last_request().path,
        "/api/spot/v3/instruments/btc_usdt/book?size=5"
    );
}

#[tokio::test]
async fn test_ticker_default_profile_reverses_asks() {
    let exchange = okex();
    exchange.transport().push_json(json!({
        "bids": [["100", "1"]],
        "asks": [["102", "3"], ["101", "1"]]
    }));

    let ticker = exchange.get_ticker("BTC/USDT", None).await.unwrap();
    assert_eq!(ticker.sell, dec!(101));
}

#[tokio::test]
async fn test_ticker_requires_both_sides() {
    let exchange = okex();
    exchange.transport().push_json(json!({"bids": [], "asks": [["101", "1"]]}));

    let err = exchange.get_ticker("BTC/USDT", None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientData);
}

// ============================================================================
// 캔들
// ============================================================================

#[tokio::test]
async fn test_records_first_fetch_and_extension() {
    let exchange = okex();

    exchange.transport().push_json(json!([
        candle(T + 2 * MIN, "3"),
        candle(T + MIN, "2"),
        candle(T, "1"),
    ]));
    let series = exchange.get_records("BTC/USDT", "M", None).await.unwrap();
    assert_eq!(times(&series), vec![T, T + MIN, T + 2 * MIN]);
    assert_eq!(
        exchange.transport().last_request().path,
        "/api/spot/v3/instruments/btc_usdt/candles?granularity=60"
    );

    // 같은 윈도우 재조회: 변화 없음
    exchange.transport().push_json(json!([
        candle(T + 2 * MIN, "3"),
        candle(T + MIN, "2"),
        candle(T, "1"),
    ]));
    let again = exchange.get_records("BTC/USDT", "M", None).await.unwrap();
    assert_eq!(again, series);

    // 진행 중인 캔들 갱신 + 새 캔들 추가, 이전 캔들은 무시
    let last = T + 2 * MIN;
    exchange.transport().push_json(json!([
        candle(last + 2 * MIN, "6"),
        candle(last + MIN, "5"),
        candle(last, "4"),
        candle(last - MIN, "99"),
    ]));
    let series = exchange.get_records("BTC/USDT", "M", None).await.unwrap();

    assert_eq!(
        times(&series),
        vec![T, T + MIN, T + 2 * MIN, T + 3 * MIN, T + 4 * MIN]
    );
    assert_eq!(series[1].close, dec!(2));
    assert_eq!(series[2].close, dec!(4));
    assert_eq!(series[4].close, dec!(6));
}

#[tokio::test]
async fn test_records_window_and_period_isolation() {
    let exchange = okex();

    let batch: Vec<Value> = (0..10).rev().map(|i| candle(T + i * MIN, "1")).collect();
    exchange.transport().push_json(Value::Array(batch));
    let minute = exchange.get_records("BTC/USDT", "M", Some(4)).await.unwrap();
    assert_eq!(minute.len(), 4);
    assert_eq!(minute[0].time, T + 6 * MIN);

    exchange.transport().push_json(json!([candle(T, "7")]));
    let daily = exchange.get_records("BTC/USDT", "D", Some(4)).await.unwrap();
    assert_eq!(daily.len(), 1);
    assert_eq!(
        exchange.transport().last_request().path,
        "/api/spot/v3/instruments/btc_usdt/candles?granularity=86400"
    );

    let cached = exchange.cached_records("BTC/USDT", "M").await.unwrap();
    assert_eq!(cached, minute);
}

#[tokio::test]
async fn test_records_failure_leaves_cache_untouched() {
    let exchange = okex();
    exchange.transport().push_json(json!([candle(T, "1")]));
    exchange.get_records("BTC/USDT", "M", None).await.unwrap();

    exchange.transport().push(200, "not json");
    let err = exchange.get_records("BTC/USDT", "M", None).await.unwrap_err();
    assert!(err.is_contract_drift());

    let cached = exchange.cached_records("BTC/USDT", "M").await.unwrap();
    assert_eq!(times(&cached), vec![T]);
}

// ============================================================================
// 주문
// ============================================================================

#[tokio::test]
async fn test_place_limit_order_signs_transmitted_body() {
    let exchange = okex();
    exchange
        .transport()
        .push_json(json!({"result": true, "order_id": "2510789768709120", "client_oid": ""}));

    let id = exchange
        .place_order("btc/usdt", Side::Buy, dec!(3900.50), dec!(0.0100))
        .await
        .unwrap();
    assert_eq!(id, "2510789768709120");

    let request = exchange.transport().last_request();
    assert_eq!(request.method.as_str(), "POST");
    assert_eq!(request.path, "/api/spot/v3/orders");

    let body: Value = serde_json::from_str(request.body_str()).unwrap();
    assert_eq!(body["instrument_id"], "btc_usdt");
    assert_eq!(body["side"], "buy");
    assert_eq!(body["type"], "limit");
    assert_eq!(body["size"], "0.01");
    assert_eq!(body["price"], "3900.5");
    assert!(body["client_oid"].as_str().unwrap().starts_with('q'));

    let timestamp = request.header("OK-ACCESS-TIMESTAMP").unwrap();
    let expected = hmac_sha256_base64(
        "secret",
        &prehash(timestamp, "POST", &request.path, request.body_str()),
    );
    assert_eq!(request.header("OK-ACCESS-SIGN"), Some(expected.as_str()));
    assert_eq!(request.header("OK-ACCESS-KEY"), Some("test-key"));
    assert_eq!(request.header("OK-ACCESS-PASSPHRASE"), Some("test-pass"));
}

#[tokio::test]
async fn test_market_order_price_field_per_venue() {
    let exchange = okex();
    exchange.transport().push_json(json!({"result": true, "order_id": 42}));
    let id = exchange.sell("ETH/USDT", Decimal::ZERO, dec!(1)).await.unwrap();
    assert_eq!(id, "42");

    let body: Value = serde_json::from_str(exchange.transport().last_request().body_str()).unwrap();
    assert_eq!(body["type"], "market");
    assert!(body.get("price").is_none());

    let xnodes = adapter(VenueProfile::xnodes());
    xnodes.transport().push_json(json!({"result": true, "code": 0, "order_id": "7"}));
    xnodes.trade("sell", "ETH/USDT", Decimal::ZERO, dec!(1)).await.unwrap();

    let body: Value = serde_json::from_str(xnodes.transport().last_request().body_str()).unwrap();
    assert_eq!(body["type"], "market");
    assert_eq!(body["price"], "0");
}

#[tokio::test]
async fn test_place_order_rejection_is_not_success() {
    let exchange = okex();
    exchange.transport().push_json(json!({
        "result": false,
        "error_code": "33017",
        "error_message": "Greater than the maximum available balance",
        "order_id": "-1"
    }));

    let err = exchange
        .buy("BTC/USDT", dec!(4000), dec!(100))
        .await
        .unwrap_err();

    match &err {
        ExchangeError::VenueRejected { code, message } => {
            assert_eq!(code, "33017");
            assert!(message.contains("maximum available balance"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_auth_and_transport_failures_are_distinct() {
    let exchange = okex();

    exchange.transport().push(401, r#"{"error_code":"30013","error_message":"Invalid Sign"}"#);
    let err = exchange.get_account().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    exchange.transport().push(503, "Service Unavailable");
    let err = exchange.get_account().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.is_retryable());

    // 응답 없음 (연결 실패)
    let err = exchange.get_account().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn test_get_and_list_orders() {
    let exchange = okex();
    let order_json = json!({
        "order_id": "100",
        "price": "3900",
        "size": "0.5",
        "filled_size": "0.2",
        "side": "buy",
        "instrument_id": "btc_usdt",
        "status": "part_filled"
    });

    exchange.transport().push_json(order_json.clone());
    let order = exchange.get_order("BTC/USDT", "100").await.unwrap();
    assert_eq!(order.remaining(), dec!(0.3));
    assert_eq!(order.symbol.to_string(), "BTC/USDT");
    assert_eq!(
        exchange.transport().last_request().path,
        "/api/spot/v3/orders/100?instrument_id=btc_usdt"
    );

    exchange.transport().push_json(json!([order_json]));
    let open = exchange.list_open_orders("BTC/USDT").await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(
        exchange.transport().last_request().path,
        "/api/spot/v3/orders_pending?instrument_id=btc_usdt"
    );

    exchange.transport().push_json(json!([]));
    let fills = exchange.list_recent_fills("BTC/USDT").await.unwrap();
    assert!(fills.is_empty());
    assert_eq!(
        exchange.transport().last_request().path,
        "/api/spot/v3/orders?instrument_id=btc_usdt&status=filled"
    );
}

#[tokio::test]
async fn test_cancel_order() {
    let exchange = okex();
    exchange
        .transport()
        .push_json(json!({"result": true, "order_id": "100", "client_oid": ""}));

    let order = Order::new("100", dec!(3900), dec!(0.5), dec!(0.2), Side::Buy, Symbol::new("BTC", "USDT")).unwrap();
    exchange.cancel_order(&order).await.unwrap();

    let request = exchange.transport().last_request();
    assert_eq!(request.path, "/api/spot/v3/cancel_orders/100");
    assert_eq!(request.body_str(), r#"{"instrument_id":"btc_usdt"}"#);

    exchange.transport().push(400, r#"{"error_code":"33014","error_message":"Order does not exist"}"#);
    let err = exchange.cancel_order(&order).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::VenueRejected);
}

#[tokio::test]
async fn test_get_account() {
    let exchange = okex();
    exchange.transport().push_json(json!([
        {"currency": "BTC", "available": "1.5", "hold": "0.5", "balance": "2"},
        {"currency": "usdt", "available": "100", "hold": "0"}
    ]));

    let account = exchange.get_account().await.unwrap();
    assert_eq!(account["BTC"].total(), dec!(2));
    assert_eq!(account["USDT"].available, dec!(100));
    assert_eq!(exchange.transport().last_request().path, "/api/spot/v3/accounts");
}

// ============================================================================
// 속도 제한
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_adapter_paces_requests() {
    let exchange = okex();
    assert_eq!(exchange.set_max_calls_per_second(10.0).await, 10.0);

    for _ in 0..5 {
        exchange.transport().push_json(json!([]));
    }

    let start = tokio::time::Instant::now();
    for _ in 0..5 {
        exchange.get_account().await.unwrap();
    }

    assert!(start.elapsed() >= Duration::from_millis(400));
    assert_eq!(exchange.transport().call_count(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_local_failures_do_not_consume_rate_budget() {
    let exchange = okex();
    exchange.set_max_calls_per_second(1.0).await;

    for _ in 0..10 {
        let _ = exchange.get_ticker("NOPE/USDT", None).await;
    }

    let start = tokio::time::Instant::now();
    exchange.throttle().await;
    assert_eq!(start.elapsed(), Duration::ZERO);
}
