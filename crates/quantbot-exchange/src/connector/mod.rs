//! 거래소 커넥터.
//!
//! 설정(`VenueConfig`)으로부터 거래소 어댑터를 생성합니다.

pub mod adapter;

pub use adapter::*;

use crate::traits::{Exchange, ExchangeResult};
use crate::transport::HttpTransport;
use crate::venue::VenueKind;
use crate::ExchangeError;
use quantbot_core::VenueConfig;
use std::time::Duration;
use tracing::info;

/// HTTP 전송을 사용하는 기본 어댑터 타입.
pub type HttpVenueAdapter = VenueAdapter<HttpTransport>;

/// 설정으로부터 HTTP 기반 어댑터를 생성합니다.
///
/// # Errors
/// 설정 검증에 실패하거나 지원하지 않는 거래소이면 `ExchangeError::InvalidArgument`,
/// HTTP 클라이언트 생성에 실패하면 `ExchangeError::Transport`를 반환합니다.
pub fn build_adapter(config: &VenueConfig) -> ExchangeResult<HttpVenueAdapter> {
    config
        .validate()
        .map_err(|e| ExchangeError::InvalidArgument(e.to_string()))?;

    let kind: VenueKind = config.venue.parse()?;
    let profile = kind.profile();
    let base_url = config
        .base_url
        .clone()
        .unwrap_or_else(|| profile.host.to_string());

    let transport = HttpTransport::new(&base_url, Duration::from_secs(config.timeout_secs))?;

    info!(
        venue = %kind,
        name = %config.name,
        trader_id = ?config.trader_id,
        base_url = %base_url,
        max_calls_per_second = config.max_calls_per_second,
        "exchange adapter created"
    );

    Ok(VenueAdapter::new(
        profile,
        config.name.clone(),
        config.credentials(),
        transport,
        config.max_calls_per_second,
    )
    .with_trader_id(config.trader_id))
}

/// 설정으로부터 `Exchange` trait 객체를 생성합니다.
pub fn build_exchange(config: &VenueConfig) -> ExchangeResult<Box<dyn Exchange>> {
    Ok(Box::new(build_adapter(config)?))
}
