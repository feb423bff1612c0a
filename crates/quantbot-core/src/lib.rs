//! # QuantBot Core
//!
//! 거래소 커넥터 계층이 공유하는 도메인 모델과 공통 기반을 제공합니다:
//! - 정규 심볼, 캔들 주기, Decimal 가격/수량 타입
//! - 주문, 잔고, 시세(호가창), OHLCV 캔들
//! - 거래소 자격증명 (시크릿 마스킹)
//! - 설정 로드 및 로깅 초기화

pub mod config;
pub mod credentials;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use credentials::Credentials;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
