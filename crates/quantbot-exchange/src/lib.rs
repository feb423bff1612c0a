//! 거래소 연결 계층.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Exchange trait: 통합 거래소 인터페이스
//! - 거래소 프로필 (OKEX v3, Xnodes)과 심볼 테이블
//! - 요청 서명 및 클라이언트 측 rate limiting
//! - 응답 분류와 도메인 모델 정규화
//! - 캔들 캐시 병합

pub mod cache;
pub mod connector;
pub mod error;
pub mod parser;
pub mod rate_limiter;
pub mod signer;
pub mod symbol_table;
pub mod traits;
pub mod transport;
pub mod venue;

pub use cache::{effective_window, merge_records, CandleCache, MergeOutcome, DEFAULT_WINDOW};
pub use connector::{
    build_adapter, build_exchange, HttpVenueAdapter, VenueAdapter, DEFAULT_BOOK_DEPTH,
};
pub use error::*;
pub use rate_limiter::{RateLimiter, RateState};
pub use signer::{AuthHeaderNames, Signer};
pub use symbol_table::{SymbolEntry, SymbolTable};
pub use traits::*;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Transport};
pub use venue::{AskOrder, VenueKind, VenueProfile};
