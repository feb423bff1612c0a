//! 거래소별 심볼 테이블.
//!
//! 정규 심볼(`BTC/USDT`)을 거래소 wire 심볼(`btc_usdt`)과 최소 거래 수량으로 매핑합니다.
//! 상태가 없는 순수 조회 테이블입니다.

use quantbot_core::{Quantity, Symbol};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// 심볼 테이블 항목.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    /// 거래소 wire 심볼 (예: "btc_usdt")
    pub wire: String,
    /// 최소 거래 수량 (0이면 제한 없음)
    pub min_size: Quantity,
}

/// 정규 심볼 → 거래소 심볼 매핑.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: HashMap<Symbol, SymbolEntry>,
}

impl SymbolTable {
    /// 빈 테이블 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 항목 추가 (builder 스타일).
    ///
    /// wire 심볼은 `base_quote` 소문자 형식으로 만들어집니다.
    pub fn with(mut self, base: &str, quote: &str, min_size: Quantity) -> Self {
        let symbol = Symbol::new(base, quote);
        let wire = format!("{}_{}", symbol.base, symbol.quote).to_lowercase();
        self.entries.insert(symbol, SymbolEntry { wire, min_size });
        self
    }

    /// 정규 심볼 문자열을 조회합니다. 대소문자와 앞뒤 공백은 무시됩니다.
    pub fn resolve(&self, symbol: &str) -> Option<(Symbol, &SymbolEntry)> {
        let symbol = Symbol::parse(symbol)?;
        let entry = self.entries.get(&symbol)?;
        Some((symbol, entry))
    }

    /// 거래소 wire 심볼을 반환합니다.
    pub fn wire_symbol(&self, symbol: &str) -> Option<&str> {
        self.resolve(symbol).map(|(_, entry)| entry.wire.as_str())
    }

    /// 최소 거래 수량. 알 수 없는 심볼이면 0.
    pub fn minimum_trade_size(&self, symbol: &str) -> Quantity {
        self.resolve(symbol)
            .map(|(_, entry)| entry.min_size)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.resolve(symbol).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
