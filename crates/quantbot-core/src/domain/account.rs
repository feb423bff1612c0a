//! 계좌 잔고 타입.

use crate::types::Quantity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 한 통화의 잔고.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Balance {
    /// 사용 가능한 잔고
    pub available: Quantity,
    /// 주문에 묶인 잔고
    pub held: Quantity,
}

impl Balance {
    /// 총 잔고 반환 (사용 가능 + 묶인 잔고).
    pub fn total(&self) -> Quantity {
        self.available + self.held
    }
}

/// 통화 코드(대문자) → 잔고.
pub type AccountBalances = BTreeMap<String, Balance>;
