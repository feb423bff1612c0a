//! 캔들 캐시.
//!
//! (심볼, 주기)별로 시간 오름차순의 제한된 길이 `RecordSeries`를 보관하고,
//! 새로 받은 캔들을 중복이나 공백 없이 병합합니다.
//! 아직 닫히지 않은 마지막 캔들은 추가되지 않고 제자리에서 갱신됩니다.

use quantbot_core::{Period, Record, RecordSeries, Symbol};
use std::collections::{HashMap, VecDeque};

/// 기본 캔들 윈도우 크기.
pub const DEFAULT_WINDOW: usize = 200;

/// 요청된 윈도우 크기를 실제 값으로 변환합니다. `None`이나 0은 기본값.
pub fn effective_window(window: Option<usize>) -> usize {
    match window {
        Some(size) if size > 0 => size,
        _ => DEFAULT_WINDOW,
    }
}

/// 한 번의 병합 결과.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// 새로 추가된 캔들 수
    pub appended: usize,
    /// 마지막 캔들이 갱신되었는지 여부
    pub updated_last: bool,
    /// 윈도우 초과로 앞에서 제거된 캔들 수
    pub truncated: usize,
}

/// 캐시된 시리즈에 새로 받은 캔들을 병합합니다.
///
/// 1. 캐시의 마지막 시각을 기준으로 받은 캔들을 최신순으로 순회합니다.
/// 2. 더 새로운 캔들은 스테이징 버퍼 앞에 넣어 오름차순을 유지합니다.
/// 3. 같은 시각의 캔들은 캐시의 마지막 항목을 덮어씁니다.
/// 4. 더 오래된 캔들을 만나면 순회를 멈춥니다.
/// 5. 스테이징 버퍼를 뒤에 붙이고 `window`를 넘는 만큼 앞에서 잘라냅니다.
///
/// 받은 배치는 순회 전에 시각 내림차순으로 정렬되고 같은 시각은 하나만 남기므로,
/// 거래소 응답 순서와 무관하게 결과가 같습니다.
pub fn merge_records(
    series: &mut RecordSeries,
    mut fetched: Vec<Record>,
    window: usize,
) -> MergeOutcome {
    let window = window.max(1);
    let mut outcome = MergeOutcome::default();

    fetched.sort_by(|a, b| b.time.cmp(&a.time));
    fetched.dedup_by_key(|r| r.time);

    let last_cached = series.last().map(|r| r.time);
    let mut staging: VecDeque<Record> = VecDeque::new();

    for record in fetched {
        match last_cached {
            Some(last) if record.time == last => {
                if let Some(slot) = series.last_mut() {
                    *slot = record;
                    outcome.updated_last = true;
                }
            }
            Some(last) if record.time < last => break,
            _ => staging.push_front(record),
        }
    }

    outcome.appended = staging.len();
    series.extend(staging);

    if series.len() > window {
        outcome.truncated = series.len() - window;
        series.drain(..outcome.truncated);
    }

    outcome
}

/// (심볼, 주기)별 캔들 시리즈 저장소.
///
/// 어댑터 인스턴스가 독점 소유하며 다른 어댑터와 공유되지 않습니다.
#[derive(Debug, Default)]
pub struct CandleCache {
    series: HashMap<(Symbol, Period), RecordSeries>,
}

impl CandleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 받은 캔들을 병합하고 병합 후 시리즈의 복사본을 반환합니다.
    pub fn merge(
        &mut self,
        symbol: &Symbol,
        period: Period,
        fetched: Vec<Record>,
        window: usize,
    ) -> (RecordSeries, MergeOutcome) {
        let series = self
            .series
            .entry((symbol.clone(), period))
            .or_default();
        let outcome = merge_records(series, fetched, window);
        (series.clone(), outcome)
    }

    pub fn get(&self, symbol: &Symbol, period: Period) -> Option<&RecordSeries> {
        self.series.get(&(symbol.clone(), period))
    }

    /// 캐시된 시리즈 수.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
