//! 클라이언트 측 요청 속도 제한.
//!
//! 어댑터 인스턴스마다 하나씩 소유하며, 요청을 보내기 전에 스스로 속도를 조절합니다.
//! 마지막 체크포인트 이후 보낸 호출 수만큼의 최소 간격이 지나지 않았다면
//! 그 차이만큼 대기한 뒤, 카운터를 초기화하고 현재 시각을 체크포인트로 기록합니다.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::trace;

/// 한 번에 대기하는 최대 시간. 극단적으로 작은 속도 제한도 이 값으로 잘립니다.
pub const MAX_WAIT: Duration = Duration::from_secs(3600);

/// 스로틀링 상태.
#[derive(Debug)]
pub struct RateState {
    /// 마지막 스로틀링 체크포인트
    pub last_checkpoint: Instant,
    /// 체크포인트 이후 보낸 호출 수
    pub calls_since_checkpoint: u32,
    /// 초당 최대 호출 수 (0이면 제한 없음)
    pub max_calls_per_second: f64,
}

impl RateState {
    /// 지금 대기해야 하는 시간.
    fn required_wait(&self, now: Instant) -> Duration {
        if self.max_calls_per_second <= 0.0 || self.calls_since_checkpoint == 0 {
            return Duration::ZERO;
        }

        let required =
            Duration::try_from_secs_f64(self.calls_since_checkpoint as f64 / self.max_calls_per_second)
                .map_or(MAX_WAIT, |d| d.min(MAX_WAIT));
        required.saturating_sub(now.saturating_duration_since(self.last_checkpoint))
    }
}

/// 어댑터 단위 속도 제한기.
///
/// 상태는 `tokio::sync::Mutex`로 보호되며 대기 중에도 잠금을 유지하므로,
/// 같은 어댑터를 여러 태스크가 동시에 호출해도 호출 간격 계산이 선형화됩니다.
#[derive(Debug)]
pub struct RateLimiter {
    state: Mutex<RateState>,
}

impl RateLimiter {
    /// 새 속도 제한기 생성.
    pub fn new(max_calls_per_second: f64) -> Self {
        Self {
            state: Mutex::new(RateState {
                last_checkpoint: Instant::now(),
                calls_since_checkpoint: 0,
                max_calls_per_second: sanitize(max_calls_per_second),
            }),
        }
    }

    /// 초당 최대 호출 수를 설정하고 실제 적용된 값을 반환합니다.
    ///
    /// 음수나 유한하지 않은 값은 0(제한 없음)으로 처리됩니다.
    pub async fn set_max_calls_per_second(&self, max_calls_per_second: f64) -> f64 {
        let mut state = self.state.lock().await;
        state.max_calls_per_second = sanitize(max_calls_per_second);
        state.max_calls_per_second
    }

    pub async fn max_calls_per_second(&self) -> f64 {
        self.state.lock().await.max_calls_per_second
    }

    /// 필요한 만큼 대기한 뒤 체크포인트를 갱신합니다. 실제 대기 시간을 반환합니다.
    pub async fn throttle(&self) -> Duration {
        let mut state = self.state.lock().await;
        Self::throttle_locked(&mut state).await
    }

    /// 요청 한 건을 보내기 전에 호출합니다. 스로틀링 후 호출 수를 1 증가시킵니다.
    pub async fn pace(&self) -> Duration {
        let mut state = self.state.lock().await;
        let waited = Self::throttle_locked(&mut state).await;
        state.calls_since_checkpoint += 1;
        waited
    }

    async fn throttle_locked(state: &mut RateState) -> Duration {
        let wait = state.required_wait(Instant::now());
        if !wait.is_zero() {
            trace!(
                wait_ms = wait.as_millis() as u64,
                calls = state.calls_since_checkpoint,
                "throttling"
            );
            sleep(wait).await;
        }

        state.calls_since_checkpoint = 0;
        state.last_checkpoint = Instant::now();
        wait
    }
}

fn sanitize(max_calls_per_second: f64) -> f64 {
    if max_calls_per_second.is_finite() && max_calls_per_second > 0.0 {
        max_calls_per_second
    } else {
        0.0
    }
}
