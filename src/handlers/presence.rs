//! 비활성 참여자 정리 스케줄러

use crate::room::now_millis;
use crate::state::AppState;
use crate::store::Participant;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// 한 번의 정리. 퇴장 처리된 참여자 반환.
pub async fn sweep_stale_participants(state: &AppState) -> Vec<Participant> {
    let threshold_ms = state.config.presence.stale_threshold_ms;

    match state.room.evict_stale(now_millis(), threshold_ms).await {
        Ok(evicted) => {
            if !evicted.is_empty() {
                tracing::info!(evicted = evicted.len(), "Presence sweep completed");
            }
            evicted
        }
        Err(err) => {
            tracing::error!(error = %err, "Presence sweep failed to read participants");
            Vec::new()
        }
    }
}

/// 정리 루프. 한 tick의 작업이 끝난 뒤에만 다음 tick을 기다리므로 겹치지 않는다.
pub async fn run_sweeper(state: Arc<AppState>, mut shutdown: watch::Receiver<bool>) {
    let period = state.config.presence.sweep_interval();
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(
        interval_ms = state.config.presence.sweep_interval_ms,
        threshold_ms = state.config.presence.stale_threshold_ms,
        "Presence sweeper started"
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                sweep_stale_participants(&state).await;
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    tracing::info!("Presence sweeper stopped");
}
