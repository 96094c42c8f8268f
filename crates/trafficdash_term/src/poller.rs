//! Cancellable poll loop.
//!
//! Every tick issues a fresh request, whether or not earlier ones are still
//! pending; results are reduced in the order they resolve, so the last one to
//! answer wins. Cancelling the token stops the timer and aborts every request
//! still in flight.

use std::sync::Arc;

use tokio::task::JoinSet;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use trafficdash::{DashboardConfig, DashboardState, PollError, PollOutcome};

use crate::source::StatusSource;

/// Poll `source` every `config.poll_interval` until `cancel` fires.
///
/// The first poll happens one interval after start. `on_update` sees the
/// state after every completed poll (success or failure). Returns the final
/// state.
pub async fn run_poller<S, F>(
    source: S,
    config: DashboardConfig,
    cancel: CancellationToken,
    mut on_update: F,
) -> DashboardState
where
    S: StatusSource + Send + Sync + 'static,
    F: FnMut(&DashboardState, &PollOutcome) + Send,
{
    let source = Arc::new(source);
    let mut state = DashboardState::with_capacity(config.max_points);
    let period = config.poll_interval;
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut in_flight: JoinSet<Result<String, PollError>> = JoinSet::new();

    info!(url = %config.status_url, period_ms = period.as_millis() as u64, "poller started");

    loop {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let source = Arc::clone(&source);
                in_flight.spawn(async move { source.fetch().await });
                if in_flight.len() > 1 {
                    debug!(pending = in_flight.len(), "request issued while others are pending");
                }
                continue;
            }
            Some(joined) = in_flight.join_next() => joined
                .unwrap_or_else(|e| Err(PollError::Transport(format!("poll task failed: {e}")))),
        };

        let outcome = state.reduce(result);
        match &outcome {
            PollOutcome::Cancelled => continue,
            PollOutcome::Failed(err) => {
                warn!(error = %err, failed = state.failed_polls, "status poll failed");
            }
            PollOutcome::Updated {
                point,
                lane_sum_mismatch,
            } => {
                debug!(
                    step = point.step,
                    total_queue = point.total_queue,
                    cumulative_reward = point.cumulative_reward,
                    "status updated"
                );
                if let Some(diff) = lane_sum_mismatch {
                    warn!(diff = %diff, "total_queue disagrees with lane queues");
                }
            }
        }
        on_update(&state, &outcome);
    }

    let abandoned = in_flight.len();
    in_flight.abort_all();
    while in_flight.join_next().await.is_some() {}

    info!(
        successful = state.successful_polls,
        failed = state.failed_polls,
        abandoned,
        "poller stopped"
    );
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use trafficdash::{Phase, StatusSnapshot};

    /// Serves scripted responses; counts every fetch.
    #[derive(Clone)]
    struct ScriptedSource {
        calls: Arc<AtomicUsize>,
        script: Arc<Vec<Result<(u64, f64), u16>>>,
    }

    impl ScriptedSource {
        fn new(script: Vec<Result<(u64, f64), u16>>) -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                script: Arc::new(script),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl StatusSource for ScriptedSource {
        fn fetch(&self) -> impl Future<Output = Result<String, PollError>> + Send {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let entry = self.script[n % self.script.len()];
            async move {
                match entry {
                    Ok((total_queue, cumulative_reward)) => Ok(StatusSnapshot {
                        q_eb: vec![1, 2, 3],
                        q_sb: vec![0, 0, 1],
                        current_phase: Phase::EastBound,
                        total_queue,
                        cumulative_reward,
                    }
                    .to_json()),
                    Err(status) => Err(PollError::Http { status }),
                }
            }
        }
    }

    /// One scripted reply per call: answer after a delay, or never.
    #[derive(Clone, Copy)]
    enum Reply {
        After { delay_ms: u64, total_queue: u64 },
        Never,
    }

    /// Counts requests dropped before they answered.
    struct AbandonGuard {
        armed: bool,
        abandoned: Arc<AtomicUsize>,
    }

    impl Drop for AbandonGuard {
        fn drop(&mut self) {
            if self.armed {
                self.abandoned.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[derive(Clone)]
    struct TimedSource {
        calls: Arc<AtomicUsize>,
        abandoned: Arc<AtomicUsize>,
        script: Arc<Vec<Reply>>,
        /// Used once the script runs out.
        fallback: Reply,
    }

    impl TimedSource {
        fn new(script: Vec<Reply>, fallback: Reply) -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                abandoned: Arc::new(AtomicUsize::new(0)),
                script: Arc::new(script),
                fallback,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn abandoned(&self) -> usize {
            self.abandoned.load(Ordering::SeqCst)
        }
    }

    impl StatusSource for TimedSource {
        fn fetch(&self) -> impl Future<Output = Result<String, PollError>> + Send {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let reply = self.script.get(n).copied().unwrap_or(self.fallback);
            let mut guard = AbandonGuard {
                armed: true,
                abandoned: Arc::clone(&self.abandoned),
            };
            async move {
                let _ = &guard;
                let total_queue = match reply {
                    Reply::After {
                        delay_ms,
                        total_queue,
                    } => {
                        time::sleep(Duration::from_millis(delay_ms)).await;
                        total_queue
                    }
                    Reply::Never => std::future::pending().await,
                };
                guard.armed = false;
                Ok(StatusSnapshot {
                    total_queue,
                    ..StatusSnapshot::default()
                }
                .to_json())
            }
        }
    }

    fn config() -> DashboardConfig {
        DashboardConfig::default()
    }

    #[tokio::test(start_paused = true)]
    async fn polls_once_per_interval() {
        let source = ScriptedSource::new(vec![Ok((5, 1.0)), Ok((8, 1.5)), Ok((4, 2.25))]);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_poller(source.clone(), config(), cancel.clone(), |_, _| {}));

        time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(source.calls(), 3);

        cancel.cancel();
        let state = handle.await.unwrap();
        let got: Vec<(u64, u64, f64)> = state
            .history
            .iter()
            .map(|p| (p.step, p.total_queue, p.cumulative_reward))
            .collect();
        assert_eq!(got, vec![(0, 5, 1.0), (1, 8, 1.5), (2, 4, 2.25)]);
    }

    #[tokio::test(start_paused = true)]
    async fn no_fetch_after_cancel() {
        let source = ScriptedSource::new(vec![Ok((1, 0.0))]);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_poller(source.clone(), config(), cancel.clone(), |_, _| {}));

        time::sleep(Duration::from_millis(2500)).await;
        cancel.cancel();
        let state = handle.await.unwrap();
        let calls_at_teardown = source.calls();

        time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(source.calls(), calls_at_teardown);
        assert_eq!(state.successful_polls, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_request_does_not_block_later_ticks() {
        let source = TimedSource::new(
            vec![Reply::Never],
            Reply::After {
                delay_ms: 0,
                total_queue: 4,
            },
        );
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_poller(source.clone(), config(), cancel.clone(), |_, _| {}));

        time::sleep(Duration::from_millis(10_500)).await;
        assert_eq!(source.calls(), 10);

        cancel.cancel();
        let state = time::timeout(Duration::from_millis(10), handle)
            .await
            .expect("poller should stop promptly")
            .unwrap();
        assert_eq!(state.successful_polls, 9);
        assert_eq!(state.history.len(), 9);
        assert_eq!(state.snapshot.total_queue, 4);
        assert_eq!(source.abandoned(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn last_response_to_resolve_wins() {
        // Tick 1 answers at 2500 ms, tick 2 at 2100 ms.
        let source = TimedSource::new(
            vec![
                Reply::After {
                    delay_ms: 1500,
                    total_queue: 1,
                },
                Reply::After {
                    delay_ms: 100,
                    total_queue: 2,
                },
            ],
            Reply::Never,
        );
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_poller(source.clone(), config(), cancel.clone(), |_, _| {}));

        time::sleep(Duration::from_millis(2700)).await;
        cancel.cancel();
        let state = handle.await.unwrap();

        let got: Vec<(u64, u64)> = state
            .history
            .iter()
            .map(|p| (p.step, p.total_queue))
            .collect();
        assert_eq!(got, vec![(0, 2), (1, 1)]);
        assert_eq!(state.snapshot.total_queue, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_aborts_every_pending_request() {
        let source = TimedSource::new(Vec::new(), Reply::Never);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_poller(source.clone(), config(), cancel.clone(), |_, _| {}));

        time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(source.calls(), 3);

        cancel.cancel();
        let state = time::timeout(Duration::from_millis(10), handle)
            .await
            .expect("poller should stop promptly")
            .unwrap();
        assert_eq!(source.abandoned(), 3);
        assert_eq!(state.successful_polls, 0);
        assert_eq!(state.failed_polls, 0);

        time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_are_reported_and_polling_continues() {
        let source = ScriptedSource::new(vec![Ok((3, -1.0)), Err(503), Ok((6, -2.0))]);
        let cancel = CancellationToken::new();
        let outcomes = Arc::new(AtomicUsize::new(0));
        let failures = Arc::new(AtomicUsize::new(0));
        let handle = tokio::spawn({
            let outcomes = Arc::clone(&outcomes);
            let failures = Arc::clone(&failures);
            run_poller(source.clone(), config(), cancel.clone(), move |_, outcome| {
                outcomes.fetch_add(1, Ordering::SeqCst);
                if matches!(outcome, PollOutcome::Failed(_)) {
                    failures.fetch_add(1, Ordering::SeqCst);
                }
            })
        });

        time::sleep(Duration::from_millis(3500)).await;
        cancel.cancel();
        let state = handle.await.unwrap();

        assert_eq!(outcomes.load(Ordering::SeqCst), 3);
        assert_eq!(failures.load(Ordering::SeqCst), 1);
        assert_eq!(state.failed_polls, 1);
        let steps: Vec<u64> = state.history.iter().map(|p| p.step).collect();
        assert_eq!(steps, vec![0, 1]);
        assert_eq!(state.snapshot.total_queue, 6);
    }
}
