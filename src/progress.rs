//! Cosmetic analysis progress.
//!
//! The value climbs quickly to 30, slower to 70, crawls to 90 and then waits
//! there for the real result. Only [`Progress::complete`] reaches 100.

use std::time::Duration;

use rand::Rng;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::debug;

pub const STALL_AT: f32 = 90.0;
pub const DONE: f32 = 100.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Progress {
    value: f32,
    complete: bool,
}

impl Progress {
    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// One timer step. Never decreases and never passes [`STALL_AT`].
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.complete {
            return;
        }
        let step: f32 = if self.value < 30.0 {
            rng.gen_range(0.0..8.0)
        } else if self.value < 70.0 {
            rng.gen_range(0.0..2.0)
        } else if self.value < STALL_AT {
            0.5
        } else {
            0.0
        };
        self.value = (self.value + step).min(STALL_AT);
    }

    pub fn complete(&mut self) {
        self.complete = true;
        self.value = DONE;
    }
}

/// Repeating timer task. Stops when the tick callback returns `false`, when
/// cancelled, or when dropped.
pub struct ProgressTimer {
    handle: JoinHandle<()>,
}

impl ProgressTimer {
    pub fn spawn<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick of a tokio interval fires immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if !on_tick() {
                    debug!("Progress timer stopped by its callback");
                    break;
                }
            }
        });
        Self { handle }
    }

    pub fn cancel(self) {
        // Drop aborts.
    }
}

impl Drop for ProgressTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn advance_is_monotonic_and_stalls_at_ninety() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut progress = Progress::default();
        let mut last = 0.0;
        for _ in 0..1_000 {
            progress.advance(&mut rng);
            assert!(progress.value() >= last);
            assert!(progress.value() <= STALL_AT);
            last = progress.value();
        }
        assert_eq!(progress.value(), STALL_AT);
        assert!(!progress.is_complete());
    }

    #[test]
    fn completion_snaps_to_hundred_and_freezes() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut progress = Progress::default();
        progress.advance(&mut rng);
        progress.complete();
        progress.advance(&mut rng);
        assert_eq!(progress.value(), DONE);
    }

    #[tokio::test(start_paused = true)]
    async fn timer_stops_when_callback_says_so() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        let _timer = ProgressTimer::spawn(Duration::from_millis(150), move || {
            counter.fetch_add(1, Ordering::SeqCst) < 2
        });

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_no_longer_ticks() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        let timer = ProgressTimer::spawn(Duration::from_millis(150), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        });

        tokio::time::sleep(Duration::from_millis(500)).await;
        timer.cancel();
        let seen = ticks.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), seen);
        assert!(seen >= 2);
    }
}
