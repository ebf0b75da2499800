#![cfg_attr(not(feature = "rate-limit"), allow(dead_code))]

use std::collections::VecDeque;
use std::sync::{Arc, LazyLock};

use tokio::sync::Mutex;
#[cfg(feature = "rate-limit")]
use tokio::time::sleep_until;
use tokio::time::{Duration, Instant};

/// The API allows at most 45 requests per minute, as per
/// <https://wallhaven.cc/help/api#limits>. The limit applies per client IP,
/// so it is enforced across every [`Client`][super::Client] in the process.
const WINDOW_CALLS: usize = 45;
const WINDOW_PERIOD: Duration = Duration::from_secs(60);

static GLOBAL: LazyLock<RateLimit> = LazyLock::new(|| RateLimit::with_limit(WINDOW_CALLS, WINDOW_PERIOD));

/// Sliding-window rate limiter. Cloned handles share their window.
#[derive(Debug, Clone)]
pub(crate) struct RateLimit {
    // Use a tokio mutex for fairness; waiting out the window is far too
    // long to block an async task on a std lock.
    calls: Arc<Mutex<VecDeque<Instant>>>,
    window_calls: usize,
    window_period: Duration,
}

impl RateLimit {
    /// The process-wide limiter every client shares.
    pub(crate) fn global() -> Self {
        GLOBAL.clone()
    }

    fn with_limit(window_calls: usize, window_period: Duration) -> Self {
        RateLimit {
            calls: Arc::new(Mutex::new(VecDeque::with_capacity(window_calls))),
            window_calls,
            window_period,
        }
    }

    /// Claims a call slot, sleeping until one frees if the window is full.
    #[cfg(feature = "rate-limit")]
    pub(crate) async fn acquire(&self) {
        loop {
            let wake = {
                let mut calls = self.calls.lock().await;
                let now = Instant::now();

                while calls
                    .front()
                    .is_some_and(|&call| now.duration_since(call) >= self.window_period)
                {
                    calls.pop_front();
                }

                if calls.len() < self.window_calls {
                    calls.push_back(now);
                    return;
                }

                // full window: the oldest call ages out first
                calls[0] + self.window_period
            };

            sleep_until(wake).await;
        }
    }

    #[cfg(not(feature = "rate-limit"))]
    pub(crate) async fn acquire(&self) {}
}
