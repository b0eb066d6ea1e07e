//! Minimum spacing between consecutive model invocations

use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Keeps model calls at least `min_interval` apart.
///
/// The first call goes out immediately and nothing waits after the last one.
#[derive(Debug)]
pub struct RequestPacer {
    min_interval: Duration,
    last_call: Option<Instant>,
}

impl RequestPacer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: None,
        }
    }

    /// Wait until the next call may start, then claim the slot
    pub async fn ready(&mut self) {
        if let Some(last) = self.last_call {
            let next = last + self.min_interval;
            let now = Instant::now();
            if next > now {
                debug!("Waiting {:?} before the next model call", next - now);
                tokio::time::sleep_until(next).await;
            }
        }
        self.last_call = Some(Instant::now());
    }
}
