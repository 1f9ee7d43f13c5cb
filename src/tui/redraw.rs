//! Periodic bottom-border redraw while a line read is pending.
//!
//! Terminals give no scroll or resize notification to a line-mode reader, so
//! the border is repainted on a fixed interval instead.

use super::console::Console;
use super::prompt::redraw_bottom_border;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Repeating border redraw bound to one pending read.
pub struct RedrawTimer {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl RedrawTimer {
    /// Spawn the timer. The first redraw happens one `interval` after start.
    pub fn start(console: Console, interval: Duration) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut tick = tokio::time::interval(interval);
            tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // First tick completes immediately
            tick.tick().await;

            loop {
                tokio::select! {
                    biased;
                    () = token.cancelled() => break,
                    _ = tick.tick() => {
                        if let Err(e) = redraw_bottom_border(&console) {
                            tracing::debug!(error = %e, "Border redraw failed, stopping timer");
                            break;
                        }
                    }
                }
            }
        });

        Self {
            cancel,
            handle: Some(handle),
        }
    }

    /// Stop the timer and wait for its task to exit. No write happens after
    /// this returns. Calling it again is a no-op.
    pub async fn cancel(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take()
            && let Err(e) = handle.await
            && e.is_panic()
        {
            tracing::warn!("Border redraw task panicked");
        }
    }
}

impl Drop for RedrawTimer {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
