//! Cooperative cancellation for long-running readers.
//!
//! A [`CancellationToken`] is created per run and handed to the follow loop,
//! which checks it only at safe points between reads.

use std::future::Future;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Cloneable cancellation flag with async wake-up
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation and wake every task waiting in [`cancelled`](Self::cancelled)
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolve once [`cancel`](Self::cancel) has been called
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            // Register before checking the flag so a concurrent cancel is not missed
            notified.as_mut().enable();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }

    /// Cancel on the first interrupt, then resolve on the second.
    ///
    /// `next_interrupt` waits for one interrupt per call. The caller decides
    /// what a second interrupt means; the binary exits. An error from the
    /// interrupt source is returned as is.
    pub async fn escalate<F, Fut>(&self, mut next_interrupt: F) -> io::Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = io::Result<()>>,
    {
        next_interrupt().await?;
        log::warn!("Interrupted; stopping follow (interrupt again to exit)");
        self.cancel();
        next_interrupt().await
    }
}
