use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// Process-wide Ctrl-C fan-out.
///
/// Once `tokio::signal::ctrl_c` has been awaited the default SIGINT action is
/// gone for good, so every consumer (model calls, plain stdin reads) watches
/// this one source instead of installing its own.
#[derive(Clone, Default)]
pub struct Interrupts {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    count: AtomicUsize,
    notify: Notify,
}

impl Interrupts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns the signal listener. Needs a multi-threaded runtime so the
    /// listener keeps running while the main thread blocks on a console read.
    pub fn listen() -> Self {
        let interrupts = Self::new();
        let listener = interrupts.clone();
        tokio::spawn(async move {
            loop {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::warn!(error = %e, "cannot listen for Ctrl-C");
                    break;
                }
                listener.trigger();
            }
        });
        interrupts
    }

    pub fn trigger(&self) {
        self.inner.count.fetch_add(1, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Number of interrupts seen so far.
    pub fn count(&self) -> usize {
        self.inner.count.load(Ordering::SeqCst)
    }

    /// Resolves on the next interrupt after this call.
    pub async fn wait(&self) {
        self.inner.notify.notified().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn wait_wakes_on_trigger() {
        let interrupts = Interrupts::new();
        let trigger = interrupts.clone();
        tokio::spawn(async move { trigger.trigger() });

        interrupts.wait().await;
        assert_eq!(interrupts.count(), 1);
    }
}
