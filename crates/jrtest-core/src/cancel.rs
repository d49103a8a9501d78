//! Cancellation propagation for downstream calls

use crate::error::{ServiceError, ServiceResult};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

/// Handle for triggering cancellation
#[derive(Clone)]
pub struct CancelHandle {
    sender: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    /// Create a new, untriggered handle
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Trigger cancellation (idempotent)
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }

    /// Get a signal observing this handle
    pub fn signal(&self) -> CancelSignal {
        CancelSignal {
            receiver: Some(self.sender.subscribe()),
        }
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer side of a [`CancelHandle`], passed down every call chain
#[derive(Clone)]
pub struct CancelSignal {
    receiver: Option<watch::Receiver<bool>>,
}

impl CancelSignal {
    /// A signal that never fires
    pub fn never() -> Self {
        Self { receiver: None }
    }

    /// Check whether cancellation was requested (non-blocking)
    pub fn is_cancelled(&self) -> bool {
        self.receiver.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Fail fast with [`ServiceError::Cancelled`] if cancellation was requested
    pub fn check(&self) -> ServiceResult<()> {
        if self.is_cancelled() {
            Err(ServiceError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Wait until cancellation is requested.
    ///
    /// Returns immediately if already cancelled. Pends forever when the
    /// handle was dropped without cancelling.
    pub async fn cancelled(&self) {
        let Some(receiver) = &self.receiver else {
            return std::future::pending().await;
        };
        let mut receiver = receiver.clone();
        let fired = receiver.wait_for(|cancelled| *cancelled).await.map(|_| ()).is_ok();
        if !fired {
            std::future::pending::<()>().await;
        }
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::never()
    }
}

impl std::fmt::Debug for CancelSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelSignal")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Run `future` unless `signal` fires first
pub async fn run_cancellable<F, T>(signal: &CancelSignal, future: F) -> ServiceResult<T>
where
    F: Future<Output = ServiceResult<T>>,
{
    signal.check()?;
    tokio::select! {
        biased;
        _ = signal.cancelled() => Err(ServiceError::Cancelled),
        result = future => result,
    }
}
