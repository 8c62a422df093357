//! Caller-side cancellation for authentication attempts.
//!
//! An [`AuthContext`] carries an optional cancel signal and an optional
//! deadline. The signal is delivered by closing a channel, so waiters learn
//! about cancellation without polling and without any particular runtime.

use std::future;
use std::pin::pin;
use std::time::{Duration, Instant};

use async_channel::{Receiver, Sender};
use futures::future::select;
use futures_timer::Delay;

/// Cancellation and deadline for one authentication attempt.
///
/// The default context is never cancelled and has no deadline, so an
/// evaluation under it lasts until the platform reports an outcome.
///
/// # Example
///
/// ```ignore
/// let (ctx, handle) = AuthContext::with_cancel();
/// let ctx = ctx.timeout(Duration::from_secs(30));
///
/// std::thread::spawn(move || {
///     wait_for_user_abort();
///     handle.cancel();
/// });
///
/// touchkit_bridge::authenticate(&ctx, policy, "unlock vault").await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    cancel: Option<Receiver<()>>,
    deadline: Option<Instant>,
}

impl AuthContext {
    /// A context that is never cancelled.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// A context cancelled through the returned [`CancelHandle`].
    ///
    /// Dropping the handle cancels the context as well.
    #[must_use]
    pub fn with_cancel() -> (Self, CancelHandle) {
        let (sender, receiver) = async_channel::bounded(1);
        let ctx = Self {
            cancel: Some(receiver),
            deadline: None,
        };
        (ctx, CancelHandle { sender })
    }

    /// A context that expires `timeout` from now.
    ///
    /// A zero timeout means no deadline.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().timeout(timeout)
    }

    /// Add a deadline `timeout` from now, keeping any earlier one.
    ///
    /// A zero timeout leaves the context unchanged.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        if timeout.is_zero() {
            return self;
        }
        if let Some(deadline) = Instant::now().checked_add(timeout) {
            self.deadline = Some(self.deadline.map_or(deadline, |current| current.min(deadline)));
        }
        self
    }

    /// The instant this context expires, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Check whether the context is already cancelled or expired (non-blocking).
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(Receiver::is_closed)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Wait until the context is cancelled or its deadline passes.
    ///
    /// Never resolves for a background context.
    pub async fn cancelled(&self) {
        let signal = pin!(async {
            match &self.cancel {
                // Nothing is ever sent; recv errors out once the handle closes the channel.
                Some(receiver) => {
                    let _ = receiver.recv().await;
                }
                None => future::pending::<()>().await,
            }
        });
        let expiry = pin!(async {
            match self.deadline {
                Some(deadline) => {
                    Delay::new(deadline.saturating_duration_since(Instant::now())).await;
                }
                None => future::pending::<()>().await,
            }
        });
        select(signal, expiry).await;
    }
}

/// Cancels the [`AuthContext`] it was created with.
///
/// Cancellation happens on [`cancel()`](Self::cancel) or when the handle is
/// dropped, whichever comes first.
#[derive(Debug)]
pub struct CancelHandle {
    sender: Sender<()>,
}

impl CancelHandle {
    /// Cancel the associated context. Calling this more than once is harmless.
    pub fn cancel(&self) {
        self.sender.close();
    }
}

impl Drop for CancelHandle {
    fn drop(&mut self) {
        self.sender.close();
    }
}
