//! The seam between the bridge and a native authentication service.

use tokio::sync::oneshot;
use touchkit_catalog::{Policy, SUCCESS};

use crate::AuthError;

/// A native authentication service.
///
/// Implementors expose the four primitives of the service's context object.
/// The bridge owns sequencing: it creates one context per call, never
/// evaluates a context twice, and releases every context exactly once after
/// the evaluation's [`Reply`] has been delivered.
pub trait Platform {
    /// The native context handle.
    type Context;

    /// Allocate a fresh context.
    ///
    /// # Errors
    /// Returns [`AuthError::Session`] if the native resource cannot be allocated.
    fn create(&self) -> Result<Self::Context, AuthError>;

    /// Ask, without prompting, whether `policy` can be evaluated right now.
    ///
    /// Returns [`SUCCESS`] or the platform's reason code.
    fn can_evaluate(&self, context: &Self::Context, policy: Policy) -> i64;

    /// Start an evaluation and return immediately.
    ///
    /// The terminal outcome must be delivered through `reply`, from any
    /// thread. Dropping `reply` without answering wakes the caller with
    /// [`AuthError::ReplyDropped`].
    fn evaluate(&self, context: &Self::Context, policy: Policy, reason: &str, reply: Reply);

    /// Abort any in-flight or future evaluation on `context`.
    ///
    /// May run while an evaluation is in flight. The in-flight evaluation is
    /// still expected to answer its [`Reply`], typically with a
    /// cancellation-class code.
    fn invalidate(&self, context: &Self::Context);

    /// Free the native resource.
    fn release(&self, context: Self::Context);
}

/// Single-use completion for one evaluation.
///
/// Consumed by the first answer, so the waiting caller wakes exactly once.
#[derive(Debug)]
pub struct Reply {
    sender: oneshot::Sender<i64>,
    // Never sent on; closes when the reply is answered or dropped.
    _done: async_channel::Sender<()>,
}

/// The caller's end of a [`Reply`].
#[derive(Debug)]
pub(crate) struct Waiter {
    pub(crate) receiver: oneshot::Receiver<i64>,
    done: async_channel::Receiver<()>,
}

impl Reply {
    pub(crate) fn channel() -> (Self, Waiter) {
        let (sender, receiver) = oneshot::channel();
        let (done_sender, done) = async_channel::bounded(1);
        let reply = Self {
            sender,
            _done: done_sender,
        };
        (reply, Waiter { receiver, done })
    }

    /// Report that the evaluation succeeded.
    pub fn succeed(self) {
        self.finish(SUCCESS);
    }

    /// Report the platform's failure code.
    pub fn fail(self, code: i64) {
        self.finish(code);
    }

    fn finish(self, code: i64) {
        // The caller only goes away once the session is gone, so a closed receiver is benign.
        let _ = self.sender.send(code);
    }
}

impl Waiter {
    /// Park the current thread until the reply is answered or dropped.
    ///
    /// Needs no executor, so it is safe to call from a destructor that runs
    /// inside one.
    pub(crate) fn wait_blocking(&self) {
        // Nothing is ever sent; recv fails once the reply's sender is gone.
        let _ = self.done.recv_blocking();
    }
}
