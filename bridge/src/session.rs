//! Ownership of one native authentication context.

use std::fmt;
use std::mem::ManuallyDrop;
use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;
use touchkit_catalog::Policy;

use crate::AuthError;
use crate::platform::{Platform, Reply};

/// One authentication attempt's native context.
///
/// The context is created by [`AuthSession::create`] and released exactly
/// once when the session is dropped, on every exit path. Invalidation is
/// forwarded to the platform at most once no matter how often it is
/// requested.
pub struct AuthSession<'p, P: Platform> {
    platform: &'p P,
    context: ManuallyDrop<P::Context>,
    invalidated: AtomicBool,
}

impl<'p, P: Platform> AuthSession<'p, P> {
    /// Allocate a fresh native context.
    ///
    /// # Errors
    /// Returns [`AuthError::Session`] if the platform cannot allocate one.
    pub fn create(platform: &'p P) -> Result<Self, AuthError> {
        let context = platform.create()?;
        debug!("authentication session created");
        Ok(Self {
            platform,
            context: ManuallyDrop::new(context),
            invalidated: AtomicBool::new(false),
        })
    }

    /// Ask the platform to abort any in-flight or future evaluation.
    ///
    /// Only the first call reaches the platform.
    pub fn invalidate(&self) {
        if !self.invalidated.swap(true, Ordering::AcqRel) {
            debug!("invalidating authentication session");
            self.platform.invalidate(&self.context);
        }
    }

    /// Whether [`invalidate`](Self::invalidate) has been called.
    #[must_use]
    pub fn is_invalidated(&self) -> bool {
        self.invalidated.load(Ordering::Acquire)
    }

    pub(crate) fn can_evaluate(&self, policy: Policy) -> i64 {
        self.platform.can_evaluate(&self.context, policy)
    }

    pub(crate) fn begin(&self, policy: Policy, reason: &str, reply: Reply) {
        self.platform.evaluate(&self.context, policy, reason, reply);
    }
}

impl<P: Platform> Drop for AuthSession<'_, P> {
    fn drop(&mut self) {
        // SAFETY: `context` is never touched again after this point.
        let context = unsafe { ManuallyDrop::take(&mut self.context) };
        self.platform.release(context);
        debug!("authentication session released");
    }
}

impl<P: Platform> fmt::Debug for AuthSession<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("invalidated", &self.is_invalidated())
            .finish_non_exhaustive()
    }
}
