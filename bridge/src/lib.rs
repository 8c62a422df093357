//! This crate provides a safe, cancellable interface to the platform's
//! user-presence authentication service (`TouchID`, `FaceID`, or the device
//! owner's password).
//!
//! Each call owns one native authentication context for its whole duration:
//! [`can_authenticate`] asks whether a policy is satisfiable without showing
//! a prompt, and [`authenticate`] additionally prompts the user and waits for
//! the platform's answer, honoring the caller's [`AuthContext`].
//!
//! ```ignore
//! use std::time::Duration;
//! use touchkit_bridge::{AuthContext, Policy, authenticate};
//!
//! let ctx = AuthContext::with_timeout(Duration::from_secs(30));
//! match authenticate(&ctx, Policy::DeviceOwnerAuthentication, "unlock vault").await {
//!     Ok(()) => println!("welcome back"),
//!     Err(err) => eprintln!("authentication failed: {err}"),
//! }
//! ```

#![warn(missing_docs)]

mod context;
pub mod evaluator;
mod platform;
pub mod preflight;
mod session;
/// Platform-specific implementations.
pub mod sys;

#[cfg(test)]
mod mock;

use thiserror::Error;

pub use context::{AuthContext, CancelHandle};
pub use platform::{Platform, Reply};
pub use session::AuthSession;
pub use sys::SystemPlatform;
pub use touchkit_catalog::{ErrorKind, Policy};

/// Errors that can occur during authentication.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The platform reported a failure, or a policy that cannot be evaluated.
    #[error(transparent)]
    Auth(#[from] ErrorKind),
    /// The native authentication context could not be allocated.
    #[error("failed to create authentication context: {0}")]
    Session(String),
    /// The platform discarded the evaluation without reporting an outcome.
    #[error("platform dropped the authentication reply")]
    ReplyDropped,
    /// Invalid input (e.g. an empty reason).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl AuthError {
    /// The catalog error, if the platform reported one.
    #[must_use]
    pub const fn kind(&self) -> Option<&ErrorKind> {
        match self {
            Self::Auth(kind) => Some(kind),
            _ => None,
        }
    }

    /// Whether the evaluation ended because it was cancelled, including
    /// cancellation through an [`AuthContext`].
    #[must_use]
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::Auth(kind) if kind.is_cancellation())
    }
}

/// Check whether `policy` can currently be evaluated, without prompting.
///
/// # Errors
/// Returns an [`AuthError`] carrying the platform's reason if the policy is
/// not satisfiable right now (nothing enrolled, hardware unavailable,
/// lockout, ...).
pub fn can_authenticate(policy: Policy) -> Result<(), AuthError> {
    can_authenticate_with(&SystemPlatform, policy)
}

/// [`can_authenticate`] against an explicit [`Platform`].
///
/// # Errors
/// See [`can_authenticate`].
pub fn can_authenticate_with<P: Platform>(platform: &P, policy: Policy) -> Result<(), AuthError> {
    let session = AuthSession::create(platform)?;
    preflight::can_evaluate(&session, policy)?;
    Ok(())
}

/// Prompt the user to authenticate under `policy`.
///
/// `reason` is shown in the platform's prompt. The call returns once the
/// platform answers; cancelling `ctx` or reaching its deadline asks the
/// platform to abort, and the resulting cancellation is returned as the
/// error.
///
/// # Errors
/// Returns an [`AuthError`] if:
/// - `reason` is empty.
/// - The policy cannot be evaluated right now (no prompt is shown).
/// - The user fails or cancels the prompt, or `ctx` is cancelled.
pub async fn authenticate(
    ctx: &AuthContext,
    policy: Policy,
    reason: &str,
) -> Result<(), AuthError> {
    authenticate_with(&SystemPlatform, ctx, policy, reason).await
}

/// [`authenticate`] against an explicit [`Platform`].
///
/// # Errors
/// See [`authenticate`].
pub async fn authenticate_with<P: Platform>(
    platform: &P,
    ctx: &AuthContext,
    policy: Policy,
    reason: &str,
) -> Result<(), AuthError> {
    if reason.trim().is_empty() {
        return Err(AuthError::InvalidInput("reason cannot be empty".into()));
    }
    let session = AuthSession::create(platform)?;
    evaluator::evaluate(ctx, session, policy, reason).await
}

/// [`authenticate`], blocking the current thread until the platform answers.
///
/// Must not be called from inside an async runtime's worker.
///
/// # Errors
/// See [`authenticate`].
pub fn authenticate_blocking(
    ctx: &AuthContext,
    policy: Policy,
    reason: &str,
) -> Result<(), AuthError> {
    futures::executor::block_on(authenticate(ctx, policy, reason))
}
