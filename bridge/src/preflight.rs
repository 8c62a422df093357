//! Non-prompting capability check.

use log::debug;
use touchkit_catalog::{ErrorKind, Policy, check};

use crate::platform::Platform;
use crate::session::AuthSession;

/// Check whether `policy` can be evaluated on `session` right now.
///
/// Never shows a prompt and never waits.
///
/// # Errors
/// Returns the platform's reason (no enrollment, hardware unavailable,
/// lockout, ...) when the policy is not currently satisfiable.
pub fn can_evaluate<P: Platform>(
    session: &AuthSession<'_, P>,
    policy: Policy,
) -> Result<(), ErrorKind> {
    let result = check(session.can_evaluate(policy));
    match &result {
        Ok(()) => debug!("preflight passed for {}", policy.name()),
        Err(kind) => debug!("preflight failed for {}: {kind} ({})", policy.name(), kind.code()),
    }
    result
}
