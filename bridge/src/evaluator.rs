//! One prompting evaluation, bridged from the platform's callback to an
//! awaitable, cancellable call.
//!
//! The platform answers from its own execution context through a [`Reply`];
//! the caller awaits the matching one-shot receiver. Cancellation of the
//! [`AuthContext`] only invalidates the session: the call still waits for
//! the platform's own terminal code, which is then mapped through the
//! catalog like any other.

use std::pin::pin;

use futures::future::{Either, select};
use log::{debug, info, warn};
use tokio::sync::oneshot;
use touchkit_catalog::{Policy, check};

use crate::AuthError;
use crate::context::AuthContext;
use crate::platform::{Platform, Reply, Waiter};
use crate::preflight;
use crate::session::AuthSession;

/// Run one evaluation of `policy` on `session`, consuming it.
///
/// Preflight runs first so that no prompt is shown for an attempt that is
/// bound to fail. Once the prompt is issued, cancelling `ctx` (or reaching
/// its deadline) invalidates the session, and the call returns whatever the
/// platform reports afterwards. The session is released after the platform
/// has answered, on every path.
///
/// # Errors
/// Returns [`AuthError::Auth`] with the preflight or terminal code, or
/// [`AuthError::ReplyDropped`] if the platform never answered.
pub async fn evaluate<P: Platform>(
    ctx: &AuthContext,
    session: AuthSession<'_, P>,
    policy: Policy,
    reason: &str,
) -> Result<(), AuthError> {
    preflight::can_evaluate(&session, policy)?;

    let (reply, waiter) = Reply::channel();
    debug!("evaluating {}", policy.name());
    session.begin(policy, reason, reply);

    let mut outstanding = Outstanding {
        session: &session,
        waiter,
        settled: false,
    };
    let code = outstanding.settle(ctx).await;
    drop(outstanding);
    drop(session);

    let code = code.map_err(|_| {
        warn!("platform dropped the authentication reply");
        AuthError::ReplyDropped
    })?;
    check(code).map_err(AuthError::from)
}

/// An issued evaluation whose reply has not been received yet.
///
/// If the caller stops waiting (the future is dropped), the session is
/// invalidated and the thread parks until the platform answers, so the
/// session is never released while the platform still holds it.
struct Outstanding<'s, 'p, P: Platform> {
    session: &'s AuthSession<'p, P>,
    waiter: Waiter,
    settled: bool,
}

impl<P: Platform> Outstanding<'_, '_, P> {
    async fn settle(&mut self, ctx: &AuthContext) -> Result<i64, oneshot::error::RecvError> {
        let cancelled = pin!(ctx.cancelled());
        let outcome = match select(&mut self.waiter.receiver, cancelled).await {
            // Completion first: the cancellation observer is dropped with the select.
            Either::Left((outcome, _)) => outcome,
            Either::Right(((), receiver)) => {
                info!("authentication context cancelled, invalidating session");
                self.session.invalidate();
                receiver.await
            }
        };
        self.settled = true;
        outcome
    }
}

impl<P: Platform> Drop for Outstanding<'_, '_, P> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("authentication abandoned mid-evaluation, waiting for the platform to answer");
            self.session.invalidate();
            self.waiter.wait_blocking();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use futures_timer::Delay;
    use touchkit_catalog::{ErrorKind, SUCCESS};

    use super::*;
    use crate::mock::{Event, MockPlatform, Outcome};

    const POLICY: Policy = Policy::DeviceOwnerAuthenticationWithBiometrics;

    async fn run(platform: &MockPlatform, ctx: &AuthContext) -> Result<(), AuthError> {
        let session = AuthSession::create(platform)?;
        evaluate(ctx, session, POLICY, "unlock vault").await
    }

    #[tokio::test]
    async fn success_without_timeout() {
        let platform = MockPlatform::new(Outcome::Succeed);
        let result = run(&platform, &AuthContext::with_timeout(Duration::ZERO)).await;
        assert_eq!(result, Ok(()));
        assert_eq!(
            platform.events(),
            [
                Event::Create,
                Event::Preflight,
                Event::Evaluate,
                Event::Answer,
                Event::Release
            ]
        );
    }

    #[tokio::test]
    async fn preflight_failure_never_prompts() {
        let platform =
            MockPlatform::new(Outcome::Succeed).preflight(ErrorKind::BiometryNotEnrolled.code());
        let result = run(&platform, &AuthContext::background()).await;
        assert_eq!(result, Err(AuthError::Auth(ErrorKind::BiometryNotEnrolled)));
        assert_eq!(platform.count(Event::Evaluate), 0);
        assert_eq!(
            platform.events(),
            [Event::Create, Event::Preflight, Event::Release]
        );
    }

    #[tokio::test]
    async fn user_cancel_is_reported_without_invalidation() {
        let platform = MockPlatform::new(Outcome::Fail(ErrorKind::UserCancel.code()));
        let result = run(&platform, &AuthContext::background()).await;
        assert_eq!(result, Err(AuthError::Auth(ErrorKind::UserCancel)));
        assert_eq!(platform.count(Event::Create), 1);
        assert_eq!(platform.count(Event::Release), 1);
        assert_eq!(platform.count(Event::Invalidate), 0);
    }

    #[tokio::test]
    async fn deadline_invalidates_and_returns_platform_code() {
        let platform = MockPlatform::new(Outcome::UntilInvalidated(ErrorKind::AppCancel.code()));
        let start = Instant::now();
        let ctx = AuthContext::with_timeout(Duration::from_millis(10));

        let result = tokio::time::timeout(Duration::from_secs(2), run(&platform, &ctx))
            .await
            .expect("evaluation must not hang past its deadline");

        let elapsed = start.elapsed();
        assert_eq!(result, Err(AuthError::Auth(ErrorKind::AppCancel)));
        assert!(elapsed >= Duration::from_millis(10));
        assert!(elapsed < Duration::from_millis(110), "took {elapsed:?}");
        assert_eq!(
            platform.events(),
            [
                Event::Create,
                Event::Preflight,
                Event::Evaluate,
                Event::Invalidate,
                Event::Answer,
                Event::Release
            ]
        );
    }

    #[tokio::test]
    async fn pre_cancelled_context_still_issues_the_evaluation() {
        let platform = MockPlatform::new(Outcome::UntilInvalidated(ErrorKind::SystemCancel.code()));
        let (ctx, handle) = AuthContext::with_cancel();
        handle.cancel();

        let result = run(&platform, &ctx).await;
        assert_eq!(result, Err(AuthError::Auth(ErrorKind::SystemCancel)));
        assert!(result.unwrap_err().is_cancellation());
        assert_eq!(platform.count(Event::Evaluate), 1);
        assert_eq!(platform.count(Event::Invalidate), 1);
        assert_eq!(platform.count(Event::Release), 1);
    }

    #[tokio::test]
    async fn completion_wins_over_pending_cancellation() {
        let platform = MockPlatform::new(Outcome::Succeed);
        let (ctx, handle) = AuthContext::with_cancel();
        handle.cancel();

        // The reply is already there when the wait starts, so nothing is invalidated.
        assert_eq!(run(&platform, &ctx).await, Ok(()));
        assert_eq!(platform.count(Event::Invalidate), 0);
    }

    #[tokio::test]
    async fn reply_from_another_thread() {
        let platform = MockPlatform::new(Outcome::Deferred(SUCCESS, Duration::from_millis(5)));
        assert_eq!(run(&platform, &AuthContext::background()).await, Ok(()));
        assert_eq!(platform.count(Event::Release), 1);
    }

    #[tokio::test]
    async fn dropped_reply_wakes_the_caller() {
        let platform = MockPlatform::new(Outcome::Abandon);
        let result = run(&platform, &AuthContext::background()).await;
        assert_eq!(result, Err(AuthError::ReplyDropped));
        assert_eq!(platform.count(Event::Release), 1);
    }

    #[tokio::test]
    async fn unknown_code_is_typed() {
        let platform = MockPlatform::new(Outcome::Fail(-4242));
        let result = run(&platform, &AuthContext::background()).await;
        assert_eq!(result, Err(AuthError::Auth(ErrorKind::Unknown(-4242))));
    }

    #[tokio::test]
    async fn abandoned_future_invalidates_before_release() {
        let platform = MockPlatform::new(Outcome::UntilInvalidated(ErrorKind::AppCancel.code()));
        let waited = tokio::time::timeout(
            Duration::from_millis(10),
            run(&platform, &AuthContext::background()),
        )
        .await;
        assert!(waited.is_err());
        assert_eq!(
            platform.events(),
            [
                Event::Create,
                Event::Preflight,
                Event::Evaluate,
                Event::Invalidate,
                Event::Answer,
                Event::Release
            ]
        );
    }

    /// Drive `evaluate` inside a futures executor and drop it once `after` elapses.
    fn abandon_under_executor(
        platform: &MockPlatform,
        after: Duration,
    ) -> Option<Result<(), AuthError>> {
        let ctx = AuthContext::background();
        let session = AuthSession::create(platform).unwrap();
        futures::executor::block_on(async {
            let evaluation = Box::pin(evaluate(&ctx, session, POLICY, "unlock vault"));
            match select(evaluation, Delay::new(after)).await {
                Either::Left((result, _)) => Some(result),
                Either::Right(((), evaluation)) => {
                    drop(evaluation);
                    None
                }
            }
        })
    }

    #[test]
    fn abandoned_inside_a_futures_executor() {
        let platform = MockPlatform::new(Outcome::UntilInvalidated(ErrorKind::AppCancel.code()));
        assert_eq!(abandon_under_executor(&platform, Duration::from_millis(10)), None);
        assert_eq!(
            platform.events(),
            [
                Event::Create,
                Event::Preflight,
                Event::Evaluate,
                Event::Invalidate,
                Event::Answer,
                Event::Release
            ]
        );
    }

    #[test]
    fn abandoned_evaluation_is_released_only_after_the_late_answer() {
        let platform = MockPlatform::new(Outcome::Deferred(
            ErrorKind::AppCancel.code(),
            Duration::from_millis(60),
        ));
        let start = Instant::now();
        assert_eq!(abandon_under_executor(&platform, Duration::from_millis(10)), None);

        assert!(start.elapsed() >= Duration::from_millis(60));
        assert_eq!(platform.count(Event::Invalidate), 1);
        assert_eq!(platform.events().last(), Some(&Event::Release));
    }
}
