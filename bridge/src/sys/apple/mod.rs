//! Apple platform (iOS/macOS) implementation on the LocalAuthentication framework.

use std::sync::Mutex;

use block2::RcBlock;
use log::warn;
use objc2::rc::Retained;
use objc2::runtime::Bool;
use objc2::{ClassType, msg_send};
use objc2_foundation::{NSError, NSInteger, NSString};
use objc2_local_authentication::{LAContext, LAPolicy};
use touchkit_catalog::{ErrorKind, Policy, SUCCESS};

use crate::AuthError;
use crate::platform::{Platform, Reply};

/// The LocalAuthentication service.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPlatform;

/// An owned `LAContext`.
#[derive(Debug)]
pub struct SystemContext(Retained<LAContext>);

// SAFETY: `LAContext` may be invalidated from any thread, and the session
// sequences every other call on it.
unsafe impl Send for SystemContext {}
unsafe impl Sync for SystemContext {}

#[allow(clippy::cast_possible_truncation)]
const fn la_policy(policy: Policy) -> LAPolicy {
    LAPolicy(policy.code() as NSInteger)
}

fn error_code(error: &NSError) -> i64 {
    error.code() as i64
}

impl Platform for SystemPlatform {
    type Context = SystemContext;

    fn create(&self) -> Result<SystemContext, AuthError> {
        // SAFETY: `+[LAContext new]` takes no arguments and returns a +1 reference or nil.
        let context: Option<Retained<LAContext>> = unsafe { msg_send![LAContext::class(), new] };
        context
            .map(SystemContext)
            .ok_or_else(|| AuthError::Session("LAContext allocation returned nil".into()))
    }

    fn can_evaluate(&self, context: &SystemContext, policy: Policy) -> i64 {
        // SAFETY: `canEvaluatePolicy:error:` only reads the context's state.
        match unsafe { context.0.canEvaluatePolicy_error(la_policy(policy)) } {
            Ok(()) => SUCCESS,
            Err(error) => error_code(&error),
        }
    }

    fn evaluate(&self, context: &SystemContext, policy: Policy, reason: &str, reply: Reply) {
        let reason = NSString::from_str(reason);
        // The framework calls the block once, on a private queue.
        let reply = Mutex::new(Some(reply));
        let block: RcBlock<dyn Fn(Bool, *mut NSError)> =
            RcBlock::new(move |success: Bool, error: *mut NSError| {
                let Some(reply) = reply.lock().ok().and_then(|mut slot| slot.take()) else {
                    return;
                };
                if success.as_bool() {
                    reply.succeed();
                    return;
                }
                // SAFETY: on failure the framework passes a valid NSError or nil.
                match unsafe { error.as_ref() } {
                    Some(error) => reply.fail(error_code(error)),
                    None => {
                        warn!("evaluation failed without an NSError");
                        reply.fail(ErrorKind::AuthenticationFailed.code());
                    }
                }
            });
        // SAFETY: `reason` is non-empty (checked by the entry points) and the
        // block matches the `(BOOL, NSError *)` reply signature.
        unsafe {
            context
                .0
                .evaluatePolicy_localizedReason_reply(la_policy(policy), &reason, &block);
        }
    }

    fn invalidate(&self, context: &SystemContext) {
        // SAFETY: `invalidate` is documented as callable while an evaluation is in flight.
        unsafe { context.0.invalidate() };
    }

    fn release(&self, context: SystemContext) {
        drop(context);
    }
}
