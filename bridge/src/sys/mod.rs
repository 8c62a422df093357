#[cfg(any(target_os = "ios", target_os = "macos"))]
pub mod apple;
#[cfg(any(target_os = "ios", target_os = "macos"))]
pub use apple::*;

#[cfg(not(any(target_os = "ios", target_os = "macos")))]
pub mod stub {
    //! Targets without a user-presence service: every policy is unavailable.

    use touchkit_catalog::{ErrorKind, Policy};

    use crate::AuthError;
    use crate::platform::{Platform, Reply};

    /// The platform authentication service of the current target.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemPlatform;

    /// Placeholder context; there is no native resource to hold.
    #[derive(Debug)]
    pub struct SystemContext;

    impl Platform for SystemPlatform {
        type Context = SystemContext;

        fn create(&self) -> Result<SystemContext, AuthError> {
            Ok(SystemContext)
        }

        fn can_evaluate(&self, _context: &SystemContext, _policy: Policy) -> i64 {
            ErrorKind::BiometryNotAvailable.code()
        }

        fn evaluate(&self, _context: &SystemContext, _policy: Policy, _reason: &str, reply: Reply) {
            reply.fail(ErrorKind::BiometryNotAvailable.code());
        }

        fn invalidate(&self, _context: &SystemContext) {}

        fn release(&self, _context: SystemContext) {}
    }
}
#[cfg(not(any(target_os = "ios", target_os = "macos")))]
pub use stub::*;
