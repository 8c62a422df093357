//! # Touchkit
//!
//! Safe, cancellable user-presence authentication through the platform's
//! built-in service (`TouchID`, `FaceID`, or the device owner's password).
//!
//! ## Features
//!
//! - `bridge` (default): the authentication bridge, [`authenticate`] and
//!   [`can_authenticate`].
//!
//! The error and policy catalogs are always available under [`catalog`].
//! Use the `full` feature to enable everything.
//!
//! ## Example
//!
//! ```toml
//! [dependencies]
//! touchkit = "0.1"
//! ```
//!
//! ```ignore
//! use std::time::Duration;
//! use touchkit::{AuthContext, Policy};
//!
//! async fn unlock() -> Result<(), touchkit::AuthError> {
//!     let ctx = AuthContext::with_timeout(Duration::from_secs(30));
//!     touchkit::authenticate(&ctx, Policy::DeviceOwnerAuthentication, "unlock vault").await
//! }
//! ```

pub use touchkit_catalog as catalog;
pub use touchkit_catalog::{ErrorKind, Policy};

#[cfg(feature = "bridge")]
pub use touchkit_bridge as bridge;

#[cfg(feature = "bridge")]
pub use touchkit_bridge::{
    AuthContext, AuthError, CancelHandle, authenticate, authenticate_blocking, can_authenticate,
};
