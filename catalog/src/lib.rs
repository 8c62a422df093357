//! Error and policy catalogs for the LocalAuthentication framework.
//!
//! The tables in this crate are generated from the platform header by
//! `touchkit-gen` and are never edited by hand. Each entry pairs a stable
//! name with the platform's numeric code and a message suitable for display.
//! Codes missing from the catalog still map to a typed [`ErrorKind::Unknown`].

#![warn(missing_docs)]

#[rustfmt::skip]
mod generated;

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

pub use generated::{ERRORS, ErrorKind, POLICIES, Policy};

/// The code the platform reports when an evaluation succeeds.
pub const SUCCESS: i64 = 0;

/// One row of a generated catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<K> {
    /// The typed value this row describes.
    pub kind: K,
    /// Stable name, the header constant without its enum prefix.
    pub name: &'static str,
    /// Numeric value of the header constant.
    pub code: i64,
    /// Human-readable message.
    pub message: &'static str,
}

impl<K> Entry<K> {
    /// Build a catalog row.
    #[must_use]
    pub const fn new(kind: K, name: &'static str, code: i64, message: &'static str) -> Self {
        Self {
            kind,
            name,
            code,
            message,
        }
    }
}

fn lookup<K>(table: &'static [Entry<K>], code: i64) -> Option<&'static Entry<K>> {
    table
        .binary_search_by_key(&code, |entry| entry.code)
        .ok()
        .map(|index| &table[index])
}

/// Map a terminal platform code to an outcome.
///
/// [`SUCCESS`] yields `Ok(())`; every other code yields an [`ErrorKind`],
/// falling back to [`ErrorKind::Unknown`] for codes the catalog lacks.
///
/// # Errors
/// Returns the [`ErrorKind`] for any non-success code.
pub fn check(code: i64) -> Result<(), ErrorKind> {
    ErrorKind::from_code(code).map_or(Ok(()), Err)
}

impl ErrorKind {
    /// Look up the error for a platform code.
    ///
    /// Returns `None` only for [`SUCCESS`].
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        if code == SUCCESS {
            return None;
        }
        Some(lookup(ERRORS, code).map_or(Self::Unknown(code), |entry| entry.kind))
    }

    /// The catalog row for this error, `None` for [`ErrorKind::Unknown`].
    #[must_use]
    pub fn entry(&self) -> Option<&'static Entry<Self>> {
        match self {
            Self::Unknown(_) => None,
            known => lookup(ERRORS, known.code()),
        }
    }

    /// Stable name of this error.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.entry().map_or("Unknown", |entry| entry.name)
    }

    /// Human-readable message for this error.
    #[must_use]
    pub fn message(&self) -> Cow<'static, str> {
        match self.entry() {
            Some(entry) => Cow::Borrowed(entry.message),
            None => Cow::Owned(self.to_string()),
        }
    }

    /// Whether the platform reported the evaluation as cancelled, either by
    /// the user, the system, or the calling application.
    #[must_use]
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::UserCancel | Self::SystemCancel | Self::AppCancel)
    }
}

impl Policy {
    /// Look up the policy for a platform code.
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        lookup(POLICIES, code).map(|entry| entry.kind)
    }

    /// Stable name of this policy.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.entry().name
    }

    /// Human-readable description of this policy.
    #[must_use]
    pub fn message(self) -> &'static str {
        self.entry().message
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// The name given to [`Policy::from_str`] matched no cataloged policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown policy: {0}")]
pub struct UnknownPolicy(pub String);

impl FromStr for Policy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        POLICIES
            .iter()
            .find(|entry| entry.name == s)
            .map(|entry| entry.kind)
            .ok_or_else(|| UnknownPolicy(s.to_owned()))
    }
}
