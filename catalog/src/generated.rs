// @generated by touchkit-gen from <LocalAuthentication/LocalAuthentication.h>. Do not edit.

use crate::Entry;

/// A failure reported by the platform authentication service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ErrorKind {
    /// `LAErrorNotInteractive` (-1004).
    #[error("not interactive")]
    NotInteractive,
    /// `LAErrorInvalidDimensions` (-14).
    #[error("invalid dimensions")]
    InvalidDimensions,
    /// `LAErrorBiometryDisconnected` (-13).
    #[error("biometry disconnected")]
    BiometryDisconnected,
    /// `LAErrorBiometryNotPaired` (-12).
    #[error("biometry not paired")]
    BiometryNotPaired,
    /// `LAErrorCompanionNotAvailable` (-11).
    #[error("companion not available")]
    CompanionNotAvailable,
    /// `LAErrorInvalidContext` (-10).
    #[error("invalid context")]
    InvalidContext,
    /// `LAErrorAppCancel` (-9).
    #[error("app cancel")]
    AppCancel,
    /// `LAErrorBiometryLockout` (-8).
    #[error("biometry lockout")]
    BiometryLockout,
    /// `LAErrorBiometryNotEnrolled` (-7).
    #[error("biometry not enrolled")]
    BiometryNotEnrolled,
    /// `LAErrorBiometryNotAvailable` (-6).
    #[error("biometry not available")]
    BiometryNotAvailable,
    /// `LAErrorPasscodeNotSet` (-5).
    #[error("passcode not set")]
    PasscodeNotSet,
    /// `LAErrorSystemCancel` (-4).
    #[error("system cancel")]
    SystemCancel,
    /// `LAErrorUserFallback` (-3).
    #[error("user fallback")]
    UserFallback,
    /// `LAErrorUserCancel` (-2).
    #[error("user cancel")]
    UserCancel,
    /// `LAErrorAuthenticationFailed` (-1).
    #[error("authentication failed")]
    AuthenticationFailed,
    /// A code with no catalog entry.
    #[error("unknown code {0}")]
    Unknown(i64),
}

impl ErrorKind {
    /// The platform's numeric code for this error.
    #[must_use]
    pub const fn code(&self) -> i64 {
        match self {
            Self::NotInteractive => -1004,
            Self::InvalidDimensions => -14,
            Self::BiometryDisconnected => -13,
            Self::BiometryNotPaired => -12,
            Self::CompanionNotAvailable => -11,
            Self::InvalidContext => -10,
            Self::AppCancel => -9,
            Self::BiometryLockout => -8,
            Self::BiometryNotEnrolled => -7,
            Self::BiometryNotAvailable => -6,
            Self::PasscodeNotSet => -5,
            Self::SystemCancel => -4,
            Self::UserFallback => -3,
            Self::UserCancel => -2,
            Self::AuthenticationFailed => -1,
            Self::Unknown(code) => *code,
        }
    }
}

/// Every cataloged error, sorted by code.
pub const ERRORS: &[Entry<ErrorKind>] = &[
    Entry::new(ErrorKind::NotInteractive, "NotInteractive", -1004, "not interactive"),
    Entry::new(ErrorKind::InvalidDimensions, "InvalidDimensions", -14, "invalid dimensions"),
    Entry::new(ErrorKind::BiometryDisconnected, "BiometryDisconnected", -13, "biometry disconnected"),
    Entry::new(ErrorKind::BiometryNotPaired, "BiometryNotPaired", -12, "biometry not paired"),
    Entry::new(ErrorKind::CompanionNotAvailable, "CompanionNotAvailable", -11, "companion not available"),
    Entry::new(ErrorKind::InvalidContext, "InvalidContext", -10, "invalid context"),
    Entry::new(ErrorKind::AppCancel, "AppCancel", -9, "app cancel"),
    Entry::new(ErrorKind::BiometryLockout, "BiometryLockout", -8, "biometry lockout"),
    Entry::new(ErrorKind::BiometryNotEnrolled, "BiometryNotEnrolled", -7, "biometry not enrolled"),
    Entry::new(ErrorKind::BiometryNotAvailable, "BiometryNotAvailable", -6, "biometry not available"),
    Entry::new(ErrorKind::PasscodeNotSet, "PasscodeNotSet", -5, "passcode not set"),
    Entry::new(ErrorKind::SystemCancel, "SystemCancel", -4, "system cancel"),
    Entry::new(ErrorKind::UserFallback, "UserFallback", -3, "user fallback"),
    Entry::new(ErrorKind::UserCancel, "UserCancel", -2, "user cancel"),
    Entry::new(ErrorKind::AuthenticationFailed, "AuthenticationFailed", -1, "authentication failed"),
];

/// A class of proof the platform accepts for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    /// `LAPolicyDeviceOwnerAuthenticationWithBiometrics` (1).
    DeviceOwnerAuthenticationWithBiometrics,
    /// `LAPolicyDeviceOwnerAuthentication` (2).
    DeviceOwnerAuthentication,
}

impl Policy {
    /// The platform's numeric code for this policy.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::DeviceOwnerAuthenticationWithBiometrics => 1,
            Self::DeviceOwnerAuthentication => 2,
        }
    }

    /// The catalog row for this policy.
    pub(crate) fn entry(self) -> &'static Entry<Self> {
        match self {
            Self::DeviceOwnerAuthenticationWithBiometrics => &POLICIES[0],
            Self::DeviceOwnerAuthentication => &POLICIES[1],
        }
    }
}

/// Every cataloged policy, sorted by code.
pub const POLICIES: &[Entry<Policy>] = &[
    Entry::new(Policy::DeviceOwnerAuthenticationWithBiometrics, "DeviceOwnerAuthenticationWithBiometrics", 1, "device owner authentication with biometrics"),
    Entry::new(Policy::DeviceOwnerAuthentication, "DeviceOwnerAuthentication", 2, "device owner authentication"),
];
