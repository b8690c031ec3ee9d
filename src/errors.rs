//! Error types for intent compilation
//!
//! Every failure is terminal for the compilation that produced it. Callers
//! should treat any error as "do not set this cookie".

use thiserror::Error;

/// Failures while parsing a `ReturnTo` scope pattern
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// Pattern is missing `://` or the host/path separator
    #[error("{pattern:?} is not in form {expected}")]
    Syntax {
        pattern: String,
        expected: &'static str,
    },

    /// Schema is neither `https` nor `https?`
    #[error("{0:?} schema is not https or https?")]
    Schema(String),

    /// Host is not `<current>` and not a `**.` suffix pattern
    #[error("{pattern:?} has invalid domain pattern: {reason}")]
    DomainPattern {
        pattern: String,
        reason: &'static str,
    },

    /// Path does not end in `**`
    #[error("{0:?} is not in form ...://.../...**")]
    PathPattern(String),
}

/// Baseline legality failures reported by the cookie container
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    #[error("invalid cookie name {0:?}")]
    InvalidName(String),

    #[error("invalid byte {0:#04x} in cookie value")]
    InvalidValue(u8),

    #[error("invalid byte {0:#04x} in cookie path")]
    InvalidPath(u8),

    #[error("invalid cookie domain {0:?}")]
    InvalidDomain(String),

    #[error("invalid cookie expiration: {0}")]
    InvalidExpires(String),
}

/// Failures while compiling an [`Intent`](crate::Intent)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("invalid ReturnTo: {0}")]
    Scope(#[from] ScopeError),

    #[error("expiration at and after are mutually exclusive")]
    ConflictingExpiration,

    #[error("at least one of WhenUaIsClosed, At, After, or Immediately needs to be set")]
    MissingExpiration,

    #[error("expiration after {0} seconds is out of range")]
    ExpirationOutOfRange(i64),

    #[error("{0}")]
    PrefixConstraint(&'static str),

    #[error("unsupported ReturnOnNavigationFrom value {0:?}")]
    UnsupportedPolicy(String),

    #[error("cookie with SameSite=None must be secure")]
    InsecureNone,

    #[error(transparent)]
    Container(#[from] ContainerError),
}
