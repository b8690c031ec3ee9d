//! `ReturnTo` scope patterns
//!
//! A scope pattern has the form `<schema>://<host>/<path>` where
//!
//! - schema is `https` (secure only) or `https?` (any transport)
//! - host is `<current>` (exact current host) or `**.example.com` (suffix match)
//! - path ends with `**` and denotes a prefix match, e.g. `/**` or `/app/**`
//!
//! The empty pattern means the most restrictive `https://<current>/**`.

use std::str::FromStr;

use crate::errors::ScopeError;

const CURRENT_HOST: &str = "<current>";
const DOMAIN_WILDCARD: &str = "**.";
const PATH_WILDCARD: &str = "**";

/// Secure/Domain/Path triple derived from a scope pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    /// Only send over an encrypted transport
    pub secure_only: bool,
    /// Domain suffix without leading dot, empty for the exact current host
    pub domain: String,
    /// Path prefix, always starting with `/`
    pub path: String,
}

impl Default for Scope {
    fn default() -> Self {
        Self {
            secure_only: true,
            domain: String::new(),
            path: "/".to_string(),
        }
    }
}

impl Scope {
    /// True when the cookie is bound to the exact current host
    #[must_use]
    pub fn is_host_only(&self) -> bool {
        self.domain.is_empty()
    }

    /// True when the scope satisfies the `__Host-` prefix requirements
    #[must_use]
    pub fn is_host_prefix_compatible(&self) -> bool {
        self.secure_only && self.is_host_only() && self.path == "/"
    }
}

impl FromStr for Scope {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_return_to(s)
    }
}

/// Parse a `ReturnTo` pattern into a [`Scope`]
///
/// # Errors
///
/// Returns a [`ScopeError`] describing the first grammar violation found.
pub fn parse_return_to(return_to: &str) -> Result<Scope, ScopeError> {
    if return_to.is_empty() {
        return Ok(Scope::default());
    }

    let (schema, rest) = return_to
        .split_once("://")
        .ok_or_else(|| ScopeError::Syntax {
            pattern: return_to.to_string(),
            expected: "...://...",
        })?;

    let secure_only = match schema {
        "https" => true,
        "https?" => false,
        _ => return Err(ScopeError::Schema(return_to.to_string())),
    };

    let (host, path) = rest.split_once('/').ok_or_else(|| ScopeError::Syntax {
        pattern: return_to.to_string(),
        expected: "...://.../...",
    })?;

    let domain = parse_host(return_to, host)?;

    let prefix = path
        .strip_suffix(PATH_WILDCARD)
        .ok_or_else(|| ScopeError::PathPattern(return_to.to_string()))?;

    Ok(Scope {
        secure_only,
        domain,
        path: format!("/{prefix}"),
    })
}

fn parse_host(return_to: &str, host: &str) -> Result<String, ScopeError> {
    if host == CURRENT_HOST {
        return Ok(String::new());
    }

    let suffix = host
        .strip_prefix(DOMAIN_WILDCARD)
        .ok_or_else(|| ScopeError::DomainPattern {
            pattern: return_to.to_string(),
            reason: "explicit domain without **.",
        })?;

    if suffix.is_empty() {
        return Err(ScopeError::DomainPattern {
            pattern: return_to.to_string(),
            reason: "wildcard without a domain suffix",
        });
    }

    if suffix.starts_with('.') {
        return Err(ScopeError::DomainPattern {
            pattern: return_to.to_string(),
            reason: "domain should not have form **..example.com",
        });
    }

    Ok(suffix.to_string())
}
