use actix_web::cookie::{Cookie, SameSite};
use chrono::{DateTime, Utc};

use crate::container::CookieContainer;
use crate::errors::ContainerError;

/// Fully resolved cookie attributes produced by the compiler
///
/// At most one of `expires` and `max_age` is set. Neither being set means a
/// session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieAttributes {
    pub name: String,
    pub value: String,
    /// Empty for a host-only cookie
    pub domain: String,
    pub path: String,
    pub expires: Option<DateTime<Utc>>,
    /// Seconds, zero or negative means immediate expiration
    pub max_age: Option<i64>,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
}

impl CookieAttributes {
    /// True when the cookie is dropped together with the browsing session
    #[must_use]
    pub fn is_session(&self) -> bool {
        self.expires.is_none() && self.max_age.is_none()
    }

    /// Build the wire cookie for these attributes
    ///
    /// # Errors
    ///
    /// Returns an error if the expiry cannot be represented by the cookie container
    pub fn to_cookie(&self) -> Result<Cookie<'static>, ContainerError> {
        <Cookie<'static> as CookieContainer>::from_attributes(self)
    }

    /// Serialize to a `Set-Cookie` header value
    ///
    /// # Errors
    ///
    /// Returns an error if the expiry cannot be represented by the cookie container
    pub fn to_header_value(&self) -> Result<String, ContainerError> {
        self.to_cookie().map(|cookie| cookie.to_string())
    }
}
