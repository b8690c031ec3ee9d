//! Declarative cookie intents
//!
//! An [`Intent`] states how a cookie should behave instead of listing raw
//! attributes. The compiler derives `Secure`, `Domain`, `Path`, `HttpOnly`,
//! `SameSite` and the expiry from it.

use std::fmt;
use std::str::FromStr;

use actix_web::cookie::SameSite;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CompileError;

/// Request sources from which the browser may send the cookie back
///
/// Each value maps onto a `SameSite` mode but is named after the navigation
/// it allows, `A` being the site that set the cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NavigationSource {
    /// `A->A`: only requests originating from the same site (`SameSite=Strict`)
    SameSite,
    /// `A->A,*-(user)->A`: same site, or any site on user navigation (`SameSite=Lax`)
    SameSiteOrAnySiteByUser,
    /// `*->A`: any site (`SameSite=None`)
    AnySite,
}

impl NavigationSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SameSite => "A->A",
            Self::SameSiteOrAnySiteByUser => "A->A,*-(user)->A",
            Self::AnySite => "*->A",
        }
    }

    /// The `SameSite` attribute this navigation policy compiles to
    #[must_use]
    pub const fn same_site(self) -> SameSite {
        match self {
            Self::SameSite => SameSite::Strict,
            Self::SameSiteOrAnySiteByUser => SameSite::Lax,
            Self::AnySite => SameSite::None,
        }
    }
}

impl fmt::Display for NavigationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NavigationSource {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A->A" => Ok(Self::SameSite),
            "A->A,*-(user)->A" => Ok(Self::SameSiteOrAnySiteByUser),
            "*->A" => Ok(Self::AnySite),
            other => Err(CompileError::UnsupportedPolicy(other.to_string())),
        }
    }
}

impl TryFrom<String> for NavigationSource {
    type Error = CompileError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NavigationSource> for String {
    fn from(source: NavigationSource) -> Self {
        source.as_str().to_string()
    }
}

/// When the browser should stop sending the cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiration {
    /// Session cookie, dropped when the user agent is closed
    WhenUaIsClosed,
    /// Absolute point in time (`Expires`)
    At(DateTime<Utc>),
    /// Relative to the moment the cookie is received (`Max-Age`)
    ///
    /// Zero or negative durations expire the cookie immediately.
    After(Duration),
}

impl Expiration {
    pub const WHEN_UA_IS_CLOSED: Self = Self::WhenUaIsClosed;

    #[must_use]
    pub const fn at(moment: DateTime<Utc>) -> Self {
        Self::At(moment)
    }

    #[must_use]
    pub const fn after(duration: Duration) -> Self {
        Self::After(duration)
    }

    /// Expiration that removes an existing cookie
    #[must_use]
    pub fn immediately() -> Self {
        Self::After(Duration::seconds(-1))
    }
}

/// Description of a browser cookie
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Intent {
    pub name: String,
    pub value: String,
    pub expires: Option<Expiration>,

    /// Pages the browser should return the cookie to, see [`crate::scope`].
    ///
    /// Empty defaults to the most restrictive `https://<current>/**`.
    pub return_to: String,

    /// `None` defaults to [`NavigationSource::SameSiteOrAnySiteByUser`]
    pub return_on_navigation_from: Option<NavigationSource>,
    pub reveal_to_javascript: bool,
}

impl Intent {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn expires(mut self, expiration: Expiration) -> Self {
        self.expires = Some(expiration);
        self
    }

    #[must_use]
    pub fn return_to(mut self, pattern: impl Into<String>) -> Self {
        self.return_to = pattern.into();
        self
    }

    #[must_use]
    pub fn return_on_navigation_from(mut self, source: NavigationSource) -> Self {
        self.return_on_navigation_from = Some(source);
        self
    }

    #[must_use]
    pub fn reveal_to_javascript(mut self, reveal: bool) -> Self {
        self.reveal_to_javascript = reveal;
        self
    }

    /// Effective `SameSite` mode, `Lax` when no policy was given
    #[must_use]
    pub fn same_site(&self) -> SameSite {
        self.return_on_navigation_from
            .map_or(SameSite::Lax, NavigationSource::same_site)
    }
}
