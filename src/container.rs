//! Cookie container abstraction
//!
//! The compiler hands its resolved attributes to a container which owns the
//! wire representation and the baseline syntax rules of RFC 6265: legal
//! characters in name, value and path, a well-formed domain and a
//! representable expiry date.

use std::net::Ipv4Addr;

use actix_web::cookie::time::{Duration, OffsetDateTime};
use actix_web::cookie::Cookie;
use chrono::{DateTime, Utc};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::attributes::CookieAttributes;
use crate::errors::ContainerError;

// RFC 7230 token characters
static COOKIE_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[!#$%&'*+\-.^_`|~0-9A-Za-z]+$").unwrap());

// Host name label: letters, digits and inner hyphens, at most 63 characters
static DOMAIN_LABEL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$").unwrap());

const MAX_DOMAIN_LENGTH: usize = 255;
const MIN_EXPIRES_YEAR: i32 = 1601;

/// Wire-format cookie that can be built from compiled attributes
pub trait CookieContainer: Sized {
    /// Assemble a container holding exactly the given attributes
    ///
    /// # Errors
    ///
    /// Returns an error if an attribute cannot be represented by the container
    fn from_attributes(attributes: &CookieAttributes) -> Result<Self, ContainerError>;

    /// Check the baseline syntactic legality of the cookie
    ///
    /// # Errors
    ///
    /// Returns the first violated rule
    fn validate(&self) -> Result<(), ContainerError>;
}

impl CookieContainer for Cookie<'static> {
    fn from_attributes(attributes: &CookieAttributes) -> Result<Self, ContainerError> {
        let mut builder = Cookie::build(attributes.name.clone(), attributes.value.clone())
            .path(attributes.path.clone())
            .secure(attributes.secure)
            .http_only(attributes.http_only)
            .same_site(attributes.same_site);

        if !attributes.domain.is_empty() {
            builder = builder.domain(attributes.domain.clone());
        }
        if let Some(expires) = attributes.expires {
            builder = builder.expires(to_offset_date_time(expires)?);
        }
        if let Some(max_age) = attributes.max_age {
            builder = builder.max_age(Duration::seconds(max_age));
        }

        Ok(builder.finish())
    }

    fn validate(&self) -> Result<(), ContainerError> {
        if !is_valid_name(self.name()) {
            return Err(ContainerError::InvalidName(self.name().to_string()));
        }

        if let Some(expires) = self.expires_datetime() {
            if expires.year() < MIN_EXPIRES_YEAR {
                return Err(ContainerError::InvalidExpires(format!(
                    "year {} is before {MIN_EXPIRES_YEAR}",
                    expires.year()
                )));
            }
        }

        if let Some(byte) = self.value().bytes().find(|b| !is_value_byte(*b)) {
            return Err(ContainerError::InvalidValue(byte));
        }

        if let Some(path) = self.path() {
            if let Some(byte) = path.bytes().find(|b| !is_path_byte(*b)) {
                return Err(ContainerError::InvalidPath(byte));
            }
        }

        if let Some(domain) = self.domain() {
            if !is_valid_domain(domain) {
                debug!("Rejected cookie domain: {domain}");
                return Err(ContainerError::InvalidDomain(domain.to_string()));
            }
        }

        Ok(())
    }
}

fn to_offset_date_time(moment: DateTime<Utc>) -> Result<OffsetDateTime, ContainerError> {
    OffsetDateTime::from_unix_timestamp(moment.timestamp())
        .map_err(|e| ContainerError::InvalidExpires(e.to_string()))
}

fn is_valid_name(name: &str) -> bool {
    COOKIE_NAME_PATTERN.is_match(name)
}

fn is_value_byte(b: u8) -> bool {
    (0x20..0x7f).contains(&b) && b != b'"' && b != b';' && b != b'\\'
}

fn is_path_byte(b: u8) -> bool {
    (0x20..0x7f).contains(&b) && b != b';'
}

/// Host name or IPv4 literal, optionally with a leading dot
fn is_valid_domain(domain: &str) -> bool {
    if domain.parse::<Ipv4Addr>().is_ok() {
        return true;
    }

    let name = domain.strip_prefix('.').unwrap_or(domain);
    let name = name.strip_suffix('.').unwrap_or(name);
    if name.is_empty() || name.len() > MAX_DOMAIN_LENGTH {
        return false;
    }

    name.split('.').all(|label| DOMAIN_LABEL_PATTERN.is_match(label))
        && name.bytes().any(|b| b.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::SameSite;
    use chrono::TimeZone;

    fn attributes(name: &str, value: &str) -> CookieAttributes {
        CookieAttributes {
            name: name.to_string(),
            value: value.to_string(),
            domain: String::new(),
            path: "/".to_string(),
            expires: None,
            max_age: Some(60),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
        }
    }

    fn validate(attributes: &CookieAttributes) -> Result<(), ContainerError> {
        Cookie::from_attributes(attributes)?.validate()
    }

    #[test]
    fn test_assembles_all_attributes() {
        let attrs = CookieAttributes {
            domain: "example.com".to_string(),
            path: "/app/".to_string(),
            ..attributes("id", "abc")
        };
        let cookie = Cookie::from_attributes(&attrs).unwrap();

        assert_eq!(cookie.name(), "id");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.domain(), Some("example.com"));
        assert_eq!(cookie.path(), Some("/app/"));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age().unwrap().whole_seconds(), 60);
        assert!(cookie.expires().is_none());
    }

    #[test]
    fn test_valid_cookies() {
        assert!(validate(&attributes("test", "value")).is_ok());
        assert!(validate(&attributes("__Host-ID", "a b,c=d")).is_ok());
        assert!(validate(&attributes("session-cookie", "")).is_ok());
    }

    #[test]
    fn test_invalid_names() {
        for name in ["", "a b", "a;b", "a=b", "naïve", "(x)"] {
            assert!(
                matches!(
                    validate(&attributes(name, "v")),
                    Err(ContainerError::InvalidName(_))
                ),
                "name {name:?}"
            );
        }
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            validate(&attributes("test", "Ñ‰")),
            Err(ContainerError::InvalidValue(0xc3))
        );
        assert_eq!(
            validate(&attributes("test", "a;b")),
            Err(ContainerError::InvalidValue(b';'))
        );
        assert_eq!(
            validate(&attributes("test", "\"quoted\"")),
            Err(ContainerError::InvalidValue(b'"'))
        );
        assert_eq!(
            validate(&attributes("test", "a\\b")),
            Err(ContainerError::InvalidValue(b'\\'))
        );
        assert_eq!(
            validate(&attributes("test", "line\n")),
            Err(ContainerError::InvalidValue(b'\n'))
        );
    }

    #[test]
    fn test_invalid_path() {
        let attrs = CookieAttributes {
            path: "/a;b".to_string(),
            ..attributes("test", "value")
        };
        assert_eq!(validate(&attrs), Err(ContainerError::InvalidPath(b';')));
    }

    #[test]
    fn test_domains() {
        for domain in [
            "example.com",
            "a.b-c.example.com",
            "localhost",
            "10.0.0.1",
            "example.com.",
        ] {
            assert!(is_valid_domain(domain), "domain {domain:?}");
        }
        for domain in [
            "example.com.**",
            "example..com",
            "-example.com",
            "example-.com",
            "exa_mple.com",
            "123.456",
            "",
        ] {
            assert!(!is_valid_domain(domain), "domain {domain:?}");
        }
        assert!(!is_valid_domain(&format!("{}.com", "a".repeat(64))));
    }

    #[test]
    fn test_domain_rejected_through_container() {
        let attrs = CookieAttributes {
            domain: "example.com.**".to_string(),
            ..attributes("test", "value")
        };
        assert!(matches!(
            validate(&attrs),
            Err(ContainerError::InvalidDomain(_))
        ));
    }

    #[test]
    fn test_expires_year_limit() {
        let attrs = CookieAttributes {
            expires: Some(Utc.with_ymd_and_hms(1600, 12, 31, 0, 0, 0).unwrap()),
            max_age: None,
            ..attributes("test", "value")
        };
        assert!(matches!(
            validate(&attrs),
            Err(ContainerError::InvalidExpires(_))
        ));

        let attrs = CookieAttributes {
            expires: Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()),
            max_age: None,
            ..attributes("test", "value")
        };
        assert!(validate(&attrs).is_ok());
    }
}
