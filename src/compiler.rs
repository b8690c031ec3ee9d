//! Intent compiler
//!
//! Turns an [`Intent`] into [`CookieAttributes`], rejecting every combination
//! that would produce an insecure or inconsistent cookie:
//!
//! 1. the `ReturnTo` pattern is parsed into Secure/Domain/Path
//! 2. the expiration is resolved into `Expires` or `Max-Age`
//! 3. `__Secure-` and `__Host-` name prefixes are checked against the scope
//! 4. the navigation policy is mapped onto `SameSite`
//! 5. `SameSite=None` requires a secure-only scope
//! 6. the cookie container validates the assembled cookie

use actix_web::cookie::{Cookie, SameSite};
use chrono::{DateTime, Utc};
use log::debug;

use crate::attributes::CookieAttributes;
use crate::container::CookieContainer;
use crate::errors::CompileError;
use crate::intent::{Expiration, Intent};
use crate::scope::{parse_return_to, Scope};

pub const SECURE_PREFIX: &str = "__Secure-";
pub const HOST_PREFIX: &str = "__Host-";

/// Compile an intent, validating it with the actix-web cookie container
///
/// # Errors
///
/// Returns the first violated constraint, see [`CompileError`]
pub fn compile(intent: &Intent) -> Result<CookieAttributes, CompileError> {
    compile_with::<Cookie<'static>>(intent)
}

/// Compile an intent and validate the result with a custom cookie container
///
/// # Errors
///
/// Returns the first violated constraint, see [`CompileError`]
pub fn compile_with<C: CookieContainer>(intent: &Intent) -> Result<CookieAttributes, CompileError> {
    match resolve::<C>(intent) {
        Ok(attributes) => {
            debug!(
                "Compiled cookie '{}': domain={:?}, path={}, secure={}, http_only={}, same_site={}",
                attributes.name,
                attributes.domain,
                attributes.path,
                attributes.secure,
                attributes.http_only,
                attributes.same_site
            );
            Ok(attributes)
        }
        Err(e) => {
            debug!("Rejected cookie '{}': {e}", intent.name);
            Err(e)
        }
    }
}

fn resolve<C: CookieContainer>(intent: &Intent) -> Result<CookieAttributes, CompileError> {
    let scope = parse_return_to(&intent.return_to)?;
    let (expires, max_age) = resolve_expiration(intent.expires)?;

    check_name_prefix(&intent.name, &scope)?;

    let same_site = intent.same_site();
    if same_site == SameSite::None && !scope.secure_only {
        return Err(CompileError::InsecureNone);
    }

    let attributes = CookieAttributes {
        name: intent.name.clone(),
        value: intent.value.clone(),
        domain: scope.domain,
        path: scope.path,
        expires,
        max_age,
        secure: scope.secure_only,
        http_only: !intent.reveal_to_javascript,
        same_site,
    };

    C::from_attributes(&attributes)?.validate()?;

    Ok(attributes)
}

/// Split an expiration into the `Expires` timestamp or `Max-Age` seconds
///
/// Relative durations are truncated to whole seconds.
fn resolve_expiration(
    expiration: Option<Expiration>,
) -> Result<(Option<DateTime<Utc>>, Option<i64>), CompileError> {
    match expiration {
        Some(Expiration::At(moment)) => Ok((Some(moment), None)),
        Some(Expiration::After(duration)) => Ok((None, Some(duration.num_seconds()))),
        Some(Expiration::WhenUaIsClosed) => Ok((None, None)),
        None => Err(CompileError::MissingExpiration),
    }
}

fn check_name_prefix(name: &str, scope: &Scope) -> Result<(), CompileError> {
    if name.starts_with(SECURE_PREFIX) && !scope.secure_only {
        return Err(CompileError::PrefixConstraint(
            "cookies named __Secure-* must use schema https:",
        ));
    }
    if name.starts_with(HOST_PREFIX) && !scope.is_host_prefix_compatible() {
        return Err(CompileError::PrefixConstraint(
            "cookies named __Host-* must have ReturnTo https://<current>/**",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ContainerError, ScopeError};
    use crate::intent::NavigationSource;
    use chrono::{Duration, TimeZone};

    fn day() -> Expiration {
        Expiration::after(Duration::hours(24))
    }

    fn basic() -> Intent {
        Intent::new("test", "value").expires(day())
    }

    #[test]
    fn test_basic_cookie() {
        let attrs = compile(&basic()).unwrap();

        assert_eq!(
            attrs,
            CookieAttributes {
                name: "test".to_string(),
                value: "value".to_string(),
                domain: String::new(),
                path: "/".to_string(),
                expires: None,
                max_age: Some(86_400),
                secure: true,
                http_only: true,
                same_site: SameSite::Lax,
            }
        );
    }

    #[test]
    fn test_absolute_expiration() {
        let moment = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let attrs = compile(&Intent::new("test", "value").expires(Expiration::at(moment))).unwrap();

        assert_eq!(attrs.expires, Some(moment));
        assert_eq!(attrs.max_age, None);
    }

    #[test]
    fn test_session_expiration() {
        let intent = Intent::new("session-cookie", "value").expires(Expiration::WHEN_UA_IS_CLOSED);
        let attrs = compile(&intent).unwrap();
        assert!(attrs.is_session());
    }

    #[test]
    fn test_immediate_and_zero_expiration() {
        let attrs = compile(&Intent::new("gone", "").expires(Expiration::immediately())).unwrap();
        assert_eq!(attrs.max_age, Some(-1));

        let intent = Intent::new("gone", "").expires(Expiration::after(Duration::zero()));
        let attrs = compile(&intent).unwrap();
        assert_eq!(attrs.max_age, Some(0));
    }

    #[test]
    fn test_duration_truncated_to_seconds() {
        let intent = Intent::new("test", "value")
            .expires(Expiration::after(Duration::milliseconds(1_999)));
        assert_eq!(compile(&intent).unwrap().max_age, Some(1));

        let intent = Intent::new("test", "value")
            .expires(Expiration::after(Duration::milliseconds(-1_500)));
        assert_eq!(compile(&intent).unwrap().max_age, Some(-1));
    }

    #[test]
    fn test_missing_expiration() {
        assert_eq!(
            compile(&Intent::new("test", "value")),
            Err(CompileError::MissingExpiration)
        );
    }

    #[test]
    fn test_scope_checked_before_expiration() {
        let intent = Intent::new("test", "value").return_to("http://<current>/**");
        assert!(matches!(
            compile(&intent),
            Err(CompileError::Scope(ScopeError::Schema(_)))
        ));
    }

    #[test]
    fn test_reveal_to_javascript() {
        let attrs = compile(&basic().reveal_to_javascript(true)).unwrap();
        assert!(!attrs.http_only);
    }

    #[test]
    fn test_domain_and_path_from_scope() {
        let attrs = compile(&basic().return_to("https?://**.example.com/app/**")).unwrap();
        assert_eq!(attrs.domain, "example.com");
        assert_eq!(attrs.path, "/app/");
        assert!(!attrs.secure);
    }

    #[test]
    fn test_prefixed_cookies() {
        assert!(compile(&Intent::new("__Host-test", "value").expires(day())).is_ok());
        assert!(compile(&Intent::new("__Secure-test", "value").expires(day())).is_ok());
        assert!(compile(
            &Intent::new("__Secure-test", "value")
                .expires(day())
                .return_to("https://**.example.com/app/**")
        )
        .is_ok());
    }

    #[test]
    fn test_prefix_violations() {
        let cases = [
            ("__Host-test", "https://**.example.com/**"),
            ("__Host-test", "https://<current>/foo/**"),
            ("__Host-test", "https?://<current>/**"),
            ("__Secure-test", "https?://<current>/**"),
        ];

        for (name, return_to) in cases {
            let intent = Intent::new(name, "value").expires(day()).return_to(return_to);
            assert!(
                matches!(compile(&intent), Err(CompileError::PrefixConstraint(_))),
                "{name} with {return_to}"
            );
        }
    }

    #[test]
    fn test_navigation_sources() {
        let strict = basic().return_on_navigation_from(NavigationSource::SameSite);
        let strict = compile(&strict).unwrap();
        assert_eq!(strict.same_site, SameSite::Strict);

        let lax = basic().return_on_navigation_from(NavigationSource::SameSiteOrAnySiteByUser);
        let lax = compile(&lax).unwrap();
        assert_eq!(lax.same_site, SameSite::Lax);

        let none = compile(&basic().return_on_navigation_from(NavigationSource::AnySite)).unwrap();
        assert_eq!(none.same_site, SameSite::None);
        assert!(none.secure);
    }

    #[test]
    fn test_bare_wildcard_domain_is_not_host_only() {
        let intent = Intent::new("__Host-x", "value")
            .expires(day())
            .return_to("https://**./**");
        assert!(matches!(
            compile(&intent),
            Err(CompileError::Scope(ScopeError::DomainPattern { .. }))
        ));
    }

    #[test]
    fn test_any_site_requires_secure() {
        let intent = basic()
            .return_to("https?://<current>/**")
            .return_on_navigation_from(NavigationSource::AnySite);
        assert_eq!(compile(&intent), Err(CompileError::InsecureNone));
    }

    #[test]
    fn test_delegated_validation() {
        let intent = Intent::new("test", "Ñ‰").expires(day());
        assert_eq!(
            compile(&intent),
            Err(CompileError::Container(ContainerError::InvalidValue(0xc3)))
        );

        let intent = basic().return_to("https://**.example.com.**/**");
        assert!(matches!(
            compile(&intent),
            Err(CompileError::Container(ContainerError::InvalidDomain(_)))
        ));
    }

    #[test]
    fn test_compile_is_deterministic() {
        let intent = basic()
            .return_to("https://**.example.com/**")
            .return_on_navigation_from(NavigationSource::AnySite);
        assert_eq!(compile(&intent).unwrap(), compile(&intent).unwrap());
    }

    struct RejectingContainer;

    impl CookieContainer for RejectingContainer {
        fn from_attributes(_attributes: &CookieAttributes) -> Result<Self, ContainerError> {
            Ok(Self)
        }

        fn validate(&self) -> Result<(), ContainerError> {
            Err(ContainerError::InvalidName("rejected".to_string()))
        }
    }

    #[test]
    fn test_custom_container_error_propagates() {
        assert_eq!(
            compile_with::<RejectingContainer>(&basic()),
            Err(CompileError::Container(ContainerError::InvalidName(
                "rejected".to_string()
            )))
        );
    }
}
