//! Assertion helpers for compiled cookies

use actix_web::cookie::SameSite;

use crate::attributes::CookieAttributes;
use crate::errors::CompileError;

/// Assert the most restrictive defaults: secure, host-only, root path,
/// HTTP-only and `SameSite=Lax`
///
/// # Panics
///
/// Panics if any of the default attributes differ.
pub fn assert_secure_defaults(attributes: &CookieAttributes) {
    assert!(attributes.secure, "Expected Secure for {}", attributes.name);
    assert!(
        attributes.domain.is_empty(),
        "Expected host-only cookie, got domain {:?}",
        attributes.domain
    );
    assert_eq!(attributes.path, "/", "Expected root path");
    assert!(attributes.http_only, "Expected HttpOnly for {}", attributes.name);
    assert_eq!(attributes.same_site, SameSite::Lax, "Expected SameSite=Lax");
}

/// Assert that exactly the given `Max-Age` is set and no `Expires`
///
/// # Panics
///
/// Panics if `max_age` differs or `expires` is set.
pub fn assert_max_age(attributes: &CookieAttributes, expected_seconds: i64) {
    assert_eq!(
        attributes.max_age,
        Some(expected_seconds),
        "Unexpected Max-Age for {}",
        attributes.name
    );
    assert!(
        attributes.expires.is_none(),
        "Expires and Max-Age must not both be set"
    );
}

/// Assert that a compilation failed with an error matching `predicate`
///
/// # Panics
///
/// Panics if the result is `Ok` or the error does not match.
pub fn assert_compile_error<T: std::fmt::Debug>(
    result: &Result<T, CompileError>,
    predicate: impl Fn(&CompileError) -> bool,
    description: &str,
) {
    match result {
        Ok(value) => panic!("Expected {description} error, got {value:?}"),
        Err(e) => assert!(predicate(e), "Expected {description} error, got {e:?}"),
    }
}
