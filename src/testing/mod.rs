//! Testing utilities for cookie-intent
//!
//! - [`fixtures`] - Pre-built intents, timestamps and catalogs
//! - [`assertions`] - Assertion helpers for compiled attributes and errors
//!
//! ## Usage
//!
//! ```rust
//! use cookie_intent::compile;
//! use cookie_intent::testing::{assert_secure_defaults, TestFixtures};
//!
//! let attributes = compile(&TestFixtures::basic_intent()).unwrap();
//! assert_secure_defaults(&attributes);
//! ```

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::TestFixtures;

/// Common test constants
pub mod constants {
    /// Default test cookie name
    pub const TEST_COOKIE_NAME: &str = "test";

    /// Default test cookie value
    pub const TEST_COOKIE_VALUE: &str = "value";

    /// One day in seconds
    pub const ONE_DAY_SECONDS: i64 = 86_400;

    /// Scope patterns that must be rejected by the parser
    pub const INVALID_RETURN_TO: &[&str] = &[
        "http:/**.example.com/**",
        "http://**.example.com/**",
        "https://example.com",
        "https://example.com/**",
        "https://**..example.com/**",
        "https://<current>/foo",
    ];
}
