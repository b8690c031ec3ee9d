#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![deny(warnings)]
#![allow(clippy::multiple_crate_versions)]

//! Compile declarative cookie intents into validated `Set-Cookie` attributes.
//!
//! ```rust
//! use chrono::Duration;
//! use cookie_intent::{compile, Expiration, Intent, NavigationSource};
//!
//! let attributes = compile(
//!     &Intent::new("__Host-ID", "12345")
//!         .expires(Expiration::after(Duration::hours(24)))
//!         .return_on_navigation_from(NavigationSource::SameSite),
//! )
//! .unwrap();
//!
//! assert!(attributes.secure);
//! assert!(attributes.http_only);
//! assert_eq!(attributes.path, "/");
//! assert_eq!(attributes.max_age, Some(86_400));
//! ```

/// Version of the cookie-intent crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod attributes;
pub mod compiler;
pub mod container;
pub mod errors;
pub mod intent;
pub mod scope;
pub mod settings;

// Testing utilities - available for unit tests and integration tests with the testing feature
#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use attributes::CookieAttributes;
pub use compiler::{compile, compile_with};
pub use container::CookieContainer;
pub use errors::{CompileError, ContainerError, ScopeError};
pub use intent::{Expiration, Intent, NavigationSource};
pub use scope::{parse_return_to, Scope};
pub use settings::CatalogSettings;
