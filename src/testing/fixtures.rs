//! Test fixtures providing pre-built intents

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::intent::{Expiration, Intent, NavigationSource};
use crate::settings::CatalogSettings;

use super::constants::{TEST_COOKIE_NAME, TEST_COOKIE_VALUE};

/// Central fixture provider for all test data
pub struct TestFixtures;

impl TestFixtures {
    /// Fixed point in time, 2020-01-01T00:00:00Z
    ///
    /// # Panics
    ///
    /// Never, the date is valid
    #[must_use]
    pub fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
    }

    /// Relative expiration of 24 hours
    #[must_use]
    pub fn one_day() -> Expiration {
        Expiration::after(Duration::hours(24))
    }

    /// `test=value` expiring after 24 hours with every other field defaulted
    #[must_use]
    pub fn basic_intent() -> Intent {
        Intent::new(TEST_COOKIE_NAME, TEST_COOKIE_VALUE).expires(Self::one_day())
    }

    /// `__Host-` prefixed intent with the default scope
    #[must_use]
    pub fn host_intent() -> Intent {
        Intent::new("__Host-ID", "12345").expires(Self::one_day())
    }

    /// Cross-site intent scoped to every subdomain of `example.com`
    #[must_use]
    pub fn cross_site_intent() -> Intent {
        Self::basic_intent()
            .return_to("https://**.example.com/**")
            .return_on_navigation_from(NavigationSource::AnySite)
    }

    /// Catalog TOML with one valid entry of each expiration kind
    #[must_use]
    pub fn catalog_toml() -> &'static str {
        r#"
[logging]
level = "warn"

[[cookies]]
name = "__Host-ID"
value = "12345"
return_on_navigation_from = "A->A"

[cookies.expires]
after_seconds = 86400

[[cookies]]
name = "remember"
value = "yes"
return_to = "https://**.example.com/**"
return_on_navigation_from = "*->A"

[cookies.expires]
at = "2020-01-01T00:00:00Z"

[[cookies]]
name = "prefs"
value = "dark"
return_to = "https?://<current>/app/**"
reveal_to_javascript = true

[cookies.expires]
session = true
"#
    }

    /// Parsed [`TestFixtures::catalog_toml`]
    ///
    /// # Panics
    ///
    /// Panics if the fixture TOML does not parse
    #[must_use]
    pub fn catalog() -> CatalogSettings {
        CatalogSettings::from_toml_str(Self::catalog_toml()).expect("fixture catalog parses")
    }
}
