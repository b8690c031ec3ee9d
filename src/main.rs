#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![deny(warnings)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use anyhow::{bail, Result};
use cookie_intent::settings::CatalogSettings;

/// Compile every intent of a cookie catalog and print the resulting
/// `Set-Cookie` headers
///
/// Usage: `cookie-intent [CATALOG]`
fn main() -> Result<()> {
    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = CatalogSettings::load(path.as_deref())?;
    settings.init_logging()?;

    let mut failed = 0usize;
    for (name, result) in settings.compile_all() {
        match result.map_err(anyhow::Error::from).and_then(|attributes| {
            attributes
                .to_header_value()
                .map_err(anyhow::Error::from)
        }) {
            Ok(header) => println!("Set-Cookie: {header}"),
            Err(e) => {
                log::error!("Cookie '{name}' rejected: {e}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{failed} cookie intent(s) failed to compile");
    }
    Ok(())
}
