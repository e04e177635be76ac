//! The surveyed-municipality allow-list.
//!
//! The list is a TOML file embedded at compile time via [`include_str!`].

use std::collections::BTreeSet;
use std::sync::OnceLock;

use serde::Deserialize;

const SURVEYED_MUNICIPALITIES_TOML: &str =
    include_str!("../registry/surveyed_municipalities.toml");

/// Number of surveyed municipalities (used in tests).
#[cfg(test)]
const EXPECTED_MUNICIPALITY_COUNT: usize = 40;

#[derive(Deserialize)]
struct Registry {
    municipalities: Vec<String>,
}

/// Upper-case names of every surveyed municipality, in registry order.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed (this is a compile-time
/// guarantee since the registry is embedded).
#[must_use]
pub fn surveyed_municipalities() -> &'static [String] {
    static NAMES: OnceLock<Vec<String>> = OnceLock::new();
    NAMES.get_or_init(|| {
        toml::from_str::<Registry>(SURVEYED_MUNICIPALITIES_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse surveyed_municipalities.toml: {e}"))
            .municipalities
    })
}

/// Whether `name` is a surveyed municipality, ignoring case.
#[must_use]
pub fn is_surveyed(name: &str) -> bool {
    static SET: OnceLock<BTreeSet<String>> = OnceLock::new();
    SET.get_or_init(|| surveyed_municipalities().iter().cloned().collect())
        .contains(&name.trim().to_uppercase())
}
