//! Seed registry: the hand-maintained list of known modules.
//!
//! The list lives in `packages/feed/seeds/modules.toml` and is baked into
//! the binary at compile time via [`include_str!`].

use course_portal_catalog_models::SeedModule;
use serde::Deserialize;

/// Seed list embedded at compile time.
const SEED_TOML: &str = include_str!("../seeds/modules.toml");

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    modules: Vec<SeedModule>,
}

/// Parses a seed list from TOML text containing `[[modules]]` tables.
///
/// # Errors
///
/// Returns [`toml::de::Error`] if the TOML is malformed or a module is
/// missing a field.
pub fn parse_seed_toml(text: &str) -> Result<Vec<SeedModule>, toml::de::Error> {
    let file: SeedFile = toml::from_str(text)?;
    Ok(file.modules)
}

/// Returns the embedded seed modules, in file order.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed (the file is compiled in, so
/// this surfaces in tests rather than in the field).
#[must_use]
pub fn all_seeds() -> Vec<SeedModule> {
    parse_seed_toml(SEED_TOML).unwrap_or_else(|e| panic!("Failed to parse modules.toml: {e}"))
}
