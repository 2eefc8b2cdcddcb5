//! Configuration for LangCountry.
//!
//! Reads `.langcountry/config.yaml` (allow-list, fallback, session keys,
//! dataset directories, switch endpoint, listener), expands `${VAR}`
//! references, applies `LANGCOUNTRY_*` overrides and validates the result.

pub mod env;
pub mod loader;
pub mod types;

#[cfg(test)]
mod integration_test;

pub use env::*;
pub use loader::*;
pub use types::*;

/// Serializes tests that touch process environment variables.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
