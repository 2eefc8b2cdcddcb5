//! Middleware for the LangCountry server.

pub mod locale;

pub use locale::{CurrentLocale, CurrentSession, LocaleSessionLayer, LocaleSessionMiddleware};
