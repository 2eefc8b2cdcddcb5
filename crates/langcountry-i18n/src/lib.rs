//! Locale resolution and per-locale attribute bundles for LangCountry.
//!
//! The crate turns an untrusted locale hint (an `Accept-Language` header, a
//! stored preference, an explicit switch request) into exactly one code from
//! a configured [`AllowList`], and exposes the static attribute bundle of that
//! code (country, names, date/time patterns, currency, flag) through a
//! per-session [`LocaleSession`].
//!
//! ```no_run
//! use langcountry_i18n::{AllowList, CatalogConfig, LangCountry, LocaleCatalog};
//!
//! let allow_list = AllowList::new(["en", "es_CO", "nl"], "en").unwrap();
//! let catalog = LocaleCatalog::new(CatalogConfig::default());
//! let service = LangCountry::new(catalog, allow_list);
//!
//! let resolution = service.resolve(Some("es-ES;q=0.9"));
//! assert_eq!(resolution.code.as_str(), "es_CO");
//!
//! let mut session = service.session(Some("nl")).unwrap();
//! let pattern = session.with_time().date_numbers_format();
//! println!("{} {}", session.emoji_flag(), pattern);
//! ```

pub mod catalog;
pub mod detect;
pub mod error;
pub mod format;
pub mod resolve;
pub mod session;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

pub use catalog::{CatalogConfig, CatalogStats, Currency, LocaleBundle, LocaleCatalog, LocaleSummary};
pub use detect::{detect_host_locale, normalize_posix_locale};
pub use error::{I18nError, Result};
pub use format::{ChronoFormatter, DateFormatter};
pub use resolve::{primary_subtag, resolve, Resolution};
pub use session::{DateStyle, LangCountry, LocaleSession, SelectorView, SessionValues};

static CODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z]{2}(_[A-Z]{2})?$").expect("locale code pattern is valid")
});

/// Whether `code` has the canonical shape of a locale code (`nl`, `es_CO`).
pub fn is_well_formed(code: &str) -> bool {
    CODE_RE.is_match(code)
}

/// A validated locale code, member of the allow-list it came from.
///
/// Only [`AllowList`] hands these out, so holding one means the code passed
/// allow-list membership.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LocaleCode(String);

impl LocaleCode {
    fn new_unchecked(code: &str) -> Self {
        Self(code.to_string())
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The two-letter language part.
    pub fn language(&self) -> &str {
        &self.0[..2]
    }

    /// The region part, if any (`CO` for `es_CO`).
    pub fn region(&self) -> Option<&str> {
        self.0.split_once('_').map(|(_, region)| region)
    }

    /// Whether this is a language+region code.
    pub fn has_region(&self) -> bool {
        self.region().is_some()
    }

    /// The locale tag handed to date-formatting collaborators.
    ///
    /// Language+region codes are their own tag; language-only codes map to
    /// the language subtag.
    pub fn tag(&self) -> LocaleTag {
        if self.has_region() {
            LocaleTag(self.0.clone())
        } else {
            LocaleTag(self.language().to_string())
        }
    }
}

impl fmt::Display for LocaleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LocaleCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for LocaleCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for LocaleCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Locale name understood by date-formatting collaborators.
///
/// May be coarser than the [`LocaleCode`] it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LocaleTag(String);

impl LocaleTag {
    /// Wrap a raw tag, e.g. one read back from session storage.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered set of supported locale codes plus the designated fallback.
#[derive(Debug, Clone)]
pub struct AllowList {
    codes: Vec<LocaleCode>,
    fallback: LocaleCode,
}

impl AllowList {
    /// Build an allow-list, checking shape, uniqueness and fallback membership.
    pub fn new<I, S>(codes: I, fallback: &str) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut validated = Vec::new();

        for code in codes {
            let code = code.as_ref();
            if !is_well_formed(code) {
                return Err(I18nError::InvalidAllowList(format!(
                    "malformed locale code '{code}'"
                )));
            }
            if !seen.insert(code.to_string()) {
                return Err(I18nError::InvalidAllowList(format!(
                    "duplicate locale code '{code}'"
                )));
            }
            validated.push(LocaleCode::new_unchecked(code));
        }

        if validated.is_empty() {
            return Err(I18nError::InvalidAllowList(
                "at least one locale code must be allowed".to_string(),
            ));
        }

        let fallback = validated
            .iter()
            .find(|code| code.as_str() == fallback)
            .cloned()
            .ok_or_else(|| {
                I18nError::InvalidAllowList(format!(
                    "fallback '{fallback}' is not in the allow-list"
                ))
            })?;

        Ok(Self {
            codes: validated,
            fallback,
        })
    }

    /// Allowed codes in configured order.
    pub fn codes(&self) -> &[LocaleCode] {
        &self.codes
    }

    /// The designated fallback code.
    pub fn fallback(&self) -> &LocaleCode {
        &self.fallback
    }

    /// Exact, case-sensitive membership lookup.
    pub fn get(&self, code: &str) -> Option<&LocaleCode> {
        self.codes.iter().find(|allowed| allowed.as_str() == code)
    }

    /// Whether `code` is allowed.
    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Number of allowed codes.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Always false: construction rejects empty lists.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Iterate allowed codes in configured order.
    pub fn iter(&self) -> impl Iterator<Item = &LocaleCode> {
        self.codes.iter()
    }
}
