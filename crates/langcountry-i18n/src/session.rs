//! Session facade over the resolver and the catalog.
//!
//! [`LangCountry`] is the process-wide service (allow-list, catalog, date
//! formatter). It hands out [`LocaleSession`]s: explicit per-request state
//! holding the bound code and its bundle, never an ambient global.

use crate::catalog::{Currency, LocaleBundle, LocaleCatalog, LocaleSummary};
use crate::detect::detect_host_locale;
use crate::error::Result;
use crate::format::{ChronoFormatter, DateFormatter};
use crate::resolve::{resolve, Resolution};
use crate::{AllowList, LocaleCode, LocaleTag};
use chrono::{DateTime, TimeZone};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// The date and time patterns a bundle carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateStyle {
    /// `d-m-Y`
    Numbers,
    /// `DD-MM-YYYY`, for JS date pickers. Never rendered.
    NumbersFullCapitals,
    /// `j F Y`
    WordsWithoutDay,
    /// `l j F Y`
    WordsWithDay,
    /// `j F`
    Birthday,
    /// `H:i`
    Time,
}

impl DateStyle {
    /// The bundle's pattern for this style.
    pub fn pattern(self, bundle: &LocaleBundle) -> &str {
        match self {
            Self::Numbers => &bundle.date_numbers,
            Self::NumbersFullCapitals => &bundle.date_numbers_full_capitals,
            Self::WordsWithoutDay => &bundle.date_words_without_day,
            Self::WordsWithDay => &bundle.date_words_with_day,
            Self::Birthday => &bundle.date_birthday,
            Self::Time => &bundle.time_format,
        }
    }

    /// Whether a time pattern may be appended to this style.
    pub fn accepts_time(self) -> bool {
        matches!(
            self,
            Self::Numbers | Self::NumbersFullCapitals | Self::WordsWithoutDay | Self::WordsWithDay
        )
    }
}

/// The two values written to session storage after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionValues {
    /// Bound allow-listed code.
    pub language_code: LocaleCode,
    /// Locale tag for date formatting.
    pub locale: LocaleTag,
}

impl From<Resolution> for SessionValues {
    fn from(resolution: Resolution) -> Self {
        Self {
            language_code: resolution.code,
            locale: resolution.tag,
        }
    }
}

/// Locale picker model: the bound locale plus every other allowed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorView {
    pub current: LocaleSummary,
    pub available: Vec<LocaleSummary>,
}

/// Process-wide locale service.
///
/// Cheap to clone; everything behind it is shared.
#[derive(Clone)]
pub struct LangCountry {
    catalog: Arc<LocaleCatalog>,
    allow_list: Arc<AllowList>,
    formatter: Arc<dyn DateFormatter>,
    host_fallback: bool,
    host_locale: fn() -> Option<String>,
}

impl LangCountry {
    /// Create a service over a catalog and an allow-list.
    pub fn new(catalog: LocaleCatalog, allow_list: AllowList) -> Self {
        Self::from_shared(Arc::new(catalog), Arc::new(allow_list))
    }

    /// Create a service over an already shared catalog and allow-list.
    pub fn from_shared(catalog: Arc<LocaleCatalog>, allow_list: Arc<AllowList>) -> Self {
        Self {
            catalog,
            allow_list,
            formatter: Arc::new(ChronoFormatter),
            host_fallback: false,
            host_locale: detect_host_locale,
        }
    }

    /// When nothing is stored, resolve the host's language instead of
    /// going straight to the fallback.
    pub fn with_host_fallback(mut self, enabled: bool) -> Self {
        self.host_fallback = enabled;
        self
    }

    /// Replace the host language source (defaults to environment detection).
    pub fn with_host_locale_source(mut self, source: fn() -> Option<String>) -> Self {
        self.host_locale = source;
        self
    }

    /// Replace the date rendering collaborator.
    pub fn with_formatter(mut self, formatter: Arc<dyn DateFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    pub fn catalog(&self) -> &LocaleCatalog {
        &self.catalog
    }

    /// Resolve a hint against the configured allow-list.
    pub fn resolve(&self, hint: Option<&str>) -> Resolution {
        resolve(hint, &self.allow_list)
    }

    /// Resolve a hint into the session values to store.
    pub fn set_all_sessions(&self, hint: Option<&str>) -> SessionValues {
        let host;
        let hint = match hint.map(str::trim).filter(|h| !h.is_empty()) {
            Some(hint) => Some(hint),
            None => {
                host = self.host_hint();
                host.as_deref()
            }
        };
        self.resolve(hint).into()
    }

    /// Build a bound session from a stored code.
    ///
    /// The stored value still goes through resolution, so a code that has
    /// since left the allow-list degrades instead of being trusted.
    pub fn session(&self, stored: Option<&str>) -> Result<LocaleSession> {
        let values = self.set_all_sessions(stored);
        self.bind(Resolution {
            code: values.language_code,
            tag: values.locale,
        })
    }

    /// Bind a session to an already resolved code.
    pub fn bind(&self, resolution: Resolution) -> Result<LocaleSession> {
        let bundle = self.catalog.load(&resolution.code)?;
        debug!(code = %resolution.code, tag = %resolution.tag, "locale session bound");
        Ok(LocaleSession {
            service: self.clone(),
            binding: Binding { resolution, bundle },
            with_time: false,
        })
    }

    fn host_hint(&self) -> Option<String> {
        if self.host_fallback {
            (self.host_locale)()
        } else {
            None
        }
    }
}

impl fmt::Debug for LangCountry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LangCountry")
            .field("allow_list", &self.allow_list)
            .field("catalog", &self.catalog)
            .field("host_fallback", &self.host_fallback)
            .finish()
    }
}

#[derive(Debug, Clone)]
struct Binding {
    resolution: Resolution,
    bundle: Arc<LocaleBundle>,
}

/// Locale state of one request or session.
///
/// Holds the bound code and its bundle, plus the one-shot `with_time` flag.
/// Not meant to be shared between sessions; clone it instead.
#[derive(Debug, Clone)]
pub struct LocaleSession {
    service: LangCountry,
    binding: Binding,
    with_time: bool,
}

impl LocaleSession {
    /// Current bound code.
    pub fn current_locale(&self) -> &LocaleCode {
        &self.binding.resolution.code
    }

    /// Locale tag for date formatting.
    pub fn locale_tag(&self) -> &LocaleTag {
        &self.binding.resolution.tag
    }

    /// The session values matching the current binding.
    pub fn values(&self) -> SessionValues {
        self.binding.resolution.clone().into()
    }

    /// The bound bundle.
    pub fn bundle(&self) -> &LocaleBundle {
        &self.binding.bundle
    }

    /// Re-resolve `hint` and rebind.
    ///
    /// Code and bundle are replaced together; on error the session keeps
    /// its previous binding.
    pub fn override_locale(&mut self, hint: Option<&str>) -> Result<&LocaleCode> {
        let resolution = self.service.resolve(hint);
        let bundle = self.service.catalog.load(&resolution.code)?;
        self.binding = Binding { resolution, bundle };
        Ok(self.current_locale())
    }

    /// Append the time pattern to the next date pattern request only.
    pub fn with_time(&mut self) -> &mut Self {
        self.with_time = true;
        self
    }

    pub fn lang(&self) -> &str {
        &self.binding.bundle.lang
    }

    pub fn country(&self) -> &str {
        &self.binding.bundle.country
    }

    pub fn country_name(&self) -> &str {
        &self.binding.bundle.country_name
    }

    pub fn country_name_local(&self) -> &str {
        &self.binding.bundle.country_name_local
    }

    /// Language name in its own language.
    pub fn name(&self) -> &str {
        &self.binding.bundle.name
    }

    pub fn emoji_flag(&self) -> &str {
        &self.binding.bundle.emoji_flag
    }

    pub fn currency(&self) -> &Currency {
        &self.binding.bundle.currency
    }

    pub fn currency_code(&self) -> &str {
        &self.currency().code
    }

    pub fn currency_symbol(&self) -> &str {
        &self.currency().symbol
    }

    pub fn currency_symbol_local(&self) -> &str {
        &self.currency().symbol_local
    }

    pub fn currency_name(&self) -> &str {
        &self.currency().name
    }

    pub fn currency_name_local(&self) -> &str {
        &self.currency().name_local
    }

    /// Pattern for `style`, with the time pattern appended when asked for
    /// and the style allows it. Does not touch the one-shot flag.
    pub fn pattern(&self, style: DateStyle, include_time: bool) -> String {
        let bundle = self.bundle();
        let pattern = style.pattern(bundle);
        if include_time && style.accepts_time() {
            format!("{} {}", pattern, bundle.time_format)
        } else {
            pattern.to_string()
        }
    }

    fn take_pattern(&mut self, style: DateStyle) -> String {
        let include_time = std::mem::take(&mut self.with_time);
        self.pattern(style, include_time)
    }

    pub fn date_numbers_format(&mut self) -> String {
        self.take_pattern(DateStyle::Numbers)
    }

    pub fn date_numbers_full_capitals_format(&mut self) -> String {
        self.take_pattern(DateStyle::NumbersFullCapitals)
    }

    pub fn date_words_without_day_format(&mut self) -> String {
        self.take_pattern(DateStyle::WordsWithoutDay)
    }

    pub fn date_words_with_day_format(&mut self) -> String {
        self.take_pattern(DateStyle::WordsWithDay)
    }

    pub fn date_birthday_format(&mut self) -> String {
        self.take_pattern(DateStyle::Birthday)
    }

    pub fn time_format(&mut self) -> String {
        self.take_pattern(DateStyle::Time)
    }

    /// Render `instant` in `style` through the date formatter.
    pub fn render<Tz: TimeZone>(
        &self,
        style: DateStyle,
        instant: &DateTime<Tz>,
        include_time: bool,
    ) -> String {
        let pattern = self.pattern(style, include_time);
        self.service
            .formatter
            .format(&instant.fixed_offset(), &pattern, self.locale_tag())
    }

    fn take_render<Tz: TimeZone>(&mut self, style: DateStyle, instant: &DateTime<Tz>) -> String {
        let include_time = std::mem::take(&mut self.with_time);
        self.render(style, instant, include_time)
    }

    pub fn date_numbers<Tz: TimeZone>(&mut self, instant: &DateTime<Tz>) -> String {
        self.take_render(DateStyle::Numbers, instant)
    }

    pub fn date_words_without_day<Tz: TimeZone>(&mut self, instant: &DateTime<Tz>) -> String {
        self.take_render(DateStyle::WordsWithoutDay, instant)
    }

    pub fn date_words_with_day<Tz: TimeZone>(&mut self, instant: &DateTime<Tz>) -> String {
        self.take_render(DateStyle::WordsWithDay, instant)
    }

    pub fn date_birthday<Tz: TimeZone>(&mut self, instant: &DateTime<Tz>) -> String {
        self.take_render(DateStyle::Birthday, instant)
    }

    pub fn time<Tz: TimeZone>(&mut self, instant: &DateTime<Tz>) -> String {
        self.take_render(DateStyle::Time, instant)
    }

    /// Summary of the bound locale.
    pub fn current_summary(&self) -> LocaleSummary {
        LocaleSummary::new(self.current_locale(), self.bundle())
    }

    /// One summary per allowed code, in allow-list order.
    pub fn all_locales(&self) -> Result<Vec<LocaleSummary>> {
        self.service.catalog.summaries(&self.service.allow_list)
    }

    /// Split [`all_locales`](Self::all_locales) into the bound locale and the rest.
    pub fn selector_view(&self) -> Result<SelectorView> {
        let (current, available): (Vec<_>, Vec<_>) = self
            .all_locales()?
            .into_iter()
            .partition(|summary| summary.language_code == *self.current_locale());

        let current = current
            .into_iter()
            .next()
            .unwrap_or_else(|| self.current_summary());

        Ok(SelectorView { current, available })
    }
}
