//! Locale bundle loading.
//!
//! One JSON file per locale code (`<code>.json`). An optional override
//! directory is consulted before the bundled dataset, so deployments can
//! replace or add locales without touching shipped data. Loaded bundles are
//! cached for the lifetime of the catalog; there is no invalidation.

use crate::error::{I18nError, Result};
use crate::{AllowList, LocaleCode};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use langcountry_common_log::spans::catalog_span;
use langcountry_common_log::timed;
use std::sync::Arc;
use tracing::{debug, info};

/// Extension of dataset files.
pub const BUNDLE_EXTENSION: &str = "json";

/// Directory of the dataset shipped with this crate.
pub fn bundled_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Catalog configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Directory holding the shipped dataset.
    pub bundled_dir: PathBuf,
    /// Directory checked first, if set.
    pub override_dir: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            bundled_dir: bundled_data_dir(),
            override_dir: None,
        }
    }
}

impl CatalogConfig {
    /// Set the override directory.
    pub fn with_override_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.override_dir = Some(dir.into());
        self
    }

    /// Path of the file backing `code`, override directory first.
    pub fn bundle_path(&self, code: &str) -> Option<PathBuf> {
        let file_name = format!("{code}.{BUNDLE_EXTENSION}");

        self.override_dir
            .iter()
            .chain(std::iter::once(&self.bundled_dir))
            .map(|dir| dir.join(&file_name))
            .find(|path| path.is_file())
    }
}

/// Currency attributes of a locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Currency {
    /// ISO 4217 code, e.g. `EUR`.
    pub code: String,
    /// International symbol, e.g. `€`.
    pub symbol: String,
    /// Symbol as written locally, e.g. `COL$`.
    pub symbol_local: String,
    /// English name.
    pub name: String,
    /// Name in the locale's language.
    pub name_local: String,
}

/// Static attribute bundle of one locale.
///
/// Every field is required; a file missing any of them (or holding `null`)
/// fails to load as [`I18nError::CorruptBundle`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawBundle", into = "RawBundle")]
pub struct LocaleBundle {
    /// Language-only code for pluralization and date libraries.
    pub lang: String,
    /// Two-letter country code.
    pub country: String,
    /// Country name in English.
    pub country_name: String,
    /// Country name in the locale's language.
    pub country_name_local: String,
    /// Language name, written in that language.
    pub name: String,
    /// Flag emoji.
    pub emoji_flag: String,
    /// Numeric date pattern, e.g. `d-m-Y`.
    pub date_numbers: String,
    /// Numeric date pattern in capitals for JS date pickers, e.g. `DD-MM-YYYY`.
    pub date_numbers_full_capitals: String,
    /// Date in words without the weekday.
    pub date_words_without_day: String,
    /// Date in words with the weekday.
    pub date_words_with_day: String,
    /// Birthday pattern (no year).
    pub date_birthday: String,
    /// Time pattern.
    pub time_format: String,
    /// Currency attributes.
    pub currency: Currency,
}

/// On-disk shape: currency fields are flat.
#[derive(Serialize, Deserialize)]
struct RawBundle {
    lang: String,
    country: String,
    country_name: String,
    country_name_local: String,
    name: String,
    emoji_flag: String,
    date_numbers: String,
    date_numbers_full_capitals: String,
    date_words_without_day: String,
    date_words_with_day: String,
    date_birthday: String,
    time_format: String,
    currency_code: String,
    currency_symbol: String,
    currency_symbol_local: String,
    currency_name: String,
    currency_name_local: String,
}

impl From<RawBundle> for LocaleBundle {
    fn from(raw: RawBundle) -> Self {
        Self {
            lang: raw.lang,
            country: raw.country,
            country_name: raw.country_name,
            country_name_local: raw.country_name_local,
            name: raw.name,
            emoji_flag: raw.emoji_flag,
            date_numbers: raw.date_numbers,
            date_numbers_full_capitals: raw.date_numbers_full_capitals,
            date_words_without_day: raw.date_words_without_day,
            date_words_with_day: raw.date_words_with_day,
            date_birthday: raw.date_birthday,
            time_format: raw.time_format,
            currency: Currency {
                code: raw.currency_code,
                symbol: raw.currency_symbol,
                symbol_local: raw.currency_symbol_local,
                name: raw.currency_name,
                name_local: raw.currency_name_local,
            },
        }
    }
}

impl From<LocaleBundle> for RawBundle {
    fn from(bundle: LocaleBundle) -> Self {
        let Currency {
            code,
            symbol,
            symbol_local,
            name,
            name_local,
        } = bundle.currency;

        Self {
            lang: bundle.lang,
            country: bundle.country,
            country_name: bundle.country_name,
            country_name_local: bundle.country_name_local,
            name: bundle.name,
            emoji_flag: bundle.emoji_flag,
            date_numbers: bundle.date_numbers,
            date_numbers_full_capitals: bundle.date_numbers_full_capitals,
            date_words_without_day: bundle.date_words_without_day,
            date_words_with_day: bundle.date_words_with_day,
            date_birthday: bundle.date_birthday,
            time_format: bundle.time_format,
            currency_code: code,
            currency_symbol: symbol,
            currency_symbol_local: symbol_local,
            currency_name: name,
            currency_name_local: name_local,
        }
    }
}

/// Parse the contents of a dataset file.
pub fn parse_bundle(code: &str, path: &Path, content: &str) -> Result<LocaleBundle> {
    serde_json::from_str(content).map_err(|e| I18nError::CorruptBundle {
        code: code.to_string(),
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Picker entry for one allowed locale. Carries its own code since bundles
/// do not self-identify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocaleSummary {
    pub language_code: LocaleCode,
    pub country: String,
    pub country_name: String,
    pub country_name_local: String,
    pub lang: String,
    pub name: String,
    pub emoji_flag: String,
    pub currency_code: String,
    pub currency_symbol: String,
    pub currency_symbol_local: String,
    pub currency_name: String,
    pub currency_name_local: String,
}

impl LocaleSummary {
    /// Summarize `bundle` under `code`.
    pub fn new(code: &LocaleCode, bundle: &LocaleBundle) -> Self {
        Self {
            language_code: code.clone(),
            country: bundle.country.clone(),
            country_name: bundle.country_name.clone(),
            country_name_local: bundle.country_name_local.clone(),
            lang: bundle.lang.clone(),
            name: bundle.name.clone(),
            emoji_flag: bundle.emoji_flag.clone(),
            currency_code: bundle.currency.code.clone(),
            currency_symbol: bundle.currency.symbol.clone(),
            currency_symbol_local: bundle.currency.symbol_local.clone(),
            currency_name: bundle.currency.name.clone(),
            currency_name_local: bundle.currency.name_local.clone(),
        }
    }
}

/// Caching loader shared by every session in the process.
pub struct LocaleCatalog {
    config: CatalogConfig,
    bundles: RwLock<HashMap<String, Arc<LocaleBundle>>>,
}

impl LocaleCatalog {
    /// Create a catalog; nothing is read until first use.
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            config,
            bundles: RwLock::new(HashMap::new()),
        }
    }

    /// The catalog configuration.
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Load the bundle for `code`, reading the dataset on first use.
    ///
    /// Concurrent first loads of the same code may both read the file; the
    /// first one to take the write lock wins and every caller gets that copy.
    pub fn load(&self, code: &LocaleCode) -> Result<Arc<LocaleBundle>> {
        if let Some(bundle) = self.bundles.read().get(code.as_str()) {
            debug!(code = %code, "locale bundle cache hit");
            return Ok(Arc::clone(bundle));
        }

        let bundle = Arc::new(self.read_bundle(code.as_str())?);

        let mut bundles = self.bundles.write();
        let cached = bundles
            .entry(code.as_str().to_string())
            .or_insert(bundle);
        Ok(Arc::clone(cached))
    }

    fn read_bundle(&self, code: &str) -> Result<LocaleBundle> {
        catalog_span(code).in_scope(|| timed!("catalog.read_bundle", self.read_bundle_file(code)))
    }

    fn read_bundle_file(&self, code: &str) -> Result<LocaleBundle> {
        let path = self
            .config
            .bundle_path(code)
            .ok_or_else(|| I18nError::UnknownLocale { code: code.to_string() })?;

        let content = fs::read_to_string(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => I18nError::UnknownLocale { code: code.to_string() },
            _ => I18nError::Io {
                path: path.clone(),
                source,
            },
        })?;

        let bundle = parse_bundle(code, &path, &content)?;
        debug!(path = %path.display(), "locale bundle loaded");
        Ok(bundle)
    }

    /// Load every allowed code, surfacing configuration faults up front.
    pub fn preload(&self, allow_list: &AllowList) -> Result<()> {
        for code in allow_list.iter() {
            self.load(code)?;
        }
        info!(locales = allow_list.len(), "locale catalog preloaded");
        Ok(())
    }

    /// One summary per allowed code, in allow-list order.
    pub fn summaries(&self, allow_list: &AllowList) -> Result<Vec<LocaleSummary>> {
        allow_list
            .iter()
            .map(|code| {
                let bundle = self.load(code)?;
                Ok(LocaleSummary::new(code, &bundle))
            })
            .collect()
    }

    /// Cache statistics.
    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            loaded_locales: self.bundles.read().len(),
            override_dir_enabled: self.config.override_dir.is_some(),
        }
    }
}

impl std::fmt::Debug for LocaleCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleCatalog")
            .field("config", &self.config)
            .field("loaded_locales", &self.bundles.read().len())
            .finish()
    }
}

/// Catalog statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogStats {
    pub loaded_locales: usize,
    pub override_dir_enabled: bool,
}
