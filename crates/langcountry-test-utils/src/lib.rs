//! Test utilities for LangCountry crates.

use serde_json::json;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Creates a temporary directory that is cleaned up on drop.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// A bundled dataset directory and an override directory, both empty,
/// removed on drop.
pub struct DatasetDirs {
    root: TempDir,
    bundled: PathBuf,
    overrides: PathBuf,
}

impl DatasetDirs {
    pub fn new() -> Self {
        let root = temp_dir();
        let bundled = root.path().join("data");
        let overrides = root.path().join("overrides");
        std::fs::create_dir_all(&bundled).expect("Failed to create bundled dir");
        std::fs::create_dir_all(&overrides).expect("Failed to create override dir");
        Self {
            root,
            bundled,
            overrides,
        }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn bundled(&self) -> &Path {
        &self.bundled
    }

    pub fn overrides(&self) -> &Path {
        &self.overrides
    }
}

impl Default for DatasetDirs {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes `<dir>/<code>.json`.
pub fn write_bundle(dir: &Path, code: &str, content: &str) -> PathBuf {
    let path = dir.join(format!("{code}.json"));
    std::fs::write(&path, content).expect("Failed to write bundle");
    path
}

/// Flag emoji for a two-letter country code. Non-letters are skipped.
pub fn flag_for(country: &str) -> String {
    country
        .chars()
        .filter(char::is_ascii_alphabetic)
        .filter_map(|c| char::from_u32(0x1F1E6 + (c.to_ascii_uppercase() as u32 - 'A' as u32)))
        .collect()
}

/// A complete, valid bundle for `lang` in `country`, with Dutch-style
/// patterns and euro currency.
pub fn sample_bundle_json(lang: &str, country: &str) -> String {
    json!({
        "lang": lang,
        "country": country,
        "country_name": format!("Country {country}"),
        "country_name_local": format!("Land {country}"),
        "name": format!("Language {lang}"),
        "emoji_flag": flag_for(country),
        "date_numbers": "d-m-Y",
        "date_numbers_full_capitals": "DD-MM-YYYY",
        "date_words_without_day": "j F Y",
        "date_words_with_day": "l j F Y",
        "date_birthday": "j F",
        "time_format": "H:i",
        "currency_code": "EUR",
        "currency_symbol": "€",
        "currency_symbol_local": "€",
        "currency_name": "Euro",
        "currency_name_local": "Euro"
    })
    .to_string()
}

/// In-memory sink for `tracing_subscriber::fmt().with_writer(..)`.
///
/// Clones share one buffer, so a test keeps a handle and reads back what
/// the subscriber wrote.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        let buffer = self.0.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
