//! Date rendering.
//!
//! Dataset patterns use PHP `date()` tokens (`d-m-Y`, `l j F Y`, `H:i`).
//! [`ChronoFormatter`] translates them to strftime items and renders them
//! with chrono's localized month and weekday names. Sessions hold a
//! `dyn DateFormatter`, so callers can plug in their own renderer.

use crate::LocaleTag;
use chrono::{DateTime, Datelike, FixedOffset, Locale, NaiveDate};
use std::fmt::Write;
use std::str::FromStr;
use tracing::warn;

/// Renders an instant with a dataset pattern in a given locale.
pub trait DateFormatter: Send + Sync {
    /// Render `instant` using `pattern`, localized for `tag`.
    fn format(&self, instant: &DateTime<FixedOffset>, pattern: &str, tag: &LocaleTag) -> String;
}

/// Default formatter backed by chrono.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChronoFormatter;

impl DateFormatter for ChronoFormatter {
    fn format(&self, instant: &DateTime<FixedOffset>, pattern: &str, tag: &LocaleTag) -> String {
        let strftime = to_strftime(pattern, instant.date_naive());
        let locale = chrono_locale(tag);

        let mut out = String::new();
        if write!(out, "{}", instant.format_localized(&strftime, locale)).is_err() {
            warn!(pattern = %pattern, tag = %tag, "unrenderable date pattern");
            return pattern.to_string();
        }
        out
    }
}

/// Map a locale tag to a chrono locale.
///
/// `es_CO` is used as-is; a bare language tries `<lang>_<LANG>` (`nl_NL`,
/// `de_DE`) and a few well-known defaults. Unknown tags render in POSIX.
pub fn chrono_locale(tag: &LocaleTag) -> Locale {
    let tag = tag.as_str();
    if let Ok(locale) = Locale::from_str(tag) {
        return locale;
    }

    let guess = match tag {
        "en" => "en_US".to_string(),
        "pt" => "pt_PT".to_string(),
        "sv" => "sv_SE".to_string(),
        "da" => "da_DK".to_string(),
        "ja" => "ja_JP".to_string(),
        lang => format!("{}_{}", lang, lang.to_ascii_uppercase()),
    };
    Locale::from_str(&guess).unwrap_or(Locale::POSIX)
}

/// Translate a PHP date pattern into a strftime string for `date`.
///
/// Tokens that depend only on the date (ordinal suffix, leap year) are
/// resolved here and emitted as literals. Unknown letters pass through.
pub fn to_strftime(pattern: &str, date: NaiveDate) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        let item = match c {
            'd' => "%d",
            'j' => "%-d",
            'D' => "%a",
            'l' => "%A",
            'N' => "%u",
            'w' => "%w",
            'F' => "%B",
            'M' => "%b",
            'm' => "%m",
            'n' => "%-m",
            'Y' => "%Y",
            'y' => "%y",
            'o' => "%G",
            'W' => "%V",
            'a' => "%P",
            'A' => "%p",
            'g' => "%-I",
            'G' => "%-H",
            'h' => "%I",
            'H' => "%H",
            'i' => "%M",
            's' => "%S",
            'u' => "%6f",
            'v' => "%3f",
            'O' => "%z",
            'P' => "%:z",
            'T' => "%Z",
            'U' => "%s",
            'c' => "%Y-%m-%dT%H:%M:%S%:z",
            'r' => "%a, %d %b %Y %H:%M:%S %z",
            'S' => {
                push_literal(&mut out, ordinal_suffix(date.day()));
                continue;
            }
            'z' => {
                push_literal(&mut out, &date.ordinal0().to_string());
                continue;
            }
            't' => {
                push_literal(&mut out, &days_in_month(date).to_string());
                continue;
            }
            'L' => {
                push_literal(&mut out, if date.leap_year() { "1" } else { "0" });
                continue;
            }
            '\\' => {
                if let Some(escaped) = chars.next() {
                    push_literal(&mut out, escaped.encode_utf8(&mut [0; 4]));
                }
                continue;
            }
            other => {
                push_literal(&mut out, other.encode_utf8(&mut [0; 4]));
                continue;
            }
        };
        out.push_str(item);
    }

    out
}

fn push_literal(out: &mut String, literal: &str) {
    for c in literal.chars() {
        if c == '%' {
            out.push_str("%%");
        } else {
            out.push(c);
        }
    }
}

/// English ordinal suffix for a day of the month.
pub fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}
