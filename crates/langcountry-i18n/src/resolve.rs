//! Locale resolution.
//!
//! Turns any hint into exactly one allow-listed code:
//!
//! 1. Empty or absent hint: the fallback.
//! 2. Hint equal to an allowed code: that code, untouched.
//! 3. Otherwise the primary language subtag is extracted and matched against
//!    language-only codes first, then against language+region codes, in
//!    allow-list order.
//! 4. Nothing matched: the fallback.
//!
//! Resolution is pure and total; it never fails for any input.

use crate::{AllowList, LocaleCode, LocaleTag};
use langcountry_common_log::spans::resolve_span;

/// Outcome of resolving a hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The allow-listed code.
    pub code: LocaleCode,
    /// Tag for date-formatting collaborators.
    pub tag: LocaleTag,
}

impl Resolution {
    fn from_code(code: &LocaleCode) -> Self {
        Self {
            code: code.clone(),
            tag: code.tag(),
        }
    }
}

/// Resolve a raw hint against an allow-list.
pub fn resolve(hint: Option<&str>, allow_list: &AllowList) -> Resolution {
    let span = resolve_span(hint);
    let code = span.in_scope(|| resolve_code(hint, allow_list));
    span.record("code", code.as_str());
    Resolution::from_code(code)
}

fn resolve_code<'a>(hint: Option<&str>, allow_list: &'a AllowList) -> &'a LocaleCode {
    let hint = match hint.map(str::trim) {
        Some(hint) if !hint.is_empty() => hint,
        _ => return allow_list.fallback(),
    };

    // Stored preferences and explicit overrides are trusted as-is.
    if let Some(code) = allow_list.get(hint) {
        return code;
    }

    let Some(subtag) = primary_subtag(hint) else {
        return allow_list.fallback();
    };

    allow_list
        .iter()
        .find(|code| !code.has_region() && code.language() == subtag)
        .or_else(|| {
            allow_list
                .iter()
                .find(|code| code.has_region() && code.language() == subtag)
        })
        .unwrap_or_else(|| allow_list.fallback())
}

/// Extract the lower-cased two-letter primary language subtag of a hint.
///
/// Only the first entry of a comma-separated list is considered. The subtag
/// is whatever precedes the first `_`, `-` or `;`, cut to two letters.
/// Returns `None` when no two ASCII letters lead the entry.
pub fn primary_subtag(hint: &str) -> Option<String> {
    let first = hint.split(',').next()?.trim();
    let segment = first
        .split(['_', '-', ';'])
        .next()
        .map(str::trim)
        .unwrap_or_default();

    let mut letters = segment.chars();
    match (letters.next(), letters.next()) {
        (Some(a), Some(b)) if a.is_ascii_alphabetic() && b.is_ascii_alphabetic() => {
            Some([a, b].iter().collect::<String>().to_ascii_lowercase())
        }
        _ => None,
    }
}
