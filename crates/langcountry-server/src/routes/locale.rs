//! Read-only views of the bound locale.

use crate::error::ApiResult;
use crate::middleware::CurrentLocale;
use axum::Json;
use chrono::Utc;
use langcountry_i18n::{DateStyle, LocaleSummary, SelectorView};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LocaleView {
    pub locale: LocaleSummary,
    pub formats: Formats,
    pub now: Rendered,
}

/// Raw dataset patterns.
#[derive(Debug, Serialize)]
pub struct Formats {
    pub date_numbers: String,
    pub date_numbers_full_capitals: String,
    pub date_words_without_day: String,
    pub date_words_with_day: String,
    pub date_birthday: String,
    pub time: String,
    pub date_words_with_day_and_time: String,
}

/// The current instant rendered in each style.
#[derive(Debug, Serialize)]
pub struct Rendered {
    pub date_numbers: String,
    pub date_words_without_day: String,
    pub date_words_with_day: String,
    pub date_birthday: String,
    pub time: String,
}

pub async fn current(CurrentLocale(session): CurrentLocale) -> Json<LocaleView> {
    let now = Utc::now();

    let formats = Formats {
        date_numbers: session.pattern(DateStyle::Numbers, false),
        date_numbers_full_capitals: session.pattern(DateStyle::NumbersFullCapitals, false),
        date_words_without_day: session.pattern(DateStyle::WordsWithoutDay, false),
        date_words_with_day: session.pattern(DateStyle::WordsWithDay, false),
        date_birthday: session.pattern(DateStyle::Birthday, false),
        time: session.pattern(DateStyle::Time, false),
        date_words_with_day_and_time: session.pattern(DateStyle::WordsWithDay, true),
    };

    let rendered = Rendered {
        date_numbers: session.render(DateStyle::Numbers, &now, false),
        date_words_without_day: session.render(DateStyle::WordsWithoutDay, &now, false),
        date_words_with_day: session.render(DateStyle::WordsWithDay, &now, false),
        date_birthday: session.render(DateStyle::Birthday, &now, false),
        time: session.render(DateStyle::Time, &now, false),
    };

    Json(LocaleView {
        locale: session.current_summary(),
        formats,
        now: rendered,
    })
}

pub async fn selector(CurrentLocale(session): CurrentLocale) -> ApiResult<Json<SelectorView>> {
    Ok(Json(session.selector_view()?))
}
