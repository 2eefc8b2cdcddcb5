use chrono::Local;
use langcountry_i18n::{AllowList, CatalogConfig, LangCountry, LocaleCatalog};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let allow_list = AllowList::new(["en_GB", "en_US", "nl", "es_CO", "de"], "en_GB")?;
    let catalog = LocaleCatalog::new(CatalogConfig::default());
    catalog.preload(&allow_list)?;

    let service = LangCountry::new(catalog, allow_list);
    let now = Local::now();

    for code in ["en_GB", "en_US", "nl", "es_CO", "de"] {
        let mut session = service.session(Some(code))?;
        println!(
            "{} {} ({}, {})",
            session.emoji_flag(),
            session.name(),
            session.country_name_local(),
            session.currency_symbol_local()
        );
        println!("  numbers:       {}", session.date_numbers(&now));
        println!("  with weekday:  {}", session.date_words_with_day(&now));
        println!("  birthday:      {}", session.date_birthday(&now));
        session.with_time();
        println!("  with time:     {}", session.date_numbers(&now));
        println!("  picker format: {}", session.date_numbers_full_capitals_format());
    }

    let mut session = service.session(None)?;
    session.override_locale(Some("nl-BE"))?;
    let view = session.selector_view()?;
    println!("Current: {} {}", view.current.emoji_flag, view.current.language_code);
    for other in view.available {
        println!("  switch to {} {}", other.emoji_flag, other.language_code);
    }

    Ok(())
}
