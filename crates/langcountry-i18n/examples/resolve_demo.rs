use langcountry_i18n::{detect_host_locale, resolve, AllowList};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let allow_list = AllowList::new(["en", "es_CO", "nl"], "en")?;

    println!("Resolving hints against {:?} (fallback en):", ["en", "es_CO", "nl"]);
    for hint in ["es-ES;q=0.9", "fr-FR", "nl", "es_CO", "nl-BE,nl;q=0.9,en;q=0.8", "", "*"] {
        let resolution = resolve(Some(hint), &allow_list);
        println!("  {:<26} -> {} (tag {})", format!("{hint:?}"), resolution.code, resolution.tag);
    }

    match detect_host_locale() {
        Some(host) => {
            let resolution = resolve(Some(&host), &allow_list);
            println!("Host locale {host} resolves to {}", resolution.code);
        }
        None => println!("No host locale set"),
    }

    Ok(())
}
