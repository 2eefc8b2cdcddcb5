use std::env;
use std::fs;
use tempfile::tempdir;

use super::*;

#[test]
fn test_full_config_loading_workflow() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    env::set_var("LANGCOUNTRY_TEST_FALLBACK", "nl");

    let dir = tempdir().unwrap();
    let config_dir = dir.path().join(".langcountry");
    fs::create_dir_all(&config_dir).unwrap();
    let overrides = dir.path().join("overrides");
    fs::create_dir_all(&overrides).unwrap();

    // The override dir shadows the shipped Dutch bundle.
    let shipped = langcountry_i18n::catalog::bundled_data_dir().join("nl.json");
    let mut nl: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(shipped).unwrap()).unwrap();
    nl["country_name_local"] = "Koninkrijk der Nederlanden".into();
    fs::write(overrides.join("nl.json"), nl.to_string()).unwrap();

    let config_content = format!(
        r#"
allowed: [nl, es_CO, en_US]
fallback: ${{LANGCOUNTRY_TEST_FALLBACK}}
session:
  locale_field: ${{LANGCOUNTRY_TEST_LOCALE_FIELD:-date_locale}}
dataset:
  override_dir: {}
"#,
        overrides.display()
    );
    fs::write(config_dir.join("config.yaml"), config_content).unwrap();

    let loader = ConfigLoader::new(dir.path());
    let config = loader.load().unwrap();
    env::remove_var("LANGCOUNTRY_TEST_FALLBACK");

    assert_eq!(config.fallback, "nl");
    assert_eq!(config.session.locale_field, "date_locale");
    assert_eq!(config.session.language_code_field, "language_code");
    assert_eq!(config.switcher.uri, "change_language_code");

    let service = config.build_service().unwrap();
    let session = service.session(None).unwrap();
    assert_eq!(session.current_locale(), &"nl");
    assert_eq!(session.country_name_local(), "Koninkrijk der Nederlanden");
    assert_eq!(service.session(Some("es")).unwrap().current_locale(), &"es_CO");

    let mut modified = config.clone();
    modified.fallback = "en_US".to_string();
    loader.save(&modified).unwrap();
    assert_eq!(loader.load().unwrap().fallback, "en_US");
}
