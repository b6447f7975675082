use crate::*;

#[test]
fn theme_defaults_to_dark_when_nothing_is_stored() {
    let theme = Theme::init(MemoryThemeStore::new());
    assert_eq!(theme.current(), ThemePreference::Dark);
    assert_eq!(theme.store().saves(), 0);
}

#[test]
fn toggle_flips_and_writes_back_every_time() {
    let mut theme = Theme::init(MemoryThemeStore::with_value(ThemePreference::Light));
    assert_eq!(theme.current(), ThemePreference::Light);

    assert_eq!(theme.toggle().unwrap(), ThemePreference::Dark);
    assert_eq!(theme.store().stored(), Some(ThemePreference::Dark));
    assert_eq!(theme.toggle().unwrap(), ThemePreference::Light);

    let store = theme.into_store();
    assert_eq!(store.saves(), 2);
    assert_eq!(store.stored(), Some(ThemePreference::Light));
}

#[test]
fn theme_parse_is_case_insensitive() {
    assert_eq!(ThemePreference::parse(" Light "), Some(ThemePreference::Light));
    assert_eq!(ThemePreference::parse("DARK"), Some(ThemePreference::Dark));
    assert_eq!(ThemePreference::parse("sepia"), None);
    assert_eq!(ThemePreference::Dark.to_string(), "dark");
}

#[test]
fn json_file_store_round_trips_through_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("nested").join("theme.json");

    let mut theme = Theme::init(JsonFileThemeStore::new(&path));
    assert_eq!(theme.current(), ThemePreference::Dark);
    theme.toggle().unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"light\""));

    let reopened = Theme::init(JsonFileThemeStore::new(&path));
    assert_eq!(reopened.current(), ThemePreference::Light);
}

#[test]
fn unreadable_or_unknown_theme_file_falls_back_to_default() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("theme.json");

    std::fs::write(&path, "{ garbage").unwrap();
    assert_eq!(
        Theme::init(JsonFileThemeStore::new(&path)).current(),
        ThemePreference::Dark
    );

    std::fs::write(&path, r#"{"theme": "sepia"}"#).unwrap();
    assert_eq!(
        Theme::init(JsonFileThemeStore::new(&path)).current(),
        ThemePreference::Dark
    );
}
