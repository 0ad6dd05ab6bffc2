use toolgram_state::{load_settings, settings_file, Settings};
use toolgram_test_utils::{env_guard, set_env_var, TestFixture};

#[test]
fn settings_file_defaults_to_claude_dir() {
    let _g = env_guard();
    let fixture = TestFixture::new().unwrap();
    let _home = fixture.home_guard();
    let _custom = set_env_var("TOOLGRAM_SETTINGS", None);

    assert_eq!(
        settings_file().unwrap(),
        fixture.home_path().join(".claude/toolgram.json")
    );
    assert_eq!(load_settings().unwrap(), Settings::default());
}

#[test]
fn settings_load_from_custom_path() {
    let _g = env_guard();
    let fixture = TestFixture::new().unwrap();
    let path = fixture.home_path().join("toolgram.json");
    std::fs::write(
        &path,
        r#"{"days": 14, "minFrequency": 3, "excludeTools": ["TodoWrite"]}"#,
    )
    .unwrap();
    let _custom = set_env_var("TOOLGRAM_SETTINGS", path.to_str());

    let settings = load_settings().unwrap();
    assert_eq!(settings.days, Some(14));
    assert_eq!(settings.min_frequency, Some(3));
    assert_eq!(settings.exclude_tools, Some(vec!["TodoWrite".to_string()]));
    assert!(settings.max_length.is_none());
}

#[test]
fn malformed_settings_fall_back_to_defaults() {
    let _g = env_guard();
    let fixture = TestFixture::new().unwrap();
    let path = fixture.home_path().join("toolgram.json");
    std::fs::write(&path, "{ days: fourteen").unwrap();
    let _custom = set_env_var("TOOLGRAM_SETTINGS", path.to_str());

    assert_eq!(load_settings().unwrap(), Settings::default());
}
