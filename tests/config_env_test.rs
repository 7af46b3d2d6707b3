use routegen::Settings;
use std::env;
use tempfile::TempDir;

#[test]
fn test_env_override_with_nested_keys() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("settings.toml");
    std::fs::write(
        &config_path,
        "[watch]\ndebounce_ms = 250\n\n[pages]\ndir = \"app/pages\"\n",
    )
    .unwrap();

    unsafe {
        // Double underscore separates nested levels
        env::set_var("ROUTEGEN_WATCH__DEBOUNCE_MS", "42");
        env::set_var("ROUTEGEN_LOG", "false");
    }

    let settings = Settings::load_from(&config_path).unwrap();

    unsafe {
        env::remove_var("ROUTEGEN_WATCH__DEBOUNCE_MS");
        env::remove_var("ROUTEGEN_LOG");
    }

    // Environment wins over the file, the file wins over defaults
    assert_eq!(settings.watch.debounce_ms, 42);
    assert!(!settings.log);
    assert_eq!(settings.pages.dir, "app/pages");
    assert_eq!(settings.watch.queue_capacity, 100);
}
