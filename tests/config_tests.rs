use tempfile::TempDir;
use yamlpipe::config::Config;

#[test]
fn test_config_defaults() {
    let config = Config::default();

    assert_eq!(config.delimiter, ".");
    assert_eq!(config.macro_namespace, "yamlpipe");
    assert_eq!(config.output_format, "yaml");
    assert!(!config.create_backup);
    assert_eq!(config.indent_size, 2);
    assert!(config.strict_sequences);
}

#[test]
fn test_config_save_and_load_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let config = Config {
        delimiter: "/".to_string(),
        macro_namespace: "acme".to_string(),
        create_backup: true,
        strict_sequences: false,
        ..Config::default()
    };
    config.save_to(&path).unwrap();

    assert_eq!(Config::load_from(&path).unwrap(), config);
}

#[test]
fn test_config_invalid_toml_is_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "delimiter = [not toml").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_config_path_location() {
    if let Some(path) = Config::config_path() {
        assert!(path.ends_with(".config/yamlpipe/config.toml"));
    }
}
