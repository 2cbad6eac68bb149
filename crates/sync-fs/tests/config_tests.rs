use std::fs;

use serde::{Deserialize, Serialize};
use sync_fs::{ConfigStore, Error, NormalizedPath};
use tempfile::TempDir;

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
struct TestConfig {
    name: String,
    count: i32,
}

#[test]
fn test_load_toml() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("config.toml");
    fs::write(&file_path, "name = \"test\"\ncount = 42").unwrap();

    let config: TestConfig = ConfigStore::new()
        .load(&NormalizedPath::new(&file_path))
        .unwrap();

    assert_eq!(config, TestConfig { name: "test".into(), count: 42 });
}

#[test]
fn test_load_json() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("config.json");
    fs::write(&file_path, r#"{"name": "test", "count": 42}"#).unwrap();

    let config: TestConfig = ConfigStore::new()
        .load(&NormalizedPath::new(&file_path))
        .unwrap();

    assert_eq!(config.count, 42);
}

#[test]
fn test_save_then_load_json() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("nested/config.json"));
    let store = ConfigStore::new();

    let value = TestConfig { name: "saved".into(), count: 7 };
    store.save(&path, &value).unwrap();

    let loaded: TestConfig = store.load(&path).unwrap();
    assert_eq!(loaded, value);
}

#[test]
fn test_load_or_default_missing_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("absent.toml"));

    let config: TestConfig = ConfigStore::new().load_or_default(&path).unwrap();
    assert_eq!(config, TestConfig::default());
}

#[test]
fn test_invalid_json_is_parse_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("broken.json");
    fs::write(&file_path, "{ not json").unwrap();

    let result: Result<TestConfig, _> = ConfigStore::new().load(&NormalizedPath::new(&file_path));
    assert!(matches!(result, Err(Error::ConfigParse { .. })));
}

#[test]
fn test_unsupported_extension() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("config.ini");
    fs::write(&file_path, "x").unwrap();

    let result: Result<TestConfig, _> = ConfigStore::new().load(&NormalizedPath::new(&file_path));
    assert!(matches!(result, Err(Error::UnsupportedFormat { .. })));
}
