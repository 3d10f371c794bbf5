//! 設定ファイルのテスト

use sky_souls::config::Config;
use tempfile::tempdir;

/// 設定ファイルがなければ既定値
#[test]
fn test_missing_config_uses_defaults() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = Config::load_from(&dir.path().join("config.json")).expect("読み込み失敗");

    assert_eq!(config.page_size, 20);
    assert_eq!(config.timeout_seconds, 30);
    assert!(config.api_url.starts_with("http"));
}

/// 保存と再読み込み
#[test]
fn test_save_and_load() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("config.json");

    let mut config = Config::default();
    config
        .set_api_url("https://api.example.com/".to_string())
        .expect("URL設定失敗");
    config.set_page_size(30).expect("ページサイズ設定失敗");
    config.save_to(&path).expect("保存失敗");

    let loaded = Config::load_from(&path).expect("読み込み失敗");
    assert_eq!(loaded.api_url, "https://api.example.com");
    assert_eq!(loaded.page_size, 30);
}

/// 欠けた項目は既定値で補う
#[test]
fn test_partial_config_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"api_url":"http://10.0.0.2:8080"}"#).expect("書き込み失敗");

    let config = Config::load_from(&path).expect("読み込み失敗");
    assert_eq!(config.api_url, "http://10.0.0.2:8080");
    assert_eq!(config.page_size, 20);
}

/// 不正な値は拒否
#[test]
fn test_invalid_settings() {
    let mut config = Config::default();
    assert!(config.set_api_url("ftp://example.com".to_string()).is_err());
    assert!(config.set_page_size(0).is_err());
    assert!(config.set_page_size(101).is_err());
    assert_eq!(config.page_size, 20);
}

/// コマンドライン引数が最優先
#[test]
fn test_cli_override_wins() {
    let config = Config::default();
    assert_eq!(
        config.resolve_api_url(Some("http://override:1234")),
        "http://override:1234"
    );
}
