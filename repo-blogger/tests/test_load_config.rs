use repo_blogger::load_config::load_config;
use repo_blogger_core::config::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_TEMPLATE_PATH, DEFAULT_WORKDIR};
use serial_test::serial;
use std::env;
use std::fs::write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn set_secrets() {
    env::set_var("SUPABASE_URL", "https://db.example");
    env::set_var("SUPABASE_KEY", "anon");
    env::remove_var("PUBLISH_WORDPRESS_URL");
    env::remove_var("PUBLISH_WORDPRESS_KEY");
}

fn clear_secrets() {
    env::remove_var("SUPABASE_URL");
    env::remove_var("SUPABASE_KEY");
}

#[tokio::test]
#[serial]
async fn test_load_config_overrides_paths_and_keeps_env_secrets() {
    let config_yaml = r#"
workdir: ./tmp/cache
output_dir: ./tmp/articles
http_timeout_secs: 3
clone_timeout_secs: 30
"#;
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), config_yaml).unwrap();
    set_secrets();

    let config = load_config(Some(config_file.path())).expect("Config should load");

    assert_eq!(config.workdir, PathBuf::from("./tmp/cache"));
    assert_eq!(config.output_dir, PathBuf::from("./tmp/articles"));
    assert_eq!(config.template_path, PathBuf::from(DEFAULT_TEMPLATE_PATH));
    assert_eq!(config.http_timeout_secs, 3);
    assert_eq!(config.clone_timeout_secs, 30);
    let supabase = config.supabase.expect("supabase from env");
    assert_eq!(supabase.url, "https://db.example");
    clear_secrets();
}

#[tokio::test]
#[serial]
async fn test_load_config_without_file_uses_defaults() {
    clear_secrets();
    let config = load_config(None).expect("Defaults should load");
    assert_eq!(config.workdir, PathBuf::from(DEFAULT_WORKDIR));
    assert_eq!(config.http_timeout_secs, DEFAULT_HTTP_TIMEOUT_SECS);
    assert!(config.supabase.is_none());
}

#[tokio::test]
#[serial]
async fn test_load_config_accepts_empty_file() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), "").unwrap();
    let config = load_config(Some(config_file.path())).expect("Empty file means no overrides");
    assert_eq!(config.workdir, PathBuf::from(DEFAULT_WORKDIR));
}

#[tokio::test]
#[serial]
async fn test_load_config_rejects_secrets_in_yaml() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), "supabase_key: should-not-be-here\n").unwrap();

    let err = load_config(Some(config_file.path())).unwrap_err();
    assert!(
        err.to_string().contains("parse"),
        "Parse error expected, got: {err}"
    );
}

#[tokio::test]
#[serial]
async fn test_load_config_errors_for_invalid_file() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), b"not-yaml: [:::").unwrap();

    let err = load_config(Some(config_file.path())).unwrap_err();
    let msg = err.to_string();
    assert!(
        msg.contains("parse") || msg.contains("YAML"),
        "Parse error expected, got: {msg}"
    );
}

#[tokio::test]
#[serial]
async fn test_load_config_errors_for_missing_file() {
    let err = load_config(Some(PathBuf::from("does-not-exist.yaml").as_path())).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}
