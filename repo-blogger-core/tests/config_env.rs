use repo_blogger_core::config::{BloggerConfig, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_OUTPUT_DIR};
use serial_test::serial;
use std::env;
use std::fs::write;
use std::path::PathBuf;
use tempfile::tempdir;

const VARS: [&str; 7] = [
    "GITHUB_TOKEN",
    "SUPABASE_URL",
    "SUPABASE_KEY",
    "PUBLISH_WORDPRESS_URL",
    "PUBLISH_WORDPRESS_KEY",
    "PUBLISH_TISTORY_TOKEN",
    "PUBLISH_VELOG_COOKIE",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn empty_environment_leaves_everything_unconfigured() {
    clear_env();
    let config = BloggerConfig::from_env();
    assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
    assert_eq!(config.http_timeout_secs, DEFAULT_HTTP_TIMEOUT_SECS);
    assert!(config.github_token.is_none());
    assert!(config.supabase.is_none());
    assert!(config.publish.wordpress.is_none());
    assert!(config.publish.tistory_token.is_none());
    assert!(config.publish.velog_cookie.is_none());
}

#[test]
#[serial]
fn dotenv_file_configures_targets() {
    clear_env();
    let dir = tempdir().unwrap();
    let env_path = dir.path().join(".env");
    write(
        &env_path,
        "GITHUB_TOKEN=gh-secret\n\
         SUPABASE_URL=https://db.example\n\
         SUPABASE_KEY=anon\n\
         PUBLISH_WORDPRESS_URL=https://blog.example\n\
         PUBLISH_TISTORY_TOKEN=   \n",
    )
    .unwrap();
    dotenvy::from_path(&env_path).expect(".env loads");

    let config = BloggerConfig::from_env();
    assert_eq!(config.github_token.as_deref(), Some("gh-secret"));
    let supabase = config.supabase.as_ref().expect("supabase configured");
    assert_eq!(supabase.url, "https://db.example");
    assert_eq!(supabase.key, "anon");
    assert!(config.publish.wordpress.is_none(), "url without key stays unconfigured");
    assert!(config.publish.tistory_token.is_none(), "blank token is unset");

    let debug = format!("{config:?}");
    assert!(!debug.contains("gh-secret"));
    assert!(!debug.contains("anon"));

    clear_env();
}
