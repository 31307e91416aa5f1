// Collects a throwaway local repository through the real `git` binary.
// Skipped when git is not installed.

use repo_blogger_core::collect::{clone_repo, CloneLimits, CollectError, GitCollector};
use repo_blogger_core::config::BloggerConfig;
use repo_blogger_core::contract::Collector;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn git(dir: &Path, args: &[&str]) -> bool {
    Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn init_repo(dir: &Path) -> bool {
    fs::create_dir_all(dir.join("src")).unwrap();
    fs::create_dir_all(dir.join("docs")).unwrap();
    fs::write(dir.join("README.md"), "# Widget\n\nUses Docker.\n\n- fast\n").unwrap();
    fs::write(dir.join("src/main.rs"), "fn main() {}\n").unwrap();
    fs::write(dir.join("docs/guide.md"), "guide\n").unwrap();

    git(dir, &["init", "-q"])
        && git(dir, &["add", "."])
        && git(
            dir,
            &[
                "-c",
                "user.name=test",
                "-c",
                "user.email=test@example.com",
                "commit",
                "-q",
                "-m",
                "init",
            ],
        )
}

#[tokio::test]
async fn collects_local_repository() {
    if Command::new("git").arg("--version").output().is_err() {
        eprintln!("git not available, skipping");
        return;
    }
    let dir = tempdir().unwrap();
    let source = dir.path().join("widget");
    if !init_repo(&source) {
        eprintln!("could not create a git repository, skipping");
        return;
    }

    let config = BloggerConfig {
        workdir: dir.path().join("cache"),
        ..BloggerConfig::default()
    };
    let collector = GitCollector::new(&config);
    let repo_url = format!("file://{}", source.display());

    let snapshot = collector.collect(&repo_url).await;
    assert_eq!(snapshot.repo_name, "widget");
    assert_eq!(snapshot.file_list, vec!["README.md", "docs/guide.md", "src/main.rs"]);
    assert_eq!(snapshot.folders, vec!["docs", "src"]);
    assert_eq!(snapshot.main_files, vec!["src/main.rs"]);
    assert!(snapshot.tech_stack.contains("rust"));
    assert!(snapshot.tech_stack.contains("docker"));
    assert!(snapshot.readme_text.starts_with("# Widget"));
    assert!(snapshot.contributors.is_empty());
    assert_eq!(snapshot.repo_path.as_deref(), Some(collector.checkout_dir(&repo_url).as_path()));

    // A second collection replaces the checkout rather than failing on it.
    let again = collector.collect(&repo_url).await;
    assert_eq!(again.file_list, snapshot.file_list);
}

/// Accepts connections and never answers them.
fn silent_server() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind local port");
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        let mut held = Vec::new();
        for stream in listener.incoming().flatten() {
            held.push(stream);
        }
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn stalled_server_degrades_to_empty_snapshot_in_bounded_time() {
    if Command::new("git").arg("--version").output().is_err() {
        eprintln!("git not available, skipping");
        return;
    }
    let dir = tempdir().unwrap();
    let base = silent_server();
    let config = BloggerConfig {
        workdir: dir.path().join("cache"),
        http_timeout_secs: 1,
        clone_timeout_secs: 3,
        ..BloggerConfig::default()
    };
    let collector = GitCollector::new(&config).with_api_base(base.clone());
    let repo_url = format!("{base}/acme/widget");

    let started = std::time::Instant::now();
    let snapshot = tokio::time::timeout(
        std::time::Duration::from_secs(20),
        collector.collect(&repo_url),
    )
    .await
    .expect("collect returns despite a server that never answers");

    assert!(started.elapsed() < std::time::Duration::from_secs(20));
    assert_eq!(snapshot.repo_name, "widget");
    assert!(snapshot.file_list.is_empty());
    assert!(snapshot.repo_path.is_none());
    assert!(snapshot.contributors.is_empty());
}

#[tokio::test]
async fn url_starting_with_dash_is_not_an_option() {
    if Command::new("git").arg("--version").output().is_err() {
        eprintln!("git not available, skipping");
        return;
    }
    let dir = tempdir().unwrap();
    let repo_url = format!("--template={}", dir.path().join("tpl").display());
    let config = BloggerConfig::default();

    let err = clone_repo(&repo_url, &dir.path().join("dest"), CloneLimits::from_config(&config))
        .await
        .expect_err("no such repository");
    match err {
        // git must have treated the value as the repository to clone.
        CollectError::Git(stderr) => assert!(stderr.contains("--template="), "unexpected stderr: {stderr}"),
        other => panic!("expected git error, got {other:?}"),
    }
    assert!(!dir.path().join("dest").join(".git").exists());
}
