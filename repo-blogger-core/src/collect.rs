//! Repository collection: shallow git clone, tree walk, README read and a
//! contributors lookup against the GitHub REST API.
//!
//! Nothing here is allowed to fail the pipeline. [`GitCollector::collect`]
//! logs every problem and falls back to an empty [`Snapshot`] that still
//! carries the repository name.

use async_trait::async_trait;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::config::BloggerConfig;
use crate::contract::Collector;
use crate::model::Snapshot;

const README_CANDIDATES: [&str; 3] = ["README.md", "README.MD", "readme.md"];
const GITHUB_API: &str = "https://api.github.com";
const USER_AGENT: &str = "repo-blogger";

static MAIN_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(src/)?(main|app|server|index)\.(py|js|ts|tsx|go|rs)$")
        .expect("main file pattern is valid")
});
static GITHUB_REPO_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[^/]+/([^/]+)/([^/]+)").expect("repo url pattern is valid")
});

const EXTENSION_TAGS: [(&str, &str); 12] = [
    ("py", "python"),
    ("js", "javascript"),
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("jsx", "javascript"),
    ("go", "go"),
    ("rs", "rust"),
    ("java", "java"),
    ("rb", "ruby"),
    ("php", "php"),
    ("swift", "swift"),
    ("kt", "kotlin"),
];
const README_KEYWORDS: [&str; 8] = [
    "supabase", "fastapi", "flask", "django", "react", "next.js", "vite", "docker",
];

#[derive(Debug)]
pub enum CollectError {
    Io(std::io::Error),
    Git(String),
}

impl std::fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectError::Io(e) => write!(f, "io error: {e}"),
            CollectError::Git(msg) => write!(f, "git error: {msg}"),
        }
    }
}

impl std::error::Error for CollectError {}

impl From<std::io::Error> for CollectError {
    fn from(e: std::io::Error) -> Self {
        CollectError::Io(e)
    }
}

/// Collector backed by the `git` binary and the GitHub API.
pub struct GitCollector {
    clone_root: PathBuf,
    clone_limits: CloneLimits,
    github_token: Option<String>,
    api_base: String,
    http: reqwest::Client,
}

impl GitCollector {
    pub fn new(config: &BloggerConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = ?e, "Failed to build HTTP client with timeout, using defaults");
                reqwest::Client::new()
            });
        Self {
            clone_root: config.workdir.join("repos"),
            clone_limits: CloneLimits::from_config(config),
            github_token: config.github_token.clone(),
            api_base: GITHUB_API.to_string(),
            http,
        }
    }

    /// Point contributor lookups at another API host.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Deterministic checkout directory for a URL, e.g.
    /// `https://github.com/a/b` → `git_https___github.com_a_b`.
    pub fn checkout_dir(&self, repo_url: &str) -> PathBuf {
        let dir_name = format!("git_{repo_url}").replace(['/', ':'], "_");
        self.clone_root.join(dir_name)
    }

    async fn read_checkout(&self, repo_url: &str) -> Result<(PathBuf, String, Vec<String>), CollectError> {
        let checkout = self.checkout_dir(repo_url);
        clone_repo(repo_url, &checkout, self.clone_limits).await?;
        let readme = read_readme(&checkout);
        let files = tree_paths(&checkout)?;
        Ok((checkout, readme, files))
    }

    /// Contributor logins for `http(s)://host/owner/repo` URLs; empty on any failure.
    pub async fn fetch_contributors(&self, repo_url: &str) -> Vec<String> {
        let Some((owner, repo)) = parse_owner_repo(repo_url) else {
            debug!(repo_url, "URL is not owner/repo shaped, skipping contributors");
            return Vec::new();
        };
        let url = format!("{}/repos/{owner}/{repo}/contributors", self.api_base.trim_end_matches('/'));
        let mut request = self.http.get(&url);
        if let Some(token) = &self.github_token {
            request = request.header("Authorization", format!("token {token}"));
        }

        let response = match request.send().await {
            Ok(resp) if resp.status().is_success() => resp,
            Ok(resp) => {
                warn!(status = %resp.status(), url = %url, "GitHub contributors request rejected");
                return Vec::new();
            }
            Err(e) => {
                warn!(error = ?e, url = %url, "GitHub contributors request failed");
                return Vec::new();
            }
        };

        match response.json::<serde_json::Value>().await {
            Ok(body) => contributor_logins(&body),
            Err(e) => {
                warn!(error = ?e, url = %url, "Failed to decode contributors JSON");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl Collector for GitCollector {
    async fn collect(&self, repo_url: &str) -> Snapshot {
        let repo_name = repo_name_from_url(repo_url);
        info!(repo_url, repo_name = %repo_name, "Collecting repository snapshot");

        let (repo_path, readme_text, file_list) = match self.read_checkout(repo_url).await {
            Ok((path, readme, files)) => (Some(path), readme, files),
            Err(e) => {
                error!(error = %e, repo_url, "Repository collection failed, continuing with empty snapshot");
                (None, String::new(), Vec::new())
            }
        };

        let folders = folders_of(&file_list);
        let main_files = main_files_of(&file_list);
        let tech_stack = guess_tech_stack(&file_list, &readme_text);
        let contributors = self.fetch_contributors(repo_url).await;

        info!(
            repo_name = %repo_name,
            files = file_list.len(),
            folders = folders.len(),
            contributors = contributors.len(),
            readme_length = readme_text.len(),
            "Collected repository snapshot"
        );

        Snapshot {
            repo_name,
            description: String::new(),
            readme_text,
            folders,
            main_files,
            tech_stack,
            contributors,
            file_list,
            repo_path,
        }
    }
}

/// Last path segment of the URL without a trailing `.git`.
pub fn repo_name_from_url(repo_url: &str) -> String {
    let last = repo_url
        .trim_end_matches('/')
        .rsplit(['/', ':'])
        .next()
        .unwrap_or_default();
    last.strip_suffix(".git").unwrap_or(last).to_string()
}

fn parse_owner_repo(repo_url: &str) -> Option<(String, String)> {
    let caps = GITHUB_REPO_URL.captures(repo_url)?;
    let owner = caps.get(1)?.as_str();
    let repo = caps.get(2)?.as_str();
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    Some((owner.to_string(), repo.to_string()))
}

fn contributor_logins(body: &serde_json::Value) -> Vec<String> {
    body.as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry.get("login").and_then(|login| login.as_str()))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Time bounds for one clone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloneLimits {
    /// Hard limit on the whole `git clone` process.
    pub total: Duration,
    /// Abort when the transfer stays below 1 byte/s for this long.
    pub stall: Duration,
}

impl CloneLimits {
    pub fn from_config(config: &BloggerConfig) -> Self {
        Self {
            total: Duration::from_secs(config.clone_timeout_secs),
            stall: Duration::from_secs(config.http_timeout_secs.max(1)),
        }
    }
}

/// `git clone --depth 1 -- <repo_url> <dest>`, replacing anything already at `dest`.
///
/// The child is killed when `limits.total` expires.
pub async fn clone_repo(repo_url: &str, dest: &Path, limits: CloneLimits) -> Result<(), CollectError> {
    if dest.exists() {
        fs::remove_dir_all(dest)?;
        debug!(path = %dest.display(), "Removed existing checkout");
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut command = Command::new("git");
    command
        .arg("-c")
        .arg("http.lowSpeedLimit=1")
        .arg("-c")
        .arg(format!("http.lowSpeedTime={}", limits.stall.as_secs()))
        .arg("clone")
        .arg("--depth")
        .arg("1")
        .arg("--")
        .arg(repo_url)
        .arg(dest)
        .env("GIT_TERMINAL_PROMPT", "0")
        .kill_on_drop(true);

    let output = match tokio::time::timeout(limits.total, command.output()).await {
        Ok(result) => result.map_err(|e| {
            error!(error = ?e, repo_url, "Failed to launch git process");
            CollectError::Io(e)
        })?,
        Err(_) => {
            warn!(repo_url, timeout_secs = limits.total.as_secs(), "git clone timed out, killed");
            return Err(CollectError::Git("timed out".to_string()));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(CollectError::Git(if stderr.is_empty() {
            format!("git clone exited with {}", output.status)
        } else {
            stderr
        }));
    }
    info!(repo_url, path = %dest.display(), "Cloned git repository");
    Ok(())
}

pub fn read_readme(repo_path: &Path) -> String {
    README_CANDIDATES
        .iter()
        .map(|name| repo_path.join(name))
        .find(|path| path.is_file())
        .and_then(|path| match fs::read(&path) {
            Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) => {
                warn!(error = ?e, path = %path.display(), "Failed to read README");
                None
            }
        })
        .unwrap_or_default()
}

/// Every regular file under `repo_path`, relative, `/`-separated and sorted.
/// `.git` is skipped. Symlinks to files count as files; symlinked directories
/// are not entered.
pub fn tree_paths(repo_path: &Path) -> Result<Vec<String>, CollectError> {
    fn visit_dir(dir: &Path, repo_path: &Path, results: &mut Vec<String>) -> Result<(), CollectError> {
        for entry_res in fs::read_dir(dir)? {
            let entry = entry_res?;
            let path = entry.path();
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                if entry.file_name() == ".git" {
                    continue;
                }
                visit_dir(&path, repo_path, results)?;
            } else if file_type.is_file() || (file_type.is_symlink() && path.is_file()) {
                let Ok(rel_path) = path.strip_prefix(repo_path) else {
                    continue;
                };
                let segments: Vec<String> = rel_path
                    .components()
                    .map(|comp| comp.as_os_str().to_string_lossy().into_owned())
                    .collect();
                results.push(segments.join("/"));
            }
        }
        Ok(())
    }

    let mut results = Vec::new();
    visit_dir(repo_path, repo_path, &mut results)?;
    results.sort();
    Ok(results)
}

pub fn folders_of(files: &[String]) -> Vec<String> {
    files
        .iter()
        .filter_map(|file| file.rsplit_once('/').map(|(parent, _)| parent.to_string()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn main_files_of(files: &[String]) -> Vec<String> {
    files
        .iter()
        .filter(|file| MAIN_FILE.is_match(file))
        .cloned()
        .collect()
}

/// Languages by file extension plus frameworks named in the README.
pub fn guess_tech_stack(files: &[String], readme: &str) -> BTreeSet<String> {
    let mut stack = BTreeSet::new();
    for file in files {
        let Some(ext) = Path::new(file).extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if let Some((_, tag)) = EXTENSION_TAGS.iter().find(|(known, _)| *known == ext) {
            stack.insert((*tag).to_string());
        }
    }
    let lower = readme.to_lowercase();
    for keyword in README_KEYWORDS {
        if lower.contains(keyword) {
            stack.insert(keyword.to_string());
        }
    }
    stack
}

/// Write the snapshot as pretty JSON, creating parent directories.
pub fn save_snapshot(snapshot: &Snapshot, path: &Path) -> Result<(), CollectError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(snapshot)
        .map_err(|e| CollectError::Io(std::io::Error::other(e)))?;
    fs::write(path, json)?;
    debug!(path = %path.display(), "Saved snapshot");
    Ok(())
}
