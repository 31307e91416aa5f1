//! Runtime configuration, collected once and handed to constructors.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing::{debug, info};

pub const DEFAULT_WORKDIR: &str = ".cache";
pub const DEFAULT_OUTPUT_DIR: &str = "articles/final";
pub const DEFAULT_TEMPLATE_PATH: &str = "config/BLOG_WRITING_GUIDE.md";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 8;
pub const DEFAULT_CLONE_TIMEOUT_SECS: u64 = 120;

/// Credentials for the Supabase (PostgREST) backing store.
#[derive(Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    pub url: String,
    pub key: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct WordPressConfig {
    pub url: String,
    pub key: String,
}

/// Publishing targets. `None` means the target is skipped.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct PublishConfig {
    pub wordpress: Option<WordPressConfig>,
    pub tistory_token: Option<String>,
    pub velog_cookie: Option<String>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct BloggerConfig {
    /// Scratch space for clones and the saved snapshot.
    pub workdir: PathBuf,
    /// Where rendered markdown/HTML articles are written.
    pub output_dir: PathBuf,
    /// Blog writing guide embedded into each draft.
    pub template_path: PathBuf,
    pub http_timeout_secs: u64,
    /// Hard limit on one `git clone`.
    pub clone_timeout_secs: u64,
    pub github_token: Option<String>,
    pub supabase: Option<SupabaseConfig>,
    pub publish: PublishConfig,
}

impl Default for BloggerConfig {
    fn default() -> Self {
        Self {
            workdir: PathBuf::from(DEFAULT_WORKDIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            template_path: PathBuf::from(DEFAULT_TEMPLATE_PATH),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            clone_timeout_secs: DEFAULT_CLONE_TIMEOUT_SECS,
            github_token: None,
            supabase: None,
            publish: PublishConfig::default(),
        }
    }
}

impl BloggerConfig {
    /// Default paths plus every secret found in the environment.
    ///
    /// Blank variables are treated as unset; a half-configured target (URL
    /// without key) is left unconfigured.
    pub fn from_env() -> Self {
        let supabase = match (non_blank_var("SUPABASE_URL"), non_blank_var("SUPABASE_KEY")) {
            (Some(url), Some(key)) => Some(SupabaseConfig { url, key }),
            _ => None,
        };
        let wordpress = match (
            non_blank_var("PUBLISH_WORDPRESS_URL"),
            non_blank_var("PUBLISH_WORDPRESS_KEY"),
        ) {
            (Some(url), Some(key)) => Some(WordPressConfig { url, key }),
            _ => None,
        };

        Self {
            github_token: non_blank_var("GITHUB_TOKEN"),
            supabase,
            publish: PublishConfig {
                wordpress,
                tistory_token: non_blank_var("PUBLISH_TISTORY_TOKEN"),
                velog_cookie: non_blank_var("PUBLISH_VELOG_COOKIE"),
            },
            ..Self::default()
        }
    }

    pub fn trace_loaded(&self) {
        info!(
            workdir = %self.workdir.display(),
            output_dir = %self.output_dir.display(),
            template_path = %self.template_path.display(),
            supabase_configured = self.supabase.is_some(),
            wordpress_configured = self.publish.wordpress.is_some(),
            "Loaded BloggerConfig"
        );
        debug!(?self, "Config loaded (full debug)");
    }
}

// Secrets stay out of debug output.
impl std::fmt::Debug for BloggerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BloggerConfig")
            .field("workdir", &self.workdir)
            .field("output_dir", &self.output_dir)
            .field("template_path", &self.template_path)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("clone_timeout_secs", &self.clone_timeout_secs)
            .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
            .field("supabase", &self.supabase.as_ref().map(|s| s.url.as_str()))
            .field(
                "wordpress",
                &self.publish.wordpress.as_ref().map(|w| w.url.as_str()),
            )
            .field("tistory", &self.publish.tistory_token.is_some())
            .field("velog", &self.publish.velog_cookie.is_some())
            .finish()
    }
}

fn non_blank_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
