/// `load_config` module: builds the runtime [`BloggerConfig`] from the environment
/// and an optional static YAML file.
///
/// Secrets (GitHub token, Supabase and publishing credentials) only ever come
/// from the environment. The YAML file may override the non-secret settings:
///
/// ```yaml
/// workdir: .cache
/// output_dir: articles/final
/// template_path: config/BLOG_WRITING_GUIDE.md
/// http_timeout_secs: 8
/// clone_timeout_secs: 120
/// ```
///
/// Unknown keys are rejected so a misplaced secret fails loudly instead of being ignored.
///
/// # Errors
/// All errors use `anyhow::Error` and surface at the CLI boundary.
use anyhow::Result;
use repo_blogger_core::config::BloggerConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Non-secret settings accepted from the YAML file. Absent keys keep their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub workdir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub template_path: Option<PathBuf>,
    pub http_timeout_secs: Option<u64>,
    pub clone_timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Apply the file's values over `config`.
    pub fn apply(self, config: &mut BloggerConfig) {
        if let Some(workdir) = self.workdir {
            config.workdir = workdir;
        }
        if let Some(output_dir) = self.output_dir {
            config.output_dir = output_dir;
        }
        if let Some(template_path) = self.template_path {
            config.template_path = template_path;
        }
        if let Some(secs) = self.http_timeout_secs {
            config.http_timeout_secs = secs;
        }
        if let Some(secs) = self.clone_timeout_secs {
            config.clone_timeout_secs = secs;
        }
    }
}

/// Environment-derived config, optionally overridden by a YAML file.
pub fn load_config(path: Option<&Path>) -> Result<BloggerConfig> {
    let mut config = BloggerConfig::from_env();

    let Some(path_ref) = path else {
        info!("No config file given, using defaults and environment");
        config.trace_loaded();
        return Ok(config);
    };
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    // An empty file parses as YAML null; treat it as "no overrides".
    let file_config: FileConfig = if config_content.trim().is_empty() {
        FileConfig::default()
    } else {
        match serde_yaml::from_str(&config_content) {
            Ok(conf) => {
                info!(config_path = ?path_ref, "Parsed config YAML successfully");
                conf
            }
            Err(e) => {
                error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
                return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
            }
        }
    };

    file_config.apply(&mut config);
    config.trace_loaded();
    Ok(config)
}
