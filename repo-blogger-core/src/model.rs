//! Records handed from one pipeline stage to the next.
//!
//! Every field defaults to an empty value so a partially filled record (an
//! empty snapshot after a failed clone, a row read back from the store) is
//! still a valid input for the following stage.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Raw facts collected about a repository.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub repo_name: String,
    /// Explicit description; the collector leaves this empty and the analyzer
    /// falls back to the README.
    pub description: String,
    pub readme_text: String,
    pub folders: Vec<String>,
    pub main_files: Vec<String>,
    /// Guessed technology tags, kept sorted.
    pub tech_stack: BTreeSet<String>,
    pub contributors: Vec<String>,
    pub file_list: Vec<String>,
    /// Local checkout the snapshot was read from, if the clone succeeded.
    pub repo_path: Option<PathBuf>,
}

impl Snapshot {
    /// Snapshot used when the repository could not be read at all.
    pub fn empty(repo_name: impl Into<String>) -> Self {
        Self {
            repo_name: repo_name.into(),
            ..Self::default()
        }
    }
}

/// Aggregate counts derived from a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Insights {
    pub readme_length: usize,
    pub folder_count: usize,
    pub file_count: usize,
}

/// Bounded summary of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Analysis {
    pub repo_name: String,
    pub description: String,
    /// At most 500 characters of README, plus `...` when cut.
    pub summary: String,
    pub folders: Vec<String>,
    pub main_files: Vec<String>,
    pub tech_stack: Vec<String>,
    /// README bullet lines, at most 10.
    pub features: Vec<String>,
    pub insights: Insights,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Section {
    pub title: String,
    pub content: String,
}

impl Section {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Composed long-form article.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Draft {
    pub title: String,
    pub subtitle: String,
    pub body_md: String,
    pub seo_keywords: Vec<String>,
    pub sections: Vec<Section>,
    /// Writing guide the draft was composed against (may be empty).
    pub template: String,
}

/// Image-generation prompt for one article section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Prompt {
    pub section: String,
    pub prompt: String,
}

/// Prompt row as stored in the `image_prompts` table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QueuedPrompt {
    pub section: String,
    pub prompt: String,
    pub status: String,
}
