//! Snapshot → Analysis.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::model::{Analysis, Insights, Snapshot};

pub const SUMMARY_MAX_CHARS: usize = 500;
pub const TRUNCATION_MARKER: &str = "...";
pub const MAX_FEATURES: usize = 10;

static BULLET_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^-[ \t]+(.+)$").expect("bullet pattern is valid"));

/// Derive summary, description, features and counts from a snapshot.
///
/// Total: every field of the snapshot may be empty.
pub fn analyze(snapshot: &Snapshot) -> Analysis {
    let readme = snapshot.readme_text.as_str();
    let description = if snapshot.description.is_empty() {
        extract_description(readme)
    } else {
        snapshot.description.clone()
    };
    let features = extract_features(readme);

    let analysis = Analysis {
        repo_name: snapshot.repo_name.clone(),
        description,
        summary: summarise(readme),
        folders: snapshot.folders.clone(),
        main_files: snapshot.main_files.clone(),
        tech_stack: snapshot.tech_stack.iter().cloned().collect(),
        features,
        insights: Insights {
            readme_length: readme.chars().count(),
            folder_count: snapshot.folders.len(),
            file_count: snapshot.file_list.len(),
        },
    };
    debug!(
        repo_name = %analysis.repo_name,
        features = analysis.features.len(),
        readme_length = analysis.insights.readme_length,
        "Analysed snapshot"
    );
    analysis
}

/// First README line that still has text once heading markers are stripped.
pub fn extract_description(readme: &str) -> String {
    readme
        .lines()
        .map(|line| line.trim().trim_start_matches(['#', ' ']))
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}

pub fn extract_features(readme: &str) -> Vec<String> {
    BULLET_LINE
        .captures_iter(readme)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end())
        .filter(|text| !text.is_empty())
        .take(MAX_FEATURES)
        .map(str::to_string)
        .collect()
}

pub fn summarise(readme: &str) -> String {
    match readme.char_indices().nth(SUMMARY_MAX_CHARS) {
        Some((cut, _)) => format!("{}{}", &readme[..cut], TRUNCATION_MARKER),
        None => readme.to_string(),
    }
}
