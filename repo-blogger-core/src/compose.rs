//! Analysis → Draft: fills a fixed section template into a long-form article.
//!
//! Composition is deterministic apart from the generation date, which is
//! injected through [`DraftComposer::compose_on`]. The body is padded with a
//! filler paragraph up to [`TARGET_LENGTH`] characters; when padding happens
//! the body is cut to exactly that length before the timestamp line is
//! appended. Filler carries no information, so the cut may land mid-sentence.

use chrono::{NaiveDate, Utc};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::model::{Analysis, Draft, Section};

/// Minimum body length, in characters, before the timestamp line.
pub const TARGET_LENGTH: usize = 5200;
pub const TITLE_SUFFIX: &str = "— open-source introduction";
pub const SEO_TAG: &str = "github open source";
pub const MAX_LISTED_FOLDERS: usize = 12;

const FALLBACK_REPO_NAME: &str = "project";
const FILLER_SENTENCE: &str = "This draft was generated automatically from the repository contents. ";
const FILLER_REPEAT: usize = 50;

const PROBLEM_STATEMENT: &str = "Open-source projects are easy to find and hard to evaluate. \
A repository page shows code, but rarely explains why the project exists, \
what it is good at, or where to begin. This article reads the repository for you \
and lays out the essentials so you can decide quickly whether it fits your work.";

const CLOSING: &str = "Every repository tells a story through its structure, its documentation \
and the choices its maintainers make. Reading that story before adopting a project \
saves time later and makes contributions easier to land.";

const CALL_TO_ACTION: &str = "If this project looks useful, star it on GitHub, try it on a small \
task this week, and share what you learn with the maintainers. Issues, pull requests \
and honest feedback are how open-source software gets better.";

/// Composes drafts against an optional writing guide.
#[derive(Debug, Clone, Default)]
pub struct DraftComposer {
    template: String,
}

impl DraftComposer {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Composer whose template is read from `path`; a missing or unreadable
    /// file gives an empty template.
    pub fn from_template_file(path: &Path) -> Self {
        Self::new(load_template(path))
    }

    /// Compose with today's UTC date in the timestamp line.
    pub fn compose(&self, analysis: &Analysis) -> Draft {
        self.compose_on(analysis, Utc::now().date_naive())
    }

    pub fn compose_on(&self, analysis: &Analysis, generated_on: NaiveDate) -> Draft {
        let repo = display_repo_name(analysis);
        let title = format!("{repo} {TITLE_SUFFIX}");
        let subtitle = analysis.description.clone();
        let sections = build_sections(analysis);

        let mut body_md = assemble_body(&title, &subtitle, &analysis.summary, &sections);
        let natural_length = body_md.chars().count();
        body_md = ensure_length(body_md, TARGET_LENGTH);
        body_md.push_str(&timestamp_line(generated_on));

        info!(
            title = %title,
            sections = sections.len(),
            natural_length,
            padded = natural_length < TARGET_LENGTH,
            "Composed draft"
        );

        Draft {
            title,
            subtitle,
            body_md,
            seo_keywords: seo_keywords(analysis),
            sections,
            template: self.template.clone(),
        }
    }
}

/// Compose with an empty template and today's date.
pub fn compose(analysis: &Analysis) -> Draft {
    DraftComposer::default().compose(analysis)
}

pub fn load_template(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(text) => {
            debug!(path = %path.display(), length = text.len(), "Loaded blog template");
            text
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No blog template found, using empty template");
            String::new()
        }
        Err(e) => {
            warn!(error = ?e, path = %path.display(), "Failed to read blog template, using empty template");
            String::new()
        }
    }
}

pub fn timestamp_line(generated_on: NaiveDate) -> String {
    format!("_Generated locally on {}_\n", generated_on.format("%Y-%m-%d"))
}

fn display_repo_name(analysis: &Analysis) -> &str {
    if analysis.repo_name.is_empty() {
        FALLBACK_REPO_NAME
    } else {
        &analysis.repo_name
    }
}

fn bullets<'a>(items: impl IntoIterator<Item = &'a String>, code: bool) -> String {
    items
        .into_iter()
        .map(|item| if code { format!("- `{item}`") } else { format!("- {item}") })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_sections(analysis: &Analysis) -> Vec<Section> {
    let repo = display_repo_name(analysis);
    let mut sections = Vec::with_capacity(7);

    let background = if analysis.description.is_empty() {
        format!(
            "{repo} is an open-source project published on GitHub. \
             This article walks through what it offers, how the code is organised \
             and how to get it running."
        )
    } else {
        format!(
            "{repo} is an open-source project published on GitHub: {}. \
             This article walks through what it offers, how the code is organised \
             and how to get it running.",
            analysis.description.trim_end_matches('.')
        )
    };
    sections.push(Section::new("Background", background));

    if !analysis.features.is_empty() {
        sections.push(Section::new("Key features", bullets(&analysis.features, false)));
    }
    if !analysis.folders.is_empty() {
        sections.push(Section::new(
            "Directory structure",
            bullets(analysis.folders.iter().take(MAX_LISTED_FOLDERS), true),
        ));
    }
    if !analysis.tech_stack.is_empty() {
        sections.push(Section::new("Tech stack", analysis.tech_stack.join(", ")));
    }
    if !analysis.main_files.is_empty() {
        sections.push(Section::new("Entry files", bullets(&analysis.main_files, true)));
    }

    let usage_ideas = [
        format!("Use {repo} as a reference implementation when designing a similar system."),
        format!("Run {repo} locally and adapt it to an internal workflow."),
        format!("Read the {repo} source to learn how its core features are built."),
        format!("Contribute fixes or documentation improvements back to {repo}."),
        format!("Combine {repo} with your existing tools to automate repetitive work."),
    ];
    sections.push(Section::new("Usage ideas", bullets(&usage_ideas, false)));

    let getting_started = [
        format!("1. Clone the {repo} repository from GitHub."),
        "2. Install the dependencies listed in the README.".to_string(),
        "3. Copy any example configuration and fill in your own values.".to_string(),
        "4. Run the entry file and check the output against the documentation.".to_string(),
    ];
    sections.push(Section::new("Getting started", getting_started.join("\n")));

    sections
}

fn assemble_body(title: &str, subtitle: &str, summary: &str, sections: &[Section]) -> String {
    let mut body = format!(
        "# {title}\n\n{subtitle}\n\n## Overview\n{summary}\n\n## Problem statement\n{PROBLEM_STATEMENT}\n\n"
    );
    for section in sections {
        body.push_str(&format!("### {}\n{}\n\n", section.title, section.content));
    }
    body.push_str(&format!("## Closing\n{CLOSING}\n\n## Call to action\n{CALL_TO_ACTION}\n\n"));
    body
}

/// Pad `text` with filler up to `target_len` characters, then cut to exactly
/// `target_len`. Text already at or above the target is returned untouched.
pub fn ensure_length(mut text: String, target_len: usize) -> String {
    let mut length = text.chars().count();
    if length >= target_len {
        return text;
    }
    let filler = format!("\n\n{}", FILLER_SENTENCE.repeat(FILLER_REPEAT));
    let filler_length = filler.chars().count();
    while length < target_len {
        text.push_str(&filler);
        length += filler_length;
    }
    if let Some((cut, _)) = text.char_indices().nth(target_len) {
        text.truncate(cut);
    }
    text
}

/// Tech stack tags, the marketing tag and the repo name, first occurrence wins.
pub fn seo_keywords(analysis: &Analysis) -> Vec<String> {
    let mut seen = HashSet::new();
    analysis
        .tech_stack
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(SEO_TAG))
        .chain((!analysis.repo_name.is_empty()).then_some(analysis.repo_name.as_str()))
        .filter(|keyword| seen.insert(*keyword))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_length_cuts_to_exact_target() {
        let padded = ensure_length("short".to_string(), 300);
        assert_eq!(padded.chars().count(), 300);
        assert!(padded.starts_with("short\n\n"));
    }

    #[test]
    fn ensure_length_leaves_long_text_alone() {
        let text = "x".repeat(400);
        assert_eq!(ensure_length(text.clone(), 300), text);
    }

    #[test]
    fn ensure_length_handles_multibyte_text() {
        let padded = ensure_length("— é —".to_string(), 1000);
        assert_eq!(padded.chars().count(), 1000);
    }

    #[test]
    fn folders_section_lists_at_most_twelve() {
        let analysis = Analysis {
            repo_name: "demo".into(),
            folders: (0..20).map(|i| format!("dir{i}")).collect(),
            ..Analysis::default()
        };
        let sections = build_sections(&analysis);
        let folders = sections
            .iter()
            .find(|s| s.title == "Directory structure")
            .expect("folders section present");
        assert_eq!(folders.content.lines().count(), MAX_LISTED_FOLDERS);
        assert!(folders.content.contains("`dir11`"));
        assert!(!folders.content.contains("`dir12`"));
    }

    #[test]
    fn timestamp_line_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).expect("valid date");
        assert_eq!(timestamp_line(date), "_Generated locally on 2024-03-09_\n");
    }
}
