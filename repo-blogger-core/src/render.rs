//! Local output: markdown and a minimal HTML rendering per draft, plus an
//! `index.html` card page over every rendered article.

use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::model::Draft;

pub const INDEX_FILE: &str = "index.html";
const FALLBACK_SLUG: &str = "draft";

#[derive(Debug)]
pub enum RenderError {
    Io(std::io::Error),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<std::io::Error> for RenderError {
    fn from(e: std::io::Error) -> Self {
        RenderError::Io(e)
    }
}

/// Files written for one draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalOutputs {
    pub markdown: PathBuf,
    pub html: PathBuf,
}

/// A rendered article as listed on the index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostLink {
    pub title: String,
    pub href: String,
}

/// Filesystem-safe file stem for a title: spaces and path-hostile characters
/// become `_`.
pub fn slugify(title: &str) -> String {
    let slug: String = title
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Escape `&`, `<`, `>`, then turn blank lines into `<br><br>` and single
/// newlines into `<br>`.
pub fn markdown_to_html(md: &str) -> String {
    let body = escape_html(md)
        .replace("\n\n", "<br><br>")
        .replace('\n', "<br>");
    format!("<html><body>{body}</body></html>")
}

/// Write `<slug>.md` and `<slug>.html` for the draft into `out_dir`.
pub fn write_local_outputs(out_dir: &Path, draft: &Draft) -> Result<LocalOutputs, RenderError> {
    fs::create_dir_all(out_dir)?;
    let slug = slugify(&draft.title);
    let markdown = out_dir.join(format!("{slug}.md"));
    let html = out_dir.join(format!("{slug}.html"));

    fs::write(&markdown, &draft.body_md)?;
    fs::write(&html, markdown_to_html(&draft.body_md))?;
    info!(
        markdown = %markdown.display(),
        html = %html.display(),
        "Wrote local article outputs"
    );
    Ok(LocalOutputs { markdown, html })
}

/// Title shown on an index card, recovered from a file stem.
pub fn title_from_stem(stem: &str) -> String {
    stem.replace("_—_", " — ").replace('_', " ")
}

/// Every `*.html` article in `dir` except the index itself, sorted by file name.
pub fn collect_posts(dir: &Path) -> Result<Vec<PostLink>, RenderError> {
    let mut names = Vec::new();
    for entry_res in fs::read_dir(dir)? {
        let entry = entry_res?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name == INDEX_FILE || !name.ends_with(".html") {
            continue;
        }
        names.push(name);
    }
    names.sort();

    Ok(names
        .into_iter()
        .map(|href| {
            let stem = href.strip_suffix(".html").unwrap_or(&href);
            PostLink {
                title: title_from_stem(stem),
                href: href.clone(),
            }
        })
        .collect())
}

pub fn render_index(posts: &[PostLink], generated_at: DateTime<Utc>) -> String {
    let cards = posts
        .iter()
        .map(|post| {
            format!(
                "<a class='card' href='{}'><div class='card-title'>{}</div></a>",
                escape_html(&post.href).replace('\'', "&#39;"),
                escape_html(&post.title)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<!doctype html>
<html lang='en'>
<head>
  <meta charset='UTF-8'>
  <meta name='viewport' content='width=device-width, initial-scale=1'>
  <title>Repo Blogger — Articles</title>
  <style>
    body {{ font-family: 'Inter', system-ui, -apple-system, sans-serif; margin: 0; padding: 32px; background:#f7f8fa; }}
    h1 {{ margin: 0 0 12px 0; }}
    .meta {{ color:#666; margin-bottom:24px; }}
    .grid {{ display:grid; grid-template-columns: repeat(auto-fit, minmax(240px,1fr)); gap:16px; }}
    .card {{ display:block; padding:16px; background:#fff; border-radius:10px; box-shadow:0 4px 12px rgba(0,0,0,0.06); color:#111; text-decoration:none; }}
    .card-title {{ font-weight:600; line-height:1.4; }}
  </style>
</head>
<body>
  <h1>Repo Blogger</h1>
  <div class='meta'>{count} posts · generated {generated} UTC</div>
  <div class='grid'>
    {cards}
  </div>
</body>
</html>"#,
        count = posts.len(),
        generated = generated_at.format("%Y-%m-%d %H:%M"),
    )
}

/// Regenerate `index.html` in `dir`; returns its path and the number of posts listed.
pub fn write_index(dir: &Path, generated_at: DateTime<Utc>) -> Result<(PathBuf, usize), RenderError> {
    fs::create_dir_all(dir)?;
    let posts = collect_posts(dir)?;
    let path = dir.join(INDEX_FILE);
    fs::write(&path, render_index(&posts, generated_at))?;
    debug!(path = %path.display(), posts = posts.len(), "Wrote article index");
    Ok((path, posts.len()))
}
