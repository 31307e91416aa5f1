use chrono::{TimeZone, Utc};
use repo_blogger_core::model::Draft;
use repo_blogger_core::render::{collect_posts, write_index, write_local_outputs, INDEX_FILE};
use std::fs;
use tempfile::tempdir;

fn draft(title: &str, body: &str) -> Draft {
    Draft {
        title: title.to_string(),
        body_md: body.to_string(),
        ..Draft::default()
    }
}

#[test]
fn local_outputs_are_named_by_slug() {
    let dir = tempdir().expect("tempdir");
    let out_dir = dir.path().join("articles").join("final");

    let outputs = write_local_outputs(&out_dir, &draft("widget — open-source introduction", "# T\n\nbody\n"))
        .expect("outputs written");

    assert_eq!(
        outputs.markdown.file_name().and_then(|n| n.to_str()),
        Some("widget_—_open-source_introduction.md")
    );
    assert_eq!(fs::read_to_string(&outputs.markdown).unwrap(), "# T\n\nbody\n");
    assert_eq!(
        fs::read_to_string(&outputs.html).unwrap(),
        "<html><body># T<br><br>body<br></body></html>"
    );
}

#[test]
fn index_lists_articles_but_not_itself() {
    let dir = tempdir().expect("tempdir");
    write_local_outputs(dir.path(), &draft("beta — open-source introduction", "b")).unwrap();
    write_local_outputs(dir.path(), &draft("alpha — open-source introduction", "a")).unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let generated_at = Utc.with_ymd_and_hms(2025, 2, 3, 4, 5, 0).unwrap();
    let (path, count) = write_index(dir.path(), generated_at).expect("index written");
    assert_eq!(count, 2);
    assert_eq!(path.file_name().and_then(|n| n.to_str()), Some(INDEX_FILE));

    // A second run must not pick up the index it wrote the first time.
    let (_, count_again) = write_index(dir.path(), generated_at).expect("index rewritten");
    assert_eq!(count_again, 2);

    let posts = collect_posts(dir.path()).unwrap();
    let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["alpha — open-source introduction", "beta — open-source introduction"]
    );

    let html = fs::read_to_string(&path).unwrap();
    assert!(html.contains("2 posts · generated 2025-02-03 04:05 UTC"));
    assert!(html.contains("href='alpha_—_open-source_introduction.html'"));
}

#[test]
fn index_of_empty_directory_has_no_cards() {
    let dir = tempdir().expect("tempdir");
    let generated_at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let (path, count) = write_index(&dir.path().join("fresh"), generated_at).expect("index written");
    assert_eq!(count, 0);
    assert!(!fs::read_to_string(path).unwrap().contains("class='card'"));
}
