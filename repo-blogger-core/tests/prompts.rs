use repo_blogger_core::model::{Draft, Section};
use repo_blogger_core::prompts::{generate_prompts, BASE_STYLE, DETAIL_CHARS, HERO_SECTION};

#[test]
fn draft_without_sections_gets_one_hero_prompt() {
    let draft = Draft {
        title: "Test".to_string(),
        ..Draft::default()
    };
    let prompts = generate_prompts(&draft);
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0].section, HERO_SECTION);
    assert!(prompts[0].prompt.contains("Test"));
    assert!(prompts[0].prompt.ends_with(BASE_STYLE));
}

#[test]
fn single_section_prompt_quotes_its_content() {
    let draft = Draft {
        title: "Test".to_string(),
        sections: vec![Section::new("A", "hello")],
        ..Draft::default()
    };
    let prompts = generate_prompts(&draft);
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0].section, "A");
    assert!(prompts[0].prompt.contains("hello"));
    assert_eq!(
        prompts[0].prompt,
        format!("Illustration for Test - A: hello, {BASE_STYLE}")
    );
}

#[test]
fn prompts_follow_section_order_and_truncate_detail() {
    let long = "ü".repeat(DETAIL_CHARS + 50);
    let draft = Draft {
        title: "Widget".to_string(),
        sections: vec![
            Section::new("First", long.clone()),
            Section::new("Second", "two"),
            Section::new("", "untitled"),
        ],
        ..Draft::default()
    };
    let prompts = generate_prompts(&draft);
    let sections: Vec<&str> = prompts.iter().map(|p| p.section.as_str()).collect();
    assert_eq!(sections, vec!["First", "Second", "section"]);

    let quoted = "ü".repeat(DETAIL_CHARS);
    assert!(prompts[0].prompt.contains(&format!("First: {quoted}, ")));
    assert!(!prompts[0].prompt.contains(&"ü".repeat(DETAIL_CHARS + 1)));
}

#[test]
fn empty_title_falls_back() {
    let prompts = generate_prompts(&Draft::default());
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].prompt.starts_with("Hero image for an open-source project,"));
}
