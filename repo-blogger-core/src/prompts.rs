//! Draft → image-generation prompts, one per section.

use crate::model::{Draft, Prompt};

pub const BASE_STYLE: &str = "ultra-detailed, cinematic lighting, clean UI, trending on artstation";
pub const HERO_SECTION: &str = "hero";
/// Characters of section content quoted in each prompt.
pub const DETAIL_CHARS: usize = 180;

const FALLBACK_TITLE: &str = "an open-source project";
const FALLBACK_SECTION: &str = "section";

/// One prompt per section in order, or a single hero prompt for a draft
/// without sections.
pub fn generate_prompts(draft: &Draft) -> Vec<Prompt> {
    let title = if draft.title.is_empty() {
        FALLBACK_TITLE
    } else {
        draft.title.as_str()
    };

    if draft.sections.is_empty() {
        return vec![Prompt {
            section: HERO_SECTION.to_string(),
            prompt: format!("Hero image for {title}, futuristic knowledge graph, {BASE_STYLE}"),
        }];
    }

    draft
        .sections
        .iter()
        .map(|section| {
            let section_title = if section.title.is_empty() {
                FALLBACK_SECTION
            } else {
                section.title.as_str()
            };
            let detail: String = section.content.chars().take(DETAIL_CHARS).collect();
            Prompt {
                section: section_title.to_string(),
                prompt: format!("Illustration for {title} - {section_title}: {detail}, {BASE_STYLE}"),
            }
        })
        .collect()
}
