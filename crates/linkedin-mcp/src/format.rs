// crates/linkedin-mcp/src/format.rs
// ============================================================================
// Module: Rich Post Formatter
// Description: Offline markup for LinkedIn post text.
// Purpose: Compose emphasis, lists, mentions, and hashtags without posting.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`format_rich_post`] is pure: it never touches the network. Emphasis is
//! applied to every occurrence of each phrase in the base text, then list,
//! mention, and hashtag blocks are appended in that order, each separated by
//! a blank line.

use serde::Deserialize;
use serde::Serialize;

/// Maximum characters LinkedIn accepts in a post.
pub const POST_CHARACTER_LIMIT: usize = 3000;

/// Separator placed between appended blocks.
const BLOCK_SEPARATOR: &str = "\n\n";

/// Formatting request, mirroring the tool arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RichPostRequest {
    /// Base text.
    pub text: String,
    /// Phrases wrapped in `**`.
    pub bold_text: Vec<String>,
    /// Phrases wrapped in `*`.
    pub italic_text: Vec<String>,
    /// Items rendered as `• item`.
    pub bullet_points: Vec<String>,
    /// Items rendered as `1. item`.
    pub numbered_list: Vec<String>,
    /// Tags rendered as `#tag`.
    pub hashtags: Vec<String>,
    /// Names rendered as `@name`.
    pub mentions: Vec<String>,
}

/// Formatting result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichPostResult {
    /// Always `true`.
    pub success: bool,
    /// Composed text.
    pub formatted_text: String,
    /// Length in characters.
    pub character_count: usize,
    /// Whether the text fits in a post.
    pub within_limit: bool,
}

/// Formats a rich post.
#[must_use]
pub fn format_rich_post(request: &RichPostRequest) -> RichPostResult {
    let mut text = request.text.clone();
    for phrase in non_blank(&request.bold_text) {
        text = text.replace(phrase, &format!("**{phrase}**"));
    }
    for phrase in non_blank(&request.italic_text) {
        text = text.replace(phrase, &format!("*{phrase}*"));
    }

    let bullets: Vec<String> =
        non_blank(&request.bullet_points).map(|item| format!("• {item}")).collect();
    let numbered: Vec<String> = non_blank(&request.numbered_list)
        .enumerate()
        .map(|(index, item)| format!("{}. {item}", index + 1))
        .collect();
    let mentions: Vec<String> =
        non_blank(&request.mentions).map(|name| prefix_once('@', name)).collect();
    let hashtags: Vec<String> =
        non_blank(&request.hashtags).map(|tag| prefix_once('#', tag)).collect();

    for block in [bullets.join("\n"), numbered.join("\n"), mentions.join(" "), hashtags.join(" ")] {
        if !block.is_empty() {
            text.push_str(BLOCK_SEPARATOR);
            text.push_str(&block);
        }
    }

    let character_count = text.chars().count();
    RichPostResult {
        success: true,
        formatted_text: text,
        character_count,
        within_limit: character_count <= POST_CHARACTER_LIMIT,
    }
}

/// Prefixes `value` with `marker` unless it already starts with it.
#[must_use]
pub fn prefix_once(marker: char, value: &str) -> String {
    let value = value.trim();
    if value.starts_with(marker) { value.to_string() } else { format!("{marker}{value}") }
}

/// Iterates trimmed, non-empty entries.
fn non_blank(items: &[String]) -> impl Iterator<Item = &str> {
    items.iter().map(|item| item.trim()).filter(|item| !item.is_empty())
}
