//! Text helpers for authoring posts: slugs, reading time, excerpts and
//! markdown rendering.

use serde::Deserialize;

use crate::db::models::NewPost;

const WORDS_PER_MINUTE: usize = 200;
const EXCERPT_CHARS: usize = 150;

/// Turn a title into a URL-safe slug.
///
/// Lowercases, drops anything that isn't an ASCII word character,
/// whitespace or `-`, and joins words with single dashes.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for ch in input.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else if ch.is_whitespace() || ch == '-' {
            pending_dash = true;
        }
    }

    slug
}

/// Estimated minutes to read `text` at 200 words per minute, rounded up.
pub fn reading_time_minutes(text: &str) -> i64 {
    let words = text.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE) as i64
}

/// The first 150 characters of `text`, with `...` when it was cut.
pub fn excerpt(text: &str) -> String {
    let mut chars = text.char_indices();
    match chars.nth(EXCERPT_CHARS) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

pub fn render_markdown(markdown: &str) -> String {
    comrak::markdown_to_html(markdown, &comrak::Options::default())
}

/// What an author submits from the editor.
#[derive(Debug, Clone, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub subtitle: Option<String>,
    pub content: String,
    pub cover_image_url: Option<String>,
    /// Comma separated, e.g. `"rust, databases"`.
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub publish: bool,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DraftError {
    #[error("Title is required")]
    MissingTitle,
    #[error("Content is required")]
    MissingContent,
    #[error("Title does not produce a usable slug")]
    EmptySlug,
}

impl PostDraft {
    /// Tag names from the comma separated list, blanks removed.
    pub fn tag_names(&self) -> Vec<String> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn into_new_post(self, user_id: i64) -> Result<NewPost, DraftError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(DraftError::MissingTitle);
        }
        if self.content.trim().is_empty() {
            return Err(DraftError::MissingContent);
        }
        let slug = slugify(&title);
        if slug.is_empty() {
            return Err(DraftError::EmptySlug);
        }

        Ok(NewPost {
            slug,
            subtitle: self.subtitle.filter(|s| !s.trim().is_empty()),
            content_html: Some(render_markdown(&self.content)),
            excerpt: Some(excerpt(&self.content)),
            cover_image_url: self.cover_image_url.filter(|s| !s.trim().is_empty()),
            reading_time_minutes: Some(reading_time_minutes(&self.content)),
            is_published: self.publish,
            is_featured: false,
            user_id,
            published_at: None,
            title,
            content: self.content,
        })
    }
}
